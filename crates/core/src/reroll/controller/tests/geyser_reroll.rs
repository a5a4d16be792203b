use super::support::*;
use crate::mapgen::GenerationPlan;

#[test]
fn geyser_reroll_debits_its_cost_and_keeps_the_phase() {
    let (mut host, mut controller) = booted_game(RerollSettings::default());
    let events = record_events(&mut controller);
    let seed = host.session.world.info.seed_string.clone();

    let outcome = controller.trigger_geyser_reroll(&mut host).expect("rerolled");

    assert!((1..=MAX_SCATTER_ATTEMPTS).contains(&outcome.attempts));
    assert_eq!(controller.remaining_budget(), 95.0);
    assert_eq!(controller.phase(), RerollPhase::Idle);
    assert_eq!(host.session.world.info.seed_string, seed);
    let placed = host.session.map.as_ref().map(|map| map.count_of_kind(ThingKind::SteamGeyser));
    assert_eq!(placed, Some(outcome.placed));
    assert_eq!(
        *events.borrow(),
        vec![RerollEvent::GeysersRerolled {
            budget_remaining: 95.0,
            attempts: outcome.attempts,
            collision_free: outcome.collision_free,
        }]
    );
}

#[test]
fn geyser_reroll_needs_an_active_map() {
    let (mut host, mut controller) = booted_game(RerollSettings::default());
    controller.trigger_map_reroll(&mut host).expect("started");

    assert_eq!(controller.trigger_geyser_reroll(&mut host), Err(RerollError::NoActiveMap));
    assert_eq!(controller.remaining_budget(), 100.0);
}

#[test]
fn geyser_reroll_without_a_geyser_step_aborts() {
    let (mut host, mut controller) = booted_game(RerollSettings::default());
    host.defs.plan = GenerationPlan::new(Vec::new());
    let geysers = host.session.map.as_ref().map(|map| map.count_of_kind(ThingKind::SteamGeyser));

    assert_eq!(
        controller.trigger_geyser_reroll(&mut host),
        Err(RerollError::MissingScatterStep { kind: ThingKind::SteamGeyser })
    );
    assert_eq!(controller.remaining_budget(), 100.0);
    let after = host.session.map.as_ref().map(|map| map.count_of_kind(ThingKind::SteamGeyser));
    assert_eq!(after, geysers);
}

#[test]
fn geyser_reroll_without_settings_aborts() {
    let (mut host, mut controller) = booted_game(RerollSettings::default());
    host.defs.settings = None;

    assert_eq!(controller.trigger_geyser_reroll(&mut host), Err(RerollError::MissingSettings));
}
