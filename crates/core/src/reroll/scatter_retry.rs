//! Bounded re-runs of one scatter step until its output avoids the cells it replaced.

use std::collections::BTreeSet;

use super::state_reset::reset_scatter_step;
use crate::mapgen::{GenContext, GenStep};
use crate::types::{Pos, ThingKind};
use crate::world::{DestroyGuard, Selector};

pub const MAX_SCATTER_ATTEMPTS: u32 = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScatterRetryOutcome {
    pub attempts: u32,
    /// Whether the accepted attempt avoided every previously occupied cell.
    pub collision_free: bool,
    pub placed: usize,
}

/// Replaces every `kind` instance by re-running `step`, retrying while a new instance lands on
/// a cell the previous instances occupied. The last attempt is kept either way.
pub fn regenerate_scattered_feature(
    step: &mut dyn GenStep,
    kind: ThingKind,
    context: &mut GenContext<'_>,
    selector: &mut Selector,
    max_attempts: u32,
) -> ScatterRetryOutcome {
    let max_attempts = max_attempts.max(1);
    let mut attempts = 0;
    let mut collision_free = false;

    while attempts < max_attempts {
        attempts += 1;
        let previous: BTreeSet<Pos> = context.map.positions_of_kind(kind).into_iter().collect();
        for id in context.map.things_of_kind(kind) {
            if let Err(err) = context.map.destroy(id, DestroyGuard::Bypass, selector) {
                tracing::warn!(target: "map_reroll::scatter", error = %err, "scatter.destroy_failed");
            }
        }

        step.generate(context);
        reset_scatter_step(step);

        collision_free =
            !context.map.positions_of_kind(kind).iter().any(|pos| previous.contains(pos));
        if collision_free {
            break;
        }
        tracing::debug!(
            target: "map_reroll::scatter",
            attempt = attempts,
            kind = ?kind,
            "scatter.collision"
        );
    }

    if !collision_free {
        tracing::debug!(
            target: "map_reroll::scatter",
            attempts,
            kind = ?kind,
            "scatter.collision_accepted"
        );
    }
    ScatterRetryOutcome { attempts, collision_free, placed: context.map.count_of_kind(kind) }
}

#[cfg(test)]
mod tests {
    use rand_chacha::ChaCha8Rng;
    use rand_chacha::rand_core::SeedableRng;

    use super::*;
    use crate::mapgen::{ScatterPlacement, ScatterThingsStep};
    use crate::types::{ThingState, WorldSquare};
    use crate::world::Map;

    /// Always places its kind on the same cell.
    struct FixedSpotStep {
        kind: ThingKind,
        pos: Pos,
        runs: u32,
    }

    impl GenStep for FixedSpotStep {
        fn label(&self) -> &str {
            "fixed_spot"
        }

        fn generate(&mut self, context: &mut GenContext<'_>) {
            self.runs += 1;
            context.map.spawn(self.kind, self.pos).expect("in bounds");
        }
    }

    fn run(
        step: &mut dyn GenStep,
        map: &mut Map,
        selector: &mut Selector,
        max_attempts: u32,
    ) -> ScatterRetryOutcome {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let start_spot = map.center();
        let mut context = GenContext { map, rng: &mut rng, rock_types: &[], start_spot };
        let kind = ThingKind::SteamGeyser;
        regenerate_scattered_feature(step, kind, &mut context, selector, max_attempts)
    }

    #[test]
    fn persistent_collision_stops_after_max_attempts() {
        let pos = Pos { y: 2, x: 2 };
        let mut map = Map::new(10, 10, WorldSquare { x: 0, z: 0 });
        map.spawn(ThingKind::SteamGeyser, pos).expect("in bounds");
        let mut selector = Selector::default();
        let mut step = FixedSpotStep { kind: ThingKind::SteamGeyser, pos, runs: 0 };

        let outcome = run(&mut step, &mut map, &mut selector, MAX_SCATTER_ATTEMPTS);

        assert_eq!(outcome.attempts, MAX_SCATTER_ATTEMPTS);
        assert!(!outcome.collision_free);
        assert_eq!(step.runs, MAX_SCATTER_ATTEMPTS);
        assert_eq!(map.positions_of_kind(ThingKind::SteamGeyser), vec![pos]);
    }

    #[test]
    fn zero_attempts_still_runs_once() {
        let pos = Pos { y: 2, x: 2 };
        let mut map = Map::new(10, 10, WorldSquare { x: 0, z: 0 });
        map.spawn(ThingKind::SteamGeyser, pos).expect("in bounds");
        let mut selector = Selector::default();
        let mut step = FixedSpotStep { kind: ThingKind::SteamGeyser, pos, runs: 0 };

        let outcome = run(&mut step, &mut map, &mut selector, 0);

        assert_eq!(outcome.attempts, 1);
        assert_eq!(step.runs, 1);
    }

    #[test]
    fn empty_map_is_collision_free_on_the_first_attempt() {
        let mut map = Map::new(30, 30, WorldSquare { x: 0, z: 0 });
        let mut selector = Selector::default();
        let mut step =
            ScatterThingsStep::new(ThingKind::SteamGeyser, 20, 3, ScatterPlacement::OpenGround);

        let outcome = run(&mut step, &mut map, &mut selector, MAX_SCATTER_ATTEMPTS);

        assert_eq!(outcome.attempts, 1);
        assert!(outcome.collision_free);
        assert_eq!(outcome.placed, map.count_of_kind(ThingKind::SteamGeyser));
        assert!(step.used_spots().is_empty(), "cache is reset after each attempt");
    }

    #[test]
    fn destroyed_instances_are_deselected() {
        let pos = Pos { y: 7, x: 7 };
        let mut map = Map::new(10, 10, WorldSquare { x: 0, z: 0 });
        let old = map.spawn(ThingKind::SteamGeyser, pos).expect("in bounds");
        let mut selector = Selector::default();
        selector.select_thing(old);
        let mut step =
            FixedSpotStep { kind: ThingKind::SteamGeyser, pos: Pos { y: 1, x: 1 }, runs: 0 };

        let outcome = run(&mut step, &mut map, &mut selector, MAX_SCATTER_ATTEMPTS);

        assert!(outcome.collision_free);
        assert!(!selector.is_thing_selected(old));
        assert_eq!(map.thing(old).map(|thing| thing.state()), Some(ThingState::Destroyed));
    }
}
