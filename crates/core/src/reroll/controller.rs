//! This module exists to run the two-phase map reroll transaction and the in-place geyser
//! reroll against an explicitly passed [`Host`].
//! It does not generate maps itself; the host completes the queued long event and then calls
//! [`RerollController::on_session_loaded`] to finish the transaction.

#[cfg(test)]
mod tests;

use super::RerollError;
use super::budget::{DepletionContext, DepletionPlan, FULL_BUDGET, debit_and_deplete, execute};
use super::loading::{LoadingMessageOverride, install_loading_message, restore_loading_message};
use super::scatter_retry::{
    MAX_SCATTER_ATTEMPTS, ScatterRetryOutcome, regenerate_scattered_feature,
};
use super::snapshot::InitialSessionSnapshot;
use super::state_reset::reset_scatter_steps;
use crate::host::{Host, LongEvent};
use crate::language::GENERATING_MAP_KEY;
use crate::mapgen::GenContext;
use crate::mapgen::seed::random_seed_string;
use crate::settings::RerollSettings;
use crate::types::{PawnId, ProgramState, RerollEvent, RerollKind, ThingKind};
use crate::world::RelationKind;

pub const REROLL_LONG_EVENT_LABEL: &str = "MapReroll_RerollMap";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RerollPhase {
    Idle,
    /// A replacement session is queued; the next session load completes it.
    RerollPending,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RerollTrigger {
    Started,
    AlreadyPending,
}

type Observer = Box<dyn FnMut(&RerollEvent)>;

pub struct RerollController {
    phase: RerollPhase,
    budget: f64,
    original_seed: Option<String>,
    snapshot: Option<InitialSessionSnapshot>,
    loading_override: Option<LoadingMessageOverride>,
    observers: Vec<Observer>,
}

impl Default for RerollController {
    fn default() -> Self {
        Self::new()
    }
}

impl RerollController {
    pub fn new() -> Self {
        Self {
            phase: RerollPhase::Idle,
            budget: FULL_BUDGET,
            original_seed: None,
            snapshot: None,
            loading_override: None,
            observers: Vec::new(),
        }
    }

    /// Registers an observer; events are delivered only after a reroll fully commits.
    pub fn subscribe(&mut self, observer: impl FnMut(&RerollEvent) + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub fn phase(&self) -> RerollPhase {
        self.phase
    }

    pub fn remaining_budget(&self) -> f64 {
        self.budget
    }

    pub fn snapshot(&self) -> Option<&InitialSessionSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn can_afford(&self, host: &Host, kind: RerollKind) -> bool {
        host.defs.settings.as_ref().is_some_and(|settings| self.budget >= settings.cost_of(kind))
    }

    /// Whether the reroll controls belong on screen: a freshly landed, still unnamed colony.
    pub fn show_interface(&self, host: &Host) -> bool {
        let session = &host.session;
        let colony_unnamed = session
            .world
            .factions
            .player()
            .and_then(|player| session.world.factions.get(player))
            .is_some_and(|faction| !faction.has_name());
        session.program_state == ProgramState::MapPlaying
            && host.defs.settings.as_ref().is_some_and(|settings| settings.enable_interface)
            && session.map.is_some()
            && self.snapshot.is_some()
            && colony_unnamed
    }

    /// Finishes a pending reroll, or initialises reroll state for a freshly loaded session.
    pub fn on_session_loaded(&mut self, host: &mut Host) -> Result<(), RerollError> {
        let settings = loaded_settings(host)?;
        reset_scatter_steps(&mut host.defs.plan);

        match self.phase {
            RerollPhase::RerollPending => self.complete_map_reroll(host, &settings),
            RerollPhase::Idle => {
                self.budget = FULL_BUDGET;
                self.original_seed = Some(host.session.world.info.seed_string.clone());
                self.snapshot =
                    host.session.init_data.as_ref().map(InitialSessionSnapshot::capture);
                tracing::debug!(target: "map_reroll::controller", "controller.session_fresh");
                Ok(())
            }
        }
    }

    /// Tears down the current map and queues a replacement session with a fresh world seed.
    pub fn trigger_map_reroll(&mut self, host: &mut Host) -> Result<RerollTrigger, RerollError> {
        if self.phase == RerollPhase::RerollPending {
            tracing::debug!(target: "map_reroll::controller", "controller.reroll_already_pending");
            return Ok(RerollTrigger::AlreadyPending);
        }
        let settings = loaded_settings(host)?;
        let Some(snapshot) = self.snapshot.clone() else {
            tracing::error!(target: "map_reroll::controller", "controller.no_snapshot");
            return Err(RerollError::NoSnapshot);
        };

        detach_colonists(host);
        host.session.selector.clear();
        let square = snapshot.starting_square;
        let discarded = host.session.world.factions.discard_square_factions(square);

        host.session.renew();
        host.session.world.info.seed_string = random_seed_string(&mut host.rng);

        let player = host.session.prepare_init_data(|init| snapshot.apply_to(init));
        host.session.clear_starting_pawns();
        for pawn in &snapshot.starting_pawns {
            if !host.session.stage_starting_pawn(*pawn, player) {
                tracing::warn!(
                    target: "map_reroll::controller",
                    pawn = ?pawn,
                    "controller.colonist_missing"
                );
            }
        }

        reset_scatter_steps(&mut host.defs.plan);
        self.loading_override =
            install_loading_message(&mut host.language, &settings, &mut host.rng);
        host.long_events.push(LongEvent {
            label: REROLL_LONG_EVENT_LABEL.to_string(),
            text_key: GENERATING_MAP_KEY.to_string(),
            asynchronous: true,
        });

        self.phase = RerollPhase::RerollPending;
        tracing::info!(
            target: "map_reroll::controller",
            discarded_factions = discarded,
            generation = host.session.generation,
            loading_message = ?self.loading_override.as_ref().map(|installed| &installed.key),
            "controller.map_reroll_queued"
        );
        Ok(RerollTrigger::Started)
    }

    /// Regenerates the geysers of the current map in place and debits the geyser cost.
    pub fn trigger_geyser_reroll(
        &mut self,
        host: &mut Host,
    ) -> Result<ScatterRetryOutcome, RerollError> {
        let settings = loaded_settings(host)?;
        let Some(map) = host.session.map.as_mut() else {
            tracing::error!(target: "map_reroll::controller", "controller.no_active_map");
            return Err(RerollError::NoActiveMap);
        };
        let kind = ThingKind::SteamGeyser;
        let step = match host.defs.plan.scatter_step_index(kind) {
            Some(index) => host.defs.plan.step_mut(index),
            None => None,
        };
        let Some(step) = step else {
            tracing::error!(
                target: "map_reroll::controller",
                kind = ?kind,
                "controller.no_scatter_step"
            );
            return Err(RerollError::MissingScatterStep { kind });
        };

        let rock_types = host.session.world.natural_rock_types_in(map.square());
        let start_spot = map.center();
        let outcome = {
            let mut context = GenContext {
                map: &mut *map,
                rng: &mut host.rng,
                rock_types: &rock_types,
                start_spot,
            };
            regenerate_scattered_feature(
                step,
                kind,
                &mut context,
                &mut host.session.selector,
                MAX_SCATTER_ATTEMPTS,
            )
        };

        let mut context = DepletionContext::with_native_filler(
            map,
            &mut host.session.selector,
            &mut host.rng,
            &rock_types,
            settings.log_consumed_resources,
        );
        let report = debit_and_deplete(settings.geyser_reroll_cost, self.budget, &mut context);
        self.budget = report.plan.new_budget;

        tracing::info!(
            target: "map_reroll::controller",
            attempts = outcome.attempts,
            collision_free = outcome.collision_free,
            budget = self.budget,
            "controller.geysers_rerolled"
        );
        self.publish(RerollEvent::GeysersRerolled {
            budget_remaining: self.budget,
            attempts: outcome.attempts,
            collision_free: outcome.collision_free,
        });
        Ok(outcome)
    }

    fn complete_map_reroll(
        &mut self,
        host: &mut Host,
        settings: &RerollSettings,
    ) -> Result<(), RerollError> {
        let Some(map) = host.session.map.as_mut() else {
            tracing::error!(target: "map_reroll::controller", "controller.no_active_map");
            return Err(RerollError::NoActiveMap);
        };
        let rock_types = host.session.world.natural_rock_types_in(map.square());
        let mut context = DepletionContext::with_native_filler(
            map,
            &mut host.session.selector,
            &mut host.rng,
            &rock_types,
            settings.log_consumed_resources,
        );

        // The fresh map starts full; bring it down to the carried-over level first.
        let carry_over = DepletionPlan::compute(
            context.map.deposits().len(),
            FULL_BUDGET,
            FULL_BUDGET - self.budget,
        );
        let carried = execute(&carry_over, &mut context);
        let debit = debit_and_deplete(settings.map_reroll_cost, self.budget, &mut context);
        self.budget = debit.plan.new_budget;

        if let Some(seed) = self.original_seed.clone() {
            host.session.world.info.seed_string = seed;
        }
        host.windows.try_remove_intro();
        if let Some(installed) = self.loading_override.take() {
            restore_loading_message(&mut host.language, installed);
        }
        self.phase = RerollPhase::Idle;

        tracing::info!(
            target: "map_reroll::controller",
            carried_removed = carried.removed,
            debit_removed = debit.removed,
            budget = self.budget,
            generation = host.session.generation,
            "controller.map_rerolled"
        );
        self.publish(RerollEvent::MapRerolled {
            session_generation: host.session.generation,
            budget_remaining: self.budget,
        });
        Ok(())
    }

    fn publish(&mut self, event: RerollEvent) {
        for observer in &mut self.observers {
            observer(&event);
        }
    }
}

fn loaded_settings(host: &Host) -> Result<RerollSettings, RerollError> {
    host.defs.settings.clone().ok_or_else(|| {
        tracing::error!(target: "map_reroll::controller", "controller.missing_settings");
        RerollError::MissingSettings
    })
}

/// Pulls the player's colonists off the map and cuts bonds to pawns left behind.
fn detach_colonists(host: &mut Host) {
    let Some(map) = host.session.map.as_mut() else {
        return;
    };
    let world = &mut host.session.world;
    let player = world.factions.player();
    let colonists: Vec<PawnId> = map
        .pawns()
        .iter()
        .copied()
        .filter(|id| world.pawns.get(*id).is_some_and(|pawn| pawn.is_colonist(player)))
        .collect();

    for id in &colonists {
        if map.is_pawn_spawned(*id)
            && let Some(pawn) = world.pawns.get_mut(*id)
        {
            pawn.clear_mind();
            pawn.clear_reservations();
            pawn.reset_health();
            map.despawn_pawn(*id);
        }
        let left_behind: Vec<PawnId> = world
            .pawns
            .get(*id)
            .map(|pawn| {
                pawn.relations
                    .iter()
                    .filter(|relation| {
                        relation.kind == RelationKind::Bond && !colonists.contains(&relation.other)
                    })
                    .map(|relation| relation.other)
                    .collect()
            })
            .unwrap_or_default();
        for bonded in left_behind {
            world.pawns.remove_direct_relation(*id, RelationKind::Bond, bonded);
        }
    }
}
