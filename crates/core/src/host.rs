//! This module exists to bundle the game-wide services a reroll touches into one explicitly
//! passed context: the session, loaded defs, the language table, the long-event queue, the
//! window stack and the shared RNG.
//! It does not decide when a reroll happens; callers drive it through `complete_loading`.

use std::collections::VecDeque;

use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::SeedableRng;
use thiserror::Error;

use crate::language::{GENERATING_MAP_KEY, Language};
use crate::mapgen::{GenerationPlan, default_plan, generate_map};
use crate::session::{CrashlandedScenario, GameInitData, Scenario, Session, Storyteller};
use crate::settings::RerollSettings;
use crate::types::{Pos, ProgramState, WorldSquare};
use crate::world::{Map, PawnKind, RelationKind, World};

/// Loaded definitions: reroll settings and the map generation plan.
pub struct Defs {
    pub settings: Option<RerollSettings>,
    pub plan: GenerationPlan,
}

impl Defs {
    pub fn new(settings: Option<RerollSettings>) -> Self {
        Self { settings, plan: default_plan() }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Window {
    /// Scenario intro text shown when a new colony lands.
    IntroDialog,
    Message(String),
}

#[derive(Clone, Debug, Default)]
pub struct WindowStack {
    windows: Vec<Window>,
}

impl WindowStack {
    pub fn push(&mut self, window: Window) {
        self.windows.push(window);
    }

    /// Closes the topmost intro dialog, if one is open.
    pub fn try_remove_intro(&mut self) -> bool {
        match self.windows.iter().rposition(|window| *window == Window::IntroDialog) {
            Some(index) => {
                self.windows.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, window: &Window) -> bool {
        self.windows.contains(window)
    }

    pub fn count(&self, window: &Window) -> usize {
        self.windows.iter().filter(|open| *open == window).count()
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }
}

/// Work deferred behind a loading screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LongEvent {
    pub label: String,
    /// Language key for the text shown while the event runs.
    pub text_key: String,
    pub asynchronous: bool,
}

#[derive(Clone, Debug, Default)]
pub struct LongEventQueue {
    queue: VecDeque<LongEvent>,
}

impl LongEventQueue {
    pub fn push(&mut self, event: LongEvent) {
        self.queue.push_back(event);
    }

    pub fn pop(&mut self) -> Option<LongEvent> {
        self.queue.pop_front()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LoadError {
    #[error("session has no init data to generate a map from")]
    NoInitData,
}

#[derive(Clone, Debug)]
pub struct NewGameConfig {
    pub seed_string: String,
    pub terrain_seed: u64,
    pub rng_seed: u64,
    pub starting_square: WorldSquare,
    pub map_size: usize,
    pub colonists: Vec<String>,
    /// Animal bonded to the first colonist.
    pub pet: Option<String>,
    pub permadeath: bool,
    pub starting_month: u8,
}

impl Default for NewGameConfig {
    fn default() -> Self {
        Self {
            seed_string: "bucolic".to_string(),
            terrain_seed: 1,
            rng_seed: 7,
            starting_square: WorldSquare { x: 24, z: 61 },
            map_size: 60,
            colonists: vec!["Engie".to_string(), "Doc".to_string(), "Hunter".to_string()],
            pet: Some("Husky".to_string()),
            permadeath: false,
            starting_month: 3,
        }
    }
}

pub struct Host {
    pub session: Session,
    pub defs: Defs,
    pub language: Language,
    pub long_events: LongEventQueue,
    pub windows: WindowStack,
    pub rng: ChaCha8Rng,
    loading_texts: Vec<String>,
}

impl Host {
    pub fn new(session: Session, defs: Defs, rng_seed: u64) -> Self {
        Self {
            session,
            defs,
            language: Language::english(),
            long_events: LongEventQueue::default(),
            windows: WindowStack::default(),
            rng: ChaCha8Rng::seed_from_u64(rng_seed),
            loading_texts: Vec::new(),
        }
    }

    /// Creates a world and a crash-landed session, then queues the initial map generation.
    pub fn new_game(config: &NewGameConfig, defs: Defs) -> Self {
        Self::new_game_with_scenario(config, defs, Box::new(CrashlandedScenario::default()))
    }

    pub fn new_game_with_scenario(
        config: &NewGameConfig,
        defs: Defs,
        scenario: Box<dyn Scenario>,
    ) -> Self {
        let mut world = World::new(&config.seed_string, config.terrain_seed);
        world.factions.add("Outlanders", false, None);
        world.factions.add("Pirates", false, None);

        let colonists: Vec<_> = config
            .colonists
            .iter()
            .map(|name| world.pawns.add(name, PawnKind::Humanlike, None))
            .collect();
        let pet = config.pet.as_deref().map(|name| world.pawns.add(name, PawnKind::Animal, None));
        if let (Some(pet), Some(first)) = (pet, colonists.first()) {
            world.pawns.add_direct_relation(*first, RelationKind::Bond, pet);
        }

        let mut session = Session::new(world, scenario, Storyteller::default());
        let player = session.prepare_init_data(|init| {
            init.starting_square = config.starting_square;
            init.map_size = config.map_size;
            init.permadeath = config.permadeath;
            init.starting_month = config.starting_month;
        });
        for colonist in colonists {
            session.stage_starting_pawn(colonist, player);
        }
        if let Some(pet) = pet {
            if let Some(record) = session.world.pawns.get_mut(pet) {
                record.faction = Some(player);
            }
            if let Some(init) = session.init_data.as_mut() {
                init.starting_animals.push(pet);
            }
        }

        let mut host = Self::new(session, defs, config.rng_seed);
        host.long_events.push(LongEvent {
            label: "GeneratingMap".to_string(),
            text_key: GENERATING_MAP_KEY.to_string(),
            asynchronous: true,
        });
        host
    }

    /// Runs queued long events, then generates and populates the pending map.
    pub fn complete_loading(&mut self) -> Result<(), LoadError> {
        while let Some(event) = self.long_events.pop() {
            let text = self.language.translate(&event.text_key);
            tracing::debug!(
                target: "map_reroll::host",
                label = %event.label,
                text = %text,
                asynchronous = event.asynchronous,
                "long_event.run"
            );
            self.loading_texts.push(text);
        }

        let init = self.session.init_data.as_ref().ok_or(LoadError::NoInitData)?;
        let (square, size) = (init.starting_square, init.map_size);
        let mut map = generate_map(&mut self.defs.plan, &self.session.world, square, size);
        drop_in_arrivals(&mut map, init);

        self.session.map = Some(map);
        self.session.program_state = ProgramState::MapPlaying;
        self.windows.push(Window::IntroDialog);
        Ok(())
    }

    /// Texts shown on loading screens so far, oldest first.
    pub fn loading_texts(&self) -> &[String] {
        &self.loading_texts
    }
}

fn drop_in_arrivals(map: &mut Map, init: &GameInitData) {
    let center = map.center();
    let arrivals = init.starting_pawns.iter().chain(init.starting_animals.iter());
    for (index, pawn) in arrivals.enumerate() {
        let desired = Pos { y: center.y, x: center.x + index as i32 };
        let spot = map.nearest_open_cell(desired);
        if spot.is_none() {
            tracing::warn!(target: "map_reroll::host", pawn = ?pawn, "arrival.no_open_cell");
        }
        map.add_pawn(*pawn, spot);
    }

    for (index, (kind, count)) in init.staged_things.iter().enumerate() {
        let desired = Pos { y: center.y + 1, x: center.x + index as i32 };
        let Some(spot) = map.nearest_open_cell(desired) else {
            continue;
        };
        if let Err(err) = map.spawn(*kind, spot) {
            tracing::warn!(
                target: "map_reroll::host",
                kind = ?kind,
                count,
                error = %err,
                "arrival.spawn_failed"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_game_queues_generation_and_loading_builds_the_map() {
        let mut host = Host::new_game(&NewGameConfig::default(), Defs::new(None));
        assert_eq!(host.long_events.len(), 1);
        assert!(host.session.map.is_none());

        host.complete_loading().expect("init data present");

        let map = host.session.map.as_ref().expect("map generated");
        assert!(host.long_events.is_empty());
        assert_eq!(host.loading_texts(), ["Generating map".to_string()]);
        assert_eq!(host.session.program_state, ProgramState::MapPlaying);
        assert!(host.windows.contains(&Window::IntroDialog));
        assert_eq!(map.pawns().len(), 4);
        for pawn in map.pawns() {
            assert!(map.is_pawn_spawned(*pawn));
        }
    }

    #[test]
    fn colonists_join_the_player_faction_and_the_pet_is_bonded() {
        let host = Host::new_game(&NewGameConfig::default(), Defs::new(None));
        let player = host.session.world.factions.player();
        let init = host.session.init_data.as_ref().expect("init data");
        assert_eq!(init.starting_pawns.len(), 3);
        for pawn in &init.starting_pawns {
            let record = host.session.world.pawns.get(*pawn).expect("registered");
            assert!(record.is_colonist(player));
        }
        let first = host.session.world.pawns.get(init.starting_pawns[0]).expect("registered");
        let pet = init.starting_animals.first().copied();
        assert_eq!(first.first_direct_relation(RelationKind::Bond), pet);
    }

    #[test]
    fn loading_without_init_data_fails() {
        let mut host = Host::new_game(&NewGameConfig::default(), Defs::new(None));
        host.session.renew();
        assert_eq!(host.complete_loading(), Err(LoadError::NoInitData));
    }

    #[test]
    fn removing_the_intro_only_touches_intro_dialogs() {
        let mut windows = WindowStack::default();
        windows.push(Window::Message("Raid".to_string()));
        assert!(!windows.try_remove_intro());
        windows.push(Window::IntroDialog);
        assert!(windows.try_remove_intro());
        assert_eq!(windows.len(), 1);
    }
}
