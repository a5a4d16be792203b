//! This module exists to hold one play-through's identity: the world, the scenario, the
//! storyteller and the map currently being played.
//! It does not own generation or reroll policy; it only offers the renewal and setup steps
//! those flows are built from.

pub mod scenario;

use crate::types::{FactionId, PawnId, ProgramState, ThingKind, WorldSquare};
use crate::world::{Map, Selector, World};

pub use scenario::{CrashlandedScenario, Scenario};

pub const DEFAULT_MAP_SIZE: usize = 75;
const PLAYER_FACTION_LABEL: &str = "New Arrivals";

/// Starting conditions for the next map to be generated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameInitData {
    pub starting_square: WorldSquare,
    pub permadeath: bool,
    pub starting_month: u8,
    pub map_size: usize,
    /// Colonists dropped onto the map, in order.
    pub starting_pawns: Vec<PawnId>,
    /// Pets and pack animals arriving with the colonists.
    pub starting_animals: Vec<PawnId>,
    pub player_faction: Option<FactionId>,
    pub staged_things: Vec<(ThingKind, u32)>,
}

impl Default for GameInitData {
    fn default() -> Self {
        Self {
            starting_square: WorldSquare { x: 0, z: 0 },
            permadeath: false,
            starting_month: 0,
            map_size: DEFAULT_MAP_SIZE,
            starting_pawns: Vec::new(),
            starting_animals: Vec::new(),
            player_faction: None,
            staged_things: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Storyteller {
    pub name: String,
    pub difficulty: u8,
}

impl Default for Storyteller {
    fn default() -> Self {
        Self { name: "Cassandra Classic".to_string(), difficulty: 3 }
    }
}

pub struct Session {
    /// Incremented every time the session is renewed in place.
    pub generation: u32,
    pub program_state: ProgramState,
    pub init_data: Option<GameInitData>,
    pub world: World,
    pub scenario: Box<dyn Scenario>,
    pub storyteller: Storyteller,
    pub map: Option<Map>,
    pub selector: Selector,
}

impl Session {
    pub fn new(world: World, scenario: Box<dyn Scenario>, storyteller: Storyteller) -> Self {
        Self {
            generation: 0,
            program_state: ProgramState::Entry,
            init_data: None,
            world,
            scenario,
            storyteller,
            map: None,
            selector: Selector::default(),
        }
    }

    /// Starts a replacement session over the same world, scenario and storyteller.
    ///
    /// The current map is dropped before anything else changes.
    pub fn renew(&mut self) {
        self.map = None;
        self.selector.clear();
        self.init_data = None;
        self.program_state = ProgramState::Entry;
        self.generation += 1;
    }

    /// Assembles fresh init data through the scenario hooks and a new player faction.
    ///
    /// `apply` runs after `pre_configure`, so its values win over the scenario defaults.
    pub fn prepare_init_data(&mut self, apply: impl FnOnce(&mut GameInitData)) -> FactionId {
        let mut init = GameInitData::default();
        self.scenario.pre_configure(&mut init);
        apply(&mut init);
        self.scenario.post_world_load(&mut self.world);
        let player = prep_for_map_gen(&mut self.world, &mut init);
        self.scenario.pre_map_generate(&mut init);
        self.init_data = Some(init);
        player
    }

    pub fn clear_starting_pawns(&mut self) {
        if let Some(init) = self.init_data.as_mut() {
            init.starting_pawns.clear();
        }
    }

    /// Stages a world pawn as a starting colonist of `faction`. False if the pawn is unknown.
    pub fn stage_starting_pawn(&mut self, pawn: PawnId, faction: FactionId) -> bool {
        let Some(record) = self.world.pawns.get_mut(pawn) else {
            return false;
        };
        record.faction = Some(faction);
        match self.init_data.as_mut() {
            Some(init) => {
                init.starting_pawns.push(pawn);
                true
            }
            None => false,
        }
    }
}

/// Creates the player faction and binds it to the starting square.
fn prep_for_map_gen(world: &mut World, init: &mut GameInitData) -> FactionId {
    let player = world.factions.add(PLAYER_FACTION_LABEL, true, Some(init.starting_square));
    init.player_faction = Some(player);
    player
}
