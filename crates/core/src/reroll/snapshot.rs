use crate::session::GameInitData;
use crate::types::{FactionId, PawnId, WorldSquare};

/// Starting parameters of the session as first loaded; every reroll rebuilds from these.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InitialSessionSnapshot {
    pub starting_square: WorldSquare,
    pub permadeath: bool,
    pub starting_month: u8,
    pub map_size: usize,
    pub starting_pawns: Vec<PawnId>,
    pub player_faction: Option<FactionId>,
}

impl InitialSessionSnapshot {
    pub fn capture(init: &GameInitData) -> Self {
        Self {
            starting_square: init.starting_square,
            permadeath: init.permadeath,
            starting_month: init.starting_month,
            map_size: init.map_size,
            starting_pawns: init.starting_pawns.clone(),
            player_faction: init.player_faction,
        }
    }

    /// Copies the map parameters into freshly configured init data. Pawns are staged separately.
    pub fn apply_to(&self, init: &mut GameInitData) {
        init.starting_square = self.starting_square;
        init.permadeath = self.permadeath;
        init.starting_month = self.starting_month;
        init.map_size = self.map_size;
    }
}
