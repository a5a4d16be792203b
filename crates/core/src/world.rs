//! World-level state that outlives any single map: seed, factions and pawns.

pub mod faction;
pub mod map;
pub mod pawn;
pub mod selection;

use crate::mapgen::seed::mix_seed_stream;
use crate::types::{ThingKind, WorldSquare};

pub use faction::{Faction, FactionRegistry};
pub use map::{DestroyGuard, Map, MapError, Thing};
pub use pawn::{Pawn, PawnKind, PawnRegistry, RelationKind};
pub use selection::Selector;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorldInfo {
    /// Seeds map generation; rerolls swap it temporarily.
    pub seed_string: String,
    /// Fixed at world creation; decides per-square geology.
    pub terrain_seed: u64,
}

#[derive(Clone, Debug)]
pub struct World {
    pub info: WorldInfo,
    pub factions: FactionRegistry,
    pub pawns: PawnRegistry,
}

impl World {
    pub fn new(seed_string: &str, terrain_seed: u64) -> Self {
        Self {
            info: WorldInfo { seed_string: seed_string.to_string(), terrain_seed },
            factions: FactionRegistry::default(),
            pawns: PawnRegistry::default(),
        }
    }

    /// Two distinct rock kinds native to `square`, most common first.
    pub fn natural_rock_types_in(&self, square: WorldSquare) -> Vec<ThingKind> {
        let rocks = ThingKind::NATURAL_ROCKS;
        let square_stream = ((square.x as u32 as u64) << 32) | (square.z as u32 as u64);
        let mixed = mix_seed_stream(self.info.terrain_seed, square_stream);
        let first = (mixed % rocks.len() as u64) as usize;
        let offset = 1 + ((mixed >> 17) % (rocks.len() as u64 - 1)) as usize;
        let second = (first + offset) % rocks.len();
        vec![rocks[first], rocks[second]]
    }
}
