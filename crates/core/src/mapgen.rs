//! Reference map generation split into coherent submodules.

pub mod rock;
pub mod scatter;
pub mod step;

mod generator;
mod plan;
pub(crate) mod seed;

pub use generator::MapGenerator;
pub use plan::GenerationPlan;
pub use rock::RockFieldStep;
pub use scatter::{ScatterPlacement, ScatterThingsStep};
pub use step::{GenContext, GenStep, OccupancyCache, ScatterStep};

use crate::types::WorldSquare;
use crate::world::{Map, World};

pub fn default_plan() -> GenerationPlan {
    GenerationPlan::standard()
}

pub fn generate_map(
    plan: &mut GenerationPlan,
    world: &World,
    square: WorldSquare,
    size: usize,
) -> Map {
    MapGenerator::new(world, square, size).generate(plan)
}
