//! Natural rock fill: patchy outcrops of the square's native stone.

use rand_chacha::rand_core::Rng;

use super::seed::mix_seed_stream;
use super::step::{GenContext, GenStep, START_CLEAR_RADIUS};
use crate::types::Pos;

const EDGE_ROUGHNESS_PERCENT: u64 = 85;

pub struct RockFieldStep {
    pub density_percent: u64,
    pub patch_size: usize,
}

impl Default for RockFieldStep {
    fn default() -> Self {
        Self { density_percent: 45, patch_size: 5 }
    }
}

impl GenStep for RockFieldStep {
    fn label(&self) -> &str {
        "rock_field"
    }

    fn generate(&mut self, context: &mut GenContext<'_>) {
        if context.rock_types.is_empty() {
            tracing::debug!(target: "map_reroll::mapgen", "rock_field.no_native_rock");
            return;
        }
        let field_seed = context.rng.next_u64();
        let patch_size = self.patch_size.max(1);
        let patches_per_row = context.map.width().div_ceil(patch_size) as u64;

        for y in 0..context.map.height() {
            for x in 0..context.map.width() {
                let pos = Pos { y: y as i32, x: x as i32 };
                if pos.chebyshev(context.start_spot) <= START_CLEAR_RADIUS {
                    continue;
                }
                let patch = (y / patch_size) as u64 * patches_per_row + (x / patch_size) as u64;
                if mix_seed_stream(field_seed, patch) % 100 >= self.density_percent {
                    continue;
                }
                let cell = (y * context.map.width() + x) as u64;
                if mix_seed_stream(field_seed ^ 0xA5A5_A5A5, cell) % 100 >= EDGE_ROUGHNESS_PERCENT {
                    continue;
                }
                let pick = mix_seed_stream(field_seed, patch ^ 0x5A5A) % 3;
                // The first native rock dominates two patches out of three.
                let kind = if pick < 2 || context.rock_types.len() == 1 {
                    context.rock_types[0]
                } else {
                    context.rock_types[1]
                };
                if let Err(err) = context.map.spawn(kind, pos) {
                    tracing::warn!(target: "map_reroll::mapgen", error = %err, "rock_field.spawn_failed");
                }
            }
        }
    }
}
