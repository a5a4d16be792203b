//! Clears per-step occupancy caches so regeneration starts from an empty claim set.

use crate::mapgen::{GenStep, GenerationPlan};

/// Clears the cache of one step. False when the step exposes none.
pub fn reset_scatter_step(step: &mut dyn GenStep) -> bool {
    match step.as_scatterer().and_then(|scatterer| scatterer.occupancy_mut()) {
        Some(cache) => {
            cache.clear();
            true
        }
        None => false,
    }
}

/// Clears every scatter cache in `plan`; returns how many caches were cleared.
pub fn reset_scatter_steps(plan: &mut GenerationPlan) -> usize {
    let cleared = plan
        .steps_mut()
        .iter_mut()
        .map(|step| reset_scatter_step(step.as_mut()))
        .filter(|cleared| *cleared)
        .count();
    tracing::debug!(target: "map_reroll::scatter", cleared, "scatter.caches_reset");
    cleared
}
