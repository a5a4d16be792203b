//! Ordered list of generation steps that make up a map.

use super::rock::RockFieldStep;
use super::scatter::{ScatterPlacement, ScatterThingsStep};
use super::step::GenStep;
use crate::content::{deposit_kinds, thing_def};
use crate::types::ThingKind;

/// Ore instances per ten thousand cells for a deposit of commonality 1.0.
const ORE_DENSITY_AT_FULL_COMMONALITY: f32 = 40.0;
const GEYSERS_PER_TEN_THOUSAND_CELLS: usize = 3;
const GEYSER_MIN_SPACING: u32 = 14;
const ORE_MIN_SPACING: u32 = 2;

pub struct GenerationPlan {
    steps: Vec<Box<dyn GenStep>>,
}

impl GenerationPlan {
    pub fn new(steps: Vec<Box<dyn GenStep>>) -> Self {
        Self { steps }
    }

    /// Rock field, one scatter step per deposit kind, then steam geysers.
    pub fn standard() -> Self {
        let mut steps: Vec<Box<dyn GenStep>> = vec![Box::new(RockFieldStep::default())];
        for kind in deposit_kinds() {
            let commonality = thing_def(kind).mineable_scatter_commonality;
            let count = (commonality * ORE_DENSITY_AT_FULL_COMMONALITY).round() as usize;
            steps.push(Box::new(ScatterThingsStep::new(
                kind,
                count,
                ORE_MIN_SPACING,
                ScatterPlacement::ReplaceRock,
            )));
        }
        steps.push(Box::new(ScatterThingsStep::new(
            ThingKind::SteamGeyser,
            GEYSERS_PER_TEN_THOUSAND_CELLS,
            GEYSER_MIN_SPACING,
            ScatterPlacement::OpenGround,
        )));
        Self::new(steps)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn steps_mut(&mut self) -> &mut [Box<dyn GenStep>] {
        &mut self.steps
    }

    pub fn step_mut(&mut self, index: usize) -> Option<&mut dyn GenStep> {
        self.steps.get_mut(index).map(|step| step.as_mut() as &mut dyn GenStep)
    }

    /// Index of the first scatter step targeting `kind`.
    pub fn scatter_step_index(&mut self, kind: ThingKind) -> Option<usize> {
        self.steps.iter_mut().position(|step| {
            step.as_scatterer().and_then(|scatterer| scatterer.scatter_kind()) == Some(kind)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_plan_has_one_geyser_scatterer_after_the_ores() {
        let mut plan = GenerationPlan::standard();
        assert_eq!(plan.len(), 1 + deposit_kinds().count() + 1);
        assert_eq!(plan.scatter_step_index(ThingKind::SteamGeyser), Some(plan.len() - 1));
        assert_eq!(plan.scatter_step_index(ThingKind::Granite), None);
    }
}
