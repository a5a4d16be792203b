//! Scenario hooks invoked while a session's starting conditions are assembled.

use super::GameInitData;
use crate::types::ThingKind;
use crate::world::World;

pub trait Scenario {
    fn label(&self) -> &str;

    fn pre_configure(&mut self, _init: &mut GameInitData) {}

    fn post_world_load(&mut self, _world: &mut World) {}

    fn pre_map_generate(&mut self, _init: &mut GameInitData) {}
}

/// Crash-landed colonists with emergency rations and some salvaged steel.
#[derive(Clone, Debug)]
pub struct CrashlandedScenario {
    pub survival_meals: u32,
    pub steel: u32,
}

impl Default for CrashlandedScenario {
    fn default() -> Self {
        Self { survival_meals: 30, steel: 450 }
    }
}

impl Scenario for CrashlandedScenario {
    fn label(&self) -> &str {
        "Crashlanded"
    }

    fn pre_configure(&mut self, init: &mut GameInitData) {
        init.permadeath = false;
    }

    fn pre_map_generate(&mut self, init: &mut GameInitData) {
        init.staged_things.clear();
        if self.survival_meals > 0 {
            init.staged_things.push((ThingKind::SurvivalMeals, self.survival_meals));
        }
        if self.steel > 0 {
            init.staged_things.push((ThingKind::SteelStack, self.steel));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crashlanded_restages_supplies_instead_of_accumulating() {
        let mut scenario = CrashlandedScenario::default();
        let mut init = GameInitData::default();
        scenario.pre_map_generate(&mut init);
        scenario.pre_map_generate(&mut init);
        assert_eq!(
            init.staged_things,
            vec![(ThingKind::SurvivalMeals, 30), (ThingKind::SteelStack, 450)]
        );
    }
}
