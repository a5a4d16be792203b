//! Resource budget arithmetic and deposit depletion.
//!
//! The budget is the percentage of the original map's deposits still available. A debit is
//! planned from a census of live deposits, then executed by quietly despawning random
//! deposits and backfilling each vacated cell with native rock.

use rand_chacha::ChaCha8Rng;

use crate::mapgen::seed::random_index;
use crate::types::ThingKind;
use crate::world::{Map, Selector};

pub const FULL_BUDGET: f64 = 100.0;

/// Numbers of a single debit, before any deposit is touched.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DepletionPlan {
    pub current_budget: f64,
    pub new_budget: f64,
    /// Deposit count the map is assumed to have had at a full budget.
    pub original_population: usize,
    pub toll: usize,
}

impl DepletionPlan {
    pub fn compute(population: usize, current_budget: f64, cost_percent: f64) -> Self {
        if current_budget <= 0.0 {
            return Self { current_budget: 0.0, new_budget: 0.0, original_population: 0, toll: 0 };
        }
        let new_budget = (current_budget - cost_percent).clamp(0.0, FULL_BUDGET);
        let delta = current_budget - new_budget;
        // Assumes nothing else removed deposits since the last full budget.
        let original_population = (population as f64 * FULL_BUDGET / current_budget).ceil();
        let toll = (original_population * delta / FULL_BUDGET).abs().ceil();
        Self {
            current_budget,
            new_budget,
            original_population: original_population as usize,
            toll: toll as usize,
        }
    }
}

pub struct DepletionContext<'a> {
    pub map: &'a mut Map,
    pub selector: &'a mut Selector,
    /// Rock placed where a deposit was removed; `None` leaves the cell empty.
    pub filler: Option<ThingKind>,
    pub rng: &'a mut ChaCha8Rng,
    pub log_consumed: bool,
}

impl<'a> DepletionContext<'a> {
    /// Context whose filler is the first natural rock of the map's square.
    pub fn with_native_filler(
        map: &'a mut Map,
        selector: &'a mut Selector,
        rng: &'a mut ChaCha8Rng,
        rock_types: &[ThingKind],
        log_consumed: bool,
    ) -> Self {
        Self { map, selector, filler: rock_types.first().copied(), rng, log_consumed }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DepletionReport {
    pub plan: DepletionPlan,
    pub removed: usize,
    /// Part of the toll left unpaid because deposits ran out.
    pub shortfall: usize,
    pub remaining_deposits: usize,
    pub fillers_placed: usize,
}

/// Removes up to `plan.toll` uniformly chosen deposits.
pub fn execute(plan: &DepletionPlan, context: &mut DepletionContext<'_>) -> DepletionReport {
    let mut survivors = context.map.deposits();
    let mut removed = 0;
    let mut fillers_placed = 0;

    while removed < plan.toll && !survivors.is_empty() {
        let index = random_index(context.rng, survivors.len());
        let id = survivors.swap_remove(index);
        let Some(pos) = context.map.thing(id).map(|thing| thing.pos) else {
            continue;
        };
        if let Err(err) = context.map.despawn_quietly(id, context.selector) {
            tracing::warn!(target: "map_reroll::budget", error = %err, "budget.despawn_failed");
            continue;
        }
        removed += 1;

        if let Some(filler) = context.filler {
            match context.map.spawn(filler, pos) {
                Ok(_) => fillers_placed += 1,
                Err(err) => {
                    tracing::warn!(target: "map_reroll::budget", error = %err, "budget.fill_failed");
                }
            }
        }
    }

    let shortfall = plan.toll - removed;
    if shortfall > 0 {
        tracing::warn!(
            target: "map_reroll::budget",
            toll = plan.toll,
            removed,
            shortfall,
            "budget.shortfall"
        );
    }

    let report = DepletionReport {
        plan: *plan,
        removed,
        shortfall,
        remaining_deposits: context.map.deposits().len(),
        fillers_placed,
    };
    if context.log_consumed {
        tracing::info!(
            target: "map_reroll::budget",
            removed,
            original_population = plan.original_population,
            budget_before = plan.current_budget,
            budget_after = plan.new_budget,
            "budget.consumed"
        );
    }
    report
}

/// Plans a debit of `cost_percent` from the live deposit census and executes it.
pub fn debit_and_deplete(
    cost_percent: f64,
    current_budget: f64,
    context: &mut DepletionContext<'_>,
) -> DepletionReport {
    let plan = DepletionPlan::compute(context.map.deposits().len(), current_budget, cost_percent);
    execute(&plan, context)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rand_chacha::rand_core::SeedableRng;

    use super::*;
    use crate::types::{Pos, ThingState, WorldSquare};

    fn map_with_deposits(count: usize) -> Map {
        let mut map = Map::new(20, 20, WorldSquare { x: 0, z: 0 });
        for index in 0..count {
            let pos = Pos { y: (index / 20) as i32, x: (index % 20) as i32 };
            map.spawn(ThingKind::MineableSteel, pos).expect("in bounds");
        }
        map
    }

    #[test]
    fn full_budget_debit_removes_a_proportional_toll() {
        let plan = DepletionPlan::compute(50, FULL_BUDGET, 20.0);
        assert_eq!(plan.original_population, 50);
        assert_eq!(plan.toll, 10);
        assert_eq!(plan.new_budget, 80.0);

        let mut map = map_with_deposits(50);
        let mut selector = Selector::default();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut context = DepletionContext {
            map: &mut map,
            selector: &mut selector,
            filler: Some(ThingKind::Granite),
            rng: &mut rng,
            log_consumed: true,
        };
        let report = execute(&plan, &mut context);

        assert_eq!(report.removed, 10);
        assert_eq!(report.shortfall, 0);
        assert_eq!(report.remaining_deposits, 40);
        assert_eq!(report.fillers_placed, 10);
        assert_eq!(map.count_of_kind(ThingKind::Granite), 10);
    }

    #[test]
    fn toll_larger_than_live_deposits_reports_shortfall() {
        let plan = DepletionPlan::compute(50, FULL_BUDGET, 20.0);
        let mut map = map_with_deposits(4);
        let mut selector = Selector::default();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut context = DepletionContext {
            map: &mut map,
            selector: &mut selector,
            filler: None,
            rng: &mut rng,
            log_consumed: false,
        };
        let report = execute(&plan, &mut context);

        assert_eq!(report.removed, 4);
        assert_eq!(report.shortfall, 6);
        assert_eq!(report.remaining_deposits, 0);
        assert_eq!(report.plan.new_budget, 80.0);
        assert_eq!(map.spawned_count(), 0);
    }

    #[test]
    fn empty_budget_removes_nothing() {
        let mut map = map_with_deposits(10);
        let mut selector = Selector::default();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut context = DepletionContext {
            map: &mut map,
            selector: &mut selector,
            filler: Some(ThingKind::Slate),
            rng: &mut rng,
            log_consumed: false,
        };
        let report = debit_and_deplete(15.0, 0.0, &mut context);
        assert_eq!(report.removed, 0);
        assert_eq!(report.plan.new_budget, 0.0);
        assert_eq!(report.remaining_deposits, 10);
    }

    #[test]
    fn partial_budget_back_solves_the_original_population() {
        // 34 deposits at 85% implies 40 originally; a further 15% costs 6 more.
        let plan = DepletionPlan::compute(34, 85.0, 15.0);
        assert_eq!(plan.original_population, 40);
        assert_eq!(plan.toll, 6);
        assert_eq!(plan.new_budget, 70.0);
    }

    #[test]
    fn depleted_deposits_are_remembered_not_discarded() {
        let mut map = map_with_deposits(3);
        let ids = map.deposits();
        let mut selector = Selector::default();
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let mut context = DepletionContext::with_native_filler(
            &mut map,
            &mut selector,
            &mut rng,
            &[ThingKind::Marble, ThingKind::Slate],
            false,
        );
        let report = debit_and_deplete(100.0, FULL_BUDGET, &mut context);

        assert_eq!(report.removed, 3);
        assert_eq!(map.count_of_kind(ThingKind::Marble), 3);
        for id in ids {
            assert_eq!(map.thing(id).map(|thing| thing.state()), Some(ThingState::Memory));
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(1024))]
        #[test]
        fn new_budget_is_the_clamped_difference(
            budget in 0.0f64..=100.0,
            cost in 0.0f64..=100.0,
            population in 0usize..500,
        ) {
            let plan = DepletionPlan::compute(population, budget, cost);
            prop_assert_eq!(plan.new_budget, (budget - cost).clamp(0.0, FULL_BUDGET));
            prop_assert!(plan.new_budget <= budget);
        }
    }
}
