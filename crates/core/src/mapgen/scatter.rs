//! Scatter step: places instances of one kind at random cells, honouring spacing against
//! every cell it has already claimed.
//!
//! The claimed-cell cache persists across runs until something resets it. A step that is run
//! repeatedly without a reset eventually finds no legal cell and places nothing.

use super::seed::random_index;
use super::step::{GenContext, GenStep, OccupancyCache, START_CLEAR_RADIUS, ScatterStep};
use crate::content::is_natural_rock;
use crate::types::{Pos, ThingKind};
use crate::world::Map;

const TRIES_PER_INSTANCE: u32 = 200;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScatterPlacement {
    /// Needs a cell without any building, away from the start spot.
    OpenGround,
    /// Replaces a natural rock cell.
    ReplaceRock,
}

pub struct ScatterThingsStep {
    kind: ThingKind,
    count_per_ten_thousand_cells: usize,
    min_spacing: u32,
    placement: ScatterPlacement,
    used_spots: OccupancyCache,
}

impl ScatterThingsStep {
    pub fn new(
        kind: ThingKind,
        count_per_ten_thousand_cells: usize,
        min_spacing: u32,
        placement: ScatterPlacement,
    ) -> Self {
        Self {
            kind,
            count_per_ten_thousand_cells,
            min_spacing,
            placement,
            used_spots: OccupancyCache::default(),
        }
    }

    pub fn target_count(&self, cell_count: usize) -> usize {
        (cell_count * self.count_per_ten_thousand_cells / 10_000).max(1)
    }

    pub fn used_spots(&self) -> &OccupancyCache {
        &self.used_spots
    }

    fn can_place_at(&self, map: &Map, pos: Pos, start_spot: Pos) -> bool {
        if self.used_spots.is_near(pos, self.min_spacing) {
            return false;
        }
        match self.placement {
            ScatterPlacement::OpenGround => {
                map.building_at(pos).is_none() && pos.chebyshev(start_spot) > START_CLEAR_RADIUS
            }
            ScatterPlacement::ReplaceRock => map
                .building_at(pos)
                .and_then(|id| map.thing(id))
                .is_some_and(|thing| is_natural_rock(thing.kind)),
        }
    }

    fn find_spot(&self, context: &mut GenContext<'_>) -> Option<Pos> {
        let width = context.map.width();
        let height = context.map.height();
        if width == 0 || height == 0 {
            return None;
        }
        for _ in 0..TRIES_PER_INSTANCE {
            let pos = Pos {
                y: random_index(context.rng, height) as i32,
                x: random_index(context.rng, width) as i32,
            };
            if self.can_place_at(context.map, pos, context.start_spot) {
                return Some(pos);
            }
        }
        None
    }
}

impl GenStep for ScatterThingsStep {
    fn label(&self) -> &str {
        "scatter_things"
    }

    fn generate(&mut self, context: &mut GenContext<'_>) {
        let target = self.target_count(context.map.cell_count());
        let mut placed = 0;

        while placed < target {
            let Some(pos) = self.find_spot(context) else {
                break;
            };
            if self.placement == ScatterPlacement::ReplaceRock
                && let Some(rock) = context.map.building_at(pos)
                && let Err(err) = context.map.clear_for_generation(rock)
            {
                tracing::warn!(target: "map_reroll::mapgen", error = %err, "scatter.clear_failed");
                break;
            }
            match context.map.spawn(self.kind, pos) {
                Ok(_) => {
                    self.used_spots.insert(pos);
                    placed += 1;
                }
                Err(err) => {
                    tracing::warn!(target: "map_reroll::mapgen", error = %err, "scatter.spawn_failed");
                    break;
                }
            }
        }

        if placed < target {
            tracing::warn!(
                target: "map_reroll::mapgen",
                kind = ?self.kind,
                placed,
                target,
                used_spots = self.used_spots.len(),
                "scatter.placement_starved"
            );
        }
    }

    fn as_scatterer(&mut self) -> Option<&mut dyn ScatterStep> {
        Some(self)
    }
}

impl ScatterStep for ScatterThingsStep {
    fn scatter_kind(&self) -> Option<ThingKind> {
        Some(self.kind)
    }

    fn occupancy_mut(&mut self) -> Option<&mut OccupancyCache> {
        Some(&mut self.used_spots)
    }
}

#[cfg(test)]
mod tests {
    use rand_chacha::ChaCha8Rng;
    use rand_chacha::rand_core::SeedableRng;

    use super::*;
    use crate::types::WorldSquare;

    fn run(step: &mut ScatterThingsStep, map: &mut Map, seed: u64) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let start_spot = Pos { y: 0, x: 0 };
        let mut context = GenContext { map, rng: &mut rng, rock_types: &[], start_spot };
        step.generate(&mut context);
    }

    #[test]
    fn stale_occupancy_starves_later_runs_until_cleared() {
        // Spacing wider than the map: one claimed cell blocks every other cell.
        let mut step =
            ScatterThingsStep::new(ThingKind::SteamGeyser, 1, 50, ScatterPlacement::OpenGround);
        let mut first = Map::new(12, 12, WorldSquare { x: 0, z: 0 });
        run(&mut step, &mut first, 1);
        assert_eq!(first.count_of_kind(ThingKind::SteamGeyser), 1);

        let mut second = Map::new(12, 12, WorldSquare { x: 0, z: 0 });
        run(&mut step, &mut second, 2);
        assert_eq!(
            second.count_of_kind(ThingKind::SteamGeyser),
            0,
            "stale cache should starve placement"
        );

        step.occupancy_mut().expect("scatter step exposes a cache").clear();
        let mut third = Map::new(12, 12, WorldSquare { x: 0, z: 0 });
        run(&mut step, &mut third, 3);
        assert_eq!(third.count_of_kind(ThingKind::SteamGeyser), 1);
    }

    #[test]
    fn ore_replaces_rock_in_place() {
        let mut map = Map::new(3, 3, WorldSquare { x: 0, z: 0 });
        let rock_pos = Pos { y: 2, x: 2 };
        map.spawn(ThingKind::Granite, rock_pos).expect("in bounds");

        let mut step =
            ScatterThingsStep::new(ThingKind::MineableGold, 1, 1, ScatterPlacement::ReplaceRock);
        run(&mut step, &mut map, 9);

        assert_eq!(map.positions_of_kind(ThingKind::MineableGold), vec![rock_pos]);
        assert_eq!(map.count_of_kind(ThingKind::Granite), 0);
        assert!(step.used_spots().contains(rock_pos));
    }

    #[test]
    fn open_ground_placement_avoids_buildings_and_start_area() {
        let mut map = Map::new(16, 16, WorldSquare { x: 0, z: 0 });
        let mut step =
            ScatterThingsStep::new(ThingKind::SteamGeyser, 40, 2, ScatterPlacement::OpenGround);
        run(&mut step, &mut map, 5);

        let positions = map.positions_of_kind(ThingKind::SteamGeyser);
        assert!(!positions.is_empty());
        for pos in positions {
            assert!(pos.chebyshev(Pos { y: 0, x: 0 }) > START_CLEAR_RADIUS);
        }
    }
}
