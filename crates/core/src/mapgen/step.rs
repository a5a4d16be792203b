//! Generation-step seams: the generic step trait and the narrow scatter accessor.

use std::collections::BTreeSet;

use rand_chacha::ChaCha8Rng;

use crate::types::{Pos, ThingKind};
use crate::world::Map;

/// Cells around the start spot kept free of rock and scattered features.
pub const START_CLEAR_RADIUS: u32 = 3;

pub struct GenContext<'a> {
    pub map: &'a mut Map,
    pub rng: &'a mut ChaCha8Rng,
    pub rock_types: &'a [ThingKind],
    pub start_spot: Pos,
}

pub trait GenStep {
    fn label(&self) -> &str;

    /// Runs the step against the map. Success is judged by inspecting the map afterwards.
    fn generate(&mut self, context: &mut GenContext<'_>);

    fn as_scatterer(&mut self) -> Option<&mut dyn ScatterStep> {
        None
    }
}

/// Accessor exposed by steps that scatter instances of one kind across the map.
pub trait ScatterStep {
    fn scatter_kind(&self) -> Option<ThingKind>;

    fn occupancy_mut(&mut self) -> Option<&mut OccupancyCache>;
}

/// Cells a scatter step has already claimed during the current map's generation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OccupancyCache {
    spots: BTreeSet<Pos>,
}

impl OccupancyCache {
    pub fn insert(&mut self, pos: Pos) -> bool {
        self.spots.insert(pos)
    }

    pub fn contains(&self, pos: Pos) -> bool {
        self.spots.contains(&pos)
    }

    pub fn clear(&mut self) {
        self.spots.clear();
    }

    pub fn len(&self) -> usize {
        self.spots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spots.is_empty()
    }

    /// True when any claimed cell lies closer than `spacing` (Chebyshev distance).
    pub fn is_near(&self, pos: Pos, spacing: u32) -> bool {
        self.spots.iter().any(|spot| spot.chebyshev(pos) < spacing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spacing_uses_chebyshev_distance() {
        let mut cache = OccupancyCache::default();
        cache.insert(Pos { y: 5, x: 5 });
        assert!(cache.is_near(Pos { y: 7, x: 7 }, 3));
        assert!(!cache.is_near(Pos { y: 8, x: 5 }, 3));
        assert!(cache.is_near(Pos { y: 5, x: 5 }, 1));
        assert!(!cache.is_near(Pos { y: 5, x: 5 }, 0));
    }
}
