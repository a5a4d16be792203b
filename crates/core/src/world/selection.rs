use std::collections::BTreeSet;

use crate::types::{PawnId, ThingId};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Selectable {
    Thing(ThingId),
    Pawn(PawnId),
}

/// Objects the player currently has selected.
#[derive(Clone, Debug, Default)]
pub struct Selector {
    selected: BTreeSet<Selectable>,
}

impl Selector {
    pub fn select_thing(&mut self, id: ThingId) {
        self.selected.insert(Selectable::Thing(id));
    }

    pub fn select_pawn(&mut self, id: PawnId) {
        self.selected.insert(Selectable::Pawn(id));
    }

    pub fn deselect_thing(&mut self, id: ThingId) {
        self.selected.remove(&Selectable::Thing(id));
    }

    pub fn is_thing_selected(&self, id: ThingId) -> bool {
        self.selected.contains(&Selectable::Thing(id))
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}
