//! Pawn records held by the world so they survive map replacement.

use std::collections::BTreeSet;

use slotmap::SlotMap;

use crate::types::{FactionId, PawnId, Pos};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PawnKind {
    Humanlike,
    Animal,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RelationKind {
    Bond,
    Sibling,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DirectRelation {
    pub kind: RelationKind,
    pub other: PawnId,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MindState {
    pub current_job: Option<String>,
    pub duty: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Health {
    pub injuries: u32,
    pub downed: bool,
}

#[derive(Clone, Debug)]
pub struct Pawn {
    pub id: PawnId,
    pub name: String,
    pub kind: PawnKind,
    pub faction: Option<FactionId>,
    pub mind: MindState,
    pub reservations: BTreeSet<Pos>,
    pub health: Health,
    pub relations: Vec<DirectRelation>,
}

impl Pawn {
    /// A humanlike pawn of the current player faction.
    pub fn is_colonist(&self, player: Option<FactionId>) -> bool {
        self.kind == PawnKind::Humanlike && player.is_some() && self.faction == player
    }

    pub fn clear_mind(&mut self) {
        self.mind = MindState::default();
    }

    pub fn clear_reservations(&mut self) {
        self.reservations.clear();
    }

    pub fn reset_health(&mut self) {
        self.health = Health::default();
    }

    pub fn first_direct_relation(&self, kind: RelationKind) -> Option<PawnId> {
        self.relations.iter().find(|relation| relation.kind == kind).map(|relation| relation.other)
    }
}

#[derive(Clone, Debug, Default)]
pub struct PawnRegistry {
    pawns: SlotMap<PawnId, Pawn>,
}

impl PawnRegistry {
    pub fn add(&mut self, name: &str, kind: PawnKind, faction: Option<FactionId>) -> PawnId {
        self.pawns.insert_with_key(|id| Pawn {
            id,
            name: name.to_string(),
            kind,
            faction,
            mind: MindState::default(),
            reservations: BTreeSet::new(),
            health: Health::default(),
            relations: Vec::new(),
        })
    }

    pub fn get(&self, id: PawnId) -> Option<&Pawn> {
        self.pawns.get(id)
    }

    pub fn get_mut(&mut self, id: PawnId) -> Option<&mut Pawn> {
        self.pawns.get_mut(id)
    }

    pub fn len(&self) -> usize {
        self.pawns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pawns.is_empty()
    }

    pub fn add_direct_relation(&mut self, a: PawnId, kind: RelationKind, b: PawnId) {
        if !self.pawns.contains_key(a) || !self.pawns.contains_key(b) {
            return;
        }
        self.pawns[a].relations.push(DirectRelation { kind, other: b });
        self.pawns[b].relations.push(DirectRelation { kind, other: a });
    }

    /// Removes the relation in both directions.
    pub fn remove_direct_relation(&mut self, a: PawnId, kind: RelationKind, b: PawnId) {
        if let Some(pawn) = self.pawns.get_mut(a) {
            pawn.relations.retain(|relation| !(relation.kind == kind && relation.other == b));
        }
        if let Some(pawn) = self.pawns.get_mut(b) {
            pawn.relations.retain(|relation| !(relation.kind == kind && relation.other == a));
        }
    }
}
