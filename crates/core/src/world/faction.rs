//! Faction registry with world-square bindings and pairwise goodwill.

use std::collections::BTreeMap;

use slotmap::SlotMap;

use crate::types::{FactionId, WorldSquare};

#[derive(Clone, Debug)]
pub struct Faction {
    pub id: FactionId,
    pub label: String,
    /// Player-chosen colony name; unset until the player names the colony.
    pub name: Option<String>,
    pub is_player: bool,
    pub square: Option<WorldSquare>,
    relations: BTreeMap<FactionId, i32>,
}

impl Faction {
    pub fn has_name(&self) -> bool {
        self.name.is_some()
    }

    pub fn relation_count(&self) -> usize {
        self.relations.len()
    }
}

#[derive(Clone, Debug, Default)]
pub struct FactionRegistry {
    factions: SlotMap<FactionId, Faction>,
    player: Option<FactionId>,
}

impl FactionRegistry {
    /// Adds a faction with neutral relations to every existing faction.
    pub fn add(&mut self, label: &str, is_player: bool, square: Option<WorldSquare>) -> FactionId {
        let existing: Vec<FactionId> = self.factions.keys().collect();
        let id = self.factions.insert_with_key(|id| Faction {
            id,
            label: label.to_string(),
            name: None,
            is_player,
            square,
            relations: BTreeMap::new(),
        });
        for other in existing {
            self.factions[id].relations.insert(other, 0);
            self.factions[other].relations.insert(id, 0);
        }
        if is_player {
            self.player = Some(id);
        }
        id
    }

    pub fn get(&self, id: FactionId) -> Option<&Faction> {
        self.factions.get(id)
    }

    pub fn get_mut(&mut self, id: FactionId) -> Option<&mut Faction> {
        self.factions.get_mut(id)
    }

    pub fn player(&self) -> Option<FactionId> {
        self.player
    }

    pub fn len(&self) -> usize {
        self.factions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Faction> {
        self.factions.values()
    }

    pub fn faction_in_world_square(&self, square: WorldSquare) -> Option<FactionId> {
        self.factions.iter().find(|(_, faction)| faction.square == Some(square)).map(|(id, _)| id)
    }

    pub fn relation(&self, from: FactionId, to: FactionId) -> Option<i32> {
        self.factions.get(from)?.relations.get(&to).copied()
    }

    pub fn set_goodwill(&mut self, a: FactionId, b: FactionId, goodwill: i32) {
        if !self.factions.contains_key(a) || !self.factions.contains_key(b) {
            return;
        }
        self.factions[a].relations.insert(b, goodwill);
        self.factions[b].relations.insert(a, goodwill);
    }

    /// Drops the faction's relations and every other faction's relation to it.
    pub fn remove_all_relations(&mut self, id: FactionId) {
        if let Some(faction) = self.factions.get_mut(id) {
            faction.relations.clear();
        }
        for faction in self.factions.values_mut() {
            faction.relations.remove(&id);
        }
    }

    pub fn remove(&mut self, id: FactionId) -> Option<Faction> {
        let removed = self.factions.remove(id)?;
        if self.player == Some(id) {
            self.player = None;
        }
        Some(removed)
    }

    /// Tears down factions bound to `square` until none remain; returns how many were removed.
    pub fn discard_square_factions(&mut self, square: WorldSquare) -> usize {
        let mut removed = 0;
        while let Some(id) = self.faction_in_world_square(square) {
            self.remove_all_relations(id);
            self.remove(id);
            removed += 1;
        }
        removed
    }
}
