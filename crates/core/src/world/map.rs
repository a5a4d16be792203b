//! A single map instance: spawned things, their registries, and placed pawns.
//! This module owns spawn, full destroy, and the quiet despawn used for deposit depletion.
//! It does not decide which things to remove or when.

mod registries;

use std::collections::BTreeMap;

use slotmap::SlotMap;
use thiserror::Error;
use xxhash_rust::xxh3::xxh3_64;

use crate::content::{is_deposit, thing_def};
use crate::types::{Designation, PawnId, Pos, ThingId, ThingKind, ThingState, WorldSquare};

pub use registries::Registrations;
use registries::ThingRegistries;

use super::selection::Selector;

#[derive(Clone, Debug)]
pub struct Thing {
    pub id: ThingId,
    pub kind: ThingKind,
    pub pos: Pos,
    state: ThingState,
}

impl Thing {
    pub fn state(&self) -> ThingState {
        self.state
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DestroyGuard {
    Respect,
    /// Allows destroying things whose definition forbids it.
    Bypass,
}

/// Expensive map-wide updates triggered by full destroys.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RecomputeCounters {
    pub fog_reveals: u32,
    pub path_updates: u32,
    pub roof_updates: u32,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MapError {
    #[error("thing {0:?} is not spawned on this map")]
    NotSpawned(ThingId),
    #[error("{kind:?} cannot be destroyed")]
    Indestructible { kind: ThingKind },
    #[error("position {pos:?} is outside the map")]
    OutOfBounds { pos: Pos },
}

#[derive(Clone, Debug)]
pub struct Map {
    width: usize,
    height: usize,
    square: WorldSquare,
    things: SlotMap<ThingId, Thing>,
    registries: ThingRegistries,
    pawns: Vec<PawnId>,
    spawned_pawns: BTreeMap<PawnId, Pos>,
    recomputes: RecomputeCounters,
}

impl Map {
    pub fn new(width: usize, height: usize, square: WorldSquare) -> Self {
        Self {
            width,
            height,
            square,
            things: SlotMap::with_key(),
            registries: ThingRegistries::default(),
            pawns: Vec::new(),
            spawned_pawns: BTreeMap::new(),
            recomputes: RecomputeCounters::default(),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn cell_count(&self) -> usize {
        self.width * self.height
    }

    pub fn square(&self) -> WorldSquare {
        self.square
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.width && (pos.y as usize) < self.height
    }

    pub fn center(&self) -> Pos {
        Pos { y: (self.height / 2) as i32, x: (self.width / 2) as i32 }
    }

    pub fn spawn(&mut self, kind: ThingKind, pos: Pos) -> Result<ThingId, MapError> {
        if !self.in_bounds(pos) {
            return Err(MapError::OutOfBounds { pos });
        }
        let id =
            self.things.insert_with_key(|id| Thing { id, kind, pos, state: ThingState::Spawned });
        self.registries.register(id, kind, pos);
        Ok(id)
    }

    pub fn thing(&self, id: ThingId) -> Option<&Thing> {
        self.things.get(id)
    }

    /// Full destroy: deregisters everywhere and triggers fog, path and roof updates.
    pub fn destroy(
        &mut self,
        id: ThingId,
        guard: DestroyGuard,
        selector: &mut Selector,
    ) -> Result<(), MapError> {
        let (kind, pos) = self.spawned(id)?;
        let def = thing_def(kind);
        if !def.destroyable && guard == DestroyGuard::Respect {
            return Err(MapError::Indestructible { kind });
        }

        self.registries.remove_indices(id, kind, pos);
        self.registries.remove_presentation(id, &def, pos);
        selector.deselect_thing(id);
        self.registries.remove_attack_target(id);
        self.registries.remove_tickable(id);
        self.registries.remove_building(id);
        self.things[id].state = ThingState::Destroyed;

        if def.building {
            self.recomputes.fog_reveals += 1;
            self.recomputes.path_updates += 1;
            self.recomputes.roof_updates += 1;
        }
        Ok(())
    }

    /// Removes a thing without the map-wide side effects of [`Map::destroy`].
    ///
    /// Index removal happens before the lifecycle flag changes so no lookup can observe a
    /// half-removed thing. Returns the state the thing was left in.
    pub fn despawn_quietly(
        &mut self,
        id: ThingId,
        selector: &mut Selector,
    ) -> Result<ThingState, MapError> {
        let (kind, pos) = self.spawned(id)?;
        let def = thing_def(kind);

        self.registries.remove_indices(id, kind, pos);
        self.registries.remove_presentation(id, &def, pos);
        selector.deselect_thing(id);
        self.registries.remove_attack_target(id);

        let state =
            if def.discard_on_destroyed { ThingState::Discarded } else { ThingState::Memory };
        self.things[id].state = state;

        self.registries.remove_tickable(id);
        if def.building {
            self.registries.remove_building(id);
        }
        Ok(state)
    }

    /// Drops a thing while the map is still being generated; nothing can have selected it yet.
    pub(crate) fn clear_for_generation(&mut self, id: ThingId) -> Result<(), MapError> {
        self.despawn_quietly(id, &mut Selector::default()).map(|_| ())
    }

    pub fn designate(&mut self, id: ThingId, designation: Designation) -> Result<(), MapError> {
        self.spawned(id)?;
        self.registries.designations.entry(id).or_default().push(designation);
        Ok(())
    }

    pub fn registrations(&self, id: ThingId) -> Registrations {
        match self.things.get(id) {
            Some(thing) => self.registries.registrations(id, thing.kind, thing.pos),
            None => Registrations::default(),
        }
    }

    pub fn things_of_kind(&self, kind: ThingKind) -> Vec<ThingId> {
        self.registries
            .by_kind
            .get(&kind)
            .map(|ids| ids.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn positions_of_kind(&self, kind: ThingKind) -> Vec<Pos> {
        self.things_of_kind(kind).into_iter().map(|id| self.things[id].pos).collect()
    }

    pub fn count_of_kind(&self, kind: ThingKind) -> usize {
        self.registries.by_kind.get(&kind).map_or(0, |ids| ids.len())
    }

    /// Spawned things whose definition makes them eligible for depletion.
    pub fn deposits(&self) -> Vec<ThingId> {
        self.registries
            .by_kind
            .iter()
            .filter(|(kind, _)| is_deposit(**kind))
            .flat_map(|(_, ids)| ids.iter().copied())
            .collect()
    }

    pub fn things_at(&self, pos: Pos) -> Vec<ThingId> {
        self.registries.grid.get(&pos).cloned().unwrap_or_default()
    }

    pub fn building_at(&self, pos: Pos) -> Option<ThingId> {
        self.registries
            .grid
            .get(&pos)?
            .iter()
            .copied()
            .find(|id| thing_def(self.things[*id].kind).building)
    }

    pub fn spawned_count(&self) -> usize {
        self.registries.by_kind.values().map(|ids| ids.len()).sum()
    }

    pub fn is_mesh_dirty(&self, pos: Pos) -> bool {
        self.registries.dirty_mesh.contains(&pos)
    }

    pub fn link_notifications(&self) -> u32 {
        self.registries.link_notifications
    }

    pub fn recomputes(&self) -> RecomputeCounters {
        self.recomputes
    }

    /// Lists a pawn on the map; `None` keeps it unspawned (still in a drop pod).
    pub fn add_pawn(&mut self, pawn: PawnId, pos: Option<Pos>) {
        if !self.pawns.contains(&pawn) {
            self.pawns.push(pawn);
        }
        if let Some(pos) = pos {
            self.spawned_pawns.insert(pawn, pos);
        }
    }

    pub fn despawn_pawn(&mut self, pawn: PawnId) -> bool {
        let was_spawned = self.spawned_pawns.remove(&pawn).is_some();
        self.pawns.retain(|other| *other != pawn);
        was_spawned
    }

    pub fn pawns(&self) -> &[PawnId] {
        &self.pawns
    }

    pub fn pawn_position(&self, pawn: PawnId) -> Option<Pos> {
        self.spawned_pawns.get(&pawn).copied()
    }

    pub fn is_pawn_spawned(&self, pawn: PawnId) -> bool {
        self.spawned_pawns.contains_key(&pawn)
    }

    /// Nearest cell to `desired` with no building and no pawn; ties prefer lower y, then x.
    pub fn nearest_open_cell(&self, desired: Pos) -> Option<Pos> {
        let mut best: Option<(u32, Pos)> = None;
        for y in 0..self.height {
            for x in 0..self.width {
                let pos = Pos { y: y as i32, x: x as i32 };
                if self.building_at(pos).is_some() || self.spawned_pawns.values().any(|p| *p == pos)
                {
                    continue;
                }
                let distance = pos.x.abs_diff(desired.x) + pos.y.abs_diff(desired.y);
                if best.is_none_or(|(best_distance, _)| distance < best_distance) {
                    best = Some((distance, pos));
                }
            }
        }
        best.map(|(_, pos)| pos)
    }

    /// Order-independent digest of spawned things, for comparing map instances.
    pub fn fingerprint(&self) -> u64 {
        let mut cells: Vec<(Pos, u8)> = self
            .registries
            .by_kind
            .iter()
            .flat_map(|(kind, ids)| ids.iter().map(move |id| (*id, *kind)))
            .map(|(id, kind)| (self.things[id].pos, kind as u8))
            .collect();
        cells.sort_unstable();

        let mut bytes = Vec::with_capacity(8 + cells.len() * 9);
        bytes.extend((self.width as u32).to_le_bytes());
        bytes.extend((self.height as u32).to_le_bytes());
        for (pos, kind) in cells {
            bytes.extend(pos.y.to_le_bytes());
            bytes.extend(pos.x.to_le_bytes());
            bytes.push(kind);
        }
        xxh3_64(&bytes)
    }

    fn spawned(&self, id: ThingId) -> Result<(ThingKind, Pos), MapError> {
        match self.things.get(id) {
            Some(thing) if thing.state == ThingState::Spawned => Ok((thing.kind, thing.pos)),
            _ => Err(MapError::NotSpawned(id)),
        }
    }
}
