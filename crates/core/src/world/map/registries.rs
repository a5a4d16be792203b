//! Lookup structures that index spawned things on a map.

use std::collections::{BTreeMap, BTreeSet};

use crate::content::{DrawerType, ThingDef, thing_def};
use crate::types::{Designation, Pos, ThingId, ThingKind};

/// Which registries currently reference a thing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Registrations {
    pub kind_index: bool,
    pub grid: bool,
    pub cover: bool,
    pub tooltip: bool,
    pub drawable: bool,
    pub tickable: bool,
    pub attack_target: bool,
    pub building_list: bool,
    pub designated: bool,
}

impl Registrations {
    pub fn any(&self) -> bool {
        self.kind_index
            || self.grid
            || self.cover
            || self.tooltip
            || self.drawable
            || self.tickable
            || self.attack_target
            || self.building_list
            || self.designated
    }
}

#[derive(Clone, Debug, Default)]
pub(super) struct ThingRegistries {
    pub(super) by_kind: BTreeMap<ThingKind, BTreeSet<ThingId>>,
    pub(super) grid: BTreeMap<Pos, Vec<ThingId>>,
    cover: BTreeMap<Pos, ThingId>,
    tooltip_givers: BTreeSet<ThingId>,
    drawables: BTreeSet<ThingId>,
    tickables: BTreeSet<ThingId>,
    attack_targets: BTreeSet<ThingId>,
    buildings: BTreeSet<ThingId>,
    pub(super) designations: BTreeMap<ThingId, Vec<Designation>>,
    pub(super) dirty_mesh: BTreeSet<Pos>,
    pub(super) link_notifications: u32,
}

impl ThingRegistries {
    pub(super) fn register(&mut self, id: ThingId, kind: ThingKind, pos: Pos) {
        let def = thing_def(kind);
        self.by_kind.entry(kind).or_default().insert(id);
        self.grid.entry(pos).or_default().push(id);
        if def.fills_cover {
            self.cover.insert(pos, id);
        }
        if def.has_tooltip {
            self.tooltip_givers.insert(id);
        }
        if def.linked_graphics {
            self.link_notifications += 1;
        }
        if def.drawer != DrawerType::RealtimeOnly {
            self.dirty_mesh.insert(pos);
        }
        if def.drawer != DrawerType::MapMeshOnly {
            self.drawables.insert(id);
        }
        if def.ticks {
            self.tickables.insert(id);
        }
        if def.building {
            self.attack_targets.insert(id);
            self.buildings.insert(id);
        }
    }

    /// Kind index, spatial grid and cover grid.
    pub(super) fn remove_indices(&mut self, id: ThingId, kind: ThingKind, pos: Pos) {
        if let Some(ids) = self.by_kind.get_mut(&kind) {
            ids.remove(&id);
            if ids.is_empty() {
                self.by_kind.remove(&kind);
            }
        }
        if let Some(ids) = self.grid.get_mut(&pos) {
            ids.retain(|other| *other != id);
            if ids.is_empty() {
                self.grid.remove(&pos);
            }
        }
        if self.cover.get(&pos) == Some(&id) {
            self.cover.remove(&pos);
        }
    }

    pub(super) fn remove_presentation(&mut self, id: ThingId, def: &ThingDef, pos: Pos) {
        self.tooltip_givers.remove(&id);
        if def.linked_graphics {
            self.link_notifications += 1;
            self.dirty_mesh.insert(pos);
        }
        if def.drawer != DrawerType::RealtimeOnly {
            self.dirty_mesh.insert(pos);
        }
        if def.drawer != DrawerType::MapMeshOnly {
            self.drawables.remove(&id);
        }
    }

    pub(super) fn remove_attack_target(&mut self, id: ThingId) {
        self.attack_targets.remove(&id);
    }

    pub(super) fn remove_tickable(&mut self, id: ThingId) {
        self.tickables.remove(&id);
    }

    pub(super) fn remove_building(&mut self, id: ThingId) {
        self.buildings.remove(&id);
        self.designations.remove(&id);
    }

    pub(super) fn registrations(&self, id: ThingId, kind: ThingKind, pos: Pos) -> Registrations {
        Registrations {
            kind_index: self.by_kind.get(&kind).is_some_and(|ids| ids.contains(&id)),
            grid: self.grid.get(&pos).is_some_and(|ids| ids.contains(&id)),
            cover: self.cover.get(&pos) == Some(&id),
            tooltip: self.tooltip_givers.contains(&id),
            drawable: self.drawables.contains(&id),
            tickable: self.tickables.contains(&id),
            attack_target: self.attack_targets.contains(&id),
            building_list: self.buildings.contains(&id),
            designated: self.designations.contains_key(&id),
        }
    }
}
