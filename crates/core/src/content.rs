//! Static definitions for every kind of map object the engine knows about.

use crate::types::ThingKind;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrawerType {
    MapMeshOnly,
    RealtimeOnly,
    MapMeshAndRealtime,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ThingDef {
    pub label: &'static str,
    pub building: bool,
    pub destroyable: bool,
    pub has_tooltip: bool,
    pub linked_graphics: bool,
    pub drawer: DrawerType,
    pub discard_on_destroyed: bool,
    pub ticks: bool,
    pub fills_cover: bool,
    /// Relative weight used when scattering ore; zero for anything that is not a deposit.
    pub mineable_scatter_commonality: f32,
}

const fn rock(label: &'static str) -> ThingDef {
    ThingDef {
        label,
        building: true,
        destroyable: true,
        has_tooltip: false,
        linked_graphics: true,
        drawer: DrawerType::MapMeshOnly,
        discard_on_destroyed: true,
        ticks: false,
        fills_cover: true,
        mineable_scatter_commonality: 0.0,
    }
}

const fn ore(label: &'static str, commonality: f32) -> ThingDef {
    ThingDef { mineable_scatter_commonality: commonality, discard_on_destroyed: false, ..rock(label) }
}

const fn item(label: &'static str) -> ThingDef {
    ThingDef {
        label,
        building: false,
        destroyable: true,
        has_tooltip: true,
        linked_graphics: false,
        drawer: DrawerType::RealtimeOnly,
        discard_on_destroyed: false,
        ticks: true,
        fills_cover: false,
        mineable_scatter_commonality: 0.0,
    }
}

pub fn thing_def(kind: ThingKind) -> ThingDef {
    match kind {
        ThingKind::Granite => rock("granite"),
        ThingKind::Limestone => rock("limestone"),
        ThingKind::Marble => rock("marble"),
        ThingKind::Sandstone => rock("sandstone"),
        ThingKind::Slate => rock("slate"),
        ThingKind::MineableSteel => ore("compacted steel", 1.0),
        ThingKind::MineableSilver => ore("silver", 0.3),
        ThingKind::MineableGold => ore("gold", 0.1),
        ThingKind::MineableUranium => ore("uranium", 0.2),
        ThingKind::MineablePlasteel => ore("compacted plasteel", 0.15),
        ThingKind::MineableJade => ore("jade", 0.1),
        ThingKind::MineableComponents => ore("compacted machinery", 0.2),
        ThingKind::SteamGeyser => ThingDef {
            label: "steam geyser",
            building: true,
            destroyable: false,
            has_tooltip: true,
            linked_graphics: false,
            drawer: DrawerType::MapMeshAndRealtime,
            discard_on_destroyed: true,
            ticks: true,
            fills_cover: false,
            mineable_scatter_commonality: 0.0,
        },
        ThingKind::SurvivalMeals => item("packaged survival meal"),
        ThingKind::SteelStack => item("steel"),
    }
}

pub fn is_deposit(kind: ThingKind) -> bool {
    thing_def(kind).building && thing_def(kind).mineable_scatter_commonality > 0.0
}

pub fn is_natural_rock(kind: ThingKind) -> bool {
    ThingKind::NATURAL_ROCKS.contains(&kind)
}

pub fn deposit_kinds() -> impl Iterator<Item = ThingKind> {
    ThingKind::ALL.into_iter().filter(|kind| is_deposit(*kind))
}
