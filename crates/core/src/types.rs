use serde::Serialize;
use slotmap::new_key_type;

new_key_type! {
    pub struct ThingId;
    pub struct PawnId;
    pub struct FactionId;
}

/// Cell coordinate inside a single map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pos {
    pub y: i32,
    pub x: i32,
}

impl Pos {
    pub fn chebyshev(self, other: Pos) -> u32 {
        self.x.abs_diff(other.x).max(self.y.abs_diff(other.y))
    }
}

/// Tile coordinate on the world grid; one map sits on one square.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WorldSquare {
    pub x: i32,
    pub z: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ThingKind {
    Granite,
    Limestone,
    Marble,
    Sandstone,
    Slate,
    MineableSteel,
    MineableSilver,
    MineableGold,
    MineableUranium,
    MineablePlasteel,
    MineableJade,
    MineableComponents,
    SteamGeyser,
    SurvivalMeals,
    SteelStack,
}

impl ThingKind {
    pub const ALL: [ThingKind; 15] = [
        ThingKind::Granite,
        ThingKind::Limestone,
        ThingKind::Marble,
        ThingKind::Sandstone,
        ThingKind::Slate,
        ThingKind::MineableSteel,
        ThingKind::MineableSilver,
        ThingKind::MineableGold,
        ThingKind::MineableUranium,
        ThingKind::MineablePlasteel,
        ThingKind::MineableJade,
        ThingKind::MineableComponents,
        ThingKind::SteamGeyser,
        ThingKind::SurvivalMeals,
        ThingKind::SteelStack,
    ];

    pub const NATURAL_ROCKS: [ThingKind; 5] = [
        ThingKind::Granite,
        ThingKind::Limestone,
        ThingKind::Marble,
        ThingKind::Sandstone,
        ThingKind::Slate,
    ];
}

/// Lifecycle of a map object.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ThingState {
    Spawned,
    /// Removed from the map but still remembered by the world (e.g. for records).
    Memory,
    Discarded,
    Destroyed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Designation {
    Mine,
    Deconstruct,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RerollKind {
    Map,
    Geyser,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProgramState {
    Entry,
    MapPlaying,
}

/// Notifications published after a reroll transaction fully commits.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum RerollEvent {
    MapRerolled { session_generation: u32, budget_remaining: f64 },
    GeysersRerolled { budget_remaining: f64, attempts: u32, collision_free: bool },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_serialize_with_their_variant_name() {
        let event = RerollEvent::MapRerolled { session_generation: 2, budget_remaining: 70.0 };
        let json = serde_json::to_value(&event).expect("serializable");
        assert_eq!(json["MapRerolled"]["session_generation"], 2);
        assert_eq!(json["MapRerolled"]["budget_remaining"], 70.0);
    }

    #[test]
    fn chebyshev_takes_the_larger_axis_distance() {
        assert_eq!(Pos { y: 0, x: 0 }.chebyshev(Pos { y: 3, x: -5 }), 5);
    }
}
