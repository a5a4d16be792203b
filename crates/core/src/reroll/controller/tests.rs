//! Regression test module wiring for reroll controller behaviors.

mod geyser_reroll;

/// Shared imports for controller regression tests.
mod support {
    pub(super) use crate::host::{Defs, Host, NewGameConfig, Window};
    pub(super) use crate::language::GENERATING_MAP_KEY;
    pub(super) use crate::reroll::{
        MAX_SCATTER_ATTEMPTS, RerollController, RerollError, RerollPhase, RerollTrigger,
    };
    pub(super) use crate::reroll::test_support::*;
    pub(super) use crate::settings::RerollSettings;
    pub(super) use crate::types::{ProgramState, RerollEvent, RerollKind, ThingKind, WorldSquare};
    pub(super) use crate::world::{PawnKind, RelationKind};
}
