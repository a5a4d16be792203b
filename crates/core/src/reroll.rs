//! Map and geyser rerolls: the orchestrating controller plus the budget, retry and
//! reset engines it drives.

pub mod budget;
pub mod controller;
pub mod loading;
pub mod scatter_retry;
pub mod snapshot;
pub mod state_reset;

#[cfg(test)]
mod test_support;

use thiserror::Error;

use crate::types::ThingKind;

pub use budget::{
    DepletionContext, DepletionPlan, DepletionReport, FULL_BUDGET, debit_and_deplete, execute,
};
pub use controller::{RerollController, RerollPhase, RerollTrigger};
pub use scatter_retry::{MAX_SCATTER_ATTEMPTS, ScatterRetryOutcome, regenerate_scattered_feature};
pub use snapshot::InitialSessionSnapshot;
pub use state_reset::{reset_scatter_step, reset_scatter_steps};

/// Reasons a reroll operation aborted without changing state.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RerollError {
    #[error("reroll settings are not loaded")]
    MissingSettings,
    #[error("generation plan has no scatter step for {kind:?}")]
    MissingScatterStep { kind: ThingKind },
    #[error("no map is active")]
    NoActiveMap,
    #[error("initial session parameters were never captured")]
    NoSnapshot,
}
