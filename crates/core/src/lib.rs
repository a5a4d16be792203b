pub mod content;
pub mod host;
pub mod language;
pub mod mapgen;
pub mod reroll;
pub mod session;
pub mod settings;
pub mod types;
pub mod world;

pub use host::{Defs, Host, LoadError, NewGameConfig};
pub use reroll::{
    DepletionPlan, DepletionReport, RerollController, RerollError, RerollPhase, RerollTrigger,
    ScatterRetryOutcome,
};
pub use session::{GameInitData, Session};
pub use settings::{RerollSettings, SettingsError};
pub use types::*;
