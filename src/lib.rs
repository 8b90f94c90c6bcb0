pub mod config;
pub mod env;
pub mod error;
pub mod observation;
pub mod policy;

pub use crate::config::Settings;
pub use error::{EnvError, PolicyError};

pub use env::{RewardShapingEnv, ScriptedSimulator, Simulator, Transition};
pub use observation::{LocationKey, Snapshot, SymbolGrid};
pub use policy::{build_policy, RewardPolicy, StepContext, TaskKind, Verdict};
