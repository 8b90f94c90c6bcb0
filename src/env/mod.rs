mod environment;
mod scripted;
mod simulator;

pub use environment::{RewardShapingEnv, Transition};
pub use scripted::ScriptedSimulator;
pub use simulator::Simulator;
