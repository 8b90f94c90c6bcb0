mod exploration;
mod progress;
mod stuck;
mod task;
mod visitation;

pub use exploration::ExplorationTracker;
pub use progress::{SharedProgress, TrainingProgressState};
pub use stuck::{PenaltyMode, StuckStateDetector, DEFAULT_QUIT_THRESHOLD};
pub use task::{build_policy, RewardPolicy, StepContext, TaskKind, Verdict};
pub use visitation::VisitationLedger;
