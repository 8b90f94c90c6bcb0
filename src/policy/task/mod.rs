//! The reward-policy variant family.
//!
//! Each task is a small struct implementing [`RewardPolicy`]; the
//! [`TaskKind`] tag selects one at construction time. All variants share
//! the stuck-state machinery and differ only in how they combine signals
//! into a scalar reward and a termination verdict.

mod descent;
mod gold;
mod nutrition;
mod proximity;
mod relative;
mod score;
mod scout;
mod staircase;

use serde::{Deserialize, Serialize};

use crate::config::Settings;
use crate::error::PolicyError;
use crate::observation::Snapshot;
use crate::policy::progress::SharedProgress;
use crate::policy::stuck::StuckStateDetector;

pub use descent::DescentPolicy;
pub use gold::GoldDeltaPolicy;
pub use nutrition::NutritionGainPolicy;
pub use proximity::LandmarkProximityPolicy;
pub use relative::RelativeScorePolicy;
pub use score::ScoreDeltaPolicy;
pub use scout::ExplorationDeltaPolicy;
pub use staircase::{StaircaseReachPolicy, StaircaseWithCompanionPolicy};

/// Per-step inputs that come from the simulation rather than a snapshot.
#[derive(Debug, Clone, Copy)]
pub struct StepContext {
    /// The simulation's own terminal flag for this step.
    pub simulation_done: bool,
    /// False before the game has started and after the death screen, where
    /// stat fields read as zero.
    pub in_normal_game: bool,
}

/// Outcome of one policy step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Verdict {
    pub reward: f64,
    /// Merged terminal flag: simulation, task success, or forced quit.
    pub done: bool,
    /// When set, the caller must issue a quit action to the simulation;
    /// the episode has deadlocked in a non-turn-consuming state.
    pub forced_quit: bool,
}

/// Common contract for all task variants.
///
/// One instance owns the episode state for exactly one running episode;
/// vectorized setups construct one policy per environment.
pub trait RewardPolicy: Send {
    /// Clears episode state and seeds any baselines from the first
    /// snapshot of the new episode.
    fn reset(&mut self, first: &Snapshot) -> Result<(), PolicyError>;

    /// Consumes the previous and current snapshot and produces the shaped
    /// reward and termination verdict for this step.
    fn step(
        &mut self,
        prior: &Snapshot,
        current: &Snapshot,
        ctx: StepContext,
    ) -> Result<Verdict, PolicyError>;

    /// Length of the current stall run, for diagnostics.
    fn frozen_steps(&self) -> u32;
}

/// Selects which reward policy an environment runs with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TaskKind {
    #[default]
    ScoreDelta,
    StaircaseReach,
    StaircaseWithCompanion,
    LandmarkProximity,
    GoldDelta,
    NutritionGain,
    ExplorationDelta,
    Descent,
    RelativeScore,
}

/// Builds the policy for `kind`. `progress` is required by
/// [`TaskKind::RelativeScore`] and ignored by every other variant.
pub fn build_policy(
    kind: TaskKind,
    settings: &Settings,
    progress: Option<SharedProgress>,
) -> Result<Box<dyn RewardPolicy>, PolicyError> {
    settings.validate()?;
    let policy: Box<dyn RewardPolicy> = match kind {
        TaskKind::ScoreDelta => Box::new(ScoreDeltaPolicy::new(settings)),
        TaskKind::StaircaseReach => Box::new(StaircaseReachPolicy::new(settings)),
        TaskKind::StaircaseWithCompanion => Box::new(StaircaseWithCompanionPolicy::new(settings)),
        TaskKind::LandmarkProximity => Box::new(LandmarkProximityPolicy::new(settings)),
        TaskKind::GoldDelta => Box::new(GoldDeltaPolicy::new(settings)),
        TaskKind::NutritionGain => Box::new(NutritionGainPolicy::new(settings)),
        TaskKind::ExplorationDelta => Box::new(ExplorationDeltaPolicy::new(settings)),
        TaskKind::Descent => Box::new(DescentPolicy::new(settings)),
        TaskKind::RelativeScore => {
            let progress = progress.ok_or_else(|| {
                PolicyError::Configuration(
                    "relative-score requires a shared TrainingProgressState".to_string(),
                )
            })?;
            Box::new(RelativeScorePolicy::new(settings, progress))
        }
    };
    Ok(policy)
}

pub(crate) fn detector_from(settings: &Settings) -> StuckStateDetector {
    StuckStateDetector::new(
        settings.stuck.penalty_mode,
        settings.stuck.penalty_step,
        settings.stuck.penalty_turn,
    )
    .with_quit_threshold(settings.stuck.quit_threshold)
}
