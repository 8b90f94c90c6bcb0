use crate::config::Settings;
use crate::error::PolicyError;
use crate::observation::Snapshot;
use crate::policy::stuck::StuckStateDetector;

use super::{detector_from, RewardPolicy, StepContext, Verdict};

/// Landmark-proximity task: the episode succeeds when the configured
/// landmark symbol occupies one of the eight cells around the player.
pub struct LandmarkProximityPolicy {
    stuck: StuckStateDetector,
    landmark_symbol: i32,
}

impl LandmarkProximityPolicy {
    pub fn new(settings: &Settings) -> Self {
        Self {
            stuck: detector_from(settings),
            landmark_symbol: settings.landmark_symbol,
        }
    }
}

impl RewardPolicy for LandmarkProximityPolicy {
    fn reset(&mut self, _first: &Snapshot) -> Result<(), PolicyError> {
        self.stuck.reset();
        Ok(())
    }

    fn step(
        &mut self,
        prior: &Snapshot,
        current: &Snapshot,
        ctx: StepContext,
    ) -> Result<Verdict, PolicyError> {
        let penalty = self
            .stuck
            .advance(prior.turn_counter()?, current.turn_counter()?);
        let (x, y) = current.position()?;
        let success = current
            .glyphs
            .neighbors(y, x)
            .any(|code| code == self.landmark_symbol);
        let forced_quit = self.stuck.should_force_terminate();
        Ok(Verdict {
            reward: if success { 1.0 } else { 0.0 } + penalty,
            done: ctx.simulation_done || success || forced_quit,
            forced_quit,
        })
    }

    fn frozen_steps(&self) -> u32 {
        self.stuck.frozen_steps()
    }
}
