use crate::config::Settings;
use crate::error::PolicyError;
use crate::observation::Snapshot;
use crate::policy::stuck::StuckStateDetector;

use super::{detector_from, RewardPolicy, StepContext, Verdict};

/// Score-delta task: the change in cumulative score each step, plus the
/// stuck time penalty.
pub struct ScoreDeltaPolicy {
    stuck: StuckStateDetector,
}

impl ScoreDeltaPolicy {
    pub fn new(settings: &Settings) -> Self {
        Self {
            stuck: detector_from(settings),
        }
    }
}

impl RewardPolicy for ScoreDeltaPolicy {
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
        if !ctx.in_normal_game {
            // Stats read as zero outside normal play; a delta against them
            // would be spurious.
            return Ok(Verdict {
                reward: 0.0,
                done: ctx.simulation_done,
                forced_quit: false,
            });
        }

        let old_turn = prior.turn_counter()?;
        let new_turn = current.turn_counter()?;
        let penalty = self.stuck.advance(old_turn, new_turn);
        let score_diff = (current.score()? - prior.score()?) as f64;

        let forced_quit = self.stuck.should_force_terminate();
        Ok(Verdict {
            reward: score_diff + penalty,
            done: ctx.simulation_done || forced_quit,
            forced_quit,
        })
    }

    fn frozen_steps(&self) -> u32 {
        self.stuck.frozen_steps()
    }
}
