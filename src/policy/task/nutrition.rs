use crate::config::Settings;
use crate::error::PolicyError;
use crate::observation::Snapshot;
use crate::policy::stuck::StuckStateDetector;

use super::{detector_from, RewardPolicy, StepContext, Verdict};

/// Eating task: positive changes in the nutrition counter, plus the stuck
/// time penalty. Drops in nutrition (ordinary hunger) contribute nothing
/// rather than a negative reward.
pub struct NutritionGainPolicy {
    stuck: StuckStateDetector,
}

impl NutritionGainPolicy {
    pub fn new(settings: &Settings) -> Self {
        Self {
            stuck: detector_from(settings),
        }
    }
}

impl RewardPolicy for NutritionGainPolicy {
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
            return Ok(Verdict {
                reward: 0.0,
                done: ctx.simulation_done,
                forced_quit: false,
            });
        }

        let penalty = self
            .stuck
            .advance(prior.turn_counter()?, current.turn_counter()?);
        let gain = (current.nutrition()? - prior.nutrition()?).max(0) as f64;
        let forced_quit = self.stuck.should_force_terminate();
        Ok(Verdict {
            reward: gain + penalty,
            done: ctx.simulation_done || forced_quit,
            forced_quit,
        })
    }

    fn frozen_steps(&self) -> u32 {
        self.stuck.frozen_steps()
    }
}
