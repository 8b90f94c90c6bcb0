use crate::config::Settings;
use crate::error::PolicyError;
use crate::observation::Snapshot;
use crate::policy::exploration::ExplorationTracker;
use crate::policy::stuck::StuckStateDetector;

use super::{detector_from, RewardPolicy, StepContext, Verdict};

/// Scouting task: one reward point per map cell newly revealed at the
/// current dungeon location, plus the stuck time penalty.
pub struct ExplorationDeltaPolicy {
    stuck: StuckStateDetector,
    explored: ExplorationTracker,
}

impl ExplorationDeltaPolicy {
    pub fn new(settings: &Settings) -> Self {
        Self {
            stuck: detector_from(settings),
            explored: ExplorationTracker::new(),
        }
    }
}

impl RewardPolicy for ExplorationDeltaPolicy {
    fn reset(&mut self, _first: &Snapshot) -> Result<(), PolicyError> {
        self.stuck.reset();
        self.explored.reset();
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
        let key = current.location()?;
        let delta = self.explored.update(key, current.glyphs.revealed_count());
        let forced_quit = self.stuck.should_force_terminate();
        Ok(Verdict {
            reward: delta as f64 + penalty,
            done: ctx.simulation_done || forced_quit,
            forced_quit,
        })
    }

    fn frozen_steps(&self) -> u32 {
        self.stuck.frozen_steps()
    }
}
