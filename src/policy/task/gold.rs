use crate::config::Settings;
use crate::error::PolicyError;
use crate::observation::Snapshot;
use crate::policy::stuck::StuckStateDetector;

use super::{detector_from, RewardPolicy, StepContext, Verdict};

/// Gold task: the change in gold carried, plus the stuck time penalty.
/// The player picks gold up by walking over it, so the delta is the
/// natural per-step signal.
pub struct GoldDeltaPolicy {
    stuck: StuckStateDetector,
}

impl GoldDeltaPolicy {
    pub fn new(settings: &Settings) -> Self {
        Self {
            stuck: detector_from(settings),
        }
    }
}

impl RewardPolicy for GoldDeltaPolicy {
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
        let gold_diff = (current.gold()? - prior.gold()?) as f64;
        let forced_quit = self.stuck.should_force_terminate();
        Ok(Verdict {
            reward: gold_diff + penalty,
            done: ctx.simulation_done || forced_quit,
            forced_quit,
        })
    }

    fn frozen_steps(&self) -> u32 {
        self.stuck.frozen_steps()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(turn: i64, gold: i64) -> Snapshot {
        Snapshot::builder().turn(turn).gold(gold).build()
    }

    #[test]
    fn test_gold_delta() {
        let mut policy = GoldDeltaPolicy::new(&Settings::default());
        let ctx = StepContext {
            simulation_done: false,
            in_normal_game: true,
        };
        let verdict = policy.step(&snapshot(1, 10), &snapshot(2, 35), ctx).unwrap();
        assert_eq!(verdict.reward, 25.0);
    }

    #[test]
    fn test_zero_outside_normal_play_regardless_of_stats() {
        let mut policy = GoldDeltaPolicy::new(&Settings::default());
        let ctx = StepContext {
            simulation_done: true,
            in_normal_game: false,
        };
        // death screen: stats collapsed to zero, naive delta would be -500
        let verdict = policy.step(&snapshot(9, 500), &snapshot(9, 0), ctx).unwrap();
        assert_eq!(verdict.reward, 0.0);
        assert!(verdict.done);
    }
}
