use crate::config::Settings;
use crate::error::PolicyError;
use crate::observation::Snapshot;
use crate::policy::exploration::ExplorationTracker;
use crate::policy::progress::SharedProgress;
use crate::policy::stuck::StuckStateDetector;

use super::{detector_from, RewardPolicy, StepContext, Verdict};

/// Relative-score task: the episode is scored once, at termination, against
/// a running mean of past episode scores.
///
/// The episode score is the cumulative in-game score plus an exploration
/// credit of one point per hundred newly revealed cells. The running mean
/// lives in a caller-owned [`TrainingProgressState`] shared across all
/// concurrent episodes, passed in at construction.
///
/// [`TrainingProgressState`]: crate::policy::TrainingProgressState
pub struct RelativeScorePolicy {
    stuck: StuckStateDetector,
    progress: SharedProgress,
    explored: ExplorationTracker,
    total_explored: f64,
    episode_score: f64,
}

impl RelativeScorePolicy {
    pub fn new(settings: &Settings, progress: SharedProgress) -> Self {
        Self {
            stuck: detector_from(settings),
            progress,
            explored: ExplorationTracker::new(),
            total_explored: 0.0,
            episode_score: 0.0,
        }
    }

    fn accumulate_exploration(&mut self, snapshot: &Snapshot) -> Result<(), PolicyError> {
        let key = snapshot.location()?;
        let delta = self.explored.update(key, snapshot.glyphs.revealed_count());
        self.total_explored += delta as f64 / 100.0;
        Ok(())
    }
}

impl RewardPolicy for RelativeScorePolicy {
    fn reset(&mut self, first: &Snapshot) -> Result<(), PolicyError> {
        self.stuck.reset();
        self.explored.reset();
        self.total_explored = 0.0;
        self.episode_score = 0.0;
        self.accumulate_exploration(first)?;
        Ok(())
    }

    fn step(
        &mut self,
        prior: &Snapshot,
        current: &Snapshot,
        ctx: StepContext,
    ) -> Result<Verdict, PolicyError> {
        self.stuck
            .observe(prior.turn_counter()?, current.turn_counter()?);

        // Outside normal play the stats row reads zero; the episode score
        // holds its last value instead of collapsing.
        if ctx.in_normal_game {
            self.accumulate_exploration(current)?;
            self.episode_score = current.score()? as f64 + self.total_explored;
        }

        let forced_quit = self.stuck.should_force_terminate();
        let done = ctx.simulation_done || forced_quit;
        let reward = if done {
            let mut progress = self.progress.lock().unwrap_or_else(|e| e.into_inner());
            let reward = self.episode_score / (progress.running_mean() + 1e-4) - 1.0;
            progress.record_episode(self.episode_score);
            reward
        } else {
            0.0
        };

        Ok(Verdict {
            reward,
            done,
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
    use crate::policy::TrainingProgressState;

    fn snapshot(turn: i64, score: i64) -> Snapshot {
        Snapshot::builder().turn(turn).score(score).build()
    }

    fn active_ctx() -> StepContext {
        StepContext {
            simulation_done: false,
            in_normal_game: true,
        }
    }

    #[test]
    fn test_non_terminal_steps_pay_nothing() {
        let progress = TrainingProgressState::shared(0.999);
        let mut policy = RelativeScorePolicy::new(&Settings::default(), progress);
        policy.reset(&snapshot(0, 0)).unwrap();
        let verdict = policy
            .step(&snapshot(0, 0), &snapshot(1, 50), active_ctx())
            .unwrap();
        assert_eq!(verdict.reward, 0.0);
        assert!(!verdict.done);
    }

    #[test]
    fn test_terminal_reward_is_relative_to_running_mean() {
        let progress = TrainingProgressState::shared(0.5);
        let mut policy = RelativeScorePolicy::new(&Settings::default(), progress.clone());
        policy.reset(&snapshot(0, 0)).unwrap();
        policy
            .step(&snapshot(0, 0), &snapshot(1, 3), active_ctx())
            .unwrap();

        let ctx = StepContext {
            simulation_done: true,
            in_normal_game: true,
        };
        let verdict = policy.step(&snapshot(1, 3), &snapshot(2, 3), ctx).unwrap();
        // initial mean is 1.0: reward = 3 / (1 + 1e-4) - 1
        assert!((verdict.reward - 2.0).abs() < 1e-3);
        assert!(verdict.done);
        // and the mean absorbed this episode afterwards
        let mean = progress.lock().unwrap().running_mean();
        assert!((mean - (1.0 * 0.5 + 3.0 * 0.5)).abs() < 1e-12);
    }

    #[test]
    fn test_episode_score_held_outside_normal_play() {
        let progress = TrainingProgressState::shared(0.5);
        let mut policy = RelativeScorePolicy::new(&Settings::default(), progress.clone());
        policy.reset(&snapshot(0, 0)).unwrap();
        policy
            .step(&snapshot(0, 0), &snapshot(1, 40), active_ctx())
            .unwrap();

        // death screen: stats zeroed, but the recorded score must stay 40
        let ctx = StepContext {
            simulation_done: true,
            in_normal_game: false,
        };
        policy.step(&snapshot(1, 40), &snapshot(1, 0), ctx).unwrap();
        assert_eq!(progress.lock().unwrap().last_score(), 40.0);
    }

    #[test]
    fn test_exploration_credit_counts_toward_score() {
        let progress = TrainingProgressState::shared(0.5);
        let mut policy = RelativeScorePolicy::new(&Settings::default(), progress.clone());
        policy.reset(&snapshot(0, 0)).unwrap();

        let mut revealed = Snapshot::builder().turn(1);
        for i in 0..100 {
            revealed = revealed.glyph(i / 79, i % 79, 9);
        }
        let ctx = StepContext {
            simulation_done: true,
            in_normal_game: true,
        };
        policy.step(&snapshot(0, 0), &revealed.build(), ctx).unwrap();
        assert_eq!(progress.lock().unwrap().last_score(), 1.0);
    }

    #[test]
    fn test_instances_share_one_running_mean() {
        let progress = TrainingProgressState::shared(0.5);
        let settings = Settings::default();
        let mut a = RelativeScorePolicy::new(&settings, progress.clone());
        let mut b = RelativeScorePolicy::new(&settings, progress.clone());
        let ctx = StepContext {
            simulation_done: true,
            in_normal_game: true,
        };
        a.reset(&snapshot(0, 0)).unwrap();
        b.reset(&snapshot(0, 0)).unwrap();
        a.step(&snapshot(0, 0), &snapshot(1, 4), ctx).unwrap();
        b.step(&snapshot(0, 0), &snapshot(1, 8), ctx).unwrap();
        // mean: 1.0 -> 2.5 -> 5.25
        let mean = progress.lock().unwrap().running_mean();
        assert!((mean - 5.25).abs() < 1e-12);
    }
}
