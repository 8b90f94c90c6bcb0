use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::EnvError;
use crate::observation::Snapshot;
use crate::policy::{RewardPolicy, StepContext};

use super::simulator::Simulator;

/// Result of one environment step, in the conventional RL shape.
#[derive(Debug, Clone)]
pub struct Transition {
    pub observation: Snapshot,
    pub reward: f64,
    pub done: bool,
    pub info: Map<String, Value>,
}

/// Couples a simulation with one reward policy and exposes the usual
/// `reset`/`step` surface to the training loop.
///
/// The wrapper keeps the previous snapshot so the policy always sees a
/// `(prior, current)` pair, and it is the one place that turns a policy's
/// forced-termination demand into an actual quit on the simulator.
pub struct RewardShapingEnv<S: Simulator> {
    simulator: S,
    policy: Box<dyn RewardPolicy>,
    previous: Option<Snapshot>,
    episode_id: Uuid,
    episode_steps: u64,
    episode_return: f64,
}

impl<S: Simulator> RewardShapingEnv<S> {
    pub fn new(simulator: S, policy: Box<dyn RewardPolicy>) -> Self {
        Self {
            simulator,
            policy,
            previous: None,
            episode_id: Uuid::nil(),
            episode_steps: 0,
            episode_return: 0.0,
        }
    }

    pub fn simulator(&self) -> &S {
        &self.simulator
    }

    pub fn reset(&mut self) -> Result<Snapshot, EnvError> {
        let first = self.simulator.reset()?;
        self.policy.reset(&first)?;
        self.previous = Some(first.clone());
        self.episode_id = Uuid::new_v4();
        self.episode_steps = 0;
        self.episode_return = 0.0;
        tracing::debug!(episode = %self.episode_id, "episode reset");
        Ok(first)
    }

    pub fn step(&mut self, action: &S::Action) -> Result<Transition, EnvError> {
        let prior = self.previous.take().ok_or(EnvError::NotReset)?;
        let (current, simulation_done) = self.simulator.step(action)?;
        let ctx = StepContext {
            simulation_done,
            in_normal_game: self.simulator.in_normal_game(),
        };
        let verdict = self.policy.step(&prior, &current, ctx)?;

        if verdict.forced_quit {
            tracing::warn!(
                episode = %self.episode_id,
                steps = self.episode_steps,
                frozen_steps = self.policy.frozen_steps(),
                "episode stuck, forcing quit"
            );
            self.simulator.quit()?;
        }

        self.episode_steps += 1;
        self.episode_return += verdict.reward;

        let mut info = Map::new();
        info.insert(
            "frozen_steps".to_string(),
            Value::from(self.policy.frozen_steps()),
        );
        info.insert("forced_quit".to_string(), Value::from(verdict.forced_quit));

        if verdict.done {
            tracing::info!(
                episode = %self.episode_id,
                steps = self.episode_steps,
                episode_return = self.episode_return,
                "episode finished"
            );
        }

        self.previous = Some(current.clone());
        Ok(Transition {
            observation: current,
            reward: verdict.reward,
            done: verdict.done,
            info,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::env::scripted::ScriptedSimulator;
    use crate::policy::{build_policy, TaskKind};

    /// Turn counter advances for the first ten steps, then stalls for the
    /// rest of the script.
    fn stalling_script(len: usize) -> Vec<Snapshot> {
        (0..len)
            .map(|i| Snapshot::builder().turn(i.min(9) as i64).score(0).build())
            .collect()
    }

    fn score_env(script: Vec<Snapshot>) -> RewardShapingEnv<ScriptedSimulator> {
        let settings = Settings::default();
        let policy = build_policy(TaskKind::ScoreDelta, &settings, None).unwrap();
        RewardShapingEnv::new(ScriptedSimulator::new(script), policy)
    }

    #[test]
    fn test_step_before_reset_is_an_error() {
        let mut env = score_env(stalling_script(3));
        assert!(matches!(env.step(&0), Err(EnvError::NotReset)));
    }

    #[test]
    fn test_stalled_episode_is_force_quit_within_threshold() {
        // Stalls run from step 10 onwards; the 48th consecutive stall lands
        // on step 57, within the 58-step deadline.
        let mut env = score_env(stalling_script(80));
        env.reset().unwrap();

        let mut steps = 0;
        loop {
            let transition = env.step(&0).unwrap();
            steps += 1;
            if transition.done {
                // final active step pays exactly the constant stuck penalty
                // (score never moves in this script)
                assert!((transition.reward - (-0.01)).abs() < 1e-12);
                assert_eq!(transition.info["forced_quit"], true);
                assert_eq!(transition.info["frozen_steps"], 48);
                break;
            }
        }
        assert_eq!(steps, 57);
        assert!(steps <= 58);
        assert_eq!(env.simulator().quit_count(), 1);
    }

    #[test]
    fn test_score_deltas_flow_through() {
        let script = vec![
            Snapshot::builder().turn(0).score(0).build(),
            Snapshot::builder().turn(1).score(10).build(),
            Snapshot::builder().turn(2).score(10).build(),
            Snapshot::builder().turn(3).score(25).build(),
        ];
        let mut env = score_env(script);
        env.reset().unwrap();
        assert_eq!(env.step(&0).unwrap().reward, 10.0);
        assert_eq!(env.step(&0).unwrap().reward, 0.0);
        let last = env.step(&0).unwrap();
        assert_eq!(last.reward, 15.0);
        // script exhausted: the simulation reports done on its last frame
        assert!(last.done);
        assert_eq!(env.simulator().quit_count(), 0);
    }

    #[test]
    fn test_reset_starts_a_fresh_episode() {
        let script = vec![
            Snapshot::builder().turn(0).score(0).build(),
            Snapshot::builder().turn(0).score(0).build(),
            Snapshot::builder().turn(1).score(5).build(),
        ];
        let mut env = score_env(script);
        env.reset().unwrap();
        let first = env.step(&0).unwrap();
        assert_eq!(first.info["frozen_steps"], 1);

        // fresh episode: stall run must not carry over
        env.reset().unwrap();
        let first = env.step(&0).unwrap();
        assert_eq!(first.info["frozen_steps"], 1);
        let second = env.step(&0).unwrap();
        assert_eq!(second.info["frozen_steps"], 0);
        assert_eq!(second.reward, 5.0);
    }
}
