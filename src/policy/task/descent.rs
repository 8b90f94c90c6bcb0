use std::collections::VecDeque;

use crate::config::{DescentSettings, Settings};
use crate::error::PolicyError;
use crate::observation::{LocationKey, Snapshot};
use crate::policy::exploration::ExplorationTracker;
use crate::policy::stuck::StuckStateDetector;
use crate::policy::visitation::VisitationLedger;

use super::{detector_from, RewardPolicy, StepContext, Verdict};

/// Coarse position bucket for anti-repetition bookkeeping: location key
/// plus map coordinates divided by 3.
type PositionBucket = (LocationKey, i64, i64);

/// Descent task: a composite shaping policy that pays for going deeper.
///
/// Combines a one-time bonus per visited location, an exploration delta
/// scaled down by the square of the visit count (repeated level transitions
/// must not inflate the exploration signal), a small bonus for standing in
/// a recently unvisited position bucket, experience deltas, and a fixed
/// penalty exactly once at episode end.
pub struct DescentPolicy {
    stuck: StuckStateDetector,
    cfg: DescentSettings,
    visited: VisitationLedger,
    explored: ExplorationTracker,
    position_history: VecDeque<PositionBucket>,
}

impl DescentPolicy {
    pub fn new(settings: &Settings) -> Self {
        Self {
            stuck: detector_from(settings),
            cfg: settings.descent.clone(),
            visited: VisitationLedger::new(settings.descent.visit_bonus),
            explored: ExplorationTracker::new(),
            position_history: VecDeque::with_capacity(settings.descent.position_history_window),
        }
    }

    /// Visit bonus plus the decayed exploration delta for the current
    /// location.
    fn location_reward(&mut self, snapshot: &Snapshot) -> Result<f64, PolicyError> {
        let key = snapshot.location()?;
        let mut reward = self.visited.visit(key);
        if self.cfg.explore_scale > 0.0 {
            let delta = self.explored.update(key, snapshot.glyphs.revealed_count());
            let visits = self.visited.visit_count().max(1) as f64;
            reward += delta as f64 / (self.cfg.explore_scale * visits * visits);
        }
        Ok(reward)
    }
}

impl RewardPolicy for DescentPolicy {
    fn reset(&mut self, first: &Snapshot) -> Result<(), PolicyError> {
        self.stuck.reset();
        self.visited.reset();
        self.explored.reset();
        self.position_history.clear();
        // Seed baselines from the starting snapshot so the starting level
        // does not pay out as a discovery on the first step.
        self.location_reward(first)?;
        Ok(())
    }

    fn step(
        &mut self,
        prior: &Snapshot,
        current: &Snapshot,
        ctx: StepContext,
    ) -> Result<Verdict, PolicyError> {
        let mut reward = self
            .stuck
            .advance(prior.turn_counter()?, current.turn_counter()?);

        // Menus and prompts freeze the map view; discovery bookkeeping
        // would read stale data there.
        if !current.menu_blocked()? {
            reward += self.location_reward(current)?;
        }

        let key = current.location()?;
        let (x, y) = current.position()?;
        let bucket = (key, x / 3, y / 3);
        if !self.position_history.contains(&bucket) {
            reward += self.cfg.novel_position_bonus;
        }
        if self.position_history.len() >= self.cfg.position_history_window {
            self.position_history.pop_front();
        }
        self.position_history.push_back(bucket);

        if current.experience_points()? > prior.experience_points()? {
            reward += self.cfg.experience_point_bonus;
        }
        if current.experience_level()? > prior.experience_level()? {
            reward += self.cfg.experience_level_bonus;
        }

        let forced_quit = self.stuck.should_force_terminate();
        let done = ctx.simulation_done || forced_quit;
        if done {
            reward += self.cfg.terminal_penalty;
        }
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
