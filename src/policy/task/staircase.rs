use crate::config::{Settings, SymbolRange};
use crate::error::PolicyError;
use crate::observation::Snapshot;
use crate::policy::stuck::StuckStateDetector;

use super::{detector_from, RewardPolicy, StepContext, Verdict};

/// Staircase task: terminal reward 1.0 the moment the player stands on a
/// downward staircase, plus the stuck time penalty.
pub struct StaircaseReachPolicy {
    stuck: StuckStateDetector,
}

impl StaircaseReachPolicy {
    pub fn new(settings: &Settings) -> Self {
        Self {
            stuck: detector_from(settings),
        }
    }
}

impl RewardPolicy for StaircaseReachPolicy {
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
        let success = current.stairs_down_underfoot()?;
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

/// Staircase-with-companion task: as [`StaircaseReachPolicy`], but success
/// additionally requires a companion entity in one of the eight cells
/// around the player.
pub struct StaircaseWithCompanionPolicy {
    stuck: StuckStateDetector,
    companion_range: SymbolRange,
}

impl StaircaseWithCompanionPolicy {
    pub fn new(settings: &Settings) -> Self {
        Self {
            stuck: detector_from(settings),
            companion_range: settings.companion_range,
        }
    }

    fn companion_adjacent(&self, snapshot: &Snapshot) -> Result<bool, PolicyError> {
        let (x, y) = snapshot.position()?;
        Ok(snapshot
            .glyphs
            .neighbors(y, x)
            .any(|code| self.companion_range.contains(code)))
    }
}

impl RewardPolicy for StaircaseWithCompanionPolicy {
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
        let success = current.stairs_down_underfoot()? && self.companion_adjacent(current)?;
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
