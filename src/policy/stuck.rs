//! Stuck-state detection and time penalties.
//!
//! A "stuck" step is one that leaves the simulation's turn counter
//! unchanged, which happens when the agent interacts with menus, prompts,
//! or other non-turn-consuming surfaces. A long enough run of stuck steps
//! means the episode has deadlocked and must be force-quit.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PolicyError;

/// Steps without turn progress before the episode is force-quit.
pub const DEFAULT_QUIT_THRESHOLD: u32 = 48;

/// Decay law applied to the frozen-step count when computing the penalty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(try_from = "String", into = "String")]
pub enum PenaltyMode {
    /// Flat `step_coeff` on any stuck step.
    #[default]
    Constant,
    /// `2^frozen_steps * step_coeff`.
    Exp,
    /// `frozen_steps^2 * step_coeff`.
    Square,
    /// `frozen_steps * step_coeff`.
    Linear,
    /// `step_coeff` on every step, stuck or not.
    Always,
}

impl FromStr for PenaltyMode {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "constant" => Ok(Self::Constant),
            "exp" => Ok(Self::Exp),
            "square" => Ok(Self::Square),
            "linear" => Ok(Self::Linear),
            "always" => Ok(Self::Always),
            other => Err(PolicyError::Configuration(format!(
                "unknown penalty mode '{other}'"
            ))),
        }
    }
}

impl TryFrom<String> for PenaltyMode {
    type Error = PolicyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PenaltyMode> for String {
    fn from(mode: PenaltyMode) -> Self {
        match mode {
            PenaltyMode::Constant => "constant",
            PenaltyMode::Exp => "exp",
            PenaltyMode::Square => "square",
            PenaltyMode::Linear => "linear",
            PenaltyMode::Always => "always",
        }
        .to_string()
    }
}

/// Tracks consecutive non-advancing steps and prices them.
///
/// `ACTIVE` and `STUCK` are implicit in `frozen_steps`: zero means the last
/// step consumed game time, anything else counts the current stall run.
#[derive(Debug, Clone)]
pub struct StuckStateDetector {
    mode: PenaltyMode,
    step_coeff: f64,
    turn_coeff: f64,
    quit_threshold: u32,
    frozen_steps: u32,
}

impl StuckStateDetector {
    pub fn new(mode: PenaltyMode, step_coeff: f64, turn_coeff: f64) -> Self {
        Self {
            mode,
            step_coeff,
            turn_coeff,
            quit_threshold: DEFAULT_QUIT_THRESHOLD,
            frozen_steps: 0,
        }
    }

    pub fn with_quit_threshold(mut self, threshold: u32) -> Self {
        self.quit_threshold = threshold;
        self
    }

    pub fn frozen_steps(&self) -> u32 {
        self.frozen_steps
    }

    pub fn reset(&mut self) {
        self.frozen_steps = 0;
    }

    /// Folds one turn-counter transition into the stall run. Returns the
    /// updated frozen-step count.
    pub fn observe(&mut self, old_turn: i64, new_turn: i64) -> u32 {
        if old_turn == new_turn {
            self.frozen_steps += 1;
        } else {
            self.frozen_steps = 0;
        }
        self.frozen_steps
    }

    /// Penalty for the current stall run plus the per-turn component
    /// `dt * turn_coeff`. Pure with respect to detector state.
    pub fn penalty(&self, dt: i64) -> f64 {
        let step_penalty = match self.mode {
            PenaltyMode::Constant => {
                if self.frozen_steps > 0 {
                    self.step_coeff
                } else {
                    0.0
                }
            }
            PenaltyMode::Exp => (self.frozen_steps as f64).exp2() * self.step_coeff,
            PenaltyMode::Square => (self.frozen_steps as f64).powi(2) * self.step_coeff,
            PenaltyMode::Linear => self.frozen_steps as f64 * self.step_coeff,
            PenaltyMode::Always => self.step_coeff,
        };
        step_penalty + dt as f64 * self.turn_coeff
    }

    /// Observe a transition and price it in one call.
    pub fn advance(&mut self, old_turn: i64, new_turn: i64) -> f64 {
        self.observe(old_turn, new_turn);
        self.penalty(new_turn - old_turn)
    }

    /// True once the stall run has reached the quit threshold. The caller
    /// must then send the simulation a quit action and end the episode.
    pub fn should_force_terminate(&self) -> bool {
        self.frozen_steps >= self.quit_threshold
    }
}
