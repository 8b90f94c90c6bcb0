use ::config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::PolicyError;
use crate::policy::{PenaltyMode, TaskKind, DEFAULT_QUIT_THRESHOLD};

/// Top-level settings for the reward layer.
///
/// Every field has a working default; a settings file or `ROGUEBOT_*`
/// environment variables override per key.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub task: TaskKind,
    pub stuck: StuckSettings,
    /// Half-open symbol-code range treated as companion entities. Symbol
    /// code assignments are game-data specific.
    pub companion_range: SymbolRange,
    /// Symbol code of the landmark entity for the proximity task.
    pub landmark_symbol: i32,
    pub descent: DescentSettings,
    /// EWMA retention factor for the cross-episode running mean score.
    pub progress_alpha: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            task: TaskKind::ScoreDelta,
            stuck: StuckSettings::default(),
            companion_range: SymbolRange { start: 400, end: 800 },
            landmark_symbol: 321,
            descent: DescentSettings::default(),
            progress_alpha: 0.999,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StuckSettings {
    pub penalty_mode: PenaltyMode,
    /// Coefficient applied to the frozen-step count.
    pub penalty_step: f64,
    /// Coefficient applied to the turn-counter delta.
    pub penalty_turn: f64,
    /// Frozen steps before the episode is force-quit.
    pub quit_threshold: u32,
}

impl Default for StuckSettings {
    fn default() -> Self {
        Self {
            penalty_mode: PenaltyMode::Constant,
            penalty_step: -0.01,
            penalty_turn: 0.0,
            quit_threshold: DEFAULT_QUIT_THRESHOLD,
        }
    }
}

/// Half-open range of symbol codes, `start <= code < end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolRange {
    pub start: i32,
    pub end: i32,
}

impl SymbolRange {
    pub fn contains(&self, code: i32) -> bool {
        code >= self.start && code < self.end
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DescentSettings {
    /// One-time bonus per newly visited location.
    pub visit_bonus: f64,
    /// Divisor scale for the exploration term, applied as
    /// `delta / (explore_scale * visit_count^2)`. Non-positive disables
    /// the term. The decay curve is a tunable, not a fixed law.
    pub explore_scale: f64,
    /// Bonus for standing in a coarse position bucket absent from recent
    /// history.
    pub novel_position_bonus: f64,
    pub experience_point_bonus: f64,
    pub experience_level_bonus: f64,
    /// Applied exactly once when the episode terminates.
    pub terminal_penalty: f64,
    /// Length of the recent-position window.
    pub position_history_window: usize,
}

impl Default for DescentSettings {
    fn default() -> Self {
        Self {
            visit_bonus: 1.0,
            explore_scale: 200.0,
            novel_position_bonus: 0.01,
            experience_point_bonus: 0.04,
            experience_level_bonus: 0.25,
            terminal_penalty: -0.25,
            position_history_window: 24,
        }
    }
}

impl Settings {
    /// Layered load: defaults, then an optional settings file, then
    /// `ROGUEBOT_*` environment variables.
    pub fn load(path: Option<&str>) -> Result<Self, PolicyError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::with_name(path));
        }
        builder = builder.add_source(
            Environment::with_prefix("ROGUEBOT")
                .separator("__")
                .try_parsing(true),
        );
        let settings: Settings = builder
            .build()
            .map_err(|e| PolicyError::Configuration(e.to_string()))?
            .try_deserialize()
            .map_err(|e| PolicyError::Configuration(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), PolicyError> {
        if self.stuck.quit_threshold == 0 {
            return Err(PolicyError::Configuration(
                "stuck.quit_threshold must be positive".to_string(),
            ));
        }
        if self.companion_range.is_empty() {
            return Err(PolicyError::Configuration(format!(
                "companion_range {}..{} is empty",
                self.companion_range.start, self.companion_range.end
            )));
        }
        if !(0.0..1.0).contains(&self.progress_alpha) {
            return Err(PolicyError::Configuration(format!(
                "progress_alpha {} outside [0, 1)",
                self.progress_alpha
            )));
        }
        if self.descent.position_history_window == 0 {
            return Err(PolicyError::Configuration(
                "descent.position_history_window must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn test_empty_companion_range_rejected() {
        let mut settings = Settings::default();
        settings.companion_range = SymbolRange { start: 10, end: 10 };
        assert!(matches!(
            settings.validate(),
            Err(PolicyError::Configuration(_))
        ));
    }

    #[test]
    fn test_zero_quit_threshold_rejected() {
        let mut settings = Settings::default();
        settings.stuck.quit_threshold = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_symbol_range_is_half_open() {
        let range = SymbolRange { start: 400, end: 800 };
        assert!(range.contains(400));
        assert!(range.contains(799));
        assert!(!range.contains(800));
        assert!(!range.contains(399));
    }
}
