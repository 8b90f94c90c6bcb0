//! Fixed-offset accessors into the raw snapshot rows.
//!
//! The simulation exposes player statistics and internal flags as plain
//! integer sequences whose field meanings are fixed by index. Every offset
//! is declared exactly once here; call sites go through the named methods
//! and get a bounds check for free.

use crate::error::PolicyError;

use super::snapshot::{LocationKey, Snapshot};

// stats row
pub(crate) const STAT_POS_X: usize = 0;
pub(crate) const STAT_POS_Y: usize = 1;
pub(crate) const STAT_SCORE: usize = 9;
pub(crate) const STAT_GOLD: usize = 13;
pub(crate) const STAT_EXP_LEVEL: usize = 18;
pub(crate) const STAT_EXP_POINTS: usize = 19;
pub(crate) const STAT_TURN: usize = 20;
pub(crate) const STAT_BRANCH: usize = 23;
pub(crate) const STAT_DEPTH: usize = 24;
pub(crate) const STAT_LEN: usize = 27;

// internal flags row
pub(crate) const FLAG_MENU_WAIT: usize = 3;
pub(crate) const FLAG_STAIRS_DOWN: usize = 4;
pub(crate) const FLAG_NUTRITION: usize = 7;
pub(crate) const INTERNAL_LEN: usize = 9;

impl Snapshot {
    fn stat(&self, field: &'static str, index: usize) -> Result<i64, PolicyError> {
        self.stats
            .get(index)
            .copied()
            .ok_or(PolicyError::OutOfRange {
                field,
                index,
                len: self.stats.len(),
            })
    }

    fn internal(&self, field: &'static str, index: usize) -> Result<i64, PolicyError> {
        self.internals
            .get(index)
            .copied()
            .ok_or(PolicyError::OutOfRange {
                field,
                index,
                len: self.internals.len(),
            })
    }

    /// Player map coordinates, `(x, y)`.
    pub fn position(&self) -> Result<(i64, i64), PolicyError> {
        Ok((
            self.stat("position_x", STAT_POS_X)?,
            self.stat("position_y", STAT_POS_Y)?,
        ))
    }

    /// Cumulative in-game score.
    pub fn score(&self) -> Result<i64, PolicyError> {
        self.stat("score", STAT_SCORE)
    }

    /// Gold carried by the player.
    pub fn gold(&self) -> Result<i64, PolicyError> {
        self.stat("gold", STAT_GOLD)
    }

    /// Experience level.
    pub fn experience_level(&self) -> Result<i64, PolicyError> {
        self.stat("experience_level", STAT_EXP_LEVEL)
    }

    /// Experience points.
    pub fn experience_points(&self) -> Result<i64, PolicyError> {
        self.stat("experience_points", STAT_EXP_POINTS)
    }

    /// The turn/move counter. Stuck detection watches this value; a step
    /// that leaves it unchanged did not consume game time.
    pub fn turn_counter(&self) -> Result<i64, PolicyError> {
        self.stat("turn_counter", STAT_TURN)
    }

    /// Dungeon location key, `(branch, depth)`.
    pub fn location(&self) -> Result<LocationKey, PolicyError> {
        Ok(LocationKey {
            branch: self.stat("branch", STAT_BRANCH)?,
            depth: self.stat("depth", STAT_DEPTH)?,
        })
    }

    /// True while a menu or prompt is swallowing input.
    pub fn menu_blocked(&self) -> Result<bool, PolicyError> {
        Ok(self.internal("menu_wait", FLAG_MENU_WAIT)? != 0)
    }

    /// True when the player stands on a downward staircase.
    pub fn stairs_down_underfoot(&self) -> Result<bool, PolicyError> {
        Ok(self.internal("stairs_down", FLAG_STAIRS_DOWN)? != 0)
    }

    /// Hunger/nutrition counter.
    pub fn nutrition(&self) -> Result<i64, PolicyError> {
        self.internal("nutrition", FLAG_NUTRITION)
    }
}
