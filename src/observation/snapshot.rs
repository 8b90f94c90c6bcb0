use serde::{Deserialize, Serialize};

use super::accessor::{
    FLAG_MENU_WAIT, FLAG_NUTRITION, FLAG_STAIRS_DOWN, INTERNAL_LEN, STAT_BRANCH, STAT_DEPTH,
    STAT_EXP_LEVEL, STAT_EXP_POINTS, STAT_GOLD, STAT_LEN, STAT_POS_X, STAT_POS_Y, STAT_SCORE,
    STAT_TURN,
};

/// Default viewport dimensions of the simulation's visible map.
pub const MAP_ROWS: usize = 21;
pub const MAP_COLS: usize = 79;

/// One immutable capture of simulation-exposed state at a given turn.
///
/// The policy layer only ever derives values from a snapshot; it never
/// writes one. Field meanings inside `stats` and `internals` are fixed by
/// offset and exposed through the named accessors on this type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub stats: Vec<i64>,
    pub glyphs: SymbolGrid,
    pub internals: Vec<i64>,
}

impl Snapshot {
    pub fn builder() -> SnapshotBuilder {
        SnapshotBuilder::new()
    }
}

/// 2-D grid of visible terrain/entity symbol codes. `0` means unseen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolGrid {
    rows: usize,
    cols: usize,
    cells: Vec<i32>,
}

impl SymbolGrid {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![0; rows * cols],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, y: usize, x: usize) -> Option<i32> {
        if y < self.rows && x < self.cols {
            Some(self.cells[y * self.cols + x])
        } else {
            None
        }
    }

    pub fn set(&mut self, y: usize, x: usize, code: i32) {
        if y < self.rows && x < self.cols {
            self.cells[y * self.cols + x] = code;
        }
    }

    /// Number of cells revealed so far (symbol code != 0).
    pub fn revealed_count(&self) -> i64 {
        self.cells.iter().filter(|&&c| c != 0).count() as i64
    }

    /// Symbol codes of the up-to-eight cells surrounding `(y, x)`, clamped
    /// at the grid edge. The center cell (the player) is not included.
    pub fn neighbors(&self, y: i64, x: i64) -> impl Iterator<Item = i32> + '_ {
        (-1..=1).flat_map(move |dy| (-1..=1).map(move |dx| (dy, dx))).filter_map(move |(dy, dx)| {
            if dy == 0 && dx == 0 {
                return None;
            }
            let ny = y + dy;
            let nx = x + dx;
            if ny < 0 || nx < 0 {
                return None;
            }
            self.get(ny as usize, nx as usize)
        })
    }
}

impl Default for SymbolGrid {
    fn default() -> Self {
        Self::new(MAP_ROWS, MAP_COLS)
    }
}

/// Composite identifier scoping per-location bookkeeping within an episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocationKey {
    pub branch: i64,
    pub depth: i64,
}

/// Builds well-formed snapshots, mostly for scripted simulations and tests.
#[derive(Debug, Clone)]
pub struct SnapshotBuilder {
    stats: Vec<i64>,
    glyphs: SymbolGrid,
    internals: Vec<i64>,
}

impl SnapshotBuilder {
    pub fn new() -> Self {
        Self {
            stats: vec![0; STAT_LEN],
            glyphs: SymbolGrid::default(),
            internals: vec![0; INTERNAL_LEN],
        }
    }

    pub fn position(mut self, x: i64, y: i64) -> Self {
        self.stats[STAT_POS_X] = x;
        self.stats[STAT_POS_Y] = y;
        self
    }

    pub fn score(mut self, score: i64) -> Self {
        self.stats[STAT_SCORE] = score;
        self
    }

    pub fn gold(mut self, gold: i64) -> Self {
        self.stats[STAT_GOLD] = gold;
        self
    }

    pub fn turn(mut self, turn: i64) -> Self {
        self.stats[STAT_TURN] = turn;
        self
    }

    pub fn experience(mut self, points: i64, level: i64) -> Self {
        self.stats[STAT_EXP_POINTS] = points;
        self.stats[STAT_EXP_LEVEL] = level;
        self
    }

    pub fn location(mut self, branch: i64, depth: i64) -> Self {
        self.stats[STAT_BRANCH] = branch;
        self.stats[STAT_DEPTH] = depth;
        self
    }

    pub fn nutrition(mut self, nutrition: i64) -> Self {
        self.internals[FLAG_NUTRITION] = nutrition;
        self
    }

    pub fn menu_blocked(mut self, blocked: bool) -> Self {
        self.internals[FLAG_MENU_WAIT] = blocked as i64;
        self
    }

    pub fn stairs_down(mut self, underfoot: bool) -> Self {
        self.internals[FLAG_STAIRS_DOWN] = underfoot as i64;
        self
    }

    pub fn glyph(mut self, y: usize, x: usize, code: i32) -> Self {
        self.glyphs.set(y, x, code);
        self
    }

    pub fn build(self) -> Snapshot {
        Snapshot {
            stats: self.stats,
            glyphs: self.glyphs,
            internals: self.internals,
        }
    }
}

impl Default for SnapshotBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_revealed_count() {
        let mut grid = SymbolGrid::new(4, 4);
        assert_eq!(grid.revealed_count(), 0);
        grid.set(0, 0, 7);
        grid.set(3, 3, 2);
        grid.set(3, 3, 5);
        assert_eq!(grid.revealed_count(), 2);
    }

    #[test]
    fn test_neighbors_exclude_center() {
        let mut grid = SymbolGrid::new(5, 5);
        grid.set(2, 2, 99);
        grid.set(1, 1, 3);
        grid.set(2, 3, 4);
        let codes: Vec<i32> = grid.neighbors(2, 2).collect();
        assert_eq!(codes.len(), 8);
        assert!(!codes.contains(&99));
        assert!(codes.contains(&3));
        assert!(codes.contains(&4));
    }

    #[test]
    fn test_neighbors_clamped_at_edges() {
        let grid = SymbolGrid::new(3, 3);
        assert_eq!(grid.neighbors(0, 0).count(), 3);
        assert_eq!(grid.neighbors(2, 2).count(), 3);
        assert_eq!(grid.neighbors(0, 1).count(), 5);
    }

    #[test]
    fn test_builder_defaults_are_well_formed() {
        let snapshot = Snapshot::builder().turn(12).score(40).build();
        assert_eq!(snapshot.turn_counter().unwrap(), 12);
        assert_eq!(snapshot.score().unwrap(), 40);
        assert_eq!(snapshot.glyphs.revealed_count(), 0);
    }
}
