use indexmap::IndexMap;

use crate::observation::LocationKey;

/// Per-location baseline of revealed map cells.
///
/// The revealed count for a location normally only grows, but the tracker
/// does not assume it: re-entering a level can in principle be observed
/// with a smaller population, and a negative delta is a valid result.
#[derive(Debug, Clone, Default)]
pub struct ExplorationTracker {
    explored: IndexMap<LocationKey, i64>,
}

impl ExplorationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns how many cells were newly revealed at `key` since the last
    /// update (the full count for an unseen key) and stores the new
    /// baseline.
    pub fn update(&mut self, key: LocationKey, revealed_count: i64) -> i64 {
        let previous = self.explored.insert(key, revealed_count).unwrap_or(0);
        revealed_count - previous
    }

    /// Number of distinct locations with a recorded baseline.
    pub fn location_count(&self) -> usize {
        self.explored.len()
    }

    pub fn reset(&mut self) {
        self.explored.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: LocationKey = LocationKey { branch: 0, depth: 1 };

    #[test]
    fn test_fresh_key_returns_full_count() {
        let mut tracker = ExplorationTracker::new();
        assert_eq!(tracker.update(KEY, 10), 10);
    }

    #[test]
    fn test_incremental_and_negative_deltas() {
        let mut tracker = ExplorationTracker::new();
        tracker.update(KEY, 10);
        assert_eq!(tracker.update(KEY, 15), 5);
        assert_eq!(tracker.update(KEY, 12), -3);
    }

    #[test]
    fn test_keys_are_independent() {
        let mut tracker = ExplorationTracker::new();
        tracker.update(KEY, 10);
        let other = LocationKey { branch: 0, depth: 2 };
        assert_eq!(tracker.update(other, 4), 4);
        assert_eq!(tracker.update(KEY, 11), 1);
        assert_eq!(tracker.location_count(), 2);
    }

    #[test]
    fn test_reset_clears_baselines() {
        let mut tracker = ExplorationTracker::new();
        tracker.update(KEY, 10);
        tracker.reset();
        assert_eq!(tracker.update(KEY, 10), 10);
    }
}
