use indexmap::IndexSet;

use crate::observation::LocationKey;

/// Grants a one-time bonus the first time each dungeon location is seen in
/// an episode.
#[derive(Debug, Clone)]
pub struct VisitationLedger {
    visited: IndexSet<LocationKey>,
    bonus: f64,
}

impl VisitationLedger {
    pub fn new(bonus: f64) -> Self {
        Self {
            visited: IndexSet::new(),
            bonus,
        }
    }

    /// Returns the configured bonus on the first call for `key` this
    /// episode, 0.0 on every later call.
    pub fn visit(&mut self, key: LocationKey) -> f64 {
        if self.visited.insert(key) {
            tracing::debug!(branch = key.branch, depth = key.depth, "first visit");
            self.bonus
        } else {
            0.0
        }
    }

    /// Distinct locations visited so far this episode.
    pub fn visit_count(&self) -> u32 {
        self.visited.len() as u32
    }

    pub fn reset(&mut self) {
        self.visited.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: LocationKey = LocationKey { branch: 0, depth: 1 };

    #[test]
    fn test_bonus_granted_once() {
        let mut ledger = VisitationLedger::new(10.0);
        assert_eq!(ledger.visit(KEY), 10.0);
        assert_eq!(ledger.visit(KEY), 0.0);
        assert_eq!(ledger.visit(KEY), 0.0);
        assert_eq!(ledger.visit_count(), 1);
    }

    #[test]
    fn test_reset_restores_bonus() {
        let mut ledger = VisitationLedger::new(1.0);
        ledger.visit(KEY);
        ledger.reset();
        assert_eq!(ledger.visit(KEY), 1.0);
    }
}
