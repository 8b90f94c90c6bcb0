use std::sync::{Arc, Mutex};

/// Cross-episode training progress, owned by the training loop.
///
/// Policies that score an episode relative to past episodes (see
/// `RelativeScorePolicy`) receive a shared handle at construction instead
/// of keeping their own global baseline, so vectorized environments update
/// one explicitly shared value with a single owner.
#[derive(Debug)]
pub struct TrainingProgressState {
    running_mean_score: f64,
    last_score: f64,
    alpha: f64,
}

pub type SharedProgress = Arc<Mutex<TrainingProgressState>>;

impl TrainingProgressState {
    /// `alpha` is the EWMA retention factor; 0.999 keeps roughly the last
    /// thousand episodes in view.
    pub fn new(alpha: f64) -> Self {
        Self {
            running_mean_score: 1.0,
            last_score: 0.0,
            alpha,
        }
    }

    pub fn shared(alpha: f64) -> SharedProgress {
        Arc::new(Mutex::new(Self::new(alpha)))
    }

    /// Folds a finished episode's score into the running mean.
    pub fn record_episode(&mut self, score: f64) {
        self.last_score = score;
        self.running_mean_score =
            self.running_mean_score * self.alpha + score * (1.0 - self.alpha);
        tracing::info!(score, running_mean = self.running_mean_score, "episode scored");
    }

    pub fn running_mean(&self) -> f64 {
        self.running_mean_score
    }

    pub fn last_score(&self) -> f64 {
        self.last_score
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_episode_moves_the_mean() {
        let mut progress = TrainingProgressState::new(0.9);
        progress.record_episode(11.0);
        assert!((progress.running_mean() - (1.0 * 0.9 + 11.0 * 0.1)).abs() < 1e-12);
        assert_eq!(progress.last_score(), 11.0);
    }

    #[test]
    fn test_shared_handle_updates_one_value() {
        let shared = TrainingProgressState::shared(0.5);
        let other = Arc::clone(&shared);
        shared.lock().unwrap().record_episode(3.0);
        assert_eq!(other.lock().unwrap().last_score(), 3.0);
    }
}
