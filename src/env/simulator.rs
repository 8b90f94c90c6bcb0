use crate::error::EnvError;
use crate::observation::Snapshot;

/// Downward boundary to the game simulation.
///
/// The simulation is a black box; this layer never looks behind it. The
/// only requirements are snapshot production, a terminal flag, the
/// normal-play indicator, and a side-channel quit used when an episode
/// deadlocks.
pub trait Simulator {
    type Action;

    /// Starts a fresh episode and returns its first snapshot.
    fn reset(&mut self) -> Result<Snapshot, EnvError>;

    /// Advances one simulated turn.
    fn step(&mut self, action: &Self::Action) -> Result<(Snapshot, bool), EnvError>;

    /// False before the game has started and after the death screen, where
    /// stat fields read as zero.
    fn in_normal_game(&self) -> bool;

    /// Force-quits the running game. Invoked when the stuck-state detector
    /// demands termination.
    fn quit(&mut self) -> Result<(), EnvError>;
}
