use crate::error::EnvError;
use crate::observation::Snapshot;

use super::simulator::Simulator;

/// Deterministic stand-in for the real game process: replays a fixed
/// snapshot sequence and ignores the actions it receives. Used by the demo
/// driver and by tests; a production deployment implements [`Simulator`]
/// against the actual game instead.
pub struct ScriptedSimulator {
    script: Vec<Snapshot>,
    cursor: usize,
    normal_play: bool,
    quit_count: u32,
}

impl ScriptedSimulator {
    pub fn new(script: Vec<Snapshot>) -> Self {
        Self {
            script,
            cursor: 0,
            normal_play: true,
            quit_count: 0,
        }
    }

    pub fn set_normal_play(&mut self, normal_play: bool) {
        self.normal_play = normal_play;
    }

    /// How many times the caller force-quit the game.
    pub fn quit_count(&self) -> u32 {
        self.quit_count
    }
}

impl Simulator for ScriptedSimulator {
    type Action = u8;

    fn reset(&mut self) -> Result<Snapshot, EnvError> {
        self.cursor = 0;
        self.script
            .first()
            .cloned()
            .ok_or_else(|| EnvError::Simulator("empty snapshot script".to_string()))
    }

    fn step(&mut self, _action: &u8) -> Result<(Snapshot, bool), EnvError> {
        if self.cursor + 1 >= self.script.len() {
            return Err(EnvError::Simulator(
                "stepped past the end of the script".to_string(),
            ));
        }
        self.cursor += 1;
        let done = self.cursor + 1 == self.script.len();
        Ok((self.script[self.cursor].clone(), done))
    }

    fn in_normal_game(&self) -> bool {
        self.normal_play
    }

    fn quit(&mut self) -> Result<(), EnvError> {
        self.quit_count += 1;
        Ok(())
    }
}
