use thiserror::Error;

// Policy-layer errors surface to the caller unchanged; a reward of zero is
// never used to paper over a contract violation.

#[derive(Error, Debug)]
pub enum PolicyError {
    #[error("Invalid policy configuration: {0}")]
    Configuration(String),
    #[error("Snapshot field '{field}' out of range: index {index}, length {len}")]
    OutOfRange {
        field: &'static str,
        index: usize,
        len: usize,
    },
}

// Environment Error Type
#[derive(Error, Debug)]
pub enum EnvError {
    #[error("Policy Error: {0}")]
    Policy(#[from] PolicyError),
    #[error("Simulator Error: {0}")]
    Simulator(String),
    #[error("step() called before reset()")]
    NotReset,
}
