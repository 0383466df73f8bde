use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchedError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("duplicate process id: {0}")]
    DuplicateId(String),

    #[error("invalid state for process {id}: {reason}")]
    InvalidState { id: String, reason: &'static str },

    #[error("simulation did not terminate within {limit} ticks ({completed}/{total} completed)")]
    SimulationDiverged {
        limit: u64,
        completed: usize,
        total: usize,
    },

    #[error("line {line}: cannot parse `{content}`")]
    Parse { line: usize, content: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SchedError>;
