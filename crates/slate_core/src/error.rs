use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("invalid outcome distribution for {player}: weights sum to {sum}")]
    InvalidDistribution { player: String, sum: f64 },

    #[error("expected {expected} results, got {got}")]
    LengthMismatch { expected: usize, got: usize },

    #[error("no prop named {0}")]
    UnknownProp(String),

    #[error("matchup configuration error: {0}")]
    MatchupConfiguration(String),

    #[error("corrupted prop buffer {name}: {reason}")]
    CorruptedBuffer { name: String, reason: String },

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl SimError {
    /// Whether a run-level occurrence of this error should abort the whole
    /// batch. Only configuration problems are fatal before any run starts;
    /// everything else is isolated to the offending run or call.
    pub fn is_fatal(&self) -> bool {
        matches!(self, SimError::MatchupConfiguration(_))
    }
}

pub type Result<T> = std::result::Result<T, SimError>;
