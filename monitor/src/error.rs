use hemon_core::CkksError;

#[derive(Debug, thiserror::Error)]
pub enum MonitorError {
    #[error("sample of size {actual}, expected {expected}")]
    SizeMismatch { expected: usize, actual: usize },

    #[error("invalid automaton: {0}")]
    InvalidAutomaton(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Ckks(#[from] CkksError),

    #[error(transparent)]
    Stream(#[from] StreamError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    #[error("stream i/o: {0}")]
    Io(#[from] std::io::Error),

    #[error("truncated input: expected {expected}, got {actual}")]
    Truncated { expected: usize, actual: usize },

    #[error("malformed record: {0}")]
    Malformed(String),
}
