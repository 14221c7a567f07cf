//! Voxstage Error Types
//!
//! Centralized error handling for the engine crate.

use thiserror::Error;

use crate::state::EngineState;

/// Central error type for engine operations
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("{op} is not valid while engine is {state}")]
    InvalidState {
        op: &'static str,
        state: EngineState,
    },

    #[error("model load failed: {0}")]
    ModelLoad(String),

    #[error("recognition worker is already running")]
    WorkerAlreadyRunning,

    #[error("lock poisoned: {0}")]
    Lock(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

/// Helper to convert Mutex poison errors
impl<T> From<std::sync::PoisonError<T>> for EngineError {
    fn from(err: std::sync::PoisonError<T>) -> Self {
        EngineError::Lock(err.to_string())
    }
}
