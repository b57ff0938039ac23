//! Engine error types

use thiserror::Error;

/// Result type alias for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors surfaced by the engine's programmatic API
///
/// Registration conflicts and unknown ids are not errors; they are reported
/// as `false` by the registry.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The registry actor stopped before answering
    #[error("registry actor is not running")]
    RegistryStopped,

    /// The state actor stopped before answering
    #[error("state actor is not running")]
    StateStopped,

    /// A queue capacity of zero was configured
    #[error("'{0}' must be greater than 0")]
    EmptyQueue(&'static str),

    /// The shared HTTP client could not be built
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}
