//! Crate-wide error type.

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by pool, group, and config operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid configuration value.
    #[error("config error: {0}")]
    Config(String),

    /// The pool or group was stopped before the operation.
    #[error("pool is stopped")]
    Stopped,

    /// A result-producing task panicked; carried by its future.
    #[error("task failed: {0}")]
    TaskFailed(String),

    /// Worker thread could not be spawned.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Build a [`Error::Config`] from any message.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Error::Config(msg.into())
    }

    /// Build a [`Error::TaskFailed`] from any message.
    pub fn task_failed<S: Into<String>>(msg: S) -> Self {
        Error::TaskFailed(msg.into())
    }
}
