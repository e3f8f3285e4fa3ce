//! # Taskforge Core Errors
//!
//! Top-level error surface for the crate. Each subsystem defines its own
//! typed error enum; this module wraps them into a single [`Error`] so the
//! binary and tests can use one `Result` alias.

use std::result::Result as StdResult;

use thiserror::Error as ThisError;

use crate::addon::error::AddonSystemError;
use crate::config::ConfigError;
use crate::engine::error::EngineError;
use crate::graph::error::GraphError;
use crate::lifecycle::error::LifecycleError;

/// Crate-wide error type.
#[derive(Debug, ThisError)]
pub enum Error {
    /// Run configuration could not be loaded or parsed.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// The lifecycle model is structurally invalid.
    #[error("lifecycle error: {0}")]
    Lifecycle(#[from] LifecycleError),

    /// Addon system error.
    #[error("addon system error: {0}")]
    AddonSystem(#[from] AddonSystemError),

    /// Task graph construction or gathering error.
    #[error("task graph error: {0}")]
    Graph(#[from] GraphError),

    /// Execution engine error.
    #[error("engine error: {0}")]
    Engine(#[from] EngineError),

    /// The manager was used before `initialize()` was called.
    #[error("manager not initialized: call initialize() before run()")]
    NotInitialized,

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

/// Shorthand for Result with our Error type.
pub type Result<T> = StdResult<T, Error>;

impl From<&str> for Error {
    fn from(msg: &str) -> Self {
        Error::Other(msg.to_string())
    }
}

impl From<String> for Error {
    fn from(msg: String) -> Self {
        Error::Other(msg)
    }
}
