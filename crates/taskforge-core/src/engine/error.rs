//! Error types for execution engine collaborators.

use thiserror::Error;

use crate::graph::GraphError;

#[derive(Debug, Error)]
pub enum EngineError {
    /// The requested task name matches no hook in the graph.
    #[error("no generator produces tasks for '{task}'")]
    UnknownTask { task: String },

    /// A strict-mode gather failure propagated out of a generator node.
    #[error(transparent)]
    Gather(#[from] GraphError),

    /// A task action failed while the engine executed it.
    #[error("task '{task}' failed: {message}")]
    TaskFailed { task: String, message: String },

    /// Engine-specific internal failure.
    #[error("engine internal error: {0}")]
    Internal(String),
}
