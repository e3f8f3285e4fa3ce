//! # Execution Engine Interface
//!
//! The engine is an external collaborator: it receives the generator map
//! plus a small set of global options and owns everything else
//! (dependency-file tracking, caching, concurrency, retries). The core's
//! only contribution is the partial order the engine must respect.

pub mod error;

use std::path::PathBuf;

use async_trait::async_trait;

use crate::graph::TaskGraph;

pub use error::EngineError;

/// Global options handed to the engine alongside the graph.
#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// Location of the engine's persisted dependency/state file. The file
    /// itself is owned entirely by the engine.
    pub dep_file: PathBuf,
    /// Backing-store selector for the dependency file.
    pub backend: String,
    /// Verbosity level forwarded to the engine.
    pub verbosity: u8,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            dep_file: PathBuf::from(".taskforge.db"),
            backend: "sqlite3".to_string(),
            verbosity: 2,
        }
    }
}

/// Contract every execution engine implements.
///
/// `run` receives the full generator map, resolves the named task subset
/// while honoring each node's `after` edge, and returns a process-style
/// result code. A node gated on a predecessor must not be expanded until
/// the predecessor's entire task set is known.
#[async_trait]
pub trait ExecutionEngine: Send + Sync {
    async fn run(
        &self,
        graph: &TaskGraph,
        options: &EngineOptions,
        task: &str,
        extra_args: &[String],
    ) -> Result<i32, EngineError>;
}
