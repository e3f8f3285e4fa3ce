//! A minimal sequential execution engine.
//!
//! Reference glue for the CLI: resolves generator nodes in order while
//! honoring their gating edges, prints task names, and runs task actions
//! inline. No dependency-file tracking, caching, or concurrency.

use std::collections::HashSet;

use async_trait::async_trait;

use taskforge_core::engine::{EngineError, EngineOptions, ExecutionEngine};
use taskforge_core::graph::TaskGraph;
use taskforge_core::lifecycle::AttrKey;

pub struct SequentialEngine;

#[async_trait]
impl ExecutionEngine for SequentialEngine {
    async fn run(
        &self,
        graph: &TaskGraph,
        options: &EngineOptions,
        task: &str,
        _extra_args: &[String],
    ) -> Result<i32, EngineError> {
        // Running hook X means resolving every generator up to and
        // including post_X.
        let stop = graph
            .position(&AttrKey::post(task).to_string())
            .ok_or_else(|| EngineError::UnknownTask { task: task.to_string() })?;

        let mut resolved: HashSet<String> = HashSet::new();
        for node in &graph.nodes()[..=stop] {
            if let Some(after) = &node.after {
                // Linear iteration always satisfies the chain; a miss here
                // means the graph handed us a malformed edge.
                if !resolved.contains(&after.to_string()) {
                    return Err(EngineError::Internal(format!(
                        "node '{}' scheduled before its predecessor '{}'",
                        node.key, after
                    )));
                }
            }

            for item in node.tasks() {
                let task = item?;
                if options.verbosity >= 1 {
                    println!(".  {}", task.name);
                }
                for action in &task.actions {
                    action().map_err(|message| EngineError::TaskFailed {
                        task: task.name.clone(),
                        message,
                    })?;
                }
            }
            resolved.insert(node.key.to_string());
        }

        Ok(0)
    }
}
