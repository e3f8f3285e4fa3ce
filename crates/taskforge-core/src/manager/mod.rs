//! # Manager
//!
//! The orchestrator: owns the run configuration, the addon registry, and
//! the full generator map. Construction is explicitly two-phase: build the
//! manager, then call [`Manager::initialize`] to compute and freeze the
//! registry and graph, so discovery and construction problems surface
//! before any run is attempted.

use std::sync::Arc;

use crate::addon::{AddonRegistry, AddonSource};
use crate::config::RunConfig;
use crate::engine::{EngineOptions, ExecutionEngine};
use crate::error::{Error, Result};
use crate::graph::TaskGraph;
use crate::lifecycle::Lifecycle;

/// Orchestrator for one build lifecycle.
pub struct Manager {
    config: Arc<RunConfig>,
    lifecycle: Arc<Lifecycle>,
    source: Box<dyn AddonSource>,
    options: EngineOptions,
    registry: Option<Arc<AddonRegistry>>,
    graph: Option<Arc<TaskGraph>>,
}

impl Manager {
    pub fn new(config: RunConfig, lifecycle: Lifecycle, source: Box<dyn AddonSource>) -> Self {
        Self {
            config: Arc::new(config),
            lifecycle: Arc::new(lifecycle),
            source,
            options: EngineOptions::default(),
            registry: None,
            graph: None,
        }
    }

    /// Override the engine options before initialization.
    pub fn with_engine_options(mut self, options: EngineOptions) -> Self {
        self.options = options;
        self
    }

    /// Compute and freeze the addon registry and the generator map.
    ///
    /// Calling this again rebuilds both from the source; there is no other
    /// mutation path after construction.
    pub fn initialize(&mut self) {
        log::debug!("[forge] [addon] loading ...");
        let registry = Arc::new(AddonRegistry::load(
            self.source.as_ref(),
            &self.config,
            &self.lifecycle,
        ));
        log::debug!("[forge] [addon] ... OK {} addons", registry.len());

        log::debug!("[forge] [tasks] loading ...");
        let graph = Arc::new(TaskGraph::build(&self.lifecycle, &registry, &self.config));
        log::debug!("[forge] [tasks] ... OK {} generators", graph.len());

        self.registry = Some(registry);
        self.graph = Some(graph);
    }

    /// Run a named task subset on the given engine.
    ///
    /// Merges the configured pass-through arguments with the per-call ones
    /// and returns the engine's result code unmodified.
    pub async fn run(
        &self,
        engine: &dyn ExecutionEngine,
        task: &str,
        extra_args: &[String],
    ) -> Result<i32> {
        let graph = self.graph.as_ref().ok_or(Error::NotInitialized)?;

        let mut args = self.config.extra_args.clone();
        args.extend_from_slice(extra_args);

        let code = engine.run(graph.as_ref(), &self.options, task, &args).await?;
        Ok(code)
    }

    /// The immutable run configuration.
    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// The lifecycle model this manager was built with.
    pub fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    /// The engine options this manager submits with every run.
    pub fn engine_options(&self) -> &EngineOptions {
        &self.options
    }

    /// The constructed addon registry, if initialized.
    pub fn registry(&self) -> Option<&Arc<AddonRegistry>> {
        self.registry.as_ref()
    }

    /// The generator map, if initialized.
    pub fn graph(&self) -> Option<&Arc<TaskGraph>> {
        self.graph.as_ref()
    }

    /// Names of the constructed addons, for introspection and logging.
    pub fn addon_names(&self) -> Vec<String> {
        self.registry
            .as_ref()
            .map(|registry| registry.names().map(String::from).collect())
            .unwrap_or_default()
    }
}

// Test module declaration
#[cfg(test)]
mod tests;
