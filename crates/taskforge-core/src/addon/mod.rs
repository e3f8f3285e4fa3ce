//! # Addon System
//!
//! Infrastructure for the independently loaded components that contribute
//! build tasks. An addon declares a capability set of attribute keys and a
//! task-producing operation per key it implements.
//!
//! - [`registry`]: constructs and holds the addons for one manager,
//!   isolating per-addon construction failures.
//! - [`source`]: the discovery collaborator returning candidate factories.
//! - [`error`]: typed errors for the addon system.

pub mod error;
pub mod registry;
pub mod source;

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::config::RunConfig;
use crate::graph::Task;
use crate::lifecycle::{AttrKey, Lifecycle};

pub use registry::{AddonHandle, AddonRegistry};
pub use source::{AddonFactory, AddonSource, StaticAddonSource};

/// Boxed error addons may raise while producing tasks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// One-shot lazy sequence of task descriptors produced by an addon for one
/// attribute key. Not guaranteed to be restartable.
pub type TaskIter = Box<dyn Iterator<Item = Result<Task, BoxError>> + Send>;

/// Context handed to addons at construction and at every task-producing
/// call. Stands in for the manager without creating an ownership cycle.
#[derive(Debug, Clone)]
pub struct AddonContext {
    /// The manager's immutable run configuration.
    pub config: Arc<RunConfig>,
    /// The lifecycle model the manager was built with.
    pub lifecycle: Arc<Lifecycle>,
    /// When set, the addon must skip environment-prefix-based defaults.
    pub ignore_env: bool,
}

/// Core trait that all addons implement.
pub trait Addon: Send + Sync {
    /// The addon's unique name, used for namespacing its task names.
    fn name(&self) -> &str;

    /// The attribute keys this addon can produce tasks for, deduplicated.
    ///
    /// Validated against the lifecycle at registration; an unknown key is a
    /// construction-time failure and drops the addon.
    fn capabilities(&self) -> &BTreeSet<AttrKey>;

    /// Produce the task descriptors for one attribute key.
    ///
    /// Only called for keys in [`capabilities`](Addon::capabilities). The
    /// returned iterator is consumed exactly once per gather; items may be
    /// errors, which the graph layer escalates according to strict mode.
    fn tasks(&self, key: &AttrKey, ctx: &AddonContext) -> TaskIter;
}

// Test module declaration
#[cfg(test)]
mod tests;
