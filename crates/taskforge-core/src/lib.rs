//! # Taskforge Core
//!
//! Assembles a directed, partially-ordered graph of build tasks contributed
//! by independently loaded addons, and hands that graph to an execution
//! engine. The core never executes tasks itself: it discovers and isolates
//! addon failures, maps the build lifecycle to unique attribute keys,
//! computes the gating edges between task generators, and lazily
//! materializes each generator's task set.

pub mod addon;
pub mod config;
pub mod engine;
pub mod error;
pub mod graph;
pub mod lifecycle;
pub mod manager;

// Re-export key public types for the binary and addon crates.
pub use addon::{Addon, AddonContext, AddonFactory, AddonRegistry, AddonSource, StaticAddonSource};
pub use config::{EnvIgnore, RunConfig};
pub use engine::{EngineOptions, ExecutionEngine};
pub use error::{Error, Result};
pub use graph::{GeneratorNode, Task, TaskGraph};
pub use lifecycle::{AttrKey, Lifecycle, Phase};
pub use manager::Manager;
