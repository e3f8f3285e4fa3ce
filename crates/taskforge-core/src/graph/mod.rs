//! # Task Generator Factory
//!
//! Builds the full map of generator nodes, one per attribute key, in the
//! lifecycle's total order. Each node carries an optional gating
//! predecessor and a lazy gather closure that polls every eligible addon,
//! namespaces the resulting task names, and applies the strict/lenient
//! error policy.

pub mod error;

use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::sync::Arc;

use crate::addon::{AddonHandle, AddonRegistry, TaskIter};
use crate::config::RunConfig;
use crate::lifecycle::{AttrKey, Lifecycle, Phase};

pub use error::GraphError;

/// A single runnable action inside a task descriptor. The core never
/// invokes these; they exist for whatever engine consumes the graph.
pub type TaskAction = Box<dyn Fn() -> Result<(), String> + Send + Sync>;

/// An opaque named unit of work contributed by one addon for one attribute
/// key. The core only rewrites `name`; everything else passes through to
/// the engine untouched.
pub struct Task {
    pub name: String,
    pub doc: String,
    pub file_dep: Vec<String>,
    pub targets: Vec<String>,
    /// Free-form descriptor metadata, engine-defined.
    pub meta: serde_json::Value,
    pub actions: Vec<TaskAction>,
}

impl Task {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            doc: String::new(),
            file_dep: Vec::new(),
            targets: Vec::new(),
            meta: serde_json::Value::Null,
            actions: Vec::new(),
        }
    }

    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = doc.into();
        self
    }

    pub fn file_dep(mut self, path: impl Into<String>) -> Self {
        self.file_dep.push(path.into());
        self
    }

    pub fn target(mut self, path: impl Into<String>) -> Self {
        self.targets.push(path.into());
        self
    }

    pub fn meta(mut self, meta: serde_json::Value) -> Self {
        self.meta = meta;
        self
    }

    pub fn action(mut self, action: TaskAction) -> Self {
        self.actions.push(action);
        self
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("name", &self.name)
            .field("doc", &self.doc)
            .field("file_dep", &self.file_dep)
            .field("targets", &self.targets)
            .field("actions", &self.actions.len())
            .finish()
    }
}

/// Stream of gathered task descriptors for one attribute key.
pub type TaskStream = Box<dyn Iterator<Item = Result<Task, GraphError>> + Send>;

type GatherFn = Box<dyn Fn() -> TaskStream + Send + Sync>;

/// A lazy, possibly gated task generator bound to one attribute key.
///
/// `after` is a structural dependency edge between generator nodes, not
/// between individual tasks: the engine must not expand this node until the
/// predecessor key's entire task set is known.
pub struct GeneratorNode {
    pub key: AttrKey,
    pub after: Option<AttrKey>,
    gather: GatherFn,
}

impl GeneratorNode {
    /// Materialize this node's task stream. Each call polls the eligible
    /// addons afresh; the expected usage is once per run per key.
    pub fn tasks(&self) -> TaskStream {
        (self.gather)()
    }
}

impl fmt::Debug for GeneratorNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratorNode")
            .field("key", &self.key.to_string())
            .field("after", &self.after.as_ref().map(AttrKey::to_string))
            .finish()
    }
}

/// The complete, ordered map of generator nodes for one manager.
pub struct TaskGraph {
    nodes: Vec<GeneratorNode>,
    index: HashMap<String, usize>,
}

impl fmt::Debug for TaskGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskGraph").field("nodes", &self.nodes).finish()
    }
}

impl TaskGraph {
    /// Build one generator node per attribute key, chained by gating edges.
    ///
    /// The predecessor of a node is the key processed immediately before it
    /// in the linear iteration, except that the pre-phase key of a hook
    /// with a declared parent is gated on the parent's post key instead.
    /// The very first key is ungated. `previous` advances every iteration
    /// regardless of the override, so the next default edge stays correct.
    pub fn build(
        lifecycle: &Arc<Lifecycle>,
        registry: &Arc<AddonRegistry>,
        config: &Arc<RunConfig>,
    ) -> Self {
        let mut nodes = Vec::new();
        let mut index = HashMap::new();
        let mut previous: Option<AttrKey> = None;

        for key in lifecycle.keys() {
            let mut after = previous.clone();
            if key.phase == Phase::Pre {
                if let Some(parent) = lifecycle.parent(&key.hook) {
                    after = Some(AttrKey::post(parent));
                }
            }

            let gather = make_gather(key.clone(), Arc::clone(registry), Arc::clone(config));
            index.insert(key.to_string(), nodes.len());
            nodes.push(GeneratorNode { key: key.clone(), after, gather });
            previous = Some(key);
        }

        Self { nodes, index }
    }

    /// Number of generator nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes in the lifecycle's total order.
    pub fn nodes(&self) -> &[GeneratorNode] {
        &self.nodes
    }

    /// Look up a node by its key string (e.g. `pre_build`).
    pub fn node(&self, key: &str) -> Option<&GeneratorNode> {
        self.index.get(key).map(|&i| &self.nodes[i])
    }

    /// Position of a key in the node order.
    pub fn position(&self, key: &str) -> Option<usize> {
        self.index.get(key).copied()
    }
}

fn make_gather(key: AttrKey, registry: Arc<AddonRegistry>, config: Arc<RunConfig>) -> GatherFn {
    Box::new(move || {
        Box::new(GatherIter::new(
            key.clone(),
            registry.eligible(&key),
            Arc::clone(&config),
        ))
    })
}

/// Streaming gather over the eligible addons for one key.
///
/// Descriptors are rewritten and yielded one at a time, so an engine can
/// begin scheduling before an addon's sequence is exhausted. An addon
/// failure is logged with the (key, addon) pair; under strict mode it is
/// yielded as the final item and the stream fuses, otherwise the remaining
/// addons still run.
struct GatherIter {
    key: AttrKey,
    config: Arc<RunConfig>,
    pending: VecDeque<(String, AddonHandle)>,
    current: Option<(String, TaskIter)>,
    aborted: bool,
}

impl GatherIter {
    fn new(key: AttrKey, eligible: Vec<(String, AddonHandle)>, config: Arc<RunConfig>) -> Self {
        Self {
            key,
            config,
            pending: eligible.into(),
            current: None,
            aborted: false,
        }
    }
}

impl Iterator for GatherIter {
    type Item = Result<Task, GraphError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.aborted {
            return None;
        }

        loop {
            if let Some((name, iter)) = self.current.as_mut() {
                match iter.next() {
                    Some(Ok(mut task)) => {
                        task.name =
                            format!("{}{}:{}", self.config.task_prefix, name, task.name);
                        log::debug!("[forge] [{}] [{}] {}", self.key, name, task.name);
                        return Some(Ok(task));
                    }
                    Some(Err(source)) => {
                        let addon = name.clone();
                        log::error!("[forge] [{}] [{}] [ERR] {}", self.key, addon, source);
                        self.current = None;
                        if self.config.strict {
                            self.aborted = true;
                            return Some(Err(GraphError::Gather {
                                key: self.key.to_string(),
                                addon,
                                source,
                            }));
                        }
                        continue;
                    }
                    None => {
                        self.current = None;
                        continue;
                    }
                }
            }

            match self.pending.pop_front() {
                Some((name, handle)) => {
                    let tasks = handle.addon.tasks(&self.key, &handle.ctx);
                    self.current = Some((name, tasks));
                }
                None => return None,
            }
        }
    }
}
