use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::addon::source::{AddonFactory, StaticAddonSource};
use crate::addon::{Addon, AddonContext, BoxError, TaskIter};
use crate::config::RunConfig;
use crate::engine::{EngineError, EngineOptions, ExecutionEngine};
use crate::error::Error;
use crate::graph::{Task, TaskGraph};
use crate::lifecycle::{AttrKey, Lifecycle};
use crate::manager::Manager;

struct SimpleAddon {
    name: String,
    caps: BTreeSet<AttrKey>,
}

impl Addon for SimpleAddon {
    fn name(&self) -> &str {
        &self.name
    }

    fn capabilities(&self) -> &BTreeSet<AttrKey> {
        &self.caps
    }

    fn tasks(&self, key: &AttrKey, _ctx: &AddonContext) -> TaskIter {
        Box::new(std::iter::once(Ok(Task::new(format!("task-for-{key}")))))
    }
}

fn simple_factory(name: &'static str, caps: Vec<AttrKey>) -> Arc<dyn AddonFactory> {
    let caps: BTreeSet<AttrKey> = caps.into_iter().collect();
    Arc::new(move |_ctx: &AddonContext| -> Result<Box<dyn Addon>, BoxError> {
        Ok(Box::new(SimpleAddon { name: name.to_string(), caps: caps.clone() }))
    })
}

fn two_hook_lifecycle() -> Lifecycle {
    let parents = HashMap::from([("b".to_string(), "a".to_string())]);
    Lifecycle::new(vec!["a".to_string(), "b".to_string()], parents).unwrap()
}

fn test_manager() -> Manager {
    let source = StaticAddonSource::new()
        .with("alpha", simple_factory("alpha", vec![AttrKey::post("a"), AttrKey::pre("b")]))
        .with("beta", simple_factory("beta", vec![AttrKey::main("b")]));
    Manager::new(RunConfig::default(), two_hook_lifecycle(), Box::new(source))
}

/// Engine stub that resolves nodes while preferring the LAST eligible one,
/// so only the gating edges force the chain order. Records every gather
/// start/finish plus the arguments it was invoked with.
struct RecordingEngine {
    events: Mutex<Vec<String>>,
    args: Mutex<Vec<String>>,
    exit_code: i32,
}

impl RecordingEngine {
    fn new(exit_code: i32) -> Self {
        Self { events: Mutex::new(Vec::new()), args: Mutex::new(Vec::new()), exit_code }
    }

    fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    fn recorded_args(&self) -> Vec<String> {
        self.args.lock().unwrap().clone()
    }
}

#[async_trait]
impl ExecutionEngine for RecordingEngine {
    async fn run(
        &self,
        graph: &TaskGraph,
        _options: &EngineOptions,
        _task: &str,
        extra_args: &[String],
    ) -> Result<i32, EngineError> {
        self.args.lock().unwrap().extend_from_slice(extra_args);

        let mut resolved: HashSet<String> = HashSet::new();
        let mut remaining: Vec<_> = graph.nodes().iter().collect();
        while !remaining.is_empty() {
            let pos = remaining
                .iter()
                .rposition(|node| {
                    node.after
                        .as_ref()
                        .map_or(true, |after| resolved.contains(&after.to_string()))
                })
                .ok_or_else(|| EngineError::Internal("no eligible node".to_string()))?;
            let node = remaining.remove(pos);

            self.events.lock().unwrap().push(format!("start:{}", node.key));
            for item in node.tasks() {
                let task = item?;
                self.events.lock().unwrap().push(format!("task:{}", task.name));
            }
            self.events.lock().unwrap().push(format!("done:{}", node.key));
            resolved.insert(node.key.to_string());
        }

        Ok(self.exit_code)
    }
}

#[test]
fn test_initialize_builds_registry_and_graph() {
    let mut manager = test_manager();
    assert!(manager.registry().is_none());
    assert!(manager.graph().is_none());

    manager.initialize();

    let registry = manager.registry().expect("registry after initialize");
    assert_eq!(registry.len(), 2);
    assert_eq!(manager.addon_names(), vec!["alpha", "beta"]);

    let graph = manager.graph().expect("graph after initialize");
    assert_eq!(graph.len(), 6, "one generator per (phase, hook) key");
}

#[test]
fn test_reinitialize_rebuilds() {
    let mut manager = test_manager();
    manager.initialize();
    let first = Arc::clone(manager.graph().unwrap());

    manager.initialize();
    let second = manager.graph().unwrap();

    assert!(
        !Arc::ptr_eq(&first, second),
        "re-initialization must rebuild the generator map"
    );
    assert_eq!(manager.graph().unwrap().len(), 6);
}

#[tokio::test]
async fn test_run_before_initialize_fails() {
    let manager = test_manager();
    let engine = RecordingEngine::new(0);

    let result = manager.run(&engine, "b", &[]).await;
    assert!(matches!(result, Err(Error::NotInitialized)));
}

#[tokio::test]
async fn test_run_returns_engine_code_unmodified() {
    let mut manager = test_manager();
    manager.initialize();
    let engine = RecordingEngine::new(7);

    let code = manager.run(&engine, "b", &[]).await.expect("run should succeed");
    assert_eq!(code, 7);
}

#[tokio::test]
async fn test_run_merges_extra_args() {
    let source = StaticAddonSource::new();
    let config = RunConfig {
        extra_args: vec!["--from-config".to_string()],
        ..RunConfig::default()
    };
    let mut manager = Manager::new(config, two_hook_lifecycle(), Box::new(source));
    manager.initialize();
    let engine = RecordingEngine::new(0);

    manager
        .run(&engine, "b", &["--from-call".to_string()])
        .await
        .expect("run should succeed");

    assert_eq!(engine.recorded_args(), vec!["--from-config", "--from-call"]);
}

#[tokio::test]
async fn test_gating_forces_resolution_order() {
    let mut manager = test_manager();
    manager.initialize();
    let engine = RecordingEngine::new(0);

    manager.run(&engine, "b", &[]).await.expect("run should succeed");
    let events = engine.events();

    // Even though the stub prefers later nodes, the chain of gating edges
    // forces the lifecycle order.
    let starts: Vec<&String> =
        events.iter().filter(|e| e.starts_with("start:")).collect();
    assert_eq!(
        starts,
        vec!["start:pre_a", "start:a", "start:post_a", "start:pre_b", "start:b", "start:post_b"]
    );

    // No pre_b work may begin until the full post_a task set is resolved.
    let done_post_a = events.iter().position(|e| e == "done:post_a").unwrap();
    let start_pre_b = events.iter().position(|e| e == "start:pre_b").unwrap();
    assert!(done_post_a < start_pre_b);

    // Addon tasks flow through with namespaced names.
    assert!(events.contains(&"task:alpha:task-for-post_a".to_string()));
    assert!(events.contains(&"task:beta:task-for-b".to_string()));
}

#[test]
fn test_engine_options_defaults() {
    let manager = test_manager();
    let options = manager.engine_options();

    assert_eq!(options.dep_file.to_string_lossy(), ".taskforge.db");
    assert_eq!(options.backend, "sqlite3");
    assert_eq!(options.verbosity, 2);
}
