use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use crate::addon::registry::AddonRegistry;
use crate::addon::source::{AddonFactory, StaticAddonSource};
use crate::addon::{Addon, AddonContext, BoxError, TaskIter};
use crate::config::{EnvIgnore, RunConfig};
use crate::graph::Task;
use crate::lifecycle::{AttrKey, Lifecycle};

// Mock addon emitting one task named after the key it was asked for.
struct MockAddon {
    name: String,
    caps: BTreeSet<AttrKey>,
}

impl Addon for MockAddon {
    fn name(&self) -> &str {
        &self.name
    }

    fn capabilities(&self) -> &BTreeSet<AttrKey> {
        &self.caps
    }

    fn tasks(&self, key: &AttrKey, _ctx: &AddonContext) -> TaskIter {
        Box::new(std::iter::once(Ok(Task::new(key.to_string()))))
    }
}

fn mock_factory(name: &str, caps: Vec<AttrKey>) -> Arc<dyn AddonFactory> {
    let name = name.to_string();
    let caps: BTreeSet<AttrKey> = caps.into_iter().collect();
    Arc::new(move |_ctx: &AddonContext| -> Result<Box<dyn Addon>, BoxError> {
        Ok(Box::new(MockAddon { name: name.clone(), caps: caps.clone() }))
    })
}

fn failing_factory(message: &str) -> Arc<dyn AddonFactory> {
    let message = message.to_string();
    Arc::new(move |_ctx: &AddonContext| -> Result<Box<dyn Addon>, BoxError> {
        Err(message.clone().into())
    })
}

fn test_lifecycle() -> Arc<Lifecycle> {
    let parents = HashMap::from([("b".to_string(), "a".to_string())]);
    Arc::new(Lifecycle::new(vec!["a".to_string(), "b".to_string()], parents).unwrap())
}

#[test]
fn test_load_constructs_all_candidates() {
    let source = StaticAddonSource::new()
        .with("beta", mock_factory("beta", vec![AttrKey::main("a")]))
        .with("alpha", mock_factory("alpha", vec![AttrKey::main("b")]));
    let config = Arc::new(RunConfig::default());

    let registry = AddonRegistry::load(&source, &config, &test_lifecycle());

    assert_eq!(registry.len(), 2);
    let names: Vec<&str> = registry.names().collect();
    assert_eq!(names, vec!["alpha", "beta"], "names iterate in sorted order");
}

#[test]
fn test_disabled_addon_never_instantiated() {
    let source = StaticAddonSource::new()
        .with("alpha", mock_factory("alpha", vec![AttrKey::main("a")]))
        .with("beta", failing_factory("must not even be constructed"))
        .with("gamma", mock_factory("gamma", vec![AttrKey::main("a")]));
    let mut config = RunConfig::default();
    config.disable_addons.insert("beta".to_string());
    config.disable_addons.insert("gamma".to_string());
    let config = Arc::new(config);

    let registry = AddonRegistry::load(&source, &config, &test_lifecycle());

    assert_eq!(registry.len(), 1);
    assert!(registry.has_addon("alpha"));
    assert!(!registry.has_addon("beta"));
    assert!(!registry.has_addon("gamma"));
}

#[test]
fn test_construction_failure_is_isolated() {
    let source = StaticAddonSource::new()
        .with("broken", failing_factory("boom"))
        .with("ok", mock_factory("ok", vec![AttrKey::main("a")]));
    // Strict mode must not turn a construction failure into an abort.
    let config = Arc::new(RunConfig { strict: true, ..RunConfig::default() });

    let registry = AddonRegistry::load(&source, &config, &test_lifecycle());

    assert_eq!(registry.len(), 1);
    assert!(registry.has_addon("ok"));
}

#[test]
fn test_unknown_capability_drops_addon() {
    let source = StaticAddonSource::new()
        .with("odd", mock_factory("odd", vec![AttrKey::main("zzz")]))
        .with("ok", mock_factory("ok", vec![AttrKey::pre("a")]));
    let config = Arc::new(RunConfig::default());

    let registry = AddonRegistry::load(&source, &config, &test_lifecycle());

    assert_eq!(registry.len(), 1);
    assert!(!registry.has_addon("odd"));
}

#[test]
fn test_env_ignore_selector_reaches_context() {
    let source = StaticAddonSource::new()
        .with("alpha", mock_factory("alpha", vec![AttrKey::main("a")]))
        .with("beta", mock_factory("beta", vec![AttrKey::main("a")]));
    let mut config = RunConfig::default();
    config.ignore_env = EnvIgnore::Named(BTreeSet::from(["alpha".to_string()]));
    let config = Arc::new(config);

    let registry = AddonRegistry::load(&source, &config, &test_lifecycle());

    assert!(registry.get("alpha").unwrap().ctx.ignore_env);
    assert!(!registry.get("beta").unwrap().ctx.ignore_env);
}

#[test]
fn test_env_ignore_blanket_true() {
    let source = StaticAddonSource::new()
        .with("alpha", mock_factory("alpha", vec![AttrKey::main("a")]));
    let config = Arc::new(RunConfig {
        ignore_env: EnvIgnore::All(true),
        ..RunConfig::default()
    });

    let registry = AddonRegistry::load(&source, &config, &test_lifecycle());

    assert!(registry.get("alpha").unwrap().ctx.ignore_env);
}

#[test]
fn test_eligible_filters_by_capability() {
    let source = StaticAddonSource::new()
        .with("alpha", mock_factory("alpha", vec![AttrKey::main("a"), AttrKey::post("b")]))
        .with("beta", mock_factory("beta", vec![AttrKey::post("b")]));
    let config = Arc::new(RunConfig::default());

    let registry = AddonRegistry::load(&source, &config, &test_lifecycle());

    let for_a: Vec<String> =
        registry.eligible(&AttrKey::main("a")).into_iter().map(|(n, _)| n).collect();
    assert_eq!(for_a, vec!["alpha"]);

    let for_post_b: Vec<String> =
        registry.eligible(&AttrKey::post("b")).into_iter().map(|(n, _)| n).collect();
    assert_eq!(for_post_b, vec!["alpha", "beta"]);

    assert!(registry.eligible(&AttrKey::pre("a")).is_empty());
}
