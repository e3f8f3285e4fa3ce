//! Registry of constructed addons.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::addon::error::AddonSystemError;
use crate::addon::source::AddonSource;
use crate::addon::{Addon, AddonContext};
use crate::config::RunConfig;
use crate::lifecycle::{AttrKey, Lifecycle};

/// A constructed addon together with the context it was built with.
#[derive(Clone)]
pub struct AddonHandle {
    pub addon: Arc<dyn Addon>,
    pub ctx: Arc<AddonContext>,
}

/// The addons successfully constructed for one manager.
///
/// Loaded exactly once per initialization; construction failures are
/// isolated per addon and never abort the build of the registry.
pub struct AddonRegistry {
    addons: BTreeMap<String, AddonHandle>,
}

impl fmt::Debug for AddonRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&String> = self.addons.keys().collect();
        f.debug_struct("AddonRegistry").field("addons", &names).finish()
    }
}

impl AddonRegistry {
    /// Construct every candidate the source offers, honoring the disabled
    /// set and the environment-ignore selector.
    ///
    /// A factory failure or an unknown capability key is logged as a
    /// warning and drops that addon only. Strict mode plays no role here;
    /// it governs generation time, not construction time.
    pub fn load(
        source: &dyn AddonSource,
        config: &Arc<RunConfig>,
        lifecycle: &Arc<Lifecycle>,
    ) -> Self {
        let mut addons = BTreeMap::new();

        for (name, factory) in source.candidates() {
            if config.disable_addons.contains(&name) {
                log::info!("[forge] [addon] [{name}] skipped by config");
                continue;
            }

            let ignore_env = config.ignore_env.matches(&name);
            if ignore_env {
                log::debug!("[forge] [addon] [{name}] ... ignore environment defaults");
            }
            let ctx = Arc::new(AddonContext {
                config: Arc::clone(config),
                lifecycle: Arc::clone(lifecycle),
                ignore_env,
            });

            let addon = match factory.build(&ctx) {
                Ok(addon) => addon,
                Err(source) => {
                    log::warn!(
                        "[forge] [addon] [{name}] FAIL: {}",
                        AddonSystemError::Construction { name: name.clone(), source }
                    );
                    continue;
                }
            };

            if let Some(key) = addon
                .capabilities()
                .iter()
                .find(|key| !lifecycle.contains(key))
            {
                log::warn!(
                    "[forge] [addon] [{name}] FAIL: {}",
                    AddonSystemError::UnknownCapability {
                        name: name.clone(),
                        key: key.to_string(),
                    }
                );
                continue;
            }

            for key in addon.capabilities() {
                log::debug!("[forge] [addon] [{name}] ... will {key}");
            }
            addons.insert(name, AddonHandle { addon: Arc::from(addon), ctx });
        }

        Self { addons }
    }

    /// Number of constructed addons.
    pub fn len(&self) -> usize {
        self.addons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addons.is_empty()
    }

    pub fn has_addon(&self, name: &str) -> bool {
        self.addons.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&AddonHandle> {
        self.addons.get(name)
    }

    /// Addon names in stable (sorted) order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.addons.keys().map(String::as_str)
    }

    /// All handles in stable name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AddonHandle)> {
        self.addons.iter().map(|(name, handle)| (name.as_str(), handle))
    }

    /// Snapshot of the addons whose capability set contains `key`, in
    /// stable name order. Owned clones so gather iterators can outlive the
    /// borrow.
    pub fn eligible(&self, key: &AttrKey) -> Vec<(String, AddonHandle)> {
        self.addons
            .iter()
            .filter(|(_, handle)| handle.addon.capabilities().contains(key))
            .map(|(name, handle)| (name.clone(), handle.clone()))
            .collect()
    }
}
