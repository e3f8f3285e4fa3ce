//! Addon discovery.
//!
//! Discovery is an explicit registry interface consumed once at manager
//! initialization: a source lists candidate names mapped to factories, and
//! the registry decides what to construct. There is no runtime
//! re-discovery.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::addon::{Addon, AddonContext, BoxError};

/// Builds one addon instance from the manager context.
pub trait AddonFactory: Send + Sync {
    fn build(&self, ctx: &AddonContext) -> Result<Box<dyn Addon>, BoxError>;
}

// Plain closures work as factories, which keeps static registration and
// test mocks terse.
impl<F> AddonFactory for F
where
    F: Fn(&AddonContext) -> Result<Box<dyn Addon>, BoxError> + Send + Sync,
{
    fn build(&self, ctx: &AddonContext) -> Result<Box<dyn Addon>, BoxError> {
        self(ctx)
    }
}

/// The discovery collaborator: a mapping of candidate names to factories.
pub trait AddonSource: Send + Sync {
    fn candidates(&self) -> BTreeMap<String, Arc<dyn AddonFactory>>;
}

/// A source backed by statically registered factories.
///
/// The binary registers its built-in addons here, the same way core
/// functionality is linked in rather than discovered at runtime.
#[derive(Default)]
pub struct StaticAddonSource {
    factories: BTreeMap<String, Arc<dyn AddonFactory>>,
}

impl StaticAddonSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory under a name. A later registration under the same
    /// name replaces the earlier one.
    pub fn register(&mut self, name: &str, factory: Arc<dyn AddonFactory>) {
        self.factories.insert(name.to_string(), factory);
    }

    /// Builder-style registration.
    pub fn with(mut self, name: &str, factory: Arc<dyn AddonFactory>) -> Self {
        self.register(name, factory);
        self
    }
}

impl AddonSource for StaticAddonSource {
    fn candidates(&self) -> BTreeMap<String, Arc<dyn AddonFactory>> {
        self.factories.clone()
    }
}
