//! Built-in addon that contributes `status` tasks reporting the effective
//! run configuration and the active lifecycle. Mostly here so a fresh
//! checkout has something to run; it also serves as a reference addon
//! implementation.

use std::collections::BTreeSet;

use taskforge_core::addon::{Addon, AddonContext, AddonFactory, BoxError, TaskIter};
use taskforge_core::graph::Task;
use taskforge_core::lifecycle::AttrKey;

/// The name this addon is registered under.
pub const ADDON_NAME: &str = "status-report";

pub struct StatusReportAddon {
    caps: BTreeSet<AttrKey>,
}

impl StatusReportAddon {
    fn new() -> Self {
        Self {
            caps: BTreeSet::from([AttrKey::main("status")]),
        }
    }
}

impl Addon for StatusReportAddon {
    fn name(&self) -> &str {
        ADDON_NAME
    }

    fn capabilities(&self) -> &BTreeSet<AttrKey> {
        &self.caps
    }

    fn tasks(&self, _key: &AttrKey, ctx: &AddonContext) -> TaskIter {
        let strict = ctx.config.strict;
        let prefix = ctx.config.task_prefix.clone();
        let hooks = ctx.lifecycle.hooks().join(", ");

        let config_task = Task::new("config")
            .doc("report the effective run configuration")
            .action(Box::new(move || {
                println!("strict: {strict}");
                println!("task prefix: {:?}", prefix);
                Ok(())
            }));

        let lifecycle_task = Task::new("lifecycle")
            .doc("report the active lifecycle hooks")
            .action(Box::new(move || {
                println!("hooks: {hooks}");
                Ok(())
            }));

        Box::new([config_task, lifecycle_task].into_iter().map(Ok))
    }
}

/// Factory for static registration by the binary.
pub struct StatusReportFactory;

impl AddonFactory for StatusReportFactory {
    fn build(&self, ctx: &AddonContext) -> Result<Box<dyn Addon>, BoxError> {
        if ctx.ignore_env {
            log::debug!("[{ADDON_NAME}] skipping environment defaults");
        }
        Ok(Box::new(StatusReportAddon::new()))
    }
}
