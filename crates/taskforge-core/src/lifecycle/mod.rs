//! # Stage Lifecycle Model
//!
//! Pure data describing the build lifecycle: an ordered sequence of hooks,
//! the fixed three-phase ordering {pre, main, post}, and a parent-hook map
//! used only for cross-hook gating. The model is validated once at
//! construction and never mutated afterwards.

pub mod error;

use std::collections::HashMap;
use std::fmt;

use error::LifecycleError;

/// The three phases applied to every hook, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Phase {
    Pre,
    Main,
    Post,
}

impl Phase {
    /// All phases in their fixed order.
    pub const ALL: [Phase; 3] = [Phase::Pre, Phase::Main, Phase::Post];

    /// The key prefix for this phase. Main-phase keys are the bare hook name.
    pub fn prefix(&self) -> &'static str {
        match self {
            Phase::Pre => "pre_",
            Phase::Main => "",
            Phase::Post => "post_",
        }
    }
}

/// The unique identifier `phase + hook` (e.g. `pre_build`), the unit the
/// rest of the system keys on.
///
/// Equality and hashing follow the (phase, hook) pair; the authoritative
/// total order is the one produced by [`Lifecycle::keys`], which iterates
/// hooks in lifecycle order and phases in [`Phase::ALL`] order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AttrKey {
    pub phase: Phase,
    pub hook: String,
}

impl AttrKey {
    pub fn new(phase: Phase, hook: impl Into<String>) -> Self {
        Self { phase, hook: hook.into() }
    }

    pub fn pre(hook: impl Into<String>) -> Self {
        Self::new(Phase::Pre, hook)
    }

    pub fn main(hook: impl Into<String>) -> Self {
        Self::new(Phase::Main, hook)
    }

    pub fn post(hook: impl Into<String>) -> Self {
        Self::new(Phase::Post, hook)
    }
}

impl fmt::Display for AttrKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.phase.prefix(), self.hook)
    }
}

/// The ordered hook sequence and the parent map.
///
/// The parent relation is a chain, not a general DAG: each hook has at most
/// one parent, and a parent must appear earlier in the sequence, so the
/// relation is acyclic by construction.
#[derive(Debug, Clone)]
pub struct Lifecycle {
    hooks: Vec<String>,
    parents: HashMap<String, String>,
}

impl Lifecycle {
    /// Build a lifecycle from an ordered hook list and a parent map.
    pub fn new(
        hooks: Vec<String>,
        parents: HashMap<String, String>,
    ) -> Result<Self, LifecycleError> {
        let mut seen: HashMap<&str, usize> = HashMap::new();
        for (position, hook) in hooks.iter().enumerate() {
            if seen.insert(hook.as_str(), position).is_some() {
                return Err(LifecycleError::DuplicateHook { hook: hook.clone() });
            }
        }

        for (hook, parent) in &parents {
            let hook_pos = *seen.get(hook.as_str()).ok_or_else(|| {
                LifecycleError::UnknownHook { hook: hook.clone() }
            })?;
            let parent_pos = *seen.get(parent.as_str()).ok_or_else(|| {
                LifecycleError::UnknownParent { hook: hook.clone(), parent: parent.clone() }
            })?;
            if parent_pos >= hook_pos {
                return Err(LifecycleError::ParentNotEarlier {
                    hook: hook.clone(),
                    parent: parent.clone(),
                });
            }
        }

        Ok(Self { hooks, parents })
    }

    /// The default taskforge lifecycle.
    pub fn forge_default() -> Self {
        let hooks = ["status", "init", "build", "check", "serve", "archive"]
            .into_iter()
            .map(String::from)
            .collect();
        let parents = [
            ("build", "init"),
            ("check", "build"),
            ("serve", "build"),
            ("archive", "build"),
        ]
        .into_iter()
        .map(|(hook, parent)| (hook.to_string(), parent.to_string()))
        .collect();

        // The hard-coded model always satisfies the construction rules.
        Self::new(hooks, parents).unwrap_or_else(|err| {
            unreachable!("default lifecycle is invalid: {err}")
        })
    }

    /// The ordered hook names.
    pub fn hooks(&self) -> &[String] {
        &self.hooks
    }

    /// The parent of a hook, if it declares one.
    pub fn parent(&self, hook: &str) -> Option<&str> {
        self.parents.get(hook).map(String::as_str)
    }

    /// Position of a hook in the lifecycle order.
    pub fn position(&self, hook: &str) -> Option<usize> {
        self.hooks.iter().position(|h| h == hook)
    }

    /// Whether the key's hook is part of this lifecycle.
    pub fn contains(&self, key: &AttrKey) -> bool {
        self.position(&key.hook).is_some()
    }

    /// All attribute keys in the total order: outer loop over hooks in
    /// lifecycle order, inner loop over phases in {pre, main, post} order.
    pub fn keys(&self) -> impl Iterator<Item = AttrKey> + '_ {
        self.hooks
            .iter()
            .flat_map(|hook| Phase::ALL.into_iter().map(move |phase| AttrKey::new(phase, hook.clone())))
    }
}
