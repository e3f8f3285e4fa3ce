//! Error types for the stage lifecycle model.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("hook '{hook}' appears more than once in the lifecycle")]
    DuplicateHook { hook: String },

    #[error("parent map names unknown hook '{hook}'")]
    UnknownHook { hook: String },

    #[error("hook '{hook}' declares unknown parent '{parent}'")]
    UnknownParent { hook: String, parent: String },

    #[error("hook '{hook}' declares parent '{parent}' which does not precede it")]
    ParentNotEarlier { hook: String, parent: String },
}
