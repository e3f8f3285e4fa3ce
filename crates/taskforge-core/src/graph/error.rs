//! Error types for the task generator factory.

use thiserror::Error;

use crate::addon::BoxError;

#[derive(Debug, Error)]
pub enum GraphError {
    /// An addon's task-producing operation failed while being polled.
    ///
    /// Only surfaced under strict mode; the message names the originating
    /// addon and attribute key so the operator can identify the offender.
    #[error("task generation failed for key '{key}' in addon '{addon}': {source}")]
    Gather {
        key: String,
        addon: String,
        #[source]
        source: BoxError,
    },
}
