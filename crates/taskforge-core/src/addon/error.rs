//! Error types for the addon system.

use thiserror::Error;

use crate::addon::BoxError;

#[derive(Debug, Error)]
pub enum AddonSystemError {
    /// An addon factory failed. Always isolated: the addon is dropped and
    /// registry construction continues, regardless of strict mode.
    #[error("addon construction failed for '{name}': {source}")]
    Construction {
        name: String,
        #[source]
        source: BoxError,
    },

    /// An addon declared a capability key the lifecycle does not know.
    #[error("addon '{name}' declares unknown attribute key '{key}'")]
    UnknownCapability { name: String, key: String },
}
