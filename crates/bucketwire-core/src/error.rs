//! Engine error types.
//!
//! Only one condition aborts a whole run: a declared function that is
//! not deployed, without `continue_on_error`. Everything else is
//! collected as [`BindingError`]s in the run summary while the remaining
//! bindings converge independently.

use std::fmt;

use bucketwire_model::ManifestError;

/// Fatal reconciliation error.
#[derive(Debug, thiserror::Error)]
pub enum ReconcileError {
    /// A declared function does not exist on the provider and
    /// `continue_on_error` is unset. A partially-deployed function set is
    /// a deployment-ordering violation, not a per-binding failure.
    #[error(
        "function {function} has not been deployed yet (it may not be the only one); \
         run the function deployment step before wiring bucket notifications"
    )]
    FunctionNotDeployed {
        /// The missing function.
        function: String,
    },

    /// The declared manifest failed validation.
    #[error(transparent)]
    Manifest(#[from] ManifestError),
}

/// The pipeline stage a recorded error occurred in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Resolving or granting the invoke permission.
    Permission,
    /// Reading the bucket's current notification configuration.
    NotificationRead,
    /// Writing the merged notification configuration.
    NotificationWrite,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Permission => "permission",
            Self::NotificationRead => "notification-read",
            Self::NotificationWrite => "notification-write",
        };
        f.write_str(name)
    }
}

/// A recorded, non-fatal error for one binding or one bucket.
#[derive(Debug, Clone)]
pub struct BindingError {
    /// The function of the affected binding; empty for whole-bucket
    /// failures (read/write), which affect every binding of the bucket.
    pub function: String,
    /// The bucket of the affected binding.
    pub bucket: String,
    /// Pipeline stage the error occurred in.
    pub stage: Stage,
    /// Provider or engine message.
    pub message: String,
}

impl fmt::Display for BindingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.function.is_empty() {
            write!(f, "[{}] bucket {}: {}", self.stage, self.bucket, self.message)
        } else {
            write!(
                f,
                "[{}] {} -> {}: {}",
                self.stage, self.bucket, self.function, self.message
            )
        }
    }
}
