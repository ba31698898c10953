//! Provider trait seams.
//!
//! The engine talks to the cloud provider exclusively through these two
//! traits, keeping the reconciliation logic testable against in-memory
//! doubles. The AWS SDK implementations live in `bucketwire-aws`.
//!
//! # Object safety
//!
//! Both traits use `#[async_trait]` because the reconciler holds them as
//! `Arc<dyn ...>` for shared ownership across pipeline stages.

use async_trait::async_trait;
use bucketwire_model::{NotificationConfig, PolicyDocument, PolicyStatement};

/// Classified failure of a policy-service call.
///
/// Classification happens once, at the adapter boundary; the engine only
/// branches on variants and never inspects provider message text. The
/// raw message is always preserved for the run summary.
#[derive(Debug, Clone, thiserror::Error)]
pub enum PolicyApiError {
    /// The target function does not exist. Load-bearing for orchestrator
    /// branching: fatal without `continue_on_error`, a skip with it.
    #[error("function not found: {message}")]
    FunctionNotFound {
        /// Raw provider message.
        message: String,
    },

    /// The requested resource (typically the policy itself) does not
    /// exist. Benign: it means no permission has been granted yet.
    #[error("resource not found: {message}")]
    NoSuchResource {
        /// Raw provider message.
        message: String,
    },

    /// The permission statement already exists. A concurrent deploy won
    /// the race; callers treat this as success.
    #[error("permission statement already exists: {message}")]
    Conflict {
        /// Raw provider message.
        message: String,
    },

    /// Any other provider failure, with the raw message preserved.
    #[error("provider error: {message}")]
    Provider {
        /// Raw provider message.
        message: String,
    },
}

/// Failure of a notification-configuration call.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct NotificationApiError {
    /// Raw provider message.
    pub message: String,
}

impl NotificationApiError {
    /// Wrap a provider message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Function invocation/policy service: read resource policies, grant
/// invoke permissions.
#[async_trait]
pub trait FunctionPolicyApi: Send + Sync {
    /// Fetch the function's resource policy.
    ///
    /// Returns `Ok(None)` when the provider reports that no policy is
    /// configured — that is an expected state, not an error.
    async fn get_policy(
        &self,
        function_name: &str,
    ) -> Result<Option<PolicyDocument>, PolicyApiError>;

    /// Grant the bucket permission to invoke the function.
    ///
    /// The grant is `lambda:InvokeFunction` to the storage-service
    /// principal, restricted to the bucket's resource identifier, under
    /// the given statement id. Returns the created statement.
    async fn add_invoke_permission(
        &self,
        function_name: &str,
        bucket_name: &str,
        statement_id: &str,
    ) -> Result<PolicyStatement, PolicyApiError>;
}

/// Object-storage notification service: read and replace a bucket's
/// notification configuration.
#[async_trait]
pub trait BucketNotificationApi: Send + Sync {
    /// Read the bucket's current notification configuration.
    async fn get_notification_config(
        &self,
        bucket_name: &str,
    ) -> Result<NotificationConfig, NotificationApiError>;

    /// Replace the bucket's notification configuration.
    async fn put_notification_config(
        &self,
        bucket_name: &str,
        config: &NotificationConfig,
    ) -> Result<(), NotificationApiError>;
}
