//! Invoke-permission resolution and repair.
//!
//! Each declared (function, bucket) binding maps to one deterministic
//! permission statement on the function's resource policy. The resolver
//! computes that statement id, classifies the current policy state into
//! a [`PermissionStatus`], and can create the missing grant.
//!
//! The same id later keys the bucket-notification entry for the binding,
//! which is what makes repeated runs overwrite instead of duplicate.

use std::sync::Arc;

use bucketwire_model::{PolicyDocument, PolicyStatement};
use tracing::debug;

use crate::provider::{FunctionPolicyApi, PolicyApiError};

/// Namespace tag prefixed to every identifier this tool owns.
pub const ID_NAMESPACE: &str = "bucketwire-v1";

/// Deterministic statement id for a (function, bucket) binding.
///
/// Stable across runs and collision-free in practice for distinct pairs.
/// Both components are reduced to the statement-id charset
/// (`[A-Za-z0-9-_]`); any other character is removed.
///
/// # Examples
///
/// ```
/// use bucketwire_core::statement_id;
///
/// assert_eq!(
///     statement_id("thumbnailer", "photos.example.com"),
///     "bucketwire-v1-thumbnailer-photosexamplecom"
/// );
/// ```
#[must_use]
pub fn statement_id(function_name: &str, bucket_name: &str) -> String {
    format!(
        "{ID_NAMESPACE}-{}-{}",
        normalize(function_name),
        normalize(bucket_name)
    )
}

/// Strip every character outside the statement-id charset.
fn normalize(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect()
}

/// Resolved permission state of one binding.
///
/// Recomputed on every run, never persisted.
#[derive(Debug, Clone)]
pub enum PermissionStatus {
    /// A matching statement exists on the function's policy.
    Present(PolicyStatement),
    /// The policy exists without a matching statement, or no policy is
    /// configured at all.
    Absent,
    /// The target function does not exist on the provider.
    FunctionMissing {
        /// Raw provider message.
        message: String,
    },
    /// Any other provider failure, with the raw message preserved.
    Failed {
        /// Raw provider message.
        message: String,
    },
}

impl PermissionStatus {
    /// Returns `true` for [`PermissionStatus::Present`].
    #[must_use]
    pub fn is_present(&self) -> bool {
        matches!(self, Self::Present(_))
    }
}

/// Locate the statement with the given id.
#[must_use]
pub fn find_statement<'a>(
    policy: &'a PolicyDocument,
    statement_id: &str,
) -> Option<&'a PolicyStatement> {
    policy
        .statement
        .iter()
        .find(|s| s.sid.as_deref() == Some(statement_id))
}

/// Resolves and repairs invoke permissions through a policy service.
#[derive(Clone)]
pub struct PermissionResolver {
    api: Arc<dyn FunctionPolicyApi>,
}

impl std::fmt::Debug for PermissionResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PermissionResolver").finish_non_exhaustive()
    }
}

impl PermissionResolver {
    /// Create a resolver over the given policy service.
    #[must_use]
    pub fn new(api: Arc<dyn FunctionPolicyApi>) -> Self {
        Self { api }
    }

    /// Classify the current permission state of a binding.
    ///
    /// Never fails the run: provider failures are folded into the
    /// returned status.
    pub async fn resolve(&self, function_name: &str, bucket_name: &str) -> PermissionStatus {
        let sid = statement_id(function_name, bucket_name);
        debug!(function = %function_name, bucket = %bucket_name, sid = %sid, "resolving permission");

        match self.api.get_policy(function_name).await {
            Ok(Some(policy)) => find_statement(&policy, &sid)
                .map_or(PermissionStatus::Absent, |s| {
                    PermissionStatus::Present(s.clone())
                }),
            Ok(None) => PermissionStatus::Absent,
            Err(PolicyApiError::NoSuchResource { .. }) => PermissionStatus::Absent,
            Err(PolicyApiError::FunctionNotFound { message }) => {
                PermissionStatus::FunctionMissing { message }
            }
            Err(e) => PermissionStatus::Failed {
                message: e.to_string(),
            },
        }
    }

    /// Create the invoke grant for a binding.
    ///
    /// Called at most once per (function, bucket) pair per run, and only
    /// when the resolved status is [`PermissionStatus::Absent`]. A
    /// conflict means a concurrent deploy already created the grant; the
    /// policy is re-read once and the existing statement returned.
    pub async fn grant(
        &self,
        function_name: &str,
        bucket_name: &str,
    ) -> Result<PolicyStatement, PolicyApiError> {
        let sid = statement_id(function_name, bucket_name);

        match self
            .api
            .add_invoke_permission(function_name, bucket_name, &sid)
            .await
        {
            Ok(statement) => {
                debug!(function = %function_name, bucket = %bucket_name, sid = %sid, "created invoke permission");
                Ok(statement)
            }
            Err(PolicyApiError::Conflict { .. }) => {
                debug!(function = %function_name, sid = %sid, "permission already exists, re-reading policy");
                let policy = self.api.get_policy(function_name).await?;
                policy
                    .as_ref()
                    .and_then(|p| find_statement(p, &sid))
                    .cloned()
                    .ok_or_else(|| PolicyApiError::Provider {
                        message: format!(
                            "statement {sid} reported as existing but absent from policy"
                        ),
                    })
            }
            Err(e) => Err(e),
        }
    }
}
