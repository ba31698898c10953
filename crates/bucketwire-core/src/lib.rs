//! Reconciliation engine for BucketWire.
//!
//! BucketWire converges a declared set of "S3 bucket → Lambda function"
//! event bindings onto the live state of two provider resources: Lambda
//! resource policies (invoke permissions) and S3 bucket notification
//! configurations. Convergence is idempotent and partial-failure
//! tolerant: each (bucket, function) pair succeeds or fails on its own.
//!
//! # Architecture
//!
//! ```text
//! Manifest (declared bindings)
//!        |
//!        v
//! EventTransformer::expand      -- one TriggerEvent per binding,
//!        |                         permission status resolved in batch
//!        v
//! Reconciler (repair pass)      -- grant missing permissions,
//!        |                         drop or abort on missing functions
//!        v
//! group_by_bucket               -- first-seen-ordered BucketGroups
//!        |
//!        v
//! read current configs (batch) -> merge_notifications -> write (batch)
//! ```
//!
//! Provider access goes through the trait seams in [`provider`];
//! the AWS SDK implementations live in the `bucketwire-aws` crate.

pub mod config;
pub mod error;
pub mod merge;
pub mod permissions;
pub mod provider;
pub mod reconciler;
pub mod transform;

pub use config::DeployConfig;
pub use error::{BindingError, ReconcileError, Stage};
pub use permissions::{PermissionResolver, PermissionStatus, statement_id};
pub use provider::{BucketNotificationApi, FunctionPolicyApi, NotificationApiError, PolicyApiError};
pub use reconciler::{Reconciler, RunSummary};
pub use transform::{BucketGroup, EventTransformer, TriggerEvent};
