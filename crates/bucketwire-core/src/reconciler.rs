//! Reconciliation orchestration.
//!
//! One [`Reconciler::run`] call converges the declared manifest onto the
//! provider in four batched phases: resolve all permission states, repair
//! missing permissions, read all affected buckets' notification
//! configurations, write the merged configurations. Each phase joins
//! completely before the next starts, so the run works from one
//! consistent view of permission state and one of notification state.
//!
//! Failure policy: exactly one condition is fatal — a declared function
//! that is not deployed, without `continue_on_error`. Every other
//! failure is recorded in the [`RunSummary`] and the remaining bindings
//! and buckets proceed independently; there is no rollback across
//! buckets.
//!
//! All run-scoped state (events, groups, snapshots, summary) is owned by
//! the single `run` call, so concurrent or repeated runs cannot
//! interfere with each other.

use std::sync::Arc;

use bucketwire_model::Manifest;
use futures::future;
use tracing::{info, warn};

use crate::config::DeployConfig;
use crate::error::{BindingError, ReconcileError, Stage};
use crate::merge::merge_notifications;
use crate::permissions::{PermissionResolver, PermissionStatus};
use crate::provider::{BucketNotificationApi, FunctionPolicyApi, PolicyApiError};
use crate::transform::{EventTransformer, TriggerEvent, group_by_bucket};

/// Outcome of one reconciliation run.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Declared bindings processed.
    pub bindings: usize,
    /// Invoke permissions created during the run.
    pub permissions_created: usize,
    /// Buckets whose notification configuration was written.
    pub buckets_updated: usize,
    /// Bindings excluded from notification writes.
    pub bindings_skipped: usize,
    /// Recorded per-binding and per-bucket errors.
    pub errors: Vec<BindingError>,
}

impl RunSummary {
    fn new(bindings: usize) -> Self {
        Self {
            bindings,
            ..Self::default()
        }
    }

    /// Returns `true` when the run recorded no errors.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    fn record(&mut self, function: &str, bucket: &str, stage: Stage, message: String) {
        self.errors.push(BindingError {
            function: function.to_owned(),
            bucket: bucket.to_owned(),
            stage,
            message,
        });
    }
}

/// Sequences permission repair and notification convergence over the
/// provider seams.
#[derive(Clone)]
pub struct Reconciler {
    policy: Arc<dyn FunctionPolicyApi>,
    notifications: Arc<dyn BucketNotificationApi>,
    config: DeployConfig,
}

impl std::fmt::Debug for Reconciler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reconciler")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Reconciler {
    /// Create a reconciler over the given provider clients.
    #[must_use]
    pub fn new(
        policy: Arc<dyn FunctionPolicyApi>,
        notifications: Arc<dyn BucketNotificationApi>,
        config: DeployConfig,
    ) -> Self {
        Self {
            policy,
            notifications,
            config,
        }
    }

    /// Run one reconciliation of the declared manifest.
    ///
    /// # Errors
    /// Returns [`ReconcileError::Manifest`] for an invalid manifest and
    /// [`ReconcileError::FunctionNotDeployed`] when a declared function
    /// is missing and `continue_on_error` is unset. All other failures
    /// are recorded in the returned summary.
    pub async fn run(&self, manifest: &Manifest) -> Result<RunSummary, ReconcileError> {
        manifest.validate()?;
        let mut summary = RunSummary::new(manifest.binding_count());

        info!(
            functions = manifest.functions.len(),
            bindings = summary.bindings,
            "expanding declared triggers"
        );

        let resolver = PermissionResolver::new(Arc::clone(&self.policy));
        let transformer = EventTransformer::new(resolver.clone());
        let events = transformer.expand(manifest).await;

        let events = self
            .repair_permissions(&resolver, events, &mut summary)
            .await?;
        let groups = group_by_bucket(events);

        if groups.is_empty() {
            info!("no bucket notification changes to apply");
            return Ok(summary);
        }

        info!(buckets = groups.len(), "reading current notification configurations");

        // All reads settle before any write is issued, so every merge
        // works from the same snapshot generation.
        let reads = future::join_all(
            groups
                .iter()
                .map(|g| self.notifications.get_notification_config(&g.bucket)),
        )
        .await;

        let mut writes = Vec::with_capacity(groups.len());
        for (group, read) in groups.iter().zip(reads) {
            match read {
                Ok(current) => writes.push((group, merge_notifications(&current, group))),
                Err(e) => {
                    warn!(bucket = %group.bucket, error = %e, "failed to read notification configuration");
                    summary.record("", &group.bucket, Stage::NotificationRead, e.message);
                }
            }
        }

        let results = future::join_all(
            writes
                .iter()
                .map(|(group, config)| self.notifications.put_notification_config(&group.bucket, config)),
        )
        .await;

        for ((group, _), result) in writes.iter().zip(results) {
            match result {
                Ok(()) => {
                    info!(
                        bucket = %group.bucket,
                        entries = group.events.len(),
                        "notification configuration updated"
                    );
                    summary.buckets_updated += 1;
                }
                Err(e) => {
                    warn!(bucket = %group.bucket, error = %e, "failed to write notification configuration");
                    summary.record("", &group.bucket, Stage::NotificationWrite, e.message);
                }
            }
        }

        info!(
            bindings = summary.bindings,
            permissions_created = summary.permissions_created,
            buckets_updated = summary.buckets_updated,
            bindings_skipped = summary.bindings_skipped,
            errors = summary.errors.len(),
            "reconciliation complete"
        );

        Ok(summary)
    }

    /// Grant missing permissions and settle every binding's fate.
    ///
    /// Returns the surviving events, all carrying a present statement.
    async fn repair_permissions(
        &self,
        resolver: &PermissionResolver,
        mut events: Vec<TriggerEvent>,
        summary: &mut RunSummary,
    ) -> Result<Vec<TriggerEvent>, ReconcileError> {
        // A missing function aborts the run before any permission or
        // notification mutation, unless the operator opted to continue.
        if !self.config.continue_on_error {
            if let Some(event) = events
                .iter()
                .find(|e| matches!(e.status, PermissionStatus::FunctionMissing { .. }))
            {
                return Err(ReconcileError::FunctionNotDeployed {
                    function: event.function.clone(),
                });
            }
        }

        let mut grant_targets = Vec::new();
        for (index, event) in events.iter_mut().enumerate() {
            match &event.status {
                PermissionStatus::FunctionMissing { .. } => {
                    warn!(
                        function = %event.function,
                        bucket = %event.bucket,
                        "function has not been deployed, excluding its binding"
                    );
                    event.remove = true;
                    summary.bindings_skipped += 1;
                }
                PermissionStatus::Failed { message } => {
                    warn!(
                        function = %event.function,
                        bucket = %event.bucket,
                        error = %message,
                        "permission check failed, excluding binding"
                    );
                    summary.record(
                        &event.function,
                        &event.bucket,
                        Stage::Permission,
                        message.clone(),
                    );
                    event.remove = true;
                    summary.bindings_skipped += 1;
                }
                PermissionStatus::Absent => grant_targets.push(index),
                PermissionStatus::Present(_) => {}
            }
        }

        let grants = future::join_all(grant_targets.iter().map(|&index| {
            let function = events[index].function.clone();
            let bucket = events[index].bucket.clone();
            let resolver = resolver.clone();
            async move { resolver.grant(&function, &bucket).await }
        }))
        .await;

        for (&index, result) in grant_targets.iter().zip(&grants) {
            let event = &mut events[index];
            match result {
                Ok(statement) => {
                    info!(
                        function = %event.function,
                        bucket = %event.bucket,
                        "created invoke permission"
                    );
                    event.status = PermissionStatus::Present(statement.clone());
                    summary.permissions_created += 1;
                }
                Err(PolicyApiError::FunctionNotFound { .. }) => {
                    if self.config.continue_on_error {
                        warn!(
                            function = %event.function,
                            bucket = %event.bucket,
                            "function has not been deployed, excluding its binding"
                        );
                        event.remove = true;
                        summary.bindings_skipped += 1;
                    } else {
                        return Err(ReconcileError::FunctionNotDeployed {
                            function: event.function.clone(),
                        });
                    }
                }
                Err(e) => {
                    warn!(
                        function = %event.function,
                        bucket = %event.bucket,
                        error = %e,
                        "failed to create invoke permission, excluding binding"
                    );
                    summary.record(&event.function, &event.bucket, Stage::Permission, e.to_string());
                    event.remove = true;
                    summary.bindings_skipped += 1;
                }
            }
        }

        let mut survivors = Vec::with_capacity(events.len());
        for event in events {
            if event.remove {
                continue;
            }
            if event.function_arn().is_some() {
                survivors.push(event);
            } else {
                summary.record(
                    &event.function,
                    &event.bucket,
                    Stage::Permission,
                    "permission statement carries no function resource".to_owned(),
                );
                summary.bindings_skipped += 1;
            }
        }
        Ok(survivors)
    }
}
