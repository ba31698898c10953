//! Declared-config to event-sequence transformation.
//!
//! [`EventTransformer::expand`] flattens the manifest into one
//! [`TriggerEvent`] per (function, trigger) pair, resolving each pair's
//! permission status in a single concurrent batch. [`group_by_bucket`]
//! then partitions a (possibly permission-repaired) event sequence into
//! per-bucket groups.
//!
//! Ordering is load-bearing for idempotence testing: events follow
//! declared order (functions, then triggers within a function), and
//! groups follow first appearance of each bucket in the event sequence.
//! Batch completion order never influences either.

use bucketwire_model::{KeyFilterRule, Manifest, ObjectEventType};
use futures::future;
use tracing::debug;

use crate::permissions::{PermissionResolver, PermissionStatus};

/// One declared binding enriched with its resolved permission state.
#[derive(Debug, Clone)]
pub struct TriggerEvent {
    /// The declared function name.
    pub function: String,
    /// The declared source bucket.
    pub bucket: String,
    /// Declared object event types.
    pub events: Vec<ObjectEventType>,
    /// Declared object-key filter rules.
    pub rules: Vec<KeyFilterRule>,
    /// Resolved permission status; replaced once by the repair pass.
    pub status: PermissionStatus,
    /// Set by the repair pass to exclude this event from grouping
    /// (continue-on-error only).
    pub remove: bool,
}

impl TriggerEvent {
    /// The target function's ARN, once the permission statement is known.
    #[must_use]
    pub fn function_arn(&self) -> Option<&str> {
        match &self.status {
            PermissionStatus::Present(statement) => statement.resource_str(),
            _ => None,
        }
    }
}

/// Events for one bucket, in input order.
#[derive(Debug, Clone)]
pub struct BucketGroup {
    /// The target bucket.
    pub bucket: String,
    /// Surviving events targeting the bucket.
    pub events: Vec<TriggerEvent>,
}

/// Expands the declared manifest into permission-resolved events.
#[derive(Debug, Clone)]
pub struct EventTransformer {
    resolver: PermissionResolver,
}

impl EventTransformer {
    /// Create a transformer using the given resolver.
    #[must_use]
    pub fn new(resolver: PermissionResolver) -> Self {
        Self { resolver }
    }

    /// Flatten the manifest into one event per declared binding.
    ///
    /// Permission statuses are resolved as one concurrent batch and
    /// re-associated by input position, so output order is exactly
    /// declared order regardless of response arrival.
    pub async fn expand(&self, manifest: &Manifest) -> Vec<TriggerEvent> {
        let bindings: Vec<(&str, &bucketwire_model::BucketTrigger)> = manifest
            .functions
            .iter()
            .flat_map(|f| f.triggers.iter().map(move |t| (f.name.as_str(), t)))
            .collect();

        debug!(bindings = bindings.len(), "resolving permission state");

        let statuses = future::join_all(
            bindings
                .iter()
                .map(|(function, trigger)| self.resolver.resolve(function, &trigger.bucket)),
        )
        .await;

        bindings
            .into_iter()
            .zip(statuses)
            .map(|((function, trigger), status)| TriggerEvent {
                function: function.to_owned(),
                bucket: trigger.bucket.clone(),
                events: trigger.events.clone(),
                rules: trigger.rules.clone(),
                status,
                remove: false,
            })
            .collect()
    }
}

/// Partition events into per-bucket groups.
///
/// Group order is first appearance of each bucket in the input; within a
/// group, input relative order is preserved. Events marked `remove` are
/// excluded entirely; a bucket left with no events produces no group.
#[must_use]
pub fn group_by_bucket(events: Vec<TriggerEvent>) -> Vec<BucketGroup> {
    let mut groups: Vec<BucketGroup> = Vec::new();

    for event in events {
        if event.remove {
            continue;
        }
        match groups.iter_mut().find(|g| g.bucket == event.bucket) {
            Some(group) => group.events.push(event),
            None => groups.push(BucketGroup {
                bucket: event.bucket.clone(),
                events: vec![event],
            }),
        }
    }

    groups
}
