//! Notification-configuration merge.
//!
//! The merge is the only place bucket state is computed, and it is pure:
//! given the bucket's current configuration and the surviving events of
//! one group, it produces the configuration to write back.
//!
//! Ownership rule: an entry belongs to this tool iff its id comes from
//! the deterministic statement-id scheme. The merge replaces exactly the
//! entries whose ids it is about to write and passes every other entry
//! through unchanged — foreign entries, stale entries from previous runs
//! whose bindings are no longer declared (pruning is disabled), and the
//! queue/topic/EventBridge sections in their entirety.

use std::collections::HashSet;

use bucketwire_model::{KeyFilterRule, LambdaFunctionEntry, NotificationConfig, NotificationFilter};

use crate::permissions::statement_id;
use crate::transform::BucketGroup;

/// Merge a bucket group into the bucket's current configuration.
///
/// Events without a known function ARN are skipped; the orchestrator has
/// already recorded them as failed bindings by the time merge runs.
#[must_use]
pub fn merge_notifications(
    current: &NotificationConfig,
    group: &BucketGroup,
) -> NotificationConfig {
    let owned_ids: HashSet<String> = group
        .events
        .iter()
        .map(|e| statement_id(&e.function, &e.bucket))
        .collect();

    let mut merged = current.clone();
    merged
        .lambda
        .retain(|entry| entry.id.as_deref().is_none_or(|id| !owned_ids.contains(id)));

    for event in &group.events {
        let Some(arn) = event.function_arn() else {
            continue;
        };
        merged.lambda.push(LambdaFunctionEntry {
            id: Some(statement_id(&event.function, &event.bucket)),
            function_arn: arn.to_owned(),
            events: event.events.iter().map(|e| e.as_str().to_owned()).collect(),
            filter: filter_from_rules(&event.rules),
        });
    }

    merged
}

/// Build the notification filter for a set of declared key rules.
fn filter_from_rules(rules: &[KeyFilterRule]) -> Option<NotificationFilter> {
    if rules.is_empty() {
        None
    } else {
        Some(NotificationFilter {
            rules: rules.to_vec(),
        })
    }
}
