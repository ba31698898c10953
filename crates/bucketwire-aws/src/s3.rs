//! S3 notification adapter.
//!
//! Implements [`BucketNotificationApi`] over
//! `GetBucketNotificationConfiguration` /
//! `PutBucketNotificationConfiguration`, converting between the SDK's
//! wire types and the engine's model. Conversions are lossless for the
//! sections the engine passes through (queues, topics, EventBridge,
//! foreign lambda entries with event types outside the declarable set).

use async_trait::async_trait;
use aws_sdk_s3::error::ProvideErrorMetadata;
use aws_sdk_s3::operation::get_bucket_notification_configuration::GetBucketNotificationConfigurationOutput;
use aws_sdk_s3::types as sdk;
use bucketwire_core::provider::{BucketNotificationApi, NotificationApiError};
use bucketwire_model::{
    FilterRuleName, KeyFilterRule, LambdaFunctionEntry, NotificationConfig, NotificationFilter,
    QueueEntry, TopicEntry,
};
use tracing::debug;

/// [`BucketNotificationApi`] implementation over the AWS S3 client.
#[derive(Debug, Clone)]
pub struct S3NotificationClient {
    client: aws_sdk_s3::Client,
}

impl S3NotificationClient {
    /// Wrap an SDK client.
    #[must_use]
    pub fn new(client: aws_sdk_s3::Client) -> Self {
        Self { client }
    }
}

/// Best raw message for a service error: the provider message when there
/// is one, the error's own rendering otherwise.
fn service_message<E>(service: &E) -> String
where
    E: ProvideErrorMetadata + std::fmt::Display,
{
    service
        .meta()
        .message()
        .map_or_else(|| service.to_string(), ToOwned::to_owned)
}

#[async_trait]
impl BucketNotificationApi for S3NotificationClient {
    async fn get_notification_config(
        &self,
        bucket_name: &str,
    ) -> Result<NotificationConfig, NotificationApiError> {
        debug!(bucket = %bucket_name, "reading notification configuration");

        let output = self
            .client
            .get_bucket_notification_configuration()
            .bucket(bucket_name)
            .send()
            .await
            .map_err(|err| {
                let service = err.into_service_error();
                NotificationApiError::new(service_message(&service))
            })?;

        Ok(config_from_output(&output))
    }

    async fn put_notification_config(
        &self,
        bucket_name: &str,
        config: &NotificationConfig,
    ) -> Result<(), NotificationApiError> {
        debug!(
            bucket = %bucket_name,
            lambda_entries = config.lambda.len(),
            "writing notification configuration"
        );

        let sdk_config = config_to_sdk(config)?;
        self.client
            .put_bucket_notification_configuration()
            .bucket(bucket_name)
            .notification_configuration(sdk_config)
            .send()
            .await
            .map_err(|err| {
                let service = err.into_service_error();
                NotificationApiError::new(service_message(&service))
            })?;

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// SDK <-> model conversion
// ---------------------------------------------------------------------------

fn config_from_output(output: &GetBucketNotificationConfigurationOutput) -> NotificationConfig {
    NotificationConfig {
        lambda: output
            .lambda_function_configurations()
            .iter()
            .map(|entry| LambdaFunctionEntry {
                id: entry.id().map(ToOwned::to_owned),
                function_arn: entry.lambda_function_arn().to_owned(),
                events: events_from_sdk(entry.events()),
                filter: entry.filter().and_then(filter_from_sdk),
            })
            .collect(),
        queues: output
            .queue_configurations()
            .iter()
            .map(|entry| QueueEntry {
                id: entry.id().map(ToOwned::to_owned),
                queue_arn: entry.queue_arn().to_owned(),
                events: events_from_sdk(entry.events()),
                filter: entry.filter().and_then(filter_from_sdk),
            })
            .collect(),
        topics: output
            .topic_configurations()
            .iter()
            .map(|entry| TopicEntry {
                id: entry.id().map(ToOwned::to_owned),
                topic_arn: entry.topic_arn().to_owned(),
                events: events_from_sdk(entry.events()),
                filter: entry.filter().and_then(filter_from_sdk),
            })
            .collect(),
        event_bridge: output.event_bridge_configuration().is_some(),
    }
}

fn config_to_sdk(
    config: &NotificationConfig,
) -> Result<sdk::NotificationConfiguration, NotificationApiError> {
    let lambda = config
        .lambda
        .iter()
        .map(|entry| {
            sdk::LambdaFunctionConfiguration::builder()
                .set_id(entry.id.clone())
                .lambda_function_arn(&entry.function_arn)
                .set_events(Some(events_to_sdk(&entry.events)))
                .set_filter(entry.filter.as_ref().map(filter_to_sdk))
                .build()
                .map_err(|e| {
                    NotificationApiError::new(format!("invalid lambda notification entry: {e}"))
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let queues = config
        .queues
        .iter()
        .map(|entry| {
            sdk::QueueConfiguration::builder()
                .set_id(entry.id.clone())
                .queue_arn(&entry.queue_arn)
                .set_events(Some(events_to_sdk(&entry.events)))
                .set_filter(entry.filter.as_ref().map(filter_to_sdk))
                .build()
                .map_err(|e| {
                    NotificationApiError::new(format!("invalid queue notification entry: {e}"))
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let topics = config
        .topics
        .iter()
        .map(|entry| {
            sdk::TopicConfiguration::builder()
                .set_id(entry.id.clone())
                .topic_arn(&entry.topic_arn)
                .set_events(Some(events_to_sdk(&entry.events)))
                .set_filter(entry.filter.as_ref().map(filter_to_sdk))
                .build()
                .map_err(|e| {
                    NotificationApiError::new(format!("invalid topic notification entry: {e}"))
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(sdk::NotificationConfiguration::builder()
        .set_lambda_function_configurations(Some(lambda))
        .set_queue_configurations(Some(queues))
        .set_topic_configurations(Some(topics))
        .set_event_bridge_configuration(
            config
                .event_bridge
                .then(|| sdk::EventBridgeConfiguration::builder().build()),
        )
        .build())
}

fn events_from_sdk(events: &[sdk::Event]) -> Vec<String> {
    events.iter().map(|e| e.as_str().to_owned()).collect()
}

fn events_to_sdk(events: &[String]) -> Vec<sdk::Event> {
    events.iter().map(|e| sdk::Event::from(e.as_str())).collect()
}

fn filter_from_sdk(filter: &sdk::NotificationConfigurationFilter) -> Option<NotificationFilter> {
    let rules: Vec<KeyFilterRule> = filter
        .key()
        .map(sdk::S3KeyFilter::filter_rules)
        .unwrap_or_default()
        .iter()
        .filter_map(|rule| {
            let name = match rule.name()?.as_str() {
                "prefix" => FilterRuleName::Prefix,
                "suffix" => FilterRuleName::Suffix,
                _ => return None,
            };
            Some(KeyFilterRule {
                name,
                value: rule.value()?.to_owned(),
            })
        })
        .collect();

    if rules.is_empty() {
        None
    } else {
        Some(NotificationFilter { rules })
    }
}

fn filter_to_sdk(filter: &NotificationFilter) -> sdk::NotificationConfigurationFilter {
    let rules = filter
        .rules
        .iter()
        .map(|rule| {
            sdk::FilterRule::builder()
                .name(sdk::FilterRuleName::from(rule.name.as_str()))
                .value(&rule.value)
                .build()
        })
        .collect();

    sdk::NotificationConfigurationFilter::builder()
        .key(sdk::S3KeyFilter::builder().set_filter_rules(Some(rules)).build())
        .build()
}
