//! Bucket notification configuration model.
//!
//! Mirrors the S3 `GetBucketNotificationConfiguration` /
//! `PutBucketNotificationConfiguration` shapes. The reconciler only ever
//! edits the lambda-function entry list; queue entries, topic entries and
//! the EventBridge flag are carried through verbatim so a write never
//! drops configuration the tool does not manage.
//!
//! Event type lists are kept as raw wire strings rather than the
//! [`ObjectEventType`](crate::ObjectEventType) enum: foreign entries may
//! use event types outside the set this tool can declare, and pass-through
//! must be lossless.

use serde::{Deserialize, Serialize};

use crate::manifest::KeyFilterRule;

/// A bucket's notification configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// Lambda-function notification entries.
    #[serde(rename = "LambdaFunctionConfigurations", default)]
    pub lambda: Vec<LambdaFunctionEntry>,

    /// SQS queue notification entries (pass-through only).
    #[serde(rename = "QueueConfigurations", default)]
    pub queues: Vec<QueueEntry>,

    /// SNS topic notification entries (pass-through only).
    #[serde(rename = "TopicConfigurations", default)]
    pub topics: Vec<TopicEntry>,

    /// Whether EventBridge delivery is enabled (pass-through only).
    #[serde(rename = "EventBridgeEnabled", default)]
    pub event_bridge: bool,
}

impl NotificationConfig {
    /// Returns the lambda entry with the given id, if any.
    #[must_use]
    pub fn lambda_entry(&self, id: &str) -> Option<&LambdaFunctionEntry> {
        self.lambda.iter().find(|e| e.id.as_deref() == Some(id))
    }
}

/// One lambda-function notification entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LambdaFunctionEntry {
    /// Entry id. Entries written by this tool carry a deterministic id;
    /// foreign entries keep whatever id the provider assigned.
    #[serde(rename = "Id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// ARN of the function to invoke.
    #[serde(rename = "LambdaFunctionArn")]
    pub function_arn: String,

    /// Event types routed to the function, as wire strings.
    #[serde(rename = "Events", default)]
    pub events: Vec<String>,

    /// Optional object-key filter.
    #[serde(rename = "Filter", default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<NotificationFilter>,
}

/// Object-key filter of a notification entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotificationFilter {
    /// Prefix/suffix rules; an object must match all of them.
    #[serde(rename = "Key", default)]
    pub rules: Vec<KeyFilterRule>,
}

/// One SQS queue notification entry. Never edited by the reconciler.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueueEntry {
    /// Entry id as assigned by the provider or another tool.
    #[serde(rename = "Id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// ARN of the target queue.
    #[serde(rename = "QueueArn")]
    pub queue_arn: String,

    /// Event types routed to the queue, as wire strings.
    #[serde(rename = "Events", default)]
    pub events: Vec<String>,

    /// Optional object-key filter.
    #[serde(rename = "Filter", default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<NotificationFilter>,
}

/// One SNS topic notification entry. Never edited by the reconciler.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopicEntry {
    /// Entry id as assigned by the provider or another tool.
    #[serde(rename = "Id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// ARN of the target topic.
    #[serde(rename = "TopicArn")]
    pub topic_arn: String,

    /// Event types routed to the topic, as wire strings.
    #[serde(rename = "Events", default)]
    pub events: Vec<String>,

    /// Optional object-key filter.
    #[serde(rename = "Filter", default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<NotificationFilter>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::FilterRuleName;

    fn entry(id: &str, arn: &str) -> LambdaFunctionEntry {
        LambdaFunctionEntry {
            id: Some(id.to_owned()),
            function_arn: arn.to_owned(),
            events: vec!["s3:ObjectCreated:*".to_owned()],
            filter: None,
        }
    }

    #[test]
    fn test_should_find_lambda_entry_by_id() {
        let config = NotificationConfig {
            lambda: vec![entry("a", "arn:a"), entry("b", "arn:b")],
            ..NotificationConfig::default()
        };
        assert_eq!(config.lambda_entry("b").map(|e| e.function_arn.as_str()), Some("arn:b"));
        assert!(config.lambda_entry("c").is_none());
    }

    #[test]
    fn test_should_round_trip_wire_shape() {
        let config = NotificationConfig {
            lambda: vec![LambdaFunctionEntry {
                id: Some("my-id".to_owned()),
                function_arn: "arn:aws:lambda:us-east-1:000000000000:function:fn".to_owned(),
                events: vec!["s3:ObjectCreated:*".to_owned()],
                filter: Some(NotificationFilter {
                    rules: vec![KeyFilterRule {
                        name: FilterRuleName::Prefix,
                        value: "incoming/".to_owned(),
                    }],
                }),
            }],
            ..NotificationConfig::default()
        };

        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains(r#""Id":"my-id""#));
        assert!(json.contains(r#""LambdaFunctionArn""#));

        let back: NotificationConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_should_default_missing_sections() {
        let config: NotificationConfig = serde_json::from_str("{}").unwrap();
        assert!(config.lambda.is_empty());
        assert!(config.queues.is_empty());
        assert!(config.topics.is_empty());
        assert!(!config.event_bridge);
    }

    #[test]
    fn test_should_keep_foreign_event_strings() {
        let raw = r#"{
            "LambdaFunctionConfigurations": [
                {
                    "Id": "someone-elses",
                    "LambdaFunctionArn": "arn:aws:lambda:us-east-1:1:function:x",
                    "Events": ["s3:ObjectTagging:Put"]
                }
            ]
        }"#;
        let config: NotificationConfig = serde_json::from_str(raw).unwrap();
        assert_eq!(config.lambda[0].events, vec!["s3:ObjectTagging:Put"]);
    }
}
