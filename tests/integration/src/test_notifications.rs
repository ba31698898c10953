//! Notification adapter integration tests.

#[cfg(test)]
mod tests {
    use bucketwire_aws::connect;
    use bucketwire_core::provider::BucketNotificationApi;
    use bucketwire_model::{
        FilterRuleName, KeyFilterRule, LambdaFunctionEntry, NotificationConfig, NotificationFilter,
    };

    use crate::{cleanup_bucket, create_test_bucket, deploy_config, s3_client};

    fn sample_config() -> NotificationConfig {
        NotificationConfig {
            lambda: vec![LambdaFunctionEntry {
                id: Some("integration-entry".to_owned()),
                function_arn: "arn:aws:lambda:us-east-1:000000000000:function:integration"
                    .to_owned(),
                events: vec!["s3:ObjectCreated:*".to_owned()],
                filter: Some(NotificationFilter {
                    rules: vec![KeyFilterRule {
                        name: FilterRuleName::Suffix,
                        value: ".csv".to_owned(),
                    }],
                }),
            }],
            ..NotificationConfig::default()
        }
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_return_empty_config_for_fresh_bucket() {
        let s3 = s3_client();
        let bucket = create_test_bucket(&s3, "fresh").await;
        let api = connect(&deploy_config(false)).await.notifications;

        let config = api.get_notification_config(&bucket).await.expect("read");
        assert!(config.lambda.is_empty());
        assert!(config.queues.is_empty());
        assert!(config.topics.is_empty());

        cleanup_bucket(&s3, &bucket).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_round_trip_notification_config() {
        let s3 = s3_client();
        let bucket = create_test_bucket(&s3, "roundtrip").await;
        let api = connect(&deploy_config(false)).await.notifications;

        let written = sample_config();
        api.put_notification_config(&bucket, &written)
            .await
            .expect("write");

        let read = api.get_notification_config(&bucket).await.expect("read");
        assert_eq!(read.lambda, written.lambda);

        cleanup_bucket(&s3, &bucket).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_overwrite_config_idempotently() {
        let s3 = s3_client();
        let bucket = create_test_bucket(&s3, "idempotent").await;
        let api = connect(&deploy_config(false)).await.notifications;

        let config = sample_config();
        api.put_notification_config(&bucket, &config)
            .await
            .expect("first write");
        api.put_notification_config(&bucket, &config)
            .await
            .expect("second write");

        let read = api.get_notification_config(&bucket).await.expect("read");
        // The same entry once, not duplicated.
        assert_eq!(read.lambda.len(), 1);

        cleanup_bucket(&s3, &bucket).await;
    }
}
