//! End-to-end reconciliation tests.
//!
//! The functions referenced here are deliberately not deployed, which
//! exercises the deployment-ordering guard without needing a Lambda
//! runtime on the test server.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use bucketwire_aws::connect;
    use bucketwire_core::provider::BucketNotificationApi;
    use bucketwire_core::{ReconcileError, Reconciler};
    use bucketwire_model::{LambdaFunctionEntry, Manifest, NotificationConfig};

    use crate::{cleanup_bucket, create_test_bucket, deploy_config, s3_client};

    fn ghost_manifest(bucket: &str) -> Manifest {
        Manifest::from_json_str(&format!(
            r#"{{
                "functions": [
                    {{
                        "name": "bucketwire-ghost-function",
                        "triggers": [{{ "bucket": "{bucket}", "events": ["s3:ObjectCreated:*"] }}]
                    }}
                ]
            }}"#,
        ))
        .expect("manifest")
    }

    async fn seed_foreign_entry(
        api: &bucketwire_aws::S3NotificationClient,
        bucket: &str,
    ) -> NotificationConfig {
        let config = NotificationConfig {
            lambda: vec![LambdaFunctionEntry {
                id: Some("foreign-entry".to_owned()),
                function_arn: "arn:aws:lambda:us-east-1:000000000000:function:foreign".to_owned(),
                events: vec!["s3:ObjectCreated:*".to_owned()],
                filter: None,
            }],
            ..NotificationConfig::default()
        };
        api.put_notification_config(bucket, &config)
            .await
            .expect("seed");
        config
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_abort_without_touching_buckets_when_function_missing() {
        let s3 = s3_client();
        let bucket = create_test_bucket(&s3, "abort").await;

        let config = deploy_config(false);
        let clients = connect(&config).await;
        let seeded = seed_foreign_entry(&clients.notifications, &bucket).await;

        let reconciler = Reconciler::new(
            Arc::new(clients.policy.clone()),
            Arc::new(clients.notifications.clone()),
            config,
        );
        let result = reconciler.run(&ghost_manifest(&bucket)).await;

        assert!(matches!(
            result,
            Err(ReconcileError::FunctionNotDeployed { function }) if function == "bucketwire-ghost-function"
        ));

        // The existing configuration is untouched.
        let after = clients
            .notifications
            .get_notification_config(&bucket)
            .await
            .expect("read");
        assert_eq!(after.lambda, seeded.lambda);

        cleanup_bucket(&s3, &bucket).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_skip_missing_function_with_continue_on_error() {
        let s3 = s3_client();
        let bucket = create_test_bucket(&s3, "skip").await;

        let config = deploy_config(true);
        let clients = connect(&config).await;
        let seeded = seed_foreign_entry(&clients.notifications, &bucket).await;

        let reconciler = Reconciler::new(
            Arc::new(clients.policy.clone()),
            Arc::new(clients.notifications.clone()),
            config,
        );
        let summary = reconciler
            .run(&ghost_manifest(&bucket))
            .await
            .expect("run should continue");

        assert_eq!(summary.bindings_skipped, 1);
        assert_eq!(summary.buckets_updated, 0);
        assert!(summary.is_clean());

        // The bucket group was empty, so nothing was written.
        let after = clients
            .notifications
            .get_notification_config(&bucket)
            .await
            .expect("read");
        assert_eq!(after.lambda, seeded.lambda);

        cleanup_bucket(&s3, &bucket).await;
    }
}
