//! AWS client construction.

use aws_config::{BehaviorVersion, Region};
use bucketwire_core::DeployConfig;
use tracing::info;

use crate::lambda::LambdaPolicyClient;
use crate::s3::S3NotificationClient;

/// The two provider clients a reconciliation run needs.
#[derive(Debug, Clone)]
pub struct AwsClients {
    /// Lambda policy adapter.
    pub policy: LambdaPolicyClient,
    /// S3 notification adapter.
    pub notifications: S3NotificationClient,
}

/// Build the AWS clients from the shared environment configuration.
///
/// Credentials and additional settings come from the standard AWS
/// environment/profile chain. An `endpoint_url` in the config points
/// both clients at a LocalStack-compatible target; path-style S3
/// addressing is enabled in that case.
pub async fn connect(config: &DeployConfig) -> AwsClients {
    let mut loader = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(config.default_region.clone()));
    if let Some(url) = &config.endpoint_url {
        info!(endpoint = %url, "using endpoint override");
        loader = loader.endpoint_url(url);
    }
    let shared = loader.load().await;

    let s3_config = aws_sdk_s3::config::Builder::from(&shared)
        .force_path_style(config.endpoint_url.is_some())
        .build();

    AwsClients {
        policy: LambdaPolicyClient::new(aws_sdk_lambda::Client::new(&shared)),
        notifications: S3NotificationClient::new(aws_sdk_s3::Client::from_conf(s3_config)),
    }
}
