//! Lambda policy adapter.
//!
//! Implements [`FunctionPolicyApi`] over `GetPolicy` / `AddPermission`.
//!
//! All provider-error classification lives here, in one place. The
//! provider reports both "function does not exist" and "no policy
//! configured" as a resource-not-found condition; they are told apart by
//! a case-insensitive prefix match on the message, which is the only
//! signal the provider gives. The engine never sees raw message text
//! except inside the tagged variants.

use async_trait::async_trait;
use aws_sdk_lambda::error::ProvideErrorMetadata;
use bucketwire_core::provider::{FunctionPolicyApi, PolicyApiError};
use bucketwire_model::{PolicyDocument, PolicyStatement};
use tracing::debug;

/// Message prefix the provider uses when the target function is absent.
const FUNCTION_NOT_FOUND_PREFIX: &str = "function not found";

/// Invoke action granted to the storage service.
const INVOKE_ACTION: &str = "lambda:InvokeFunction";

/// The storage-service principal receiving the grant.
const STORAGE_PRINCIPAL: &str = "s3.amazonaws.com";

/// [`FunctionPolicyApi`] implementation over the AWS Lambda client.
#[derive(Debug, Clone)]
pub struct LambdaPolicyClient {
    client: aws_sdk_lambda::Client,
}

impl LambdaPolicyClient {
    /// Wrap an SDK client.
    #[must_use]
    pub fn new(client: aws_sdk_lambda::Client) -> Self {
        Self { client }
    }
}

/// Resource identifier of a bucket, as used in grant conditions.
#[must_use]
pub fn bucket_arn(bucket_name: &str) -> String {
    format!("arn:aws:s3:::{bucket_name}")
}

/// Split the resource-not-found condition into its two meanings.
fn classify_resource_not_found(message: String) -> PolicyApiError {
    if message
        .trim_start()
        .to_ascii_lowercase()
        .starts_with(FUNCTION_NOT_FOUND_PREFIX)
    {
        PolicyApiError::FunctionNotFound { message }
    } else {
        PolicyApiError::NoSuchResource { message }
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
impl FunctionPolicyApi for LambdaPolicyClient {
    async fn get_policy(
        &self,
        function_name: &str,
    ) -> Result<Option<PolicyDocument>, PolicyApiError> {
        debug!(function = %function_name, "fetching resource policy");

        match self
            .client
            .get_policy()
            .function_name(function_name)
            .send()
            .await
        {
            Ok(output) => match output.policy() {
                None => Ok(None),
                Some(raw) => PolicyDocument::from_json_str(raw).map(Some).map_err(|e| {
                    PolicyApiError::Provider {
                        message: format!("malformed policy document: {e}"),
                    }
                }),
            },
            Err(err) => {
                let service = err.into_service_error();
                let message = service_message(&service);
                if service.is_resource_not_found_exception() {
                    match classify_resource_not_found(message) {
                        // No policy configured yet: an expected state.
                        PolicyApiError::NoSuchResource { .. } => Ok(None),
                        other => Err(other),
                    }
                } else {
                    Err(PolicyApiError::Provider { message })
                }
            }
        }
    }

    async fn add_invoke_permission(
        &self,
        function_name: &str,
        bucket_name: &str,
        statement_id: &str,
    ) -> Result<PolicyStatement, PolicyApiError> {
        debug!(
            function = %function_name,
            bucket = %bucket_name,
            sid = %statement_id,
            "adding invoke permission"
        );

        match self
            .client
            .add_permission()
            .function_name(function_name)
            .action(INVOKE_ACTION)
            .principal(STORAGE_PRINCIPAL)
            .statement_id(statement_id)
            .source_arn(bucket_arn(bucket_name))
            .send()
            .await
        {
            Ok(output) => {
                let raw = output.statement().ok_or_else(|| PolicyApiError::Provider {
                    message: "provider returned no statement for the created permission"
                        .to_owned(),
                })?;
                PolicyStatement::from_json_str(raw).map_err(|e| PolicyApiError::Provider {
                    message: format!("malformed permission statement: {e}"),
                })
            }
            Err(err) => {
                let service = err.into_service_error();
                let message = service_message(&service);
                if service.is_resource_conflict_exception() {
                    Err(PolicyApiError::Conflict { message })
                } else if service.is_resource_not_found_exception() {
                    Err(classify_resource_not_found(message))
                } else {
                    Err(PolicyApiError::Provider { message })
                }
            }
        }
    }
}
