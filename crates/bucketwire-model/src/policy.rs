//! Lambda resource-policy document model.
//!
//! `GetPolicy` returns the policy as a JSON string; `AddPermission`
//! returns the created statement as a JSON string. Both parse into the
//! types here. Fields whose shape varies across policies (principal,
//! action, resource, condition) are kept as opaque JSON values so a
//! single unusual statement cannot fail parsing of the whole document.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A function's resource policy.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PolicyDocument {
    /// Policy language version.
    #[serde(rename = "Version", default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Policy id.
    #[serde(rename = "Id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// The policy statements.
    #[serde(rename = "Statement", default)]
    pub statement: Vec<PolicyStatement>,
}

impl PolicyDocument {
    /// Parse a policy document from the JSON string returned by the
    /// provider.
    ///
    /// # Errors
    /// Returns the underlying serde error if the string is not a policy
    /// document.
    pub fn from_json_str(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}

/// One statement of a resource policy.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PolicyStatement {
    /// Statement id.
    #[serde(rename = "Sid", default, skip_serializing_if = "Option::is_none")]
    pub sid: Option<String>,

    /// Allow / Deny.
    #[serde(rename = "Effect", default, skip_serializing_if = "Option::is_none")]
    pub effect: Option<String>,

    /// Principal; a string or a service map depending on the grant.
    #[serde(rename = "Principal", default, skip_serializing_if = "Option::is_none")]
    pub principal: Option<Value>,

    /// Action; a string or an array of strings.
    #[serde(rename = "Action", default, skip_serializing_if = "Option::is_none")]
    pub action: Option<Value>,

    /// Resource; for invoke grants, the function ARN.
    #[serde(rename = "Resource", default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<Value>,

    /// Condition block, e.g. the source-ARN restriction.
    #[serde(rename = "Condition", default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<Value>,
}

impl PolicyStatement {
    /// The resource as a string, when it is one.
    ///
    /// Invoke-permission statements always carry the function ARN here;
    /// statements with list-shaped resources return `None`.
    #[must_use]
    pub fn resource_str(&self) -> Option<&str> {
        self.resource.as_ref().and_then(Value::as_str)
    }

    /// Parse a single statement from the JSON string returned by
    /// `AddPermission`.
    ///
    /// # Errors
    /// Returns the underlying serde error if the string is not a
    /// statement.
    pub fn from_json_str(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // The shape the provider actually returns for an invoke grant.
    const POLICY: &str = r#"{
        "Version": "2012-10-17",
        "Id": "default",
        "Statement": [
            {
                "Sid": "bucketwire-v1-thumbnailer-photo-uploads",
                "Effect": "Allow",
                "Principal": { "Service": "s3.amazonaws.com" },
                "Action": "lambda:InvokeFunction",
                "Resource": "arn:aws:lambda:us-east-1:000000000000:function:thumbnailer",
                "Condition": {
                    "ArnLike": { "AWS:SourceArn": "arn:aws:s3:::photo-uploads" }
                }
            }
        ]
    }"#;

    #[test]
    fn test_should_parse_provider_policy() {
        let policy = PolicyDocument::from_json_str(POLICY).unwrap();
        assert_eq!(policy.version.as_deref(), Some("2012-10-17"));
        assert_eq!(policy.statement.len(), 1);

        let statement = &policy.statement[0];
        assert_eq!(
            statement.sid.as_deref(),
            Some("bucketwire-v1-thumbnailer-photo-uploads")
        );
        assert_eq!(
            statement.resource_str(),
            Some("arn:aws:lambda:us-east-1:000000000000:function:thumbnailer")
        );
    }

    #[test]
    fn test_should_parse_statement_with_list_resource() {
        let raw = r#"{
            "Sid": "broad",
            "Effect": "Allow",
            "Action": ["lambda:InvokeFunction", "lambda:GetFunction"],
            "Resource": ["arn:one", "arn:two"]
        }"#;
        let statement = PolicyStatement::from_json_str(raw).unwrap();
        assert_eq!(statement.sid.as_deref(), Some("broad"));
        // List-shaped resources are opaque.
        assert!(statement.resource_str().is_none());
    }

    #[test]
    fn test_should_parse_empty_policy() {
        let policy = PolicyDocument::from_json_str(r#"{"Statement": []}"#).unwrap();
        assert!(policy.statement.is_empty());
    }
}
