//! Deployment-run configuration.
//!
//! Provides [`DeployConfig`] for configuring a reconciliation run.
//! Values are loaded from environment variables; the CLI may override
//! the manifest path with a positional argument.

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

/// Configuration of a reconciliation run.
///
/// All fields have defaults; [`DeployConfig::from_env`] overrides them
/// from the environment.
///
/// # Examples
///
/// ```
/// use bucketwire_core::DeployConfig;
///
/// let config = DeployConfig::default();
/// assert_eq!(config.manifest_path, "bucketwire.json");
/// assert!(!config.continue_on_error);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct DeployConfig {
    /// Path of the deployment manifest.
    #[builder(default = String::from("bucketwire.json"))]
    pub manifest_path: String,

    /// Downgrade "function not found" from a fatal abort to a per-binding
    /// skip with a warning.
    #[builder(default = false)]
    pub continue_on_error: bool,

    /// Default AWS region for client construction.
    #[builder(default = String::from("us-east-1"))]
    pub default_region: String,

    /// Optional endpoint override for LocalStack-compatible targets.
    #[builder(default)]
    pub endpoint_url: Option<String>,

    /// Log level filter string (e.g. `"info"`, `"debug"`).
    #[builder(default = String::from("info"))]
    pub log_level: String,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            manifest_path: String::from("bucketwire.json"),
            continue_on_error: false,
            default_region: String::from("us-east-1"),
            endpoint_url: None,
            log_level: String::from("info"),
        }
    }
}

impl DeployConfig {
    /// Load configuration from environment variables.
    ///
    /// Reads the following environment variables (falling back to
    /// defaults):
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `MANIFEST` | `bucketwire.json` |
    /// | `CONTINUE_ON_ERROR` | `false` |
    /// | `DEFAULT_REGION` | `us-east-1` |
    /// | `ENDPOINT_URL` | *(unset)* |
    /// | `LOG_LEVEL` | `info` |
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(v) = std::env::var("MANIFEST") {
            config.manifest_path = v;
        }
        if let Ok(v) = std::env::var("CONTINUE_ON_ERROR") {
            config.continue_on_error = parse_bool(&v);
        }
        if let Ok(v) = std::env::var("DEFAULT_REGION") {
            config.default_region = v;
        }
        if let Ok(v) = std::env::var("ENDPOINT_URL") {
            config.endpoint_url = Some(v);
        }
        if let Ok(v) = std::env::var("LOG_LEVEL") {
            config.log_level = v;
        }

        config
    }
}

/// Parse a string as a boolean, accepting `"1"` and `"true"` (case-insensitive).
fn parse_bool(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_create_default_config() {
        let config = DeployConfig::default();
        assert_eq!(config.manifest_path, "bucketwire.json");
        assert!(!config.continue_on_error);
        assert_eq!(config.default_region, "us-east-1");
        assert!(config.endpoint_url.is_none());
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_should_build_with_typed_builder() {
        let config = DeployConfig::builder()
            .manifest_path("deploy/triggers.json".into())
            .continue_on_error(true)
            .default_region("eu-west-1".into())
            .endpoint_url(Some("http://localhost:4566".into()))
            .log_level("debug".into())
            .build();

        assert_eq!(config.manifest_path, "deploy/triggers.json");
        assert!(config.continue_on_error);
        assert_eq!(config.default_region, "eu-west-1");
        assert_eq!(config.endpoint_url.as_deref(), Some("http://localhost:4566"));
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_should_serialize_to_camel_case_json() {
        let config = DeployConfig::default();
        let json = serde_json::to_string(&config).expect("test serialization");
        assert!(json.contains("manifestPath"));
        assert!(json.contains("continueOnError"));
    }

    #[test]
    fn test_should_parse_bool_values() {
        assert!(parse_bool("1"));
        assert!(parse_bool("true"));
        assert!(parse_bool("TRUE"));
        assert!(parse_bool("True"));
        assert!(!parse_bool("0"));
        assert!(!parse_bool("false"));
        assert!(!parse_bool(""));
    }
}
