//! Model-level error types.

/// Error raised while loading or validating a deployment manifest.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    /// A declared function has an empty name.
    #[error("declared function has an empty name")]
    EmptyFunctionName,

    /// A trigger references an empty bucket name.
    #[error("function {function} declares a trigger with an empty bucket name")]
    EmptyBucketName {
        /// The function declaring the offending trigger.
        function: String,
    },

    /// A trigger declares no event types.
    #[error("function {function} declares no event types for bucket {bucket}")]
    NoEventTypes {
        /// The function declaring the offending trigger.
        function: String,
        /// The bucket of the offending trigger.
        bucket: String,
    },

    /// An event type string is not a known S3 object event.
    #[error("unknown S3 object event type: {value}")]
    UnknownEventType {
        /// The unrecognized event type string.
        value: String,
    },

    /// The manifest document is not valid JSON for the expected shape.
    #[error("malformed manifest: {0}")]
    Json(#[from] serde_json::Error),
}
