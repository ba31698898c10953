//! Deployment manifest: the declared "bucket → function" bindings.
//!
//! The manifest is the single input of a reconciliation run. It maps
//! already-deployed Lambda functions to the existing S3 buckets that
//! should invoke them, together with the object event types and optional
//! key filter rules per trigger.
//!
//! Functions are a list, not a map: declared order is preserved exactly,
//! and downstream ordering (event expansion, bucket grouping) is defined
//! in terms of it.
//!
//! # Examples
//!
//! ```
//! use bucketwire_model::Manifest;
//!
//! let manifest = Manifest::from_json_str(
//!     r#"{
//!         "functions": [
//!             {
//!                 "name": "thumbnailer",
//!                 "triggers": [
//!                     {
//!                         "bucket": "photo-uploads",
//!                         "events": ["s3:ObjectCreated:*"],
//!                         "rules": [{ "name": "suffix", "value": ".jpg" }]
//!                     }
//!                 ]
//!             }
//!         ]
//!     }"#,
//! )
//! .unwrap();
//! assert_eq!(manifest.functions.len(), 1);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ManifestError;

/// The declared deployment manifest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Manifest {
    /// Declared functions, in declared order.
    pub functions: Vec<FunctionSpec>,
}

impl Manifest {
    /// Parse and validate a manifest from a JSON string.
    ///
    /// # Errors
    /// Returns [`ManifestError`] if the document is malformed or fails
    /// validation (empty names, triggers without event types).
    pub fn from_json_str(raw: &str) -> Result<Self, ManifestError> {
        let manifest: Self = serde_json::from_str(raw)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Validate the declared bindings.
    ///
    /// # Errors
    /// Returns the first violation found, in declared order.
    pub fn validate(&self) -> Result<(), ManifestError> {
        for function in &self.functions {
            if function.name.is_empty() {
                return Err(ManifestError::EmptyFunctionName);
            }
            for trigger in &function.triggers {
                if trigger.bucket.is_empty() {
                    return Err(ManifestError::EmptyBucketName {
                        function: function.name.clone(),
                    });
                }
                if trigger.events.is_empty() {
                    return Err(ManifestError::NoEventTypes {
                        function: function.name.clone(),
                        bucket: trigger.bucket.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Total number of declared (function, bucket) bindings.
    #[must_use]
    pub fn binding_count(&self) -> usize {
        self.functions.iter().map(|f| f.triggers.len()).sum()
    }
}

/// One declared function and its bucket triggers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionSpec {
    /// The deployed Lambda function name.
    pub name: String,
    /// Triggers for this function, in declared order.
    #[serde(default)]
    pub triggers: Vec<BucketTrigger>,
}

/// One declared bucket trigger for a function.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BucketTrigger {
    /// The existing source bucket.
    pub bucket: String,
    /// Object event types that should invoke the function.
    pub events: Vec<ObjectEventType>,
    /// Optional object-key filter rules (prefix/suffix).
    #[serde(default)]
    pub rules: Vec<KeyFilterRule>,
}

/// S3 object event types that can route to a Lambda function.
///
/// The serde representation carries the exact wire strings
/// (`s3:ObjectCreated:*` etc.); unknown strings are a manifest error,
/// never silently defaulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectEventType {
    /// Any object creation.
    #[serde(rename = "s3:ObjectCreated:*")]
    ObjectCreatedAll,
    /// Object created by PUT.
    #[serde(rename = "s3:ObjectCreated:Put")]
    ObjectCreatedPut,
    /// Object created by POST.
    #[serde(rename = "s3:ObjectCreated:Post")]
    ObjectCreatedPost,
    /// Object created by copy.
    #[serde(rename = "s3:ObjectCreated:Copy")]
    ObjectCreatedCopy,
    /// Object created by completing a multipart upload.
    #[serde(rename = "s3:ObjectCreated:CompleteMultipartUpload")]
    ObjectCreatedCompleteMultipartUpload,
    /// Any object removal.
    #[serde(rename = "s3:ObjectRemoved:*")]
    ObjectRemovedAll,
    /// Object permanently deleted.
    #[serde(rename = "s3:ObjectRemoved:Delete")]
    ObjectRemovedDelete,
    /// Delete marker created on a versioned object.
    #[serde(rename = "s3:ObjectRemoved:DeleteMarkerCreated")]
    ObjectRemovedDeleteMarkerCreated,
    /// Any object restore event.
    #[serde(rename = "s3:ObjectRestore:*")]
    ObjectRestoreAll,
    /// Restore initiated.
    #[serde(rename = "s3:ObjectRestore:Post")]
    ObjectRestorePost,
    /// Restore completed.
    #[serde(rename = "s3:ObjectRestore:Completed")]
    ObjectRestoreCompleted,
    /// Reduced-redundancy object lost.
    #[serde(rename = "s3:ReducedRedundancyLostObject")]
    ReducedRedundancyLostObject,
}

impl ObjectEventType {
    /// Returns the wire string of this event type.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ObjectCreatedAll => "s3:ObjectCreated:*",
            Self::ObjectCreatedPut => "s3:ObjectCreated:Put",
            Self::ObjectCreatedPost => "s3:ObjectCreated:Post",
            Self::ObjectCreatedCopy => "s3:ObjectCreated:Copy",
            Self::ObjectCreatedCompleteMultipartUpload => {
                "s3:ObjectCreated:CompleteMultipartUpload"
            }
            Self::ObjectRemovedAll => "s3:ObjectRemoved:*",
            Self::ObjectRemovedDelete => "s3:ObjectRemoved:Delete",
            Self::ObjectRemovedDeleteMarkerCreated => "s3:ObjectRemoved:DeleteMarkerCreated",
            Self::ObjectRestoreAll => "s3:ObjectRestore:*",
            Self::ObjectRestorePost => "s3:ObjectRestore:Post",
            Self::ObjectRestoreCompleted => "s3:ObjectRestore:Completed",
            Self::ReducedRedundancyLostObject => "s3:ReducedRedundancyLostObject",
        }
    }
}

impl fmt::Display for ObjectEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ObjectEventType {
    type Err = ManifestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "s3:ObjectCreated:*" => Ok(Self::ObjectCreatedAll),
            "s3:ObjectCreated:Put" => Ok(Self::ObjectCreatedPut),
            "s3:ObjectCreated:Post" => Ok(Self::ObjectCreatedPost),
            "s3:ObjectCreated:Copy" => Ok(Self::ObjectCreatedCopy),
            "s3:ObjectCreated:CompleteMultipartUpload" => {
                Ok(Self::ObjectCreatedCompleteMultipartUpload)
            }
            "s3:ObjectRemoved:*" => Ok(Self::ObjectRemovedAll),
            "s3:ObjectRemoved:Delete" => Ok(Self::ObjectRemovedDelete),
            "s3:ObjectRemoved:DeleteMarkerCreated" => Ok(Self::ObjectRemovedDeleteMarkerCreated),
            "s3:ObjectRestore:*" => Ok(Self::ObjectRestoreAll),
            "s3:ObjectRestore:Post" => Ok(Self::ObjectRestorePost),
            "s3:ObjectRestore:Completed" => Ok(Self::ObjectRestoreCompleted),
            "s3:ReducedRedundancyLostObject" => Ok(Self::ReducedRedundancyLostObject),
            _ => Err(ManifestError::UnknownEventType {
                value: s.to_owned(),
            }),
        }
    }
}

/// Which half of an object key a filter rule matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterRuleName {
    /// Match the beginning of the key.
    Prefix,
    /// Match the end of the key.
    Suffix,
}

impl FilterRuleName {
    /// Returns the wire string of this rule name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Prefix => "prefix",
            Self::Suffix => "suffix",
        }
    }
}

impl fmt::Display for FilterRuleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One object-key filter rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyFilterRule {
    /// Prefix or suffix.
    pub name: FilterRuleName,
    /// The value to match.
    pub value: String,
}
