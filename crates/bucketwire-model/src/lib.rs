//! Data model for BucketWire.
//!
//! This crate holds the plain data types exchanged between the
//! reconciliation engine, the AWS adapters, and the CLI:
//!
//! - the deployment manifest (declared functions and their bucket
//!   triggers),
//! - the bucket notification configuration as read from / written to S3,
//! - the Lambda resource-policy document as returned by `GetPolicy`.
//!
//! All types are serde-derived and perform no I/O.

pub mod error;
pub mod manifest;
pub mod notification;
pub mod policy;

pub use error::ManifestError;
pub use manifest::{BucketTrigger, FilterRuleName, FunctionSpec, KeyFilterRule, Manifest, ObjectEventType};
pub use notification::{LambdaFunctionEntry, NotificationConfig, NotificationFilter, QueueEntry, TopicEntry};
pub use policy::{PolicyDocument, PolicyStatement};
