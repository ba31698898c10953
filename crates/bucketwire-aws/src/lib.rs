//! AWS SDK adapters for BucketWire.
//!
//! Implements the `bucketwire-core` provider seams on top of
//! `aws-sdk-lambda` and `aws-sdk-s3`. This crate owns everything
//! provider-specific: client construction, ARN formatting, wire-type
//! conversion, and the classification of raw provider errors into the
//! engine's tagged error variants.

pub mod client;
pub mod lambda;
pub mod s3;

pub use client::{AwsClients, connect};
pub use lambda::LambdaPolicyClient;
pub use s3::S3NotificationClient;
