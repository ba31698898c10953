//! BucketWire CLI.
//!
//! Runs one reconciliation of the declared manifest against the
//! configured AWS account: ensures each declared Lambda function grants
//! its source bucket invoke permission, then merges the matching
//! notification entries into each bucket's configuration.
//!
//! # Usage
//!
//! ```text
//! bucketwire [MANIFEST] [--continue-on-error]
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `MANIFEST` | `bucketwire.json` | Manifest path (positional arg wins) |
//! | `CONTINUE_ON_ERROR` | `false` | Skip bindings of undeployed functions instead of aborting |
//! | `DEFAULT_REGION` | `us-east-1` | AWS region |
//! | `ENDPOINT_URL` | *(unset)* | Endpoint override for LocalStack-compatible targets |
//! | `LOG_LEVEL` | `info` | Log level filter |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |
//!
//! Exit code is non-zero on a fatal abort (undeployed function without
//! `--continue-on-error`) and when any binding or bucket recorded an
//! error.

use std::sync::Arc;

use anyhow::{Context, Result};
use bucketwire_aws::connect;
use bucketwire_core::{DeployConfig, Reconciler};
use bucketwire_model::Manifest;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: bucketwire [MANIFEST] [--continue-on-error]";

/// Initialize the tracing subscriber.
///
/// Uses `RUST_LOG` if set, otherwise falls back to the `LOG_LEVEL`
/// config value.
fn init_tracing(log_level: &str) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    Ok(())
}

/// Apply command-line arguments on top of the environment configuration.
///
/// The first non-flag argument overrides the manifest path;
/// `--continue-on-error` forces the flag on.
fn apply_args(config: &mut DeployConfig, args: &[String]) {
    if args.iter().any(|a| a == "--continue-on-error") {
        config.continue_on_error = true;
    }
    if let Some(path) = args.iter().find(|a| !a.starts_with("--")) {
        config.manifest_path = path.clone();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        println!("{USAGE}");
        return Ok(());
    }

    let mut config = DeployConfig::from_env();
    apply_args(&mut config, &args);

    init_tracing(&config.log_level)?;

    let raw = tokio::fs::read_to_string(&config.manifest_path)
        .await
        .with_context(|| format!("cannot read manifest {}", config.manifest_path))?;
    let manifest = Manifest::from_json_str(&raw)
        .with_context(|| format!("invalid manifest {}", config.manifest_path))?;

    info!(
        manifest = %config.manifest_path,
        functions = manifest.functions.len(),
        bindings = manifest.binding_count(),
        continue_on_error = config.continue_on_error,
        "starting reconciliation"
    );

    let clients = connect(&config).await;
    let reconciler = Reconciler::new(
        Arc::new(clients.policy),
        Arc::new(clients.notifications),
        config,
    );

    let summary = reconciler.run(&manifest).await?;

    for binding_error in &summary.errors {
        error!(error = %binding_error, "binding failed");
    }
    info!(
        buckets_updated = summary.buckets_updated,
        permissions_created = summary.permissions_created,
        bindings_skipped = summary.bindings_skipped,
        errors = summary.errors.len(),
        "reconciliation finished"
    );

    if !summary.is_clean() {
        anyhow::bail!(
            "reconciliation finished with {} error(s)",
            summary.errors.len()
        );
    }
    Ok(())
}
