//! `create` command implementation.

use std::sync::Arc;

use anyhow::{Context, Result};
use config_loader::ConfigLoader;
use contracts::{RunBlueprint, SinkConfig, SinkKind};
use generators::GeneratorRegistry;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::cli::CreateArgs;
use crate::error::{self, CliError};

/// Execute the `create` command
pub async fn run_create(args: &CreateArgs) -> Result<()> {
    let blueprint = build_blueprint(args).context("Failed to resolve run configuration")?;

    info!(
        template = %blueprint.template.display(),
        limit = blueprint.limit,
        timeout_secs = blueprint.timeout_secs,
        sinks = blueprint.sinks.len(),
        on_field_error = ?blueprint.generation.on_field_error,
        "Configuration resolved"
    );

    // Dry run - just print the resolved configuration and exit
    if args.dry_run {
        info!("Dry run mode - configuration is valid, exiting");
        print_plan(&blueprint)?;
        return Ok(());
    }

    if args.metrics_port != 0 {
        observability::init_metrics_only(args.metrics_port)?;
        info!("Metrics endpoint available on port {}", args.metrics_port);
    }

    let cancel = CancellationToken::new();
    spawn_shutdown_watch(cancel.clone());
    if let Some(timeout) = blueprint.timeout() {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            warn!(timeout_secs = timeout.as_secs(), "Timeout reached, stopping");
            cancel.cancel();
        });
    }

    let registry = Arc::new(GeneratorRegistry::with_builtins());
    let report = emitter::run_blueprint(&blueprint, registry, cancel)
        .await
        .context("Record generation failed")?;

    // Logs and stats go to stderr; stdout may carry records
    eprintln!("\n{}", report);
    if report.dropped() > 0 {
        warn!(dropped = report.dropped(), "Some records were dropped by sinks");
    }

    info!("datagen finished");
    Ok(())
}

/// Merge the optional profile with command-line overrides
pub(crate) fn build_blueprint(args: &CreateArgs) -> error::Result<RunBlueprint> {
    let mut blueprint = match &args.profile {
        Some(profile) => {
            info!(profile = %profile.display(), "Loading run profile");
            ConfigLoader::load_from_path(profile)?
        }
        None => RunBlueprint::new(args.from.clone().ok_or(CliError::MissingTemplate)?),
    };

    if let Some(from) = &args.from {
        blueprint.template = from.clone();
    }
    if let Some(limit) = args.limit {
        blueprint.limit = limit;
    }
    if let Some(timeout) = args.timeout {
        blueprint.timeout_secs = timeout;
    }
    if let Some(policy) = args.on_field_error {
        blueprint.generation.on_field_error = policy.into();
    }
    if let Some(max_retries) = args.max_retries {
        blueprint.retry.max_retries = max_retries;
    }
    if let Some(backoff) = args.retry_backoff_ms {
        blueprint.retry.initial_backoff_ms = backoff;
        blueprint.retry.max_backoff_ms = blueprint.retry.max_backoff_ms.max(backoff);
    }

    let flag_sinks = sinks_from_flags(args)?;
    if !flag_sinks.is_empty() {
        blueprint.sinks = flag_sinks;
    }
    if blueprint.sinks.is_empty() {
        info!("No output selected, writing records to stdout");
        blueprint
            .sinks
            .push(SinkConfig::new("console", SinkKind::Console));
    }

    for sink in &mut blueprint.sinks {
        if let Some(capacity) = args.buffer_size {
            sink.queue_capacity = capacity;
        }
        if let (SinkKind::Queue, Some(brokers)) = (sink.sink_type, &args.brokers) {
            sink.params.insert("brokers".to_string(), brokers.clone());
        }
    }

    ConfigLoader::validate(&blueprint)?;
    Ok(blueprint)
}

fn sinks_from_flags(args: &CreateArgs) -> error::Result<Vec<SinkConfig>> {
    let mut sinks = Vec::new();

    if args.filesystem {
        let mut file = SinkConfig::new("file", SinkKind::File);
        if let Some(output) = &args.output {
            file = file.with_param("path", output.to_string_lossy());
        }
        if args.append {
            file = file.with_param("append", "true");
        }
        sinks.push(file);
    }

    if args.kafka {
        let topic = args
            .topic
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .ok_or(CliError::TopicRequired)?;
        sinks.push(
            SinkConfig::new("kafka", SinkKind::Queue)
                .with_param("topic", topic)
                .with_param("properties", args.kafka_config.to_string_lossy()),
        );
    }

    Ok(sinks)
}

/// Cancel `token` on Ctrl+C or SIGTERM
fn spawn_shutdown_watch(token: CancellationToken) {
    tokio::spawn(async move {
        shutdown_signal().await;
        warn!("Received shutdown signal, stopping generation...");
        token.cancel();
    });
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Print the resolved configuration for dry-run mode
fn print_plan(blueprint: &RunBlueprint) -> Result<()> {
    let toml = ConfigLoader::to_toml(blueprint).context("Failed to render configuration")?;
    println!("\n=== Resolved Configuration ===\n");
    println!("{}", toml);
    Ok(())
}
