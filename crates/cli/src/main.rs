//! # datagen CLI
//!
//! 命令行接口入口点。
//!
//! 提供：
//! - 模板校验与生成器列表
//! - 记录生成与分发
//! - 优雅关闭处理

mod cli;
mod commands;
mod error;

use anyhow::Result;
use clap::Parser;
use observability::ObservabilityConfig;
use tracing::info;

use cli::{Cli, Commands};
use commands::{run_create, run_generators, run_validate};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Initialize logging based on CLI options
    init_logging(&cli)?;

    info!(version = env!("CARGO_PKG_VERSION"), "datagen starting");

    // Execute command
    let result = match &cli.command {
        Commands::Create(args) => run_create(args).await,
        Commands::Validate(args) => run_validate(args),
        Commands::Generators(args) => run_generators(args),
    };

    if let Err(ref e) = result {
        tracing::error!(error = %e, "Command failed");
    }

    result
}

/// Initialize logging based on CLI options
fn init_logging(cli: &Cli) -> Result<()> {
    let default_log_level = if cli.quiet {
        "warn"
    } else {
        match cli.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    observability::init_with_config(ObservabilityConfig {
        log_format: cli.log_format.into(),
        metrics_port: None,
        default_log_level: default_log_level.to_string(),
        respect_env: !cli.quiet,
    })
}
