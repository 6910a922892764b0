//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use contracts::FieldErrorPolicy;

/// datagen - synthetic JSON records from `fake:{...}` templates
#[derive(Parser, Debug)]
#[command(
    name = "datagen",
    author,
    version,
    about = "Synthetic record generator",
    long_about = "Generates JSON records from a template whose `fake:{...}` fields are \n\
                  replaced by generated values, and streams them to a file, a Kafka \n\
                  topic or stdout."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "DATAGEN_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "DATAGEN_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate records from a template
    Create(CreateArgs),

    /// Check a template without generating records
    Validate(ValidateArgs),

    /// List the available generators
    Generators(GeneratorsArgs),
}

/// Arguments for the `create` command
#[derive(Parser, Debug, Clone, Default)]
pub struct CreateArgs {
    /// Path to the JSON template
    #[arg(long, env = "DATAGEN_TEMPLATE")]
    pub from: Option<PathBuf>,

    /// Write records to a local file
    #[arg(long)]
    pub filesystem: bool,

    /// Output file for --filesystem
    #[arg(long, requires = "filesystem", env = "DATAGEN_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Append to the output file instead of truncating it
    #[arg(long, requires = "filesystem")]
    pub append: bool,

    /// Produce records to a Kafka topic
    #[arg(long, requires = "topic")]
    pub kafka: bool,

    /// Kafka topic for --kafka
    #[arg(long, requires = "kafka", env = "DATAGEN_TOPIC")]
    pub topic: Option<String>,

    /// Broker properties file (`key=value` lines)
    #[arg(long, default_value = "./conf/kafka.properties", env = "DATAGEN_KAFKA_CONFIG")]
    pub kafka_config: PathBuf,

    /// Override `bootstrap.servers`
    #[arg(long, env = "KAFKA_BROKERS")]
    pub brokers: Option<String>,

    /// Number of records (0 = 1000, or unbounded with --kafka)
    #[arg(long, env = "DATAGEN_LIMIT")]
    pub limit: Option<u64>,

    /// Stop after this many seconds (0 = no timeout)
    #[arg(long, env = "DATAGEN_TIMEOUT")]
    pub timeout: Option<u64>,

    /// What a field becomes when its directive cannot be generated
    #[arg(long, value_enum, env = "DATAGEN_ON_FIELD_ERROR")]
    pub on_field_error: Option<FieldErrorArg>,

    /// Retries per failed sink write
    #[arg(long, env = "DATAGEN_MAX_RETRIES")]
    pub max_retries: Option<u32>,

    /// Initial retry backoff in milliseconds
    #[arg(long, env = "DATAGEN_RETRY_BACKOFF_MS")]
    pub retry_backoff_ms: Option<u64>,

    /// Per-sink queue capacity
    #[arg(long, env = "DATAGEN_BUFFER_SIZE")]
    pub buffer_size: Option<usize>,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "0", env = "DATAGEN_METRICS_PORT")]
    pub metrics_port: u16,

    /// Run profile (TOML or JSON); flags override its values
    #[arg(long, env = "DATAGEN_PROFILE")]
    pub profile: Option<PathBuf>,

    /// Resolve the configuration, print it and exit
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to the JSON template
    #[arg(long, env = "DATAGEN_TEMPLATE")]
    pub from: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `generators` command
#[derive(Parser, Debug)]
pub struct GeneratorsArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Field error policy
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldErrorArg {
    /// Field becomes null
    Null,
    /// Field keeps the directive text
    Literal,
    /// Run fails
    Abort,
}

impl From<FieldErrorArg> for FieldErrorPolicy {
    fn from(arg: FieldErrorArg) -> Self {
        match arg {
            FieldErrorArg::Null => Self::Null,
            FieldErrorArg::Literal => Self::Literal,
            FieldErrorArg::Abort => Self::Abort,
        }
    }
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => Self::Json,
            LogFormat::Pretty => Self::Pretty,
            LogFormat::Compact => Self::Compact,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_create() {
        let cli = Cli::try_parse_from([
            "datagen",
            "create",
            "--from",
            "t.json",
            "--kafka",
            "--topic",
            "users",
            "--limit",
            "5",
        ])
        .unwrap();
        let Commands::Create(args) = cli.command else {
            panic!("expected create");
        };
        assert!(args.kafka);
        assert_eq!(args.topic.as_deref(), Some("users"));
        assert_eq!(args.limit, Some(5));
        assert!(!args.filesystem);
    }

    #[test]
    fn test_kafka_and_topic_required_together() {
        assert!(Cli::try_parse_from(["datagen", "create", "--from", "t.json", "--kafka"]).is_err());
        assert!(
            Cli::try_parse_from(["datagen", "create", "--from", "t.json", "--topic", "x"]).is_err()
        );
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["datagen", "-q", "-v", "generators"]).is_err());
    }
}
