//! winver
//!
//! Command-line front end for the Windows version helper. Loads a node
//! attribute file written by the fact collector and prints the answers
//! to one or all of the version queries.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use windows_version_helper::{
    Error, HelperConfig, NodeAttributes, Result, VersionHelper, VersionParsePolicy,
};

// =============================================================================
// CLI Arguments
// =============================================================================

/// Query to run against the node
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Query {
    All,
    Core,
    Workstation,
    Server,
    NtVersion,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Classify a Windows node's edition and NT version from its attributes
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Node attribute file (JSON, or YAML with a .yaml/.yml extension)
    #[arg(long, env = "WINVER_NODE")]
    node: PathBuf,

    /// Query to run
    #[arg(long, value_enum, default_value = "all")]
    query: Query,

    /// Fail on platform versions that are not a plain number
    #[arg(long, env = "WINVER_STRICT_VERSION")]
    strict_version: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    output: OutputFormat,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "warn")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long, env = "LOG_JSON")]
    log_json: bool,
}

// =============================================================================
// Main
// =============================================================================

fn main() -> ExitCode {
    let args = Args::parse();

    init_logging(&args);

    match run(&args) {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(node = %args.node.display(), "Query failed: {}", e);
            eprintln!("{}", e);
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

fn run(args: &Args) -> Result<String> {
    let version_policy = if args.strict_version {
        VersionParsePolicy::Strict
    } else {
        VersionParsePolicy::Lenient
    };
    let helper = VersionHelper::with_config(HelperConfig { version_policy });

    if !args.node.is_file() {
        return Err(Error::Configuration(format!(
            "node attribute file not found: {}",
            args.node.display()
        )));
    }

    let node = NodeAttributes::load(&args.node)?;
    info!(node = %args.node.display(), query = ?args.query, "Running query");

    let value = match args.query {
        Query::All => {
            let classification = helper.classify(&node)?;
            return match args.output {
                OutputFormat::Json => Ok(serde_json::to_string_pretty(&classification)?),
                OutputFormat::Text => Ok(format!(
                    "core: {}\ncore_sku: {}\nworkstation: {}\nserver: {}\nproduct_type: {}\nnt_version: {}",
                    classification.core,
                    classification
                        .core_sku
                        .map(|sku| sku.to_string())
                        .unwrap_or_else(|| "none".to_string()),
                    classification.workstation,
                    classification.server,
                    classification.product_type,
                    classification.nt_version,
                )),
            };
        }
        Query::Core => serde_json::Value::from(helper.is_core_version(&node)?),
        Query::Workstation => serde_json::Value::from(helper.is_workstation_version(&node)?),
        Query::Server => serde_json::Value::from(helper.is_server_version(&node)?),
        Query::NtVersion => serde_json::Value::from(helper.nt_version(&node)?),
    };

    match args.output {
        OutputFormat::Json => Ok(serde_json::to_string(&value)?),
        OutputFormat::Text => Ok(value.to_string()),
    }
}

// =============================================================================
// Logging Setup
// =============================================================================

fn init_logging(args: &Args) {
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    // Logs go to stderr so stdout only carries query results
    if args.log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    }
}
