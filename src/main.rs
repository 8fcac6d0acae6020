//! accesslens — access-governance auditing via pluggable providers
//!
//! Usage:
//!   accesslens scan --provider-dir ./provider        → discover + persist resources
//!   accesslens analyze --provider-dir ./provider     → discover + graph + reachability
//!   accesslens version                               → show version

mod analyze;
mod scan;
mod store;

use accesslens_core::config::InspectorConfig;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "accesslens",
    about = "Discover cloud identities and answer: what can this identity reach?",
    version = env!("CARGO_PKG_VERSION")
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to a config file (default: accesslens.json if present)
    #[arg(long, global = true, default_value = "accesslens.json")]
    config: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Discover all resources and persist them for later querying
    Scan {
        /// Directory containing the provider implementation
        #[arg(long)]
        provider_dir: PathBuf,
        /// Command launched per provider invocation
        #[arg(long)]
        command: Option<String>,
        /// Directory for the persisted resource report
        #[arg(long)]
        output: Option<PathBuf>,
        /// Cap on total discovery tasks (default: unbounded)
        #[arg(long)]
        task_limit: Option<usize>,
    },
    /// Discover resources, build the relationship graph, and analyze
    /// per-principal reachability
    Analyze {
        /// Directory containing the provider implementation
        #[arg(long)]
        provider_dir: PathBuf,
        /// Command launched per provider invocation
        #[arg(long)]
        command: Option<String>,
        /// Where to write the DOT serialization of the graph
        #[arg(long)]
        dot: Option<PathBuf>,
        /// Resource type treated as the analysis entry point
        #[arg(long)]
        principal_type: Option<String>,
        /// Cap on total discovery tasks (default: unbounded)
        #[arg(long)]
        task_limit: Option<usize>,
    },
    /// Show version
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = InspectorConfig::load(&cli.config)?;

    match cli.command {
        Commands::Scan {
            provider_dir,
            command,
            output,
            task_limit,
        } => {
            scan::run(&config, provider_dir, command, output, task_limit).await?;
        }
        Commands::Analyze {
            provider_dir,
            command,
            dot,
            principal_type,
            task_limit,
        } => {
            analyze::run(&config, provider_dir, command, dot, principal_type, task_limit).await?;
        }
        Commands::Version => {
            println!("accesslens v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "accesslens=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
