#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::doc_markdown,
    clippy::missing_errors_doc,
    clippy::module_name_repetitions,
    clippy::uninlined_format_args
)]

use anyhow::Result;
use clap::{Parser, Subcommand};
use reachy_mini_mcp::debug::{self, DebugOptions};
use reachy_mini_mcp::robot::SimConnector;
use reachy_mini_mcp::server::McpServer;
use reachy_mini_mcp::tools;
use reachy_mini_mcp::vision::SeetaFaceDetector;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{fmt, EnvFilter};

/// MCP server and diagnostics harness for the Reachy Mini desktop robot.
#[derive(Parser, Debug)]
#[command(name = "reachy-mini-mcp")]
#[command(version)]
#[command(about = "MCP server for the Reachy Mini desktop robot", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve MCP over stdio (the default when no subcommand is given)
    Serve,
    /// Run the sequential hardware diagnostics suite
    Debug {
        /// Directory that receives per-run result folders
        #[arg(long, default_value = "results")]
        results_dir: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Protocol traffic owns stdout; logging goes to stderr. Respects
    // RUST_LOG, defaults to INFO.
    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();
    let connector = Arc::new(SimConnector::new());
    let detector = Arc::new(SeetaFaceDetector::from_env());

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            let server = McpServer::new(tools::all_tools(connector, detector));
            server.run_stdio().await
        }
        Commands::Debug { results_dir } => {
            let options = DebugOptions::from_env();
            let code =
                debug::run_debug_suite(&*connector, &*detector, &results_dir, &options).await?;
            std::process::exit(code);
        }
    }
}
