use crate::analyze::{run_analyze, AnalyzeArgs};
use crate::console::{run_console, ConsoleArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use marketmind::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "MarketMind",
    about = "Score leads, draft pitches, and plan outreach from the command line or over HTTP",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Collect leads interactively and submit them to a running service
    Console(ConsoleArgs),
    /// Run a single analysis request from a JSON file and print the result
    Analyze(AnalyzeArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Serve a static frontend from this directory
    #[arg(long)]
    pub(crate) static_dir: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Console(args) => run_console(args).await,
        Command::Analyze(args) => run_analyze(args).await,
    }
}
