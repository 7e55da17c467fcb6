use crate::console::{run_report, run_roster_check, run_simulate, ReportArgs, RosterArgs, SimulateArgs};
use crate::server;
use callup::error::AppError;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "Call-up Simulator",
    about = "Simulate seat call-ups across the general and quota tracks",
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
    /// Run one simulation and print the verdict for a candidate
    Simulate(SimulateArgs),
    /// Render the call-up list to an HTML, CSV or PDF document
    Report(ReportArgs),
    /// Import the roster and print ingestion diagnostics
    Roster(RosterArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Simulate(args) => run_simulate(args),
        Command::Report(args) => run_report(args),
        Command::Roster(args) => run_roster_check(args),
    }
}
