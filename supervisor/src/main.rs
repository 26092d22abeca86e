use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod handlers;

use cli::{Cli, Commands};
use handlers::CommandContext;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let ctx = CommandContext::new(&cli)?;

    match cli.command {
        Commands::Install => handlers::run_install(&ctx).await,
        Commands::Start => handlers::run_start(&ctx).await,
        Commands::Stop => handlers::run_stop(&ctx).await,
        Commands::Status => handlers::run_status(&ctx).await,
        Commands::Logs { lines } => handlers::run_logs(&ctx, lines).await,
        Commands::Definitions => handlers::run_definitions(&ctx).await,
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(filter)
        .init();
}
