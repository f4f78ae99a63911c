use anyhow::Context;
use clap::{Parser, Subcommand};

use bookshop_kernel::settings::Settings;

#[derive(Parser)]
#[command(name = "bookshop")]
#[command(about = "Run and inspect the bookshop catalog service")]
struct CliArgs {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the catalog HTTP API until interrupted
    Serve {
        #[arg(long, help = "Override the configured listen port")]
        port: Option<u16>,
    },
    /// Print the resolved configuration
    ShowConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    let mut settings = Settings::load().context("failed to load bookshop settings")?;

    match args.command {
        Command::Serve { port } => {
            if let Some(port) = port {
                settings.server.port = port;
            }
            bookshop_telemetry::init(&settings.telemetry)?;
            tracing::info!(env = ?settings.environment, "bookshop CLI serving");
            bookshop_app::run(settings).await
        }
        Command::ShowConfig => {
            println!("{settings:#?}");
            Ok(())
        }
    }
}
