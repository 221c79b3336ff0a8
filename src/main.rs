use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use fxingest::cli::invoke::{EventOverrides, build_event, invoke};
use fxingest::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Fetch FX rates once and store them in the configured bucket
    Invoke {
        /// JSON event file, or `-` to read the event from stdin
        #[arg(short, long)]
        event: Option<String>,

        /// Base currency, e.g. EUR
        #[arg(long)]
        base: Option<String>,

        /// Comma separated currency codes, e.g. USD,GBP
        #[arg(long)]
        symbols: Option<String>,

        /// `latest` or a calendar date such as 2024-01-15
        #[arg(long)]
        date: Option<String>,

        /// Print the raw invocation result as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => fxingest::cli::setup::setup(),
        Some(Commands::Invoke {
            event,
            base,
            symbols,
            date,
            json,
        }) => {
            let overrides = EventOverrides {
                base,
                symbols,
                date,
            };
            match build_event(event.as_deref(), overrides) {
                Ok(event) => invoke(cli.config_path.as_deref(), event, json).await,
                Err(e) => Err(e),
            }
        }
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Invocation failed");
    }
    result
}
