use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod cert;
mod der;
mod error;
mod output;
mod utils;

use error::Result;

use cert::CertCommands;
use der::DerCommands;

#[derive(Parser)]
#[command(name = "kensa")]
#[command(about = "X.509 certificate analyzer", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace). Overrides RUST_LOG
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Certificate operations
    Cert {
        #[command(subcommand)]
        command: CertCommands,
    },
    /// DER encoding operations
    Der {
        #[command(subcommand)]
        command: DerCommands,
    },
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Cert { command } => match command {
            CertCommands::Inspect { config } => {
                cert::inspect::execute(config)?;
            }
        },
        Commands::Der { command } => match command {
            DerCommands::Dump { config } => {
                der::dump::execute(config)?;
            }
        },
    }

    Ok(())
}
