pub(crate) mod dump;

use clap::Subcommand;

#[derive(Subcommand)]
pub(crate) enum DerCommands {
    /// Print the tag/length tree of DER data (PEM input is unwrapped first)
    Dump {
        #[command(flatten)]
        config: dump::Config,
    },
}
