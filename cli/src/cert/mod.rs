pub(crate) mod inspect;

use clap::Subcommand;

#[derive(Subcommand)]
pub(crate) enum CertCommands {
    /// Analyze a certificate and display its fields
    Inspect {
        #[command(flatten)]
        config: inspect::Config,
    },
}
