use std::str::FromStr;

use clap::Args;
use der::{Der, Limits};
use kensa::decoder::Decoder;
use pem::Pem;

use crate::error::Result;
use crate::utils::{format_hex_dump, read_input};

#[derive(Args)]
pub(crate) struct Config {
    /// Path to the input file (DER, or PEM of any label). If not specified, reads from stdin
    file: Option<String>,

    /// Print a hexdump of the bytes instead of the element tree
    #[arg(long)]
    hex: bool,

    /// Maximum nesting depth accepted by the parser
    #[arg(long, default_value_t = der::DEFAULT_MAX_DEPTH)]
    max_depth: usize,
}

// PEM text is unwrapped; anything else is taken as DER.
fn input_bytes(input: Vec<u8>) -> Result<Vec<u8>> {
    match std::str::from_utf8(&input) {
        Ok(text) if text.contains("-----BEGIN") => {
            let pem = Pem::from_str(text)?;
            tracing::debug!(label = %pem.label(), "unwrapped PEM block");
            Ok(pem.decode()?)
        }
        _ => Ok(input),
    }
}

pub(crate) fn execute(config: Config) -> Result<()> {
    let bytes = input_bytes(read_input(config.file.as_deref())?)?;

    if config.hex {
        print!("{}", format_hex_dump(&bytes));
        return Ok(());
    }

    let limits = Limits {
        max_depth: config.max_depth,
        ..Default::default()
    };
    let der = Der::parse_with_limits(&bytes, limits)?;
    print!("{}", der);

    Ok(())
}
