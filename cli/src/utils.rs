use std::fmt::Write;
use std::fs;
use std::io::{self, Read};

use crate::error::Result;

const BYTES_PER_LINE: usize = 16;

/// Reads the whole file at `file`, or stdin when no path is given.
pub(crate) fn read_input(file: Option<&str>) -> Result<Vec<u8>> {
    match file {
        Some(path) => Ok(fs::read(path)?),
        None => {
            let mut buffer = Vec::new();
            io::stdin().read_to_end(&mut buffer)?;
            tracing::debug!(size = buffer.len(), "read stdin");
            Ok(buffer)
        }
    }
}

/// `xxd`-style dump: offset, 16 hex bytes split in two groups, then ASCII.
pub(crate) fn format_hex_dump(data: &[u8]) -> String {
    let mut output = String::new();

    for (line, chunk) in data.chunks(BYTES_PER_LINE).enumerate() {
        let mut hex = String::new();
        for (i, byte) in chunk.iter().enumerate() {
            if i == BYTES_PER_LINE / 2 {
                hex.push(' ');
            }
            let _ = write!(hex, "{:02x} ", byte);
        }
        let ascii = chunk
            .iter()
            .map(|&b| {
                if b.is_ascii_graphic() || b == b' ' {
                    b as char
                } else {
                    '.'
                }
            })
            .collect::<String>();
        // 3 columns per byte plus the group separator
        let _ = writeln!(
            output,
            "{:08x}  {:<width$} |{}|",
            line * BYTES_PER_LINE,
            hex,
            ascii,
            width = BYTES_PER_LINE * 3 + 1
        );
    }

    output
}
