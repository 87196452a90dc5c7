//! Helpers shared by the subcommand modules.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use tikzmill::ExtractWarning;

/// Open the output sink: a file when `--output` was given, stdout
/// otherwise.
pub fn open_output(output: Option<&Path>) -> Result<Box<dyn Write>, i32> {
    match output {
        Some(path) => match File::create(path) {
            Ok(file) => Ok(Box::new(file)),
            Err(err) => {
                eprintln!("Error creating {}: {err}", path.display());
                Err(1)
            }
        },
        None => Ok(Box::new(io::stdout())),
    }
}

/// Print collected warnings to stderr, one per line.
pub fn report_warnings(warnings: &[ExtractWarning]) {
    for warning in warnings {
        eprintln!("warning: {warning}");
    }
}
