use std::io::Write;
use std::path::Path;

use tikzmill::flatten;

use crate::shared::{open_output, report_warnings};

pub fn run(file: &Path, output: Option<&Path>) -> Result<(), i32> {
    let result = flatten(file).map_err(|err| {
        eprintln!("Error flattening {}: {err}", file.display());
        1
    })?;
    report_warnings(&result.warnings);

    let mut out = open_output(output)?;
    out.write_all(result.value.as_bytes()).map_err(|err| {
        eprintln!("Error writing output: {err}");
        1
    })
}
