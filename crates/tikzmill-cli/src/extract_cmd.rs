use std::io::Write;
use std::path::Path;

use tikzmill::Document;

use crate::cli::OutputFormat;
use crate::record::{Record, write_record};
use crate::shared::{open_output, report_warnings};

pub fn run(
    file: &Path,
    format: &OutputFormat,
    id: Option<&str>,
    output: Option<&Path>,
) -> Result<(), i32> {
    let doc = Document::open(file).map_err(|err| {
        eprintln!("Error opening {}: {err}", file.display());
        1
    })?;
    report_warnings(doc.warnings());

    let id = id
        .map(str::to_string)
        .unwrap_or_else(|| default_id(file));
    let mut out = open_output(output)?;
    let mut count = 0usize;

    let mut figures = doc.figures();
    for figure in figures.by_ref() {
        count += 1;
        let written = match format {
            OutputFormat::Text => writeln!(
                out,
                "--- Figure {count} ---\n% {}\n{}",
                figure.caption, figure.code
            ),
            OutputFormat::Jsonl => write_record(&mut out, &Record::new(&id, &figure)),
        };
        written.map_err(|err| {
            eprintln!("Error writing output: {err}");
            1
        })?;
    }
    report_warnings(figures.warnings());

    eprintln!("Extracted {count} figure(s) from {}", file.display());
    Ok(())
}

/// Identifier used when `--id` is absent: the root file's stem.
fn default_id(file: &Path) -> String {
    file.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.display().to_string())
}
