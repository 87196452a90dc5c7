use std::path::{Path, PathBuf};

use tikzmill::{extract_all, find_main_file};

use crate::record::{Record, write_record};
use crate::shared::{open_output, report_warnings};

pub fn run(dir: &Path, output: &Path) -> Result<(), i32> {
    let entries = subject_dirs(dir).map_err(|err| {
        eprintln!("Error reading {}: {err}", dir.display());
        1
    })?;

    // discover one main file per identifier subdirectory
    let mut ids = Vec::new();
    let mut mains = Vec::new();
    for subdir in entries {
        let id = subdir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        match find_main_file(&subdir) {
            Ok(Some(main)) => {
                ids.push(id);
                mains.push(main);
            }
            Ok(None) => eprintln!("{id}: no file with a documentclass, skipping"),
            Err(err) => eprintln!("{id}: {err}, skipping"),
        }
    }

    let outcomes = extract_all(&mains);

    let mut out = open_output(Some(output))?;
    let mut figures = 0usize;
    let mut rejected = 0usize;
    for (id, outcome) in ids.iter().zip(&outcomes) {
        report_warnings(&outcome.warnings);
        match &outcome.result {
            Ok(extracted) => {
                for figure in extracted {
                    write_record(&mut out, &Record::new(id, figure)).map_err(|err| {
                        eprintln!("Error writing {}: {err}", output.display());
                        1
                    })?;
                    figures += 1;
                }
            }
            Err(err) => {
                rejected += 1;
                eprintln!("{id}: {err}");
            }
        }
    }

    eprintln!(
        "Wrote {figures} record(s) from {} document(s) ({rejected} rejected) to {}",
        ids.len(),
        output.display()
    );
    Ok(())
}

/// Immediate subdirectories of the dataset directory, sorted by name.
fn subject_dirs(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut dirs = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            dirs.push(path);
        }
    }
    dirs.sort();
    Ok(dirs)
}
