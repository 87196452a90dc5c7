//! Batch extraction across independent documents.
//!
//! Each document's pipeline run is a pure, self-contained transformation,
//! so batches parallelize across documents with no shared state. With the
//! `parallel` feature the batch runs on the rayon thread pool; without it
//! the same code runs sequentially.

use std::io;
use std::path::{Path, PathBuf};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use tikzmill_core::{ExtractWarning, TexError};

use crate::document::{Document, TikzFigure};

/// Everything one document's pipeline run produced.
#[derive(Debug)]
pub struct DocumentOutcome {
    /// Path of the root document.
    pub path: PathBuf,
    /// The extracted figures, or the fatal error that rejected the
    /// document.
    pub result: Result<Vec<TikzFigure>, TexError>,
    /// Non-fatal warnings collected along the way.
    pub warnings: Vec<ExtractWarning>,
}

/// Run the full pipeline for one root document.
pub fn extract_file(path: &Path) -> DocumentOutcome {
    match Document::open(path) {
        Ok(doc) => {
            let mut iter = doc.figures();
            let figures: Vec<TikzFigure> = iter.by_ref().collect();
            tracing::debug!(path = %path.display(), figures = figures.len(), "document extracted");
            let mut warnings = doc.warnings().to_vec();
            warnings.extend(iter.warnings().iter().cloned());
            DocumentOutcome {
                path: path.to_path_buf(),
                warnings,
                result: Ok(figures),
            }
        }
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "document rejected");
            DocumentOutcome {
                path: path.to_path_buf(),
                result: Err(err),
                warnings: Vec::new(),
            }
        }
    }
}

/// Run the pipeline for every path, one outcome per document.
///
/// Document failures land in their outcome instead of aborting the
/// batch; ordering of the returned outcomes matches the input.
pub fn extract_all(paths: &[PathBuf]) -> Vec<DocumentOutcome> {
    #[cfg(feature = "parallel")]
    {
        paths.par_iter().map(|p| extract_file(p)).collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        paths.iter().map(|p| extract_file(p)).collect()
    }
}

/// Find the main file of an extracted source directory: the first `*.tex`
/// file (lexicographic walk) whose content mentions `documentclass`.
/// Previously merged outputs (`*_merged.tex`) are skipped.
///
/// # Errors
///
/// Returns the underlying [`io::Error`] if `dir` cannot be walked;
/// unreadable candidate files are skipped.
pub fn find_main_file(dir: &Path) -> io::Result<Option<PathBuf>> {
    let mut candidates = Vec::new();
    collect_tex_files(dir, &mut candidates)?;
    candidates.sort();
    for path in candidates {
        if let Ok((text, _)) = tikzmill_flatten::read_text_file(&path) {
            if text.contains("documentclass") {
                return Ok(Some(path));
            }
        }
    }
    Ok(None)
}

fn collect_tex_files(dir: &Path, out: &mut Vec<PathBuf>) -> io::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_tex_files(&path, out)?;
        } else if path.extension().is_some_and(|e| e == "tex")
            && !path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with("_merged.tex"))
        {
            out.push(path);
        }
    }
    Ok(())
}
