//! Recursive include flattening.
//!
//! Resolves `\input{...}` and `\import{...}{...}` directives into one
//! linear text stream, stripping comments line by line. Include targets
//! are resolved relative to the ROOT document's directory (arXiv trees
//! are laid out that way), with `.tex` appended when the name carries no
//! extension. A replaced directive line emits a single blank line before
//! the included content.
//!
//! The comment-stripping branches are asymmetric on purpose: lines whose
//! comment is cut keep the `%` itself and gain a newline, and lines with
//! escaped `\%` runs are reassembled chunk by chunk. This matches the
//! convention of the merged files this tool has always produced; do not
//! unify the branches.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use tikzmill_core::{ExtractResult, ExtractWarning, ExtractWarningCode};

use crate::encoding::{DecodeKind, read_text_file};
use crate::error::FlattenError;

static INPUT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\\input\{([^}]+)\}").expect("hard-coded regex"));

static IMPORT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\\import\{([^}]+)\}\{([^}]+)\}").expect("hard-coded regex"));

/// Flatten the document rooted at `root` into one text stream.
///
/// Unreadable includes contribute nothing and surface as
/// [`UnreadableInclude`](ExtractWarningCode::UnreadableInclude) warnings;
/// charset fallbacks surface as
/// [`DecodeFallback`](ExtractWarningCode::DecodeFallback) warnings.
///
/// # Errors
///
/// Returns [`FlattenError::Io`] if the root itself cannot be read, and
/// [`FlattenError::CyclicInclude`] if an include directive loops back
/// onto a file currently being flattened.
pub fn flatten(root: &Path) -> Result<ExtractResult<String>, FlattenError> {
    let base = root.parent().unwrap_or_else(|| Path::new("")).to_path_buf();
    let mut out = String::new();
    let mut warnings = Vec::new();
    let mut stack = Vec::new();
    flatten_into(root, &base, &mut out, &mut warnings, &mut stack, true)?;
    Ok(ExtractResult::with_warnings(out, warnings))
}

fn flatten_into(
    path: &Path,
    base: &Path,
    out: &mut String,
    warnings: &mut Vec<ExtractWarning>,
    stack: &mut Vec<PathBuf>,
    is_root: bool,
) -> Result<(), FlattenError> {
    let identity = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
    if stack.contains(&identity) {
        return Err(FlattenError::CyclicInclude(path.display().to_string()));
    }

    let text = match read_text_file(path) {
        Ok((text, DecodeKind::Fallback)) => {
            tracing::warn!(path = %path.display(), "assumed WINDOWS-1252 after invalid UTF-8");
            warnings.push(ExtractWarning::on_path(
                ExtractWarningCode::DecodeFallback,
                "assumed WINDOWS-1252 after invalid UTF-8",
                path.display().to_string(),
            ));
            text
        }
        Ok((text, _)) => text,
        Err(err) if is_root => return Err(FlattenError::Io(err)),
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "unable to open include");
            warnings.push(ExtractWarning::on_path(
                ExtractWarningCode::UnreadableInclude,
                format!("unable to open include: {err}"),
                path.display().to_string(),
            ));
            return Ok(());
        }
    };

    stack.push(identity);
    for line in text.split_inclusive('\n') {
        let decommented = strip_comment(line);

        if let Some(cap) = INPUT_RE.captures(&decommented) {
            let target = base.join(with_tex_extension(&cap[1]));
            out.push('\n');
            flatten_into(&target, base, out, warnings, stack, false)?;
        } else if let Some(cap) = IMPORT_RE.captures(&decommented) {
            let target = base.join(&cap[1]).join(with_tex_extension(&cap[2]));
            out.push('\n');
            flatten_into(&target, base, out, warnings, stack, false)?;
        } else {
            out.push_str(&decommented);
        }
    }
    stack.pop();
    Ok(())
}

/// Append `.tex` when the include name does not already end with it.
fn with_tex_extension(name: &str) -> String {
    if name.ends_with(".tex") {
        name.to_string()
    } else {
        format!("{name}.tex")
    }
}

/// Strip the comment from one physical line.
///
/// With no escaped `\%` on the line, everything after the first `%` is
/// dropped; the `%` itself stays and the line gains a newline. With an
/// escaped run, the line is reassembled from its `%`-separated chunks:
/// chunks ending in a backslash keep their escaped percent, and the first
/// chunk that does not marks the comment start.
pub fn strip_comment(line: &str) -> String {
    if !line.contains("\\%") {
        match line.find('%') {
            None => line.to_string(),
            Some(at) => format!("{}\n", &line[..=at]),
        }
    } else {
        let mut decommented = String::new();
        for chunk in line.split('%') {
            if chunk.ends_with('\\') {
                decommented.push_str(chunk);
                decommented.push('%');
            } else {
                if chunk.ends_with('\n') {
                    decommented.push_str(chunk);
                } else {
                    decommented.push_str(chunk);
                    decommented.push_str("%\n");
                }
                break;
            }
        }
        decommented
    }
}
