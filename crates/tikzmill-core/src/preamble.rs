//! Preamble classification — split a flattened document's preamble into
//! always-keep imports and candidate macro statements.
//!
//! The classifier first attempts a lenient structural parse that groups a
//! command with its balanced brace/bracket arguments (so multi-line
//! `\newcommand` bodies stay one statement). If that parse fails on
//! malformed input, it falls back to plain line splitting with degraded
//! fidelity, reporting a [`PreambleFallback`](crate::ExtractWarningCode::PreambleFallback)
//! warning.

use crate::error::{ExtractResult, ExtractWarning, ExtractWarningCode};

/// Marker that separates the preamble from the document body.
pub const BODY_START: &str = "\\begin{document}";

/// Patterns whose presence makes a statement always-keep (the diagram
/// library, its sub-libraries, and the document class line).
const KEEP_PATTERNS: [&str; 5] = ["documentclass", "tikz", "tkz", "pgf", "marvosym"];

/// Commonly used packages retained when pulled in via `\usepackage`.
const COMMON_PACKAGES: [&str; 6] = [
    "inputenc", "fontenc", "fontspec", "amsmath", "amssymb", "color",
];

/// Macro-definition prefixes that are never classified as imports; their
/// statements stay in the candidate pool and are resolved per diagram.
const EXCLUDE_PREFIXES: [&str; 2] = ["\\new", "\\renew"];

/// A classified document preamble.
///
/// `imports` and `macros` partition the non-comment preamble statements,
/// each side joined with newlines in document order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Preamble {
    /// Statements the assembler always keeps.
    pub imports: String,
    /// Candidate macro statements, kept per diagram only if referenced.
    pub macros: String,
}

/// Classify the preamble of a flattened document.
///
/// Takes the substring preceding [`BODY_START`] and partitions its
/// statements into [`Preamble::imports`] and [`Preamble::macros`].
/// Pure-comment statements are dropped; everything else lands on exactly
/// one side, decided in sequence order from the statement text alone.
pub fn classify(flattened: &str) -> ExtractResult<Preamble> {
    let preamble = flattened
        .split(BODY_START)
        .next()
        .unwrap_or("");

    let mut warnings = Vec::new();
    let statements = match split_statements(preamble) {
        Ok(statements) => statements,
        Err(err) => {
            tracing::warn!(error = %err, "structural preamble parse failed, splitting on lines");
            warnings.push(ExtractWarning::with_code(
                ExtractWarningCode::PreambleFallback,
                format!("structural preamble parse failed ({err}), splitting on lines"),
            ));
            preamble.lines().map(str::to_string).collect()
        }
    };

    let mut imports = Vec::new();
    let mut macros = Vec::new();
    for stmt in &statements {
        let trimmed = stmt.trim_start();
        if trimmed.starts_with('%') {
            continue;
        }
        let excluded = EXCLUDE_PREFIXES.iter().any(|p| trimmed.starts_with(p));
        let keep = !excluded
            && (KEEP_PATTERNS.iter().any(|p| stmt.contains(p))
                || (trimmed.starts_with("\\usepackage")
                    && COMMON_PACKAGES.iter().any(|p| stmt.contains(p))));
        if keep {
            imports.push(stmt.as_str());
        } else {
            macros.push(stmt.as_str());
        }
    }

    ExtractResult::with_warnings(
        Preamble {
            imports: imports.join("\n").trim().to_string(),
            macros: macros.join("\n").trim().to_string(),
        },
        warnings,
    )
}

/// Failure of the lenient structural statement parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuralError(String);

impl std::fmt::Display for StructuralError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for StructuralError {}

/// Split a preamble into coarse statement units.
///
/// A statement is either a backslash command together with its trailing
/// balanced `{...}`/`[...]` argument groups (possibly spanning lines), or
/// a run of plain text up to the end of its line. An argument group left
/// unterminated at end of input is a [`StructuralError`]; the caller
/// falls back to line splitting.
pub fn split_statements(preamble: &str) -> Result<Vec<String>, StructuralError> {
    let bytes = preamble.as_bytes();
    let mut statements = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        if bytes[pos].is_ascii_whitespace() {
            pos += 1;
            continue;
        }
        let start = pos;
        if bytes[pos] == b'\\' {
            pos += 1;
            // command name: letters (and @ for internal macros), or one symbol
            let name_start = pos;
            while pos < bytes.len() && (bytes[pos].is_ascii_alphabetic() || bytes[pos] == b'@') {
                pos += 1;
            }
            if pos == name_start && pos < bytes.len() {
                pos += 1;
            }
            // trailing argument groups, allowing spaces between them
            loop {
                let mut lookahead = pos;
                while lookahead < bytes.len()
                    && (bytes[lookahead] == b' ' || bytes[lookahead] == b'\t')
                {
                    lookahead += 1;
                }
                match bytes.get(lookahead) {
                    Some(b'{') => pos = consume_group(bytes, lookahead, b'{', b'}')?,
                    Some(b'[') => pos = consume_group(bytes, lookahead, b'[', b']')?,
                    Some(b'*') => pos = lookahead + 1,
                    _ => break,
                }
            }
            statements.push(preamble[start..pos].to_string());
        } else {
            while pos < bytes.len() && bytes[pos] != b'\n' {
                pos += 1;
            }
            let text = preamble[start..pos].trim_end();
            if !text.is_empty() {
                statements.push(text.to_string());
            }
        }
    }

    Ok(statements)
}

/// Consume a balanced delimiter group starting at `open_at`, returning the
/// position just past the closing delimiter. Nesting tracks the opening
/// delimiter only; backslash-escaped delimiters do not count.
fn consume_group(
    bytes: &[u8],
    open_at: usize,
    open: u8,
    close: u8,
) -> Result<usize, StructuralError> {
    let mut depth = 0usize;
    let mut pos = open_at;
    let mut escaped = false;
    while pos < bytes.len() {
        let b = bytes[pos];
        if escaped {
            escaped = false;
        } else if b == b'\\' {
            escaped = true;
        } else if b == open {
            depth += 1;
        } else if b == close {
            depth -= 1;
            if depth == 0 {
                return Ok(pos + 1);
            }
        }
        pos += 1;
    }
    Err(StructuralError(format!(
        "unterminated '{}' group at byte {open_at}",
        open as char
    )))
}
