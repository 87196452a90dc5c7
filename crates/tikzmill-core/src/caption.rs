//! Caption cleaning — turn a raw caption span into a single-line string
//! suitable for pairing with an assembled document.

use crate::error::ExtractResult;
use crate::macros::{MacroEngine, expand_macros};

const LABEL_TOKEN: &str = "\\label";

/// Clean a raw caption: expand macros from `pool` (lossy fallback to the
/// original text on engine failure, carried as a warning in the result),
/// strip `\label{...}` directives, and collapse all whitespace runs to
/// single spaces.
pub fn clean_caption(engine: &dyn MacroEngine, pool: &str, caption: &str) -> ExtractResult<String> {
    let expanded = expand_macros(engine, pool, caption);
    let stripped = strip_labels(&expanded.value);
    ExtractResult::with_warnings(
        stripped.split_whitespace().collect::<Vec<_>>().join(" "),
        expanded.warnings,
    )
}

/// Remove every `\label{...}` occurrence, including its balanced brace
/// group. A `\label` without a following group is left untouched.
pub fn strip_labels(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pos = 0;
    while let Some(found) = text[pos..].find(LABEL_TOKEN) {
        let at = pos + found;
        let after = at + LABEL_TOKEN.len();
        match skip_group(text, after) {
            Some(next) => {
                out.push_str(&text[pos..at]);
                pos = next;
            }
            None => {
                out.push_str(&text[pos..after]);
                pos = after;
            }
        }
    }
    out.push_str(&text[pos..]);
    out
}

/// Skip a balanced `{...}` group starting at `at` (leading spaces
/// allowed), returning the position past the closing brace.
fn skip_group(text: &str, at: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut pos = at;
    while pos < bytes.len() && (bytes[pos] == b' ' || bytes[pos] == b'\t') {
        pos += 1;
    }
    if bytes.get(pos) != Some(&b'{') {
        return None;
    }
    let mut depth = 0usize;
    let mut escaped = false;
    while pos < bytes.len() {
        let b = bytes[pos];
        if escaped {
            escaped = false;
        } else if b == b'\\' {
            escaped = true;
        } else if b == b'{' {
            depth += 1;
        } else if b == b'}' {
            depth -= 1;
            if depth == 0 {
                return Some(pos + 1);
            }
        }
        pos += 1;
    }
    None
}
