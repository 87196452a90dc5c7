//! Macro resolution — find user-defined macro definitions referenced by a
//! snippet, and expand references in-place.
//!
//! The resolution entry points ([`find_used_definitions`],
//! [`expand_macros`]) wrap a pluggable [`MacroEngine`] and never fail:
//! an engine error degrades to an empty definition list or the original
//! unexpanded snippet, reported as a
//! [`MacroEngineFailure`](crate::ExtractWarningCode::MacroEngineFailure)
//! warning. A built-in engine ([`Demacro`]) handles the `\newcommand`
//! family and `\def` with positional arguments.

use std::fmt;

use regex::Regex;

use crate::error::{ExtractResult, ExtractWarning, ExtractWarningCode};

/// Error raised by a [`MacroEngine`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MacroError {
    /// The macro pool or snippet could not be parsed.
    Parse(String),
    /// Expansion did not reach a fixed point within the depth guard
    /// (mutually recursive or self-referential definitions).
    RecursionLimit,
    /// Any other engine failure.
    Other(String),
}

impl fmt::Display for MacroError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MacroError::Parse(msg) => write!(f, "macro parse error: {msg}"),
            MacroError::RecursionLimit => write!(f, "macro expansion recursion limit reached"),
            MacroError::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for MacroError {}

/// A macro-expansion engine.
///
/// `pool` is the candidate-macro side of a classified preamble; `snippet`
/// is a diagram body or caption. Implementations may fail freely — the
/// wrapper functions absorb every error.
pub trait MacroEngine {
    /// Return the definition statements from `pool` that are referenced
    /// inside `snippet`, in pool order.
    fn find_used(&self, pool: &str, snippet: &str) -> Result<Vec<String>, MacroError>;

    /// Return `snippet` with every referenced macro substituted by its
    /// expansion, recursively, up to an internal depth guard.
    fn expand(&self, pool: &str, snippet: &str) -> Result<String, MacroError>;
}

/// Find used macro definitions, degrading to an empty string on engine
/// failure (reported as a [`MacroEngineFailure`](ExtractWarningCode::MacroEngineFailure)
/// warning). Definitions are blank-line separated, in pool order.
pub fn find_used_definitions(
    engine: &dyn MacroEngine,
    pool: &str,
    snippet: &str,
) -> ExtractResult<String> {
    match engine.find_used(pool, snippet) {
        Ok(definitions) => ExtractResult::new(definitions.join("\n\n").trim().to_string()),
        Err(err) => {
            tracing::warn!(error = %err, "macro definition lookup failed, keeping no definitions");
            ExtractResult::with_warnings(
                String::new(),
                vec![ExtractWarning::with_code(
                    ExtractWarningCode::MacroEngineFailure,
                    format!("definition lookup failed ({err}), keeping no definitions"),
                )],
            )
        }
    }
}

/// Expand macro references, degrading to the original snippet on engine
/// failure (reported as a [`MacroEngineFailure`](ExtractWarningCode::MacroEngineFailure)
/// warning).
pub fn expand_macros(engine: &dyn MacroEngine, pool: &str, snippet: &str) -> ExtractResult<String> {
    match engine.expand(pool, snippet) {
        Ok(expanded) => ExtractResult::new(expanded),
        Err(err) => {
            tracing::warn!(error = %err, "macro expansion failed, keeping the text unexpanded");
            ExtractResult::with_warnings(
                snippet.to_string(),
                vec![ExtractWarning::with_code(
                    ExtractWarningCode::MacroEngineFailure,
                    format!("expansion failed ({err}), keeping the text unexpanded"),
                )],
            )
        }
    }
}

/// A parsed macro definition.
#[derive(Debug, Clone)]
struct MacroDef {
    /// Macro name without the leading backslash.
    name: String,
    /// Number of positional arguments (`#1` .. `#n`).
    n_args: usize,
    /// Default for the first argument, if declared as optional.
    default: Option<String>,
    /// Replacement text.
    body: String,
    /// The definition statement as written in the pool.
    source: String,
}

/// Built-in macro engine.
///
/// Understands `\newcommand`, `\renewcommand`, `\providecommand` (with
/// optional star, `[n]` arity, and `[default]`) and simple
/// `\def\name#1...{body}` definitions. Expansion substitutes positional
/// arguments and repeats until a fixed point, bounded by `max_depth`.
#[derive(Debug, Clone)]
pub struct Demacro {
    max_depth: usize,
}

impl Default for Demacro {
    fn default() -> Self {
        Self { max_depth: 64 }
    }
}

impl Demacro {
    /// Create an engine with a custom expansion depth guard.
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self { max_depth }
    }

    fn parse_pool(&self, pool: &str) -> Result<Vec<MacroDef>, MacroError> {
        let mut defs = Vec::new();
        let bytes = pool.as_bytes();
        let mut pos = 0;
        while pos < bytes.len() {
            let rest = &pool[pos..];
            if let Some(command) = ["\\newcommand", "\\renewcommand", "\\providecommand"]
                .iter()
                .find(|c| rest.starts_with(**c))
            {
                let start = pos;
                pos += command.len();
                if bytes.get(pos) == Some(&b'*') {
                    pos += 1;
                }
                match parse_newcommand(pool, &mut pos) {
                    Some(mut def) => {
                        def.source = pool[start..pos].to_string();
                        defs.push(def);
                    }
                    None => {
                        return Err(MacroError::Parse(format!(
                            "malformed {command} at byte {start}"
                        )));
                    }
                }
            } else if rest.starts_with("\\def\\") {
                let start = pos;
                pos += "\\def".len();
                match parse_def(pool, &mut pos) {
                    Some(mut def) => {
                        def.source = pool[start..pos].to_string();
                        defs.push(def);
                    }
                    None => {
                        return Err(MacroError::Parse(format!("malformed \\def at byte {start}")));
                    }
                }
            } else {
                pos += rest.chars().next().map_or(1, char::len_utf8);
            }
        }
        Ok(defs)
    }
}

impl MacroEngine for Demacro {
    fn find_used(&self, pool: &str, snippet: &str) -> Result<Vec<String>, MacroError> {
        let defs = self.parse_pool(pool)?;
        Ok(defs
            .into_iter()
            .filter(|def| references(snippet, &def.name))
            .map(|def| def.source)
            .collect())
    }

    fn expand(&self, pool: &str, snippet: &str) -> Result<String, MacroError> {
        let defs = self.parse_pool(pool)?;
        if defs.is_empty() {
            return Ok(snippet.to_string());
        }
        let mut text = snippet.to_string();
        for _ in 0..self.max_depth {
            let mut changed = false;
            for def in &defs {
                let next = substitute(&text, def);
                if next != text {
                    text = next;
                    changed = true;
                }
            }
            if !changed {
                return Ok(text);
            }
        }
        Err(MacroError::RecursionLimit)
    }
}

/// Whether `snippet` references `\name` as a whole control word.
fn references(snippet: &str, name: &str) -> bool {
    if name.chars().all(|c| c.is_ascii_alphabetic() || c == '@') {
        let pattern = format!(r"\\{}([^a-zA-Z@]|$)", regex::escape(name));
        Regex::new(&pattern).is_ok_and(|re| re.is_match(snippet))
    } else {
        snippet.contains(&format!("\\{name}"))
    }
}

/// Replace each reference to `def` in `text` with its body, consuming and
/// substituting positional arguments.
fn substitute(text: &str, def: &MacroDef) -> String {
    let token = format!("\\{}", def.name);
    let mut out = String::with_capacity(text.len());
    let mut pos = 0;
    while let Some(found) = text[pos..].find(&token) {
        let at = pos + found;
        let after = at + token.len();
        // a control word must not continue with more letters
        let boundary = text[after..]
            .chars()
            .next()
            .is_none_or(|c| !(c.is_ascii_alphabetic() || c == '@'));
        if !boundary {
            out.push_str(&text[pos..after]);
            pos = after;
            continue;
        }
        let mut cursor = after;
        let mut args: Vec<String> = Vec::new();
        if def.n_args > 0 {
            let mut remaining = def.n_args;
            if let Some(default) = &def.default {
                match read_group(text, cursor, '[', ']') {
                    Some((value, next)) => {
                        args.push(value);
                        cursor = next;
                    }
                    None => args.push(default.clone()),
                }
                remaining -= 1;
            }
            for _ in 0..remaining {
                match read_group(text, cursor, '{', '}') {
                    Some((value, next)) => {
                        args.push(value);
                        cursor = next;
                    }
                    None => {
                        // reference without its arguments: leave it alone
                        out.push_str(&text[pos..after]);
                        pos = after;
                        cursor = after;
                        args.clear();
                        break;
                    }
                }
            }
            if args.len() < def.n_args {
                pos = cursor;
                continue;
            }
        } else if text[cursor..].starts_with("{}") {
            // \foo{} — the empty group only guards the control word
            cursor += 2;
        }
        out.push_str(&text[pos..at]);
        out.push_str(&apply_args(&def.body, &args));
        pos = cursor;
    }
    out.push_str(&text[pos..]);
    out
}

/// Substitute `#1` .. `#n` in a macro body.
fn apply_args(body: &str, args: &[String]) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '#' {
            if let Some(d) = chars.peek().and_then(|c| c.to_digit(10)) {
                chars.next();
                if let Some(arg) = args.get(d as usize - 1) {
                    out.push_str(arg);
                }
                continue;
            }
        }
        out.push(c);
    }
    out
}

/// Read a balanced delimiter group starting at `at` (skipping leading
/// spaces), returning its inner text and the position past the closer.
fn read_group(text: &str, at: usize, open: char, close: char) -> Option<(String, usize)> {
    let bytes = text.as_bytes();
    let mut pos = at;
    while pos < bytes.len() && (bytes[pos] == b' ' || bytes[pos] == b'\t') {
        pos += 1;
    }
    if bytes.get(pos) != Some(&(open as u8)) {
        return None;
    }
    let inner_start = pos + 1;
    let mut depth = 1usize;
    let mut escaped = false;
    pos += 1;
    while pos < bytes.len() {
        let b = bytes[pos];
        if escaped {
            escaped = false;
        } else if b == b'\\' {
            escaped = true;
        } else if b == open as u8 {
            depth += 1;
        } else if b == close as u8 {
            depth -= 1;
            if depth == 0 {
                return Some((text[inner_start..pos].to_string(), pos + 1));
            }
        }
        pos += 1;
    }
    None
}

/// Parse the tail of a `\newcommand`-family definition at `pos` (just past
/// the command word and optional star).
fn parse_newcommand(pool: &str, pos: &mut usize) -> Option<MacroDef> {
    let bytes = pool.as_bytes();
    // name: {\name} or bare \name
    let name = if bytes.get(*pos) == Some(&b'{') {
        let (inner, next) = read_group(pool, *pos, '{', '}')?;
        *pos = next;
        inner.strip_prefix('\\')?.to_string()
    } else if bytes.get(*pos) == Some(&b'\\') {
        let start = *pos + 1;
        let mut end = start;
        while end < bytes.len() && (bytes[end].is_ascii_alphabetic() || bytes[end] == b'@') {
            end += 1;
        }
        if end == start {
            return None;
        }
        *pos = end;
        pool[start..end].to_string()
    } else {
        return None;
    };

    let mut n_args = 0;
    let mut default = None;
    if let Some((arity, next)) = read_group(pool, *pos, '[', ']') {
        n_args = arity.trim().parse().ok()?;
        *pos = next;
        if let Some((value, next)) = read_group(pool, *pos, '[', ']') {
            default = Some(value);
            *pos = next;
        }
    }

    let (body, next) = read_group(pool, *pos, '{', '}')?;
    *pos = next;
    Some(MacroDef {
        name,
        n_args,
        default,
        body,
        source: String::new(),
    })
}

/// Parse the tail of a `\def\name<params>{body}` definition at `pos`
/// (just past `\def`).
fn parse_def(pool: &str, pos: &mut usize) -> Option<MacroDef> {
    let bytes = pool.as_bytes();
    if bytes.get(*pos) != Some(&b'\\') {
        return None;
    }
    let start = *pos + 1;
    let mut end = start;
    while end < bytes.len() && (bytes[end].is_ascii_alphabetic() || bytes[end] == b'@') {
        end += 1;
    }
    if end == start {
        return None;
    }
    let name = pool[start..end].to_string();
    *pos = end;

    // parameter text: count #n markers up to the body brace
    let mut n_args = 0;
    while *pos < bytes.len() && bytes[*pos] != b'{' {
        if bytes[*pos] == b'#' {
            n_args += 1;
        }
        if bytes[*pos] == b'\n' {
            return None;
        }
        *pos += 1;
    }
    let (body, next) = read_group(pool, *pos, '{', '}')?;
    *pos = next;
    Some(MacroDef {
        name,
        n_args,
        default: None,
        body,
        source: String::new(),
    })
}
