//! Color resolution — find `\colorlet` aliases and `\definecolor`
//! definitions referenced by a diagram body.
//!
//! Two passes: aliases first, then definitions over the concatenation of
//! the kept aliases and the diagram body, so a color that only backs an
//! alias is still retained.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

static COLORLET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\colorlet\{(\w+?)\}\{([^}]+)\}").expect("hard-coded regex"));

static DEFINECOLOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*\\definecolor(?:\[\w+?\])?\{(\w+?)\}\{\w+?\}\{.+?\}")
        .expect("hard-coded regex")
});

static WORD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\w+").expect("hard-coded regex"));

/// The set of maximal word tokens in `text`. Color names are `\w+`
/// captures, so a whole-word match is the same as membership here, and
/// the snippet is scanned once per call instead of once per name.
fn word_set(text: &str) -> HashSet<&str> {
    WORD_RE.find_iter(text).map(|m| m.as_str()).collect()
}

/// Collect `\colorlet` statements from `pool` whose alias name appears as
/// a whole word in `snippet`, newline-joined in pool order.
pub fn find_colorlets(pool: &str, snippet: &str) -> String {
    let words = word_set(snippet);
    let mut kept = Vec::new();
    for cap in COLORLET_RE.captures_iter(pool) {
        let name = cap.get(1).map_or("", |m| m.as_str());
        if words.contains(name) {
            kept.push(cap.get(0).map_or("", |m| m.as_str()).trim_start());
        }
    }
    kept.join("\n").trim().to_string()
}

/// Collect `\definecolor` statements from `pool` whose color name appears
/// as a whole word in `snippet`, newline-joined in pool order.
///
/// Callers wanting alias transitivity pass the colorlet text prepended to
/// the diagram body as `snippet`.
pub fn find_colordefs(pool: &str, snippet: &str) -> String {
    let words = word_set(snippet);
    let mut kept = Vec::new();
    for cap in DEFINECOLOR_RE.captures_iter(pool) {
        let name = cap.get(1).map_or("", |m| m.as_str());
        if words.contains(name) {
            kept.push(cap.get(0).map_or("", |m| m.as_str()).trim_start());
        }
    }
    kept.join("\n").trim().to_string()
}
