//! Document assembly — build one minimal standalone document around a
//! single tikzpicture body.

use crate::colors::{find_colordefs, find_colorlets};
use crate::error::ExtractResult;
use crate::macros::{MacroEngine, find_used_definitions};
use crate::preamble::Preamble;

/// Assemble a standalone document for `tikz`.
///
/// The extended preamble is `preamble.imports` followed by optional
/// blocks for `\definecolor` statements, then `\colorlet` statements,
/// then used macro definitions — each block present only if non-empty.
/// Color transitivity: the definecolor pass runs over the kept colorlet
/// text concatenated with the diagram body. A failing macro engine
/// drops the macro block and carries its warning in the result.
pub fn assemble(engine: &dyn MacroEngine, preamble: &Preamble, tikz: &str) -> ExtractResult<String> {
    let macros = find_used_definitions(engine, &preamble.macros, tikz);
    let colorlet = find_colorlets(&preamble.macros, tikz);
    let definecolor = find_colordefs(&preamble.macros, &format!("{colorlet}\n{tikz}"));

    let mut extended = preamble.imports.clone();
    if !definecolor.is_empty() {
        extended.push_str("\n\n");
        extended.push_str(&definecolor);
    }
    if !colorlet.is_empty() {
        extended.push('\n');
        extended.push_str(&colorlet);
    }
    if !macros.value.is_empty() {
        extended.push_str("\n\n");
        extended.push_str(&macros.value);
    }

    let document = [
        extended.as_str(),
        "\\begin{document}",
        tikz,
        "\\end{document}",
    ]
    .join("\n\n");
    ExtractResult::with_warnings(document, macros.warnings)
}
