//! Figure scanning — find figure blocks that contain exactly one
//! tikzpicture and a caption, yielding them lazily in document order.
//!
//! Scanning is textual, not brace-aware: a figure block runs from a
//! `\begin{figure}` (or starred) marker to the nearest `\end{figure}`
//! (or starred) marker. Figures with zero or multiple tikzpictures are
//! skipped (sub-figure layouts are out of scope), as are figures without
//! a caption.

const FIGURE_BEGIN: [&str; 2] = ["\\begin{figure}", "\\begin{figure*}"];
const FIGURE_END: [&str; 2] = ["\\end{figure}", "\\end{figure*}"];
const TIKZ_BEGIN: &str = "\\begin{tikzpicture}";
const TIKZ_END: &str = "\\end{tikzpicture}";
const CAPTION_TOKEN: &str = "\\caption{";

/// A qualifying figure: one tikzpicture body plus its raw caption.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFigure<'a> {
    /// The tikzpicture environment, begin marker through end marker.
    pub tikz: &'a str,
    /// The caption text between the balanced braces of `\caption{...}`,
    /// unprocessed.
    pub caption: String,
}

/// Lazy iterator over the qualifying figures of a flattened document.
///
/// Created by [`figures`]. Each call to [`next`](Iterator::next) scans
/// forward from the previous figure block; blocks are non-overlapping and
/// yielded in document order.
pub struct FigureIter<'a> {
    text: &'a str,
    pos: usize,
}

/// Scan `text` for qualifying figures.
pub fn figures(text: &str) -> FigureIter<'_> {
    FigureIter { text, pos: 0 }
}

impl<'a> Iterator for FigureIter<'a> {
    type Item = RawFigure<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((inner, next_pos)) = next_figure_block(self.text, self.pos) {
            self.pos = next_pos;
            if let Some(fig) = qualify(inner) {
                return Some(fig);
            }
        }
        None
    }
}

/// Find the next figure block at or after `from`. Returns the block's
/// inner text and the scan position past its end marker.
fn next_figure_block(text: &str, from: usize) -> Option<(&str, usize)> {
    let (begin_at, begin_len) = earliest(text, from, &FIGURE_BEGIN)?;
    let inner_start = begin_at + begin_len;
    let (end_at, end_len) = earliest(text, inner_start, &FIGURE_END)?;
    Some((&text[inner_start..end_at], end_at + end_len))
}

/// Earliest occurrence of any of `needles` in `text[from..]`, returning
/// its absolute position and length.
fn earliest(text: &str, from: usize, needles: &[&str]) -> Option<(usize, usize)> {
    needles
        .iter()
        .filter_map(|needle| {
            text[from..]
                .find(needle)
                .map(|found| (from + found, needle.len()))
        })
        .min_by_key(|&(at, _)| at)
}

/// Apply the qualification rules to a figure block's inner text.
fn qualify(inner: &str) -> Option<RawFigure<'_>> {
    if inner.matches(TIKZ_BEGIN).count() != 1 {
        return None;
    }
    let begin = inner.find(TIKZ_BEGIN)?;
    let end = inner[begin..].find(TIKZ_END)? + begin + TIKZ_END.len();
    let tikz = &inner[begin..end];
    let caption = find_caption(inner)?;
    Some(RawFigure { tikz, caption })
}

/// Extract the raw caption from a figure block.
///
/// Balanced-brace counting starting after the first `\caption{` token:
/// depth starts at one, each unescaped `{` increments, each unescaped `}`
/// decrements, and the span up to the point depth returns to zero is the
/// caption. Returns `None` for a figure without a caption token or with
/// an empty caption.
pub fn find_caption(figure: &str) -> Option<String> {
    let at = figure.find(CAPTION_TOKEN)?;
    let rest = &figure[at + CAPTION_TOKEN.len()..];

    let mut caption = String::new();
    let mut depth = 1usize;
    let mut escaped = false;
    for c in rest.chars() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == '{' {
            depth += 1;
        } else if c == '}' {
            depth -= 1;
            if depth == 0 {
                break;
            }
        }
        caption.push(c);
    }

    if caption.is_empty() {
        None
    } else {
        Some(caption)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn figure_doc(body: &str) -> String {
        format!("\\begin{{figure}}\n{body}\n\\end{{figure}}")
    }

    #[test]
    fn one_tikzpicture_yields_one_figure() {
        let doc = figure_doc(
            "\\centering\n\\begin{tikzpicture}\\draw (0,0);\\end{tikzpicture}\n\\caption{A plot}",
        );
        let found: Vec<_> = figures(&doc).collect();
        assert_eq!(found.len(), 1);
        assert_eq!(
            found[0].tikz,
            "\\begin{tikzpicture}\\draw (0,0);\\end{tikzpicture}"
        );
        assert_eq!(found[0].caption, "A plot");
    }

    #[test]
    fn two_tikzpictures_yield_nothing() {
        let doc = figure_doc(
            "\\begin{tikzpicture}a\\end{tikzpicture}\n\
             \\begin{tikzpicture}b\\end{tikzpicture}\n\
             \\caption{Sub-figures}",
        );
        assert_eq!(figures(&doc).count(), 0);
    }

    #[test]
    fn zero_tikzpictures_yield_nothing() {
        let doc = figure_doc("\\includegraphics{img.pdf}\n\\caption{An image}");
        assert_eq!(figures(&doc).count(), 0);
    }

    #[test]
    fn captionless_figure_is_skipped() {
        let doc = figure_doc("\\begin{tikzpicture}a\\end{tikzpicture}");
        assert_eq!(figures(&doc).count(), 0);
    }

    #[test]
    fn starred_figure_environment() {
        let doc = "\\begin{figure*}\n\
                   \\begin{tikzpicture}x\\end{tikzpicture}\n\
                   \\caption{Wide}\n\
                   \\end{figure*}";
        let found: Vec<_> = figures(doc).collect();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].caption, "Wide");
    }

    #[test]
    fn multiple_blocks_in_document_order() {
        let doc = format!(
            "{}\ntext between\n{}",
            figure_doc("\\begin{tikzpicture}first\\end{tikzpicture}\\caption{one}"),
            figure_doc("\\begin{tikzpicture}second\\end{tikzpicture}\\caption{two}")
        );
        let captions: Vec<_> = figures(&doc).map(|f| f.caption).collect();
        assert_eq!(captions, vec!["one", "two"]);
    }

    #[test]
    fn tikz_body_ends_at_first_end_marker() {
        let inner = "\\begin{tikzpicture}x\\end{tikzpicture} trailing \\end{tikzpicture}";
        let doc = format!("\\begin{{figure}}{inner}\\caption{{c}}\\end{{figure}}");
        let found: Vec<_> = figures(&doc).collect();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].tikz, "\\begin{tikzpicture}x\\end{tikzpicture}");
    }

    #[test]
    fn balanced_caption_with_nesting() {
        assert_eq!(
            find_caption("\\caption{outer {nested} text}").as_deref(),
            Some("outer {nested} text")
        );
    }

    #[test]
    fn caption_with_escaped_braces() {
        assert_eq!(
            find_caption("\\caption{a \\{literal\\} brace} after").as_deref(),
            Some("a \\{literal\\} brace")
        );
    }

    #[test]
    fn caption_stops_at_first_balance_point() {
        assert_eq!(
            find_caption("\\caption{short}\\label{fig:x}").as_deref(),
            Some("short")
        );
    }

    #[test]
    fn empty_caption_is_none() {
        assert_eq!(find_caption("\\caption{}"), None);
        assert_eq!(find_caption("no caption here"), None);
    }

    #[test]
    fn unclosed_caption_takes_remainder() {
        assert_eq!(
            find_caption("\\caption{never closed").as_deref(),
            Some("never closed")
        );
    }
}
