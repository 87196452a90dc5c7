//! Top-level document type for opening a LaTeX source tree and
//! extracting its tikzpicture figures.

use std::path::Path;

use tikzmill_core::{
    Demacro, ExtractWarning, MacroEngine, Preamble, RawFigure, TexError, assemble, classify,
    clean_caption, figures,
};
use tikzmill_flatten::flatten;

/// Structural markers every processable document must carry.
const REQUIRED_MARKERS: [&str; 3] = [
    "\\documentclass",
    "\\begin{document}",
    "\\end{document}",
];

/// A final output unit: one standalone compilable document plus its
/// cleaned caption.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TikzFigure {
    /// A complete standalone document: class line, required imports,
    /// macro/color definitions, and the tikzpicture body.
    pub code: String,
    /// Whitespace-normalized, label-stripped, macro-expanded caption.
    pub caption: String,
}

/// A LaTeX document opened for figure extraction.
///
/// Opening flattens the include tree, verifies the structural markers,
/// and classifies the preamble once; [`figures()`](Document::figures)
/// then yields each qualifying figure lazily.
///
/// # Example
///
/// ```ignore
/// let doc = Document::open("paper/main.tex")?;
/// for figure in doc.figures() {
///     println!("{}", figure.caption);
/// }
/// ```
pub struct Document {
    text: String,
    preamble: Preamble,
    warnings: Vec<ExtractWarning>,
    engine: Box<dyn MacroEngine>,
}

impl Document {
    /// Open the document rooted at `path` using the built-in macro
    /// engine.
    ///
    /// # Errors
    ///
    /// Returns [`TexError::IoError`] if the root cannot be read,
    /// [`TexError::FlattenError`] on a cyclic include graph, and
    /// [`TexError::MissingStructure`] when a required marker is absent
    /// from the flattened text.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, TexError> {
        Self::open_with_engine(path, Box::new(Demacro::default()))
    }

    /// Open the document with a caller-supplied macro engine.
    pub fn open_with_engine(
        path: impl AsRef<Path>,
        engine: Box<dyn MacroEngine>,
    ) -> Result<Self, TexError> {
        let flattened = flatten(path.as_ref()).map_err(TexError::from)?;
        let mut warnings = flattened.warnings;
        let text = flattened.value.trim().to_string();

        for marker in REQUIRED_MARKERS {
            if !text.contains(marker) {
                return Err(TexError::MissingStructure(marker.to_string()));
            }
        }

        let classified = classify(&text);
        warnings.extend(classified.warnings);

        Ok(Self {
            text,
            preamble: classified.value,
            warnings,
            engine,
        })
    }

    /// The flattened, comment-stripped document text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The classified preamble.
    pub fn preamble(&self) -> &Preamble {
        &self.preamble
    }

    /// Warnings collected while flattening and classifying.
    pub fn warnings(&self) -> &[ExtractWarning] {
        &self.warnings
    }

    /// Iterate over the document's qualifying figures in document order.
    ///
    /// Each yielded [`TikzFigure`] is assembled independently against the
    /// classified preamble. Non-fatal assembly issues (a failing macro
    /// engine) accumulate on the iterator, tagged with the figure index;
    /// see [`Figures::warnings`].
    pub fn figures(&self) -> Figures<'_> {
        Figures {
            inner: figures(&self.text),
            doc: self,
            index: 0,
            warnings: Vec::new(),
        }
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("text_len", &self.text.len())
            .field("warnings", &self.warnings.len())
            .finish_non_exhaustive()
    }
}

/// Iterator over a document's figures, assembling each on demand.
///
/// Created by [`Document::figures()`]. Figures are not retained after
/// being yielded — the caller owns each [`TikzFigure`] value.
pub struct Figures<'a> {
    inner: tikzmill_core::FigureIter<'a>,
    doc: &'a Document,
    index: usize,
    warnings: Vec<ExtractWarning>,
}

impl Figures<'_> {
    /// Warnings raised while assembling the figures yielded so far,
    /// each tagged with its zero-based figure index in document order.
    pub fn warnings(&self) -> &[ExtractWarning] {
        &self.warnings
    }
}

impl Iterator for Figures<'_> {
    type Item = TikzFigure;

    fn next(&mut self) -> Option<Self::Item> {
        let RawFigure { tikz, caption } = self.inner.next()?;
        let doc = self.doc;
        let code = assemble(doc.engine.as_ref(), &doc.preamble, tikz);
        let caption = clean_caption(doc.engine.as_ref(), &doc.preamble.macros, &caption);
        let index = self.index;
        self.index += 1;
        self.warnings.extend(
            code.warnings
                .into_iter()
                .chain(caption.warnings)
                .map(|w| w.on_figure(index)),
        );
        Some(TikzFigure {
            code: code.value,
            caption: caption.value,
        })
    }
}
