//! tikzmill-core: I/O-independent types and algorithms for extracting
//! standalone tikzpicture documents out of flattened LaTeX sources.
//!
//! This crate owns the pure transformation steps of the pipeline:
//! preamble classification, macro and color resolution, figure/caption
//! scanning, caption cleaning, and document assembly. Reading files and
//! flattening includes live in `tikzmill-flatten`; the `tikzmill` facade
//! ties everything together.

pub mod assemble;
pub mod caption;
pub mod colors;
pub mod error;
pub mod figure;
pub mod macros;
pub mod preamble;

pub use assemble::assemble;
pub use caption::{clean_caption, strip_labels};
pub use colors::{find_colordefs, find_colorlets};
pub use error::{ExtractResult, ExtractWarning, ExtractWarningCode, TexError};
pub use figure::{FigureIter, RawFigure, figures, find_caption};
pub use macros::{Demacro, MacroEngine, MacroError, expand_macros, find_used_definitions};
pub use preamble::{BODY_START, Preamble, classify};
