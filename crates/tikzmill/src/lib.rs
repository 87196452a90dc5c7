//! tikzmill: extract standalone, compilable tikzpicture documents with
//! cleaned captions out of arbitrarily large LaTeX source trees.
//!
//! This is the public API facade crate. It re-exports types from
//! tikzmill-core and uses tikzmill-flatten for reading and include
//! resolution.
//!
//! # Architecture
//!
//! - **tikzmill-core**: I/O-independent types and algorithms (preamble
//!   classification, macro/color resolution, figure scanning, assembly)
//! - **tikzmill-flatten**: encoding-aware reading and include flattening
//! - **tikzmill** (this crate): the per-document pipeline and batch
//!   extraction across documents
//!
//! # Example
//!
//! ```ignore
//! use tikzmill::Document;
//!
//! let doc = Document::open("paper/main.tex")?;
//! for figure in doc.figures() {
//!     println!("% {}\n{}", figure.caption, figure.code);
//! }
//! ```

mod batch;
mod document;

pub use batch::{DocumentOutcome, extract_all, extract_file, find_main_file};
pub use document::{Document, Figures, TikzFigure};

pub use tikzmill_core::{
    Demacro, ExtractResult, ExtractWarning, ExtractWarningCode, MacroEngine, MacroError, Preamble,
    TexError,
};
pub use tikzmill_flatten::{FlattenError, flatten};
