//! tikzmill-flatten: encoding-aware reading and recursive include
//! flattening for tikzmill-rs.
//!
//! Turns a root LaTeX document plus everything reachable through
//! `\input`/`\import` directives into one linear, comment-stripped text
//! stream, tolerating broken includes and legacy charsets along the way.

pub mod encoding;
pub mod error;
pub mod flatten;

pub use encoding::{DecodeKind, decode_bytes, read_text_file};
pub use error::FlattenError;
pub use flatten::{flatten, strip_comment};
