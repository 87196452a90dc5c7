//! Error types for the flattening layer.
//!
//! Uses [`thiserror`] for ergonomic error derivation and converts into
//! the core [`TexError`] for unified handling across the library.

use tikzmill_core::TexError;
use thiserror::Error;

/// Error type for include flattening.
///
/// Only the root document being unreadable, or a detected include cycle,
/// is fatal; a broken include deeper in the tree degrades to a warning
/// and an empty contribution.
#[derive(Debug, Error)]
pub enum FlattenError {
    /// The root document cannot be opened or read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An include directive loops back onto a file already being
    /// flattened.
    #[error("cyclic include through {0}")]
    CyclicInclude(String),
}

impl From<FlattenError> for TexError {
    fn from(err: FlattenError) -> Self {
        match err {
            FlattenError::Io(e) => TexError::IoError(e.to_string()),
            FlattenError::CyclicInclude(path) => {
                TexError::FlattenError(format!("cyclic include through {path}"))
            }
        }
    }
}
