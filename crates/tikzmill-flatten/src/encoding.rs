//! Best-effort byte-to-text decoding for LaTeX sources.
//!
//! arXiv source trees mix UTF-8 with legacy single-byte encodings, often
//! within one document tree. Decoding order: a byte-order mark wins,
//! then strict UTF-8, then WINDOWS-1252 as the lossless single-byte
//! fallback. The fallback never fails, so every readable file decodes to
//! something; callers learn about the guess through the returned flag.

use std::io;
use std::path::Path;

use encoding_rs::{Encoding, WINDOWS_1252};

/// How a file's bytes were decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeKind {
    /// A byte-order mark identified the encoding.
    Bom,
    /// The bytes were valid UTF-8.
    Utf8,
    /// Assumed WINDOWS-1252 after UTF-8 validation failed.
    Fallback,
}

/// Decode raw bytes into text, reporting how the encoding was chosen.
pub fn decode_bytes(bytes: &[u8]) -> (String, DecodeKind) {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        let (text, _, _) = encoding.decode(&bytes[bom_len..]);
        return (text.into_owned(), DecodeKind::Bom);
    }
    match std::str::from_utf8(bytes) {
        Ok(text) => (text.to_string(), DecodeKind::Utf8),
        Err(_) => {
            let (text, _, _) = WINDOWS_1252.decode(bytes);
            (text.into_owned(), DecodeKind::Fallback)
        }
    }
}

/// Read a file and decode it best-effort.
///
/// # Errors
///
/// Returns the underlying [`io::Error`] if the file cannot be read;
/// decoding itself never fails.
pub fn read_text_file(path: &Path) -> io::Result<(String, DecodeKind)> {
    let bytes = std::fs::read(path)?;
    Ok(decode_bytes(&bytes))
}
