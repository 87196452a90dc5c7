//! Error and warning types for tikzmill-rs.
//!
//! Provides [`TexError`] for fatal errors that reject a document,
//! [`ExtractWarning`] for non-fatal issues that allow best-effort
//! continuation, and [`ExtractResult`] for pairing a value with the
//! warnings collected while producing it.

use std::fmt;

/// Fatal error types for document processing.
///
/// These errors reject the current document; processing of other
/// documents is unaffected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TexError {
    /// I/O error reading the root document.
    IoError(String),
    /// Error during include flattening (e.g. a cyclic include graph).
    FlattenError(String),
    /// A required structural marker (`\documentclass`, `\begin{document}`,
    /// `\end{document}`) is absent from the flattened document.
    MissingStructure(String),
    /// Any other error not covered by specific variants.
    Other(String),
}

impl fmt::Display for TexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TexError::IoError(msg) => write!(f, "I/O error: {msg}"),
            TexError::FlattenError(msg) => write!(f, "flatten error: {msg}"),
            TexError::MissingStructure(marker) => {
                write!(f, "missing structural marker: {marker}")
            }
            TexError::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for TexError {}

impl From<std::io::Error> for TexError {
    fn from(err: std::io::Error) -> Self {
        TexError::IoError(err.to_string())
    }
}

/// Machine-readable warning code for categorizing extraction issues.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "type", content = "detail")
)]
pub enum ExtractWarningCode {
    /// An include target could not be opened or read.
    UnreadableInclude,
    /// A file's bytes were not valid UTF-8 and a legacy charset was assumed.
    DecodeFallback,
    /// The structural preamble parse failed and line splitting was used.
    PreambleFallback,
    /// The macro engine failed and a lossy default was substituted.
    MacroEngineFailure,
    /// Any other warning not covered by specific variants.
    Other(String),
}

impl ExtractWarningCode {
    /// Returns the string tag for this warning code.
    pub fn as_str(&self) -> &str {
        match self {
            ExtractWarningCode::UnreadableInclude => "UNREADABLE_INCLUDE",
            ExtractWarningCode::DecodeFallback => "DECODE_FALLBACK",
            ExtractWarningCode::PreambleFallback => "PREAMBLE_FALLBACK",
            ExtractWarningCode::MacroEngineFailure => "MACRO_ENGINE_FAILURE",
            ExtractWarningCode::Other(_) => "OTHER",
        }
    }
}

impl fmt::Display for ExtractWarningCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A non-fatal warning encountered during extraction.
///
/// Warnings allow best-effort continuation when issues are encountered
/// (an unreadable include, a charset fallback, a failing macro engine).
/// They carry a structured [`code`](ExtractWarning::code), a
/// human-readable description, and optional source context.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExtractWarning {
    /// Machine-readable warning code.
    pub code: ExtractWarningCode,
    /// Human-readable description of the warning.
    pub description: String,
    /// Path of the file the warning refers to, if applicable.
    pub path: Option<String>,
    /// Index of the figure the warning refers to (document order), if applicable.
    pub figure: Option<usize>,
}

impl ExtractWarning {
    /// Create a warning with just a description.
    ///
    /// Uses [`ExtractWarningCode::Other`] as the default code.
    pub fn new(description: impl Into<String>) -> Self {
        let desc = description.into();
        Self {
            code: ExtractWarningCode::Other(desc.clone()),
            description: desc,
            path: None,
            figure: None,
        }
    }

    /// Create a warning with a specific code and description.
    pub fn with_code(code: ExtractWarningCode, description: impl Into<String>) -> Self {
        Self {
            code,
            description: description.into(),
            path: None,
            figure: None,
        }
    }

    /// Create a warning with a specific code, description, and file context.
    pub fn on_path(
        code: ExtractWarningCode,
        description: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            code,
            description: description.into(),
            path: Some(path.into()),
            figure: None,
        }
    }

    /// Set the figure index, returning the modified warning (builder pattern).
    pub fn on_figure(mut self, figure: usize) -> Self {
        self.figure = Some(figure);
        self
    }
}

impl fmt::Display for ExtractWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.description)?;
        if let Some(ref path) = self.path {
            write!(f, " ({path})")?;
        }
        if let Some(figure) = self.figure {
            write!(f, " [figure #{figure}]")?;
        }
        Ok(())
    }
}

/// Result wrapper that pairs a value with collected warnings.
///
/// Used when an operation can partially succeed with non-fatal issues.
#[derive(Debug, Clone)]
pub struct ExtractResult<T> {
    /// The extracted value.
    pub value: T,
    /// Warnings collected while producing the value.
    pub warnings: Vec<ExtractWarning>,
}

impl<T> ExtractResult<T> {
    /// Create a result with no warnings.
    pub fn new(value: T) -> Self {
        Self {
            value,
            warnings: Vec::new(),
        }
    }

    /// Create a result carrying the given warnings.
    pub fn with_warnings(value: T, warnings: Vec<ExtractWarning>) -> Self {
        Self { value, warnings }
    }

    /// Discard the warnings and return the value.
    pub fn into_value(self) -> T {
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tex_error_display() {
        let err = TexError::MissingStructure("\\begin{document}".to_string());
        assert_eq!(
            err.to_string(),
            "missing structural marker: \\begin{document}"
        );
    }

    #[test]
    fn tex_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: TexError = io_err.into();
        assert!(matches!(err, TexError::IoError(_)));
        assert!(err.to_string().contains("file missing"));
    }

    #[test]
    fn warning_code_tags() {
        assert_eq!(
            ExtractWarningCode::UnreadableInclude.as_str(),
            "UNREADABLE_INCLUDE"
        );
        assert_eq!(
            ExtractWarningCode::Other("x".to_string()).as_str(),
            "OTHER"
        );
    }

    #[test]
    fn warning_display_with_context() {
        let w = ExtractWarning::on_path(
            ExtractWarningCode::UnreadableInclude,
            "cannot open include",
            "figs/plot.tex",
        )
        .on_figure(2);
        let s = w.to_string();
        assert!(s.contains("[UNREADABLE_INCLUDE]"));
        assert!(s.contains("figs/plot.tex"));
        assert!(s.contains("figure #2"));
    }

    #[test]
    fn extract_result_into_value() {
        let r = ExtractResult::with_warnings(7, vec![ExtractWarning::new("w")]);
        assert_eq!(r.warnings.len(), 1);
        assert_eq!(r.into_value(), 7);
    }

    #[test]
    fn tex_error_implements_std_error() {
        let err: Box<dyn std::error::Error> = Box::new(TexError::Other("test".to_string()));
        assert_eq!(err.to_string(), "test");
    }
}
