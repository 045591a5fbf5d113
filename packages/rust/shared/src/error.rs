//! Error types for kbdocs.
//!
//! Library crates use [`KbDocsError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

use crate::types::Language;

/// Top-level error type for all kbdocs operations.
#[derive(Debug, thiserror::Error)]
pub enum KbDocsError {
    /// A raw input artifact required by a build step is absent.
    #[error("raw input not found at {}. Run: {hint}", .path.display())]
    MissingPrerequisite { path: PathBuf, hint: String },

    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The PDF could not be opened or parsed.
    #[error("PDF error in {}: {message}", .path.display())]
    Pdf { path: PathBuf, message: String },

    /// A language target failed; wraps the underlying cause.
    #[error("{language} build failed")]
    Target {
        language: Language,
        #[source]
        source: Box<KbDocsError>,
    },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, KbDocsError>;

impl KbDocsError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Report a missing raw input along with the fetch command that produces it.
    pub fn missing_prerequisite(path: impl Into<PathBuf>, hint: impl Into<String>) -> Self {
        Self::MissingPrerequisite {
            path: path.into(),
            hint: hint.into(),
        }
    }

    /// Report a PDF that could not be opened or parsed.
    pub fn pdf(path: impl Into<PathBuf>, msg: impl std::fmt::Display) -> Self {
        Self::Pdf {
            path: path.into(),
            message: msg.to_string(),
        }
    }

    /// Attach the language whose build produced this error.
    pub fn for_target(self, language: Language) -> Self {
        Self::Target {
            language,
            source: Box::new(self),
        }
    }

    /// True when this error (or the error it wraps) is a missing prerequisite.
    pub fn is_missing_prerequisite(&self) -> bool {
        match self {
            Self::MissingPrerequisite { .. } => true,
            Self::Target { source, .. } => source.is_missing_prerequisite(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = KbDocsError::config("cpp_pages_per_file must be positive");
        assert_eq!(
            err.to_string(),
            "config error: cpp_pages_per_file must be positive"
        );

        let err = KbDocsError::missing_prerequisite(
            "/kb/languages/python/raw/python-docs-text",
            "./rag-ml/kb/pull-docs.sh",
        );
        let msg = err.to_string();
        assert!(msg.contains("python-docs-text"));
        assert!(msg.ends_with("Run: ./rag-ml/kb/pull-docs.sh"));
    }

    #[test]
    fn target_wrapper_keeps_cause() {
        let err = KbDocsError::missing_prerequisite("/x", "fetch").for_target(Language::Swift);
        assert_eq!(err.to_string(), "swift build failed");
        assert!(err.is_missing_prerequisite());

        let source = std::error::Error::source(&err).expect("wrapped cause");
        assert!(source.to_string().starts_with("raw input not found"));
    }

    #[test]
    fn pdf_error_names_the_file() {
        let err = KbDocsError::pdf("/kb/cpp-draft.pdf", "invalid file header");
        assert_eq!(
            err.to_string(),
            "PDF error in /kb/cpp-draft.pdf: invalid file header"
        );
    }

    #[test]
    fn io_error_is_not_missing_prerequisite() {
        let err = KbDocsError::io(
            "/tmp/out",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(!err.is_missing_prerequisite());
        assert!(err.to_string().contains("denied"));
    }
}
