//! Error types for the pdfcat library

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the pdfcat library
#[derive(Error, Debug)]
pub enum Error {
    /// PDF processing error
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// An input file does not exist
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Nothing to merge
    #[error("No input files provided")]
    NoInputs,

    /// An input could not be parsed as a PDF
    #[error("Failed to read PDF {}: {source}", .path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: lopdf::Error,
    },

    /// The merged document could not be written
    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid PDF (no pages)
    #[error("PDF has no pages: {}", .0.display())]
    EmptyPdf(PathBuf),
}

impl Error {
    /// True for the missing-input class, which is reported before any PDF is opened.
    pub fn is_missing_input(&self) -> bool {
        matches!(self, Error::FileNotFound(_) | Error::NoInputs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_not_found_names_the_path() {
        let err = Error::FileNotFound(PathBuf::from("chapter-2.pdf"));
        assert_eq!(err.to_string(), "File not found: chapter-2.pdf");
        assert!(err.is_missing_input());
    }

    #[test]
    fn test_library_failures_are_not_missing_input() {
        let err = Error::EmptyPdf(PathBuf::from("blank.pdf"));
        assert!(!err.is_missing_input());

        let err = Error::Write {
            path: PathBuf::from("out.pdf"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(!err.is_missing_input());
        assert!(err.to_string().contains("out.pdf"));
    }
}
