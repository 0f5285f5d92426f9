//! Error types for potx-inspect.

use thiserror::Error;

/// Result type for potx-inspect operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while opening or inspecting a presentation.
#[derive(Error, Debug)]
pub enum Error {
    /// The package is not a presentation this tool can read.
    #[error("Failed to parse presentation: {0}")]
    PptxParse(String),

    /// Error occurred during file I/O operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A part could not be parsed as XML.
    #[error("Malformed XML in {part}: {message}")]
    Xml { part: String, message: String },

    /// Part referenced by the package does not exist in the archive.
    #[error("Part not found: {0}")]
    PartNotFound(String),

    /// Relationship not found in a part's relationship list.
    #[error("Relationship not found: {0}")]
    RelationshipNotFound(String),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// External format conversion failed.
    #[error("Conversion error: {0}")]
    Conversion(String),
}

impl Error {
    pub(crate) fn xml(part: &str, err: roxmltree::Error) -> Self {
        Self::Xml {
            part: part.to_string(),
            message: err.to_string(),
        }
    }
}
