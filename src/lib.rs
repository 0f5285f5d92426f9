//! # potx-inspect
//!
//! Prints a human-readable summary of the slides in a PPTX/POTX
//! presentation: titles, layouts, shapes, text, pictures, speaker notes and
//! related images.
//!
//! ## Example
//!
//! ```no_run
//! use potx_inspect::{InspectOptions, PresentationInspector};
//!
//! let inspector = PresentationInspector::new(InspectOptions::default());
//! let summary = inspector.inspect("deck.pptx").unwrap();
//! print!("{}", summary);
//! ```

pub mod adapters;
pub mod convert;
pub mod core;
pub mod error;
pub mod inspector;
pub mod render;

pub use convert::{ConversionOutcome, FormatConverter, PreparedInput};
pub use error::{Error, Result};
pub use inspector::PresentationInspector;

use std::path::{Path, PathBuf};

/// Files tried, in order, when no input path is given.
pub const DEFAULT_CANDIDATES: &[&str] = &[
    "disco-template.pptx",
    "disco-template.potx",
    "disco-template.odp",
];

/// Options for the slide summary.
#[derive(Debug, Clone)]
pub struct InspectOptions {
    /// Maximum characters of shape text before it is cut with `...`.
    pub text_limit: usize,
    /// Maximum characters of joined speaker notes.
    pub notes_limit: usize,
}

impl Default for InspectOptions {
    fn default() -> Self {
        Self {
            text_limit: 300,
            notes_limit: 400,
        }
    }
}

/// Options for converting unsupported inputs before inspection.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Converter executable, looked up on `PATH` unless it is a path.
    pub program: PathBuf,
    /// Whether to try conversion at all.
    pub enabled: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            program: PathBuf::from("soffice"),
            enabled: true,
        }
    }
}

/// First of [`DEFAULT_CANDIDATES`] that exists in `dir`.
pub fn find_default_input(dir: &Path) -> Option<PathBuf> {
    DEFAULT_CANDIDATES
        .iter()
        .map(|name| dir.join(name))
        .find(|candidate| candidate.is_file())
}
