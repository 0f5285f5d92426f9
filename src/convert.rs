//! Conversion of `.potx`/`.odp` inputs to `.pptx` through LibreOffice.

use crate::{error::Error, ConvertOptions, Result};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// Extensions the extractor is not meant to read directly.
pub const CONVERTIBLE_EXTENSIONS: &[&str] = &["potx", "odp"];

const WORKDIR_PREFIX: &str = "pptx_convert_";

pub fn needs_conversion(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            CONVERTIBLE_EXTENSIONS
                .iter()
                .any(|candidate| ext.eq_ignore_ascii_case(candidate))
        })
}

/// What happened while preparing the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionOutcome {
    NotRequired,
    Disabled,
    Converted { from: PathBuf, to: PathBuf },
    NoOutput,
    Failed(String),
    ConverterMissing,
}

impl ConversionOutcome {
    /// Message shown to the user, if the outcome warrants one.
    pub fn notice(&self) -> Option<String> {
        match self {
            ConversionOutcome::NotRequired | ConversionOutcome::Disabled => None,
            other => Some(other.to_string()),
        }
    }
}

impl fmt::Display for ConversionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversionOutcome::NotRequired => f.write_str("No conversion required"),
            ConversionOutcome::Disabled => f.write_str("Conversion disabled"),
            ConversionOutcome::Converted { from, to } => {
                write!(f, "Converted {} -> {}", from.display(), to.display())
            }
            ConversionOutcome::NoOutput => {
                f.write_str("Conversion produced no .pptx; will attempt to open original file")
            }
            ConversionOutcome::Failed(_) => {
                f.write_str("LibreOffice conversion failed; attempting to open original file")
            }
            ConversionOutcome::ConverterMissing => {
                f.write_str("LibreOffice (soffice) not found; cannot auto-convert .potx/.odp")
            }
        }
    }
}

/// The file to inspect, plus the temporary directory backing it.
///
/// Dropping this value removes the temporary directory.
#[derive(Debug)]
pub struct PreparedInput {
    path: PathBuf,
    outcome: ConversionOutcome,
    workdir: Option<TempDir>,
}

impl PreparedInput {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn outcome(&self) -> &ConversionOutcome {
        &self.outcome
    }

    pub fn notice(&self) -> Option<String> {
        self.outcome.notice()
    }

    pub fn workdir(&self) -> Option<&Path> {
        self.workdir.as_ref().map(TempDir::path)
    }
}

/// Runs the external converter when the input format calls for it.
pub struct FormatConverter {
    options: ConvertOptions,
}

impl FormatConverter {
    pub fn new(options: ConvertOptions) -> Self {
        Self { options }
    }

    /// Returns the path to inspect for `input`.
    ///
    /// Conversion problems never fail this call: the original path is
    /// returned with an outcome describing what went wrong. Only failing to
    /// create the temporary directory is an error.
    pub fn prepare(&self, input: &Path) -> Result<PreparedInput> {
        let original = |outcome: ConversionOutcome| PreparedInput {
            path: input.to_path_buf(),
            outcome,
            workdir: None,
        };

        if !needs_conversion(input) {
            return Ok(original(ConversionOutcome::NotRequired));
        }
        if !self.options.enabled {
            log::debug!("conversion disabled; opening {} directly", input.display());
            return Ok(original(ConversionOutcome::Disabled));
        }

        let program = match which::which(&self.options.program) {
            Ok(program) => program,
            Err(e) => {
                log::debug!("converter {:?} not found: {}", self.options.program, e);
                return Ok(original(ConversionOutcome::ConverterMissing));
            }
        };

        let workdir = tempfile::Builder::new()
            .prefix(WORKDIR_PREFIX)
            .tempdir()?;

        let (path, outcome) = match self.run_converter(&program, input, workdir.path()) {
            Ok(converted) if converted.exists() => (
                converted.clone(),
                ConversionOutcome::Converted {
                    from: input.to_path_buf(),
                    to: converted,
                },
            ),
            Ok(_) => (input.to_path_buf(), ConversionOutcome::NoOutput),
            Err(e) => {
                log::warn!("{}", e);
                (input.to_path_buf(), ConversionOutcome::Failed(e.to_string()))
            }
        };

        Ok(PreparedInput {
            path,
            outcome,
            workdir: Some(workdir),
        })
    }

    /// Blocks until the converter exits; returns where its output should be.
    fn run_converter(&self, program: &Path, input: &Path, outdir: &Path) -> Result<PathBuf> {
        log::debug!(
            "running {} --headless --convert-to pptx {} --outdir {}",
            program.display(),
            input.display(),
            outdir.display()
        );

        let status = Command::new(program)
            .arg("--headless")
            .arg("--convert-to")
            .arg("pptx")
            .arg(input)
            .arg("--outdir")
            .arg(outdir)
            .status()
            .map_err(|e| {
                Error::Conversion(format!("failed to run {}: {}", program.display(), e))
            })?;

        if !status.success() {
            return Err(Error::Conversion(format!(
                "{} exited with {}",
                program.display(),
                status
            )));
        }

        let stem = input
            .file_stem()
            .ok_or_else(|| Error::Conversion(format!("invalid input name {}", input.display())))?;
        Ok(outdir.join(format!("{}.pptx", stem.to_string_lossy())))
    }
}
