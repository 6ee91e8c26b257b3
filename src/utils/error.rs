//! Error handling for paper assembly and rendering
//!
//! Precondition violations and renderer failures are `PaperError`s. Advisory
//! conditions never fail a call; they surface as `RenderWarning`s.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

/// Paper assembly and rendering errors
#[derive(Debug, Error)]
pub enum PaperError {
    /// `equation()` was called with an empty expression
    #[error("Equation not provided")]
    EmptyEquation,

    /// An equation reference points outside the registry
    #[error("Equation index {index} out of range (registered: {count})")]
    EquationOutOfRange { index: usize, count: usize },

    /// Paper format not recognized
    #[error("Unsupported paper format '{0}' (supported: IEEE)")]
    UnsupportedFormat(String),

    /// Unknown LaTeX engine name
    #[error("Unknown LaTeX engine '{0}' (expected latexmk, pdflatex or tectonic)")]
    UnknownEngine(String),

    /// The external LaTeX engine exited unsuccessfully
    #[error("{engine} failed on {}: {status}\n{stderr}", .tex.display())]
    Compiler {
        engine: String,
        tex: PathBuf,
        status: String,
        stderr: String,
    },

    /// Manifest could not be decoded
    #[error("Manifest error: {0}")]
    Manifest(String),

    /// Render report could not be serialized
    #[error("Report error: {0}")]
    Report(#[from] serde_json::Error),

    /// IO error (writing sources, spawning the engine)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<toml::de::Error> for PaperError {
    fn from(err: toml::de::Error) -> Self {
        PaperError::Manifest(err.to_string())
    }
}

/// Result type for paper operations
pub type PaperResult<T> = Result<T, PaperError>;

/// Advisory conditions raised while rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RenderWarning {
    MissingAbstract,
}

impl RenderWarning {
    pub fn suggestion(&self) -> &'static str {
        match self {
            RenderWarning::MissingAbstract => "use `set_abstract` to add it",
        }
    }
}

impl fmt::Display for RenderWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderWarning::MissingAbstract => {
                write!(f, "Missing Abstract ({})", self.suggestion())
            }
        }
    }
}
