//! Utility modules
//!
//! - Error and warning types
//! - LaTeX engine invocation and render configuration

pub mod compile;
pub mod error;

pub use compile::{Engine, LatexCompiler, ProcessCompiler, RenderConfig};
pub use error::{PaperError, PaperResult, RenderWarning};
