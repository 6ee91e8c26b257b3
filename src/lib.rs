//! # whitepaper
//!
//! Assemble academic papers (title, authors, abstract, keywords, sections,
//! numbered equations) through builder calls and emit LaTeX, compiled to PDF
//! by an external engine.
//!
//! - [`Paper`] is the builder; [`Content`] is what sections accept.
//! - [`template_adapters`] holds the per-format preamble and front matter.
//! - [`manifest`] replays a TOML description of a paper against the builder.
//! - [`utils::compile`] runs `latexmk`, `pdflatex` or `tectonic`.

pub mod manifest;
pub mod paper;
pub mod template_adapters;
pub mod utils;

pub use paper::{
    Author, Content, EquationIndex, EquationRegistry, MathEquation, Paper, RenderOutput,
};
pub use template_adapters::PaperFormat;
pub use utils::compile::{Engine, LatexCompiler, ProcessCompiler, RenderConfig};
pub use utils::error::{PaperError, PaperResult, RenderWarning};
