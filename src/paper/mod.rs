//! The `Paper` builder.
//!
//! A paper accumulates metadata and body content through builder calls and is
//! rendered once at the end:
//!
//! ```no_run
//! use whitepaper::{Content, Paper, PaperFormat, RenderConfig};
//!
//! # fn main() -> whitepaper::PaperResult<()> {
//! let mut paper = Paper::new(PaperFormat::Ieee, "Conference Paper Title", None);
//! paper.add_author("Ada Lovelace", "Analytical Engines", "London", "ada@example.org");
//! paper.set_abstract("We describe an engine.");
//! let eq = paper.equation(r"a+b=\gamma")?;
//! let reference = paper.ref_equation(1)?;
//! paper.add_section(
//!     "Introduction",
//!     vec![Content::from("As in:"), eq.into(), "see ".into(), reference.into()],
//! )?;
//! paper.render("output.pdf", &RenderConfig::default())?;
//! # Ok(())
//! # }
//! ```

pub mod content;
pub mod equations;

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use whitepaper_ir::{Block, Document, Inline};

pub use content::{render_contents, Content};
pub use equations::{EquationIndex, EquationRegistry, MathEquation};

use crate::template_adapters::PaperFormat;
use crate::utils::compile::{LatexCompiler, ProcessCompiler, RenderConfig};
use crate::utils::error::{PaperError, PaperResult, RenderWarning};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub name: String,
    pub affiliation: String,
    pub location: String,
    pub email: String,
}

/// Files produced by [`Paper::render`].
#[derive(Debug, Clone, Serialize)]
pub struct RenderOutput {
    pub tex: PathBuf,
    pub pdf: Option<PathBuf>,
    pub warnings: Vec<RenderWarning>,
}

#[derive(Debug, Clone)]
pub struct Paper {
    format: PaperFormat,
    title: String,
    sponsor: Option<String>,
    authors: Vec<Author>,
    abstract_text: Option<String>,
    keywords: Option<String>,
    equations: EquationRegistry,
    body: Document,
}

impl Paper {
    /// An empty sponsor is treated as no sponsor.
    pub fn new(format: PaperFormat, title: impl Into<String>, sponsor: Option<&str>) -> Self {
        Self {
            format,
            title: title.into(),
            sponsor: sponsor
                .filter(|s| !s.trim().is_empty())
                .map(str::to_string),
            authors: Vec::new(),
            abstract_text: None,
            keywords: None,
            equations: EquationRegistry::new(),
            body: Document::default(),
        }
    }

    pub fn ieee(title: impl Into<String>) -> Self {
        Self::new(PaperFormat::Ieee, title, None)
    }

    pub fn format(&self) -> PaperFormat {
        self.format
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn sponsor(&self) -> Option<&str> {
        self.sponsor.as_deref()
    }

    pub fn authors(&self) -> &[Author] {
        &self.authors
    }

    pub fn abstract_text(&self) -> Option<&str> {
        non_blank(self.abstract_text.as_deref())
    }

    pub fn keywords(&self) -> Option<&str> {
        non_blank(self.keywords.as_deref())
    }

    pub fn equations(&self) -> &[MathEquation] {
        self.equations.entries()
    }

    pub fn body(&self) -> &Document {
        &self.body
    }

    pub fn add_author(
        &mut self,
        name: impl Into<String>,
        affiliation: impl Into<String>,
        location: impl Into<String>,
        email: impl Into<String>,
    ) -> &mut Self {
        let author = Author {
            name: name.into(),
            affiliation: affiliation.into(),
            location: location.into(),
            email: email.into(),
        };
        tracing::debug!(name = %author.name, position = self.authors.len() + 1, "added author");
        self.authors.push(author);
        self
    }

    /// Replaces any previously set abstract.
    pub fn set_abstract(&mut self, text: impl Into<String>) -> &mut Self {
        self.abstract_text = Some(text.into());
        self
    }

    /// Replaces any previously set keywords.
    pub fn set_keywords(&mut self, keywords: impl Into<String>) -> &mut Self {
        self.keywords = Some(keywords.into());
        self
    }

    pub fn equation(&mut self, expression: &str) -> PaperResult<MathEquation> {
        let equation = self.equations.register(expression)?;
        tracing::debug!(index = equation.index(), "registered equation");
        Ok(equation)
    }

    pub fn ref_equation(&self, index: usize) -> PaperResult<EquationIndex> {
        self.equations.reference(index)
    }

    pub fn itemized_list<I, S>(&self, items: I) -> Content
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Content::Itemize(items.into_iter().map(Into::into).collect())
    }

    pub fn add_section<I>(&mut self, title: &str, contents: I) -> PaperResult<()>
    where
        I: IntoIterator<Item = Content>,
    {
        self.add_heading_block(1, title, contents)
    }

    pub fn add_subsection<I>(&mut self, title: &str, contents: I) -> PaperResult<()>
    where
        I: IntoIterator<Item = Content>,
    {
        self.add_heading_block(2, title, contents)
    }

    // The block only reaches the body once every item has been checked.
    fn add_heading_block<I>(&mut self, level: u8, title: &str, contents: I) -> PaperResult<()>
    where
        I: IntoIterator<Item = Content>,
    {
        let contents: Vec<Content> = contents.into_iter().collect();
        for item in &contents {
            self.check_content(item)?;
        }
        let mut blocks = vec![Block::heading(level, vec![Inline::raw(title)])];
        blocks.extend(render_contents(contents));
        tracing::debug!(level, title, blocks = blocks.len(), "appended heading block");
        self.body.extend(blocks);
        Ok(())
    }

    // Handles minted by another paper may point past this registry.
    fn check_content(&self, item: &Content) -> PaperResult<()> {
        match item {
            Content::Equation(eq) => {
                let registered = self.equations.get(eq.index())?;
                if registered != eq {
                    return Err(PaperError::EquationOutOfRange {
                        index: eq.index(),
                        count: self.equations.len(),
                    });
                }
                Ok(())
            }
            Content::EquationRef(reference) => self.equations.get(reference.index()).map(|_| ()),
            Content::Text(_) | Content::Itemize(_) => Ok(()),
        }
    }

    /// Full LaTeX source for this paper.
    pub fn to_latex(&self) -> String {
        self.format.render(self)
    }

    /// Advisory conditions that would be reported by [`Paper::render`].
    pub fn warnings(&self) -> Vec<RenderWarning> {
        let mut warnings = Vec::new();
        if self.abstract_text().is_none() {
            warnings.push(RenderWarning::MissingAbstract);
        }
        warnings
    }

    /// Write `<output>.tex` and compile it with the engine from `config`.
    ///
    /// A trailing `.pdf` on `output_path` is stripped.
    pub fn render(
        &self,
        output_path: impl AsRef<Path>,
        config: &RenderConfig,
    ) -> PaperResult<RenderOutput> {
        if config.tex_only {
            return self.render_source(output_path.as_ref());
        }
        self.render_with(output_path, &ProcessCompiler::from_config(config))
    }

    pub fn render_with(
        &self,
        output_path: impl AsRef<Path>,
        compiler: &dyn LatexCompiler,
    ) -> PaperResult<RenderOutput> {
        let mut output = self.render_source(output_path.as_ref())?;
        let out_dir = output_dir(&output.tex);
        tracing::info!(engine = compiler.name(), tex = %output.tex.display(), "compiling paper");
        output.pdf = Some(compiler.compile(&output.tex, &out_dir)?);
        Ok(output)
    }

    fn render_source(&self, output_path: &Path) -> PaperResult<RenderOutput> {
        let warnings = self.warnings();
        for warning in &warnings {
            tracing::warn!("{}", warning);
        }

        let tex = tex_path_for(output_path);
        let out_dir = output_dir(&tex);
        fs::create_dir_all(&out_dir)?;
        fs::write(&tex, self.to_latex())?;
        tracing::debug!(tex = %tex.display(), "wrote LaTeX source");

        Ok(RenderOutput {
            tex,
            pdf: None,
            warnings,
        })
    }
}

impl fmt::Display for Paper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Paper Format: {}", self.format)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.trim().is_empty())
}

fn tex_path_for(output_path: &Path) -> PathBuf {
    let raw = output_path.to_string_lossy();
    let base = raw.strip_suffix(".pdf").unwrap_or(raw.as_ref());
    PathBuf::from(format!("{}.tex", base))
}

fn output_dir(tex: &Path) -> PathBuf {
    match tex.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_format() {
        assert_eq!(Paper::ieee("T").to_string(), "Paper Format: IEEE");
    }

    #[test]
    fn blank_sponsor_is_dropped() {
        assert_eq!(Paper::new(PaperFormat::Ieee, "T", Some("  ")).sponsor(), None);
        assert_eq!(
            Paper::new(PaperFormat::Ieee, "T", Some("NSF")).sponsor(),
            Some("NSF")
        );
    }

    #[test]
    fn tex_path_strips_pdf_suffix() {
        assert_eq!(tex_path_for(Path::new("out/paper.pdf")), PathBuf::from("out/paper.tex"));
        assert_eq!(tex_path_for(Path::new("paper")), PathBuf::from("paper.tex"));
        assert_eq!(tex_path_for(Path::new("my.pdf.notes")), PathBuf::from("my.pdf.notes.tex"));
    }

    #[test]
    fn output_dir_defaults_to_cwd() {
        assert_eq!(output_dir(Path::new("paper.tex")), PathBuf::from("."));
        assert_eq!(output_dir(Path::new("a/b.tex")), PathBuf::from("a"));
    }

    #[test]
    fn failed_block_leaves_body_untouched() {
        let mut paper = Paper::ieee("T");
        paper.add_section("Intro", vec![Content::from("hello")]).unwrap();
        let before = paper.body().clone();

        let mut other = Paper::ieee("Other");
        other.equation("a=b").unwrap();
        other.equation("c=d").unwrap();
        let foreign = other.ref_equation(2).unwrap();

        let err = paper
            .add_section("Broken", vec![Content::from("text"), foreign.into()])
            .unwrap_err();
        assert!(matches!(err, PaperError::EquationOutOfRange { index: 2, count: 0 }));
        assert_eq!(paper.body(), &before);
    }

    #[test]
    fn foreign_equation_definition_is_rejected() {
        let mut paper = Paper::ieee("T");
        paper.equation("x=y").unwrap();
        let mut other = Paper::ieee("Other");
        let foreign = other.equation("a=b").unwrap();
        assert!(paper.add_section("S", vec![Content::from(foreign)]).is_err());
    }

    #[test]
    fn warnings_track_abstract() {
        let mut paper = Paper::ieee("T");
        assert_eq!(paper.warnings(), vec![RenderWarning::MissingAbstract]);
        paper.set_abstract("   ");
        assert_eq!(paper.warnings(), vec![RenderWarning::MissingAbstract]);
        paper.set_abstract("Real abstract.");
        assert!(paper.warnings().is_empty());
    }
}
