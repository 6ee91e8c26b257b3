//! TOML paper manifests.
//!
//! A manifest describes a paper declaratively and is replayed against the
//! [`Paper`] builder in document order, so equation numbers follow their
//! position in the file and `ref` entries may only point backwards.
//!
//! ```toml
//! format = "IEEE"
//! title = "Conference Paper Title"
//! abstract = "This document is a model."
//!
//! [[authors]]
//! name = "Ada Lovelace"
//! affiliation = "Analytical Engines"
//! location = "London"
//! email = "ada@example.org"
//!
//! [[sections]]
//! title = "Equations"
//! level = 2
//! content = [
//!     "Number equations consecutively:",
//!     { equation = 'a+b=\gamma' },
//!     "Use ",
//!     { ref = 1 },
//!     { text = "100% literal", escape = true },
//!     { items = ["SI units", "CGS units"] },
//! ]
//! ```

use std::fmt;
use std::fs;
use std::path::Path;

use serde::de::{self, value::MapAccessDeserializer, MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use whitepaper_latex_backend::escape_latex;

use crate::paper::{Content, Paper};
use crate::template_adapters::PaperFormat;
use crate::utils::error::{PaperError, PaperResult};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PaperManifest {
    #[serde(default = "default_format")]
    pub format: String,
    pub title: String,
    #[serde(default)]
    pub sponsor: Option<String>,
    #[serde(default)]
    pub authors: Vec<AuthorSpec>,
    #[serde(default, rename = "abstract")]
    pub abstract_text: Option<String>,
    #[serde(default)]
    pub keywords: Option<String>,
    #[serde(default)]
    pub sections: Vec<SectionSpec>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthorSpec {
    pub name: String,
    #[serde(default)]
    pub affiliation: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SectionSpec {
    pub title: String,
    #[serde(default = "default_level")]
    pub level: u8,
    #[serde(default)]
    pub content: Vec<ContentSpec>,
}

/// One content item: a bare string, or a table with exactly one of
/// `text`, `items`, `equation` or `ref`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentSpec {
    Plain(String),
    Text { text: String, escape: bool },
    Items { items: Vec<String> },
    Equation { equation: String },
    Ref { reference: usize },
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ContentTable {
    text: Option<String>,
    escape: Option<bool>,
    items: Option<Vec<String>>,
    equation: Option<String>,
    #[serde(rename = "ref")]
    reference: Option<usize>,
}

impl ContentTable {
    fn into_spec(self) -> Result<ContentSpec, String> {
        if self.escape.is_some() && self.text.is_none() {
            return Err("`escape` only applies to `text` items".to_string());
        }
        let mut kinds = Vec::new();
        if let Some(text) = self.text {
            let escape = self.escape.unwrap_or(false);
            kinds.push(("text", ContentSpec::Text { text, escape }));
        }
        if let Some(items) = self.items {
            kinds.push(("items", ContentSpec::Items { items }));
        }
        if let Some(equation) = self.equation {
            kinds.push(("equation", ContentSpec::Equation { equation }));
        }
        if let Some(reference) = self.reference {
            kinds.push(("ref", ContentSpec::Ref { reference }));
        }
        if kinds.len() == 1 {
            if let Some((_, spec)) = kinds.pop() {
                return Ok(spec);
            }
        }
        let found: Vec<&str> = kinds.iter().map(|(key, _)| *key).collect();
        Err(format!(
            "content item needs exactly one of `text`, `items`, `equation`, `ref`; found [{}]",
            found.join(", ")
        ))
    }
}

impl<'de> Deserialize<'de> for ContentSpec {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ContentVisitor;

        impl<'de> Visitor<'de> for ContentVisitor {
            type Value = ContentSpec;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str(
                    "a string or a table with one of `text`, `items`, `equation`, `ref`",
                )
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(ContentSpec::Plain(value.to_string()))
            }

            fn visit_map<A>(self, map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                ContentTable::deserialize(MapAccessDeserializer::new(map))?
                    .into_spec()
                    .map_err(de::Error::custom)
            }
        }

        deserializer.deserialize_any(ContentVisitor)
    }
}

fn default_format() -> String {
    PaperFormat::default().name().to_string()
}

fn default_level() -> u8 {
    1
}

impl PaperManifest {
    pub fn from_toml_str(input: &str) -> PaperResult<Self> {
        Ok(toml::from_str(input)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> PaperResult<Self> {
        let input = fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&input)
    }

    /// Replay the manifest against a fresh [`Paper`].
    pub fn build(&self) -> PaperResult<Paper> {
        let format: PaperFormat = self.format.parse()?;
        let mut paper = Paper::new(format, self.title.as_str(), self.sponsor.as_deref());
        for author in &self.authors {
            paper.add_author(
                author.name.as_str(),
                author.affiliation.as_str(),
                author.location.as_str(),
                author.email.as_str(),
            );
        }
        if let Some(abstract_text) = &self.abstract_text {
            paper.set_abstract(abstract_text.as_str());
        }
        if let Some(keywords) = &self.keywords {
            paper.set_keywords(keywords.as_str());
        }
        for section in &self.sections {
            add_section(&mut paper, section)?;
        }
        Ok(paper)
    }
}

fn add_section(paper: &mut Paper, section: &SectionSpec) -> PaperResult<()> {
    let mut contents = Vec::with_capacity(section.content.len());
    for item in &section.content {
        contents.push(resolve_content(paper, item)?);
    }
    match section.level {
        1 => paper.add_section(&section.title, contents),
        2 => paper.add_subsection(&section.title, contents),
        other => Err(PaperError::Manifest(format!(
            "section '{}' has level {}; expected 1 or 2",
            section.title, other
        ))),
    }
}

fn resolve_content(paper: &mut Paper, item: &ContentSpec) -> PaperResult<Content> {
    Ok(match item {
        ContentSpec::Plain(text) => Content::Text(text.clone()),
        ContentSpec::Text { text, escape } => {
            if *escape {
                Content::Text(escape_latex(text))
            } else {
                Content::Text(text.clone())
            }
        }
        ContentSpec::Items { items } => paper.itemized_list(items.iter().cloned()),
        ContentSpec::Equation { equation } => Content::Equation(paper.equation(equation)?),
        ContentSpec::Ref { reference } => Content::EquationRef(paper.ref_equation(*reference)?),
    })
}
