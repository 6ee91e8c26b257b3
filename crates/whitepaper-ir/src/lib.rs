//! Semantic intermediate representation for assembled papers.

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub blocks: Vec<Block>,
}

impl Document {
    pub fn new(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }

    pub fn extend(&mut self, blocks: impl IntoIterator<Item = Block>) {
        self.blocks.extend(blocks);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Paragraph(Vec<Inline>),
    /// Level 1 is a section, anything deeper a subsection.
    Heading { level: u8, content: Vec<Inline> },
    /// Bulleted list; each item holds its own blocks.
    List(Vec<Vec<Block>>),
    MathBlock(MathBlock),
    Environment(EnvironmentBlock),
    /// Preformatted LaTeX kept on its own line(s), untouched by whitespace normalization.
    Raw(String),
}

impl Block {
    pub fn heading(level: u8, content: Vec<Inline>) -> Self {
        Block::Heading { level, content }
    }

    pub fn raw(s: impl Into<String>) -> Self {
        Block::Raw(s.into())
    }
}

/// A numbered display equation and the label it is referenced by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MathBlock {
    pub content: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentBlock {
    pub name: String,
    pub blocks: Vec<Block>,
}

impl EnvironmentBlock {
    pub fn new(name: impl Into<String>, blocks: Vec<Block>) -> Self {
        Self {
            name: name.into(),
            blocks,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    /// Caller-supplied LaTeX, passed through verbatim.
    RawLatex(String),
    /// Cross-reference to the equation carrying this label.
    EquationRef(String),
}

impl Inline {
    pub fn raw(s: impl Into<String>) -> Self {
        Inline::RawLatex(s.into())
    }

    /// Whether this inline carries no visible content.
    pub fn is_blank(&self) -> bool {
        match self {
            Inline::RawLatex(s) => s.trim().is_empty(),
            Inline::EquationRef(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_detection() {
        assert!(Inline::raw("  \n ").is_blank());
        assert!(!Inline::EquationRef("eq:1".into()).is_blank());
        assert!(!Inline::raw("x").is_blank());
    }

    #[test]
    fn document_extend_preserves_order() {
        let mut doc = Document::new(vec![Block::raw("a")]);
        doc.extend([Block::raw("b"), Block::raw("c")]);
        assert_eq!(
            doc.blocks,
            vec![Block::raw("a"), Block::raw("b"), Block::raw("c")]
        );
    }
}
