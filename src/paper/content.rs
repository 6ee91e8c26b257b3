//! Content items accepted by section builders and their IR rendering.

use whitepaper_ir::{Block, Inline, MathBlock};

use super::equations::{EquationIndex, MathEquation};

/// One item of section content.
///
/// Text and list items are LaTeX, emitted verbatim; escaping is up to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Text(String),
    Itemize(Vec<String>),
    EquationRef(EquationIndex),
    Equation(MathEquation),
}

impl From<&str> for Content {
    fn from(value: &str) -> Self {
        Content::Text(value.to_string())
    }
}

impl From<String> for Content {
    fn from(value: String) -> Self {
        Content::Text(value)
    }
}

impl From<EquationIndex> for Content {
    fn from(value: EquationIndex) -> Self {
        Content::EquationRef(value)
    }
}

impl From<MathEquation> for Content {
    fn from(value: MathEquation) -> Self {
        Content::Equation(value)
    }
}

/// Render content items in order. Runs of text and references share one
/// paragraph; lists and equations break it.
pub fn render_contents<I>(items: I) -> Vec<Block>
where
    I: IntoIterator<Item = Content>,
{
    let mut blocks = Vec::new();
    let mut paragraph: Vec<Inline> = Vec::new();
    for item in items {
        match item {
            Content::Text(text) => paragraph.push(Inline::RawLatex(text)),
            Content::EquationRef(reference) => {
                paragraph.push(Inline::EquationRef(reference.label()))
            }
            Content::Itemize(entries) => {
                flush_paragraph(&mut paragraph, &mut blocks);
                blocks.push(render_itemize(entries));
            }
            Content::Equation(equation) => {
                flush_paragraph(&mut paragraph, &mut blocks);
                blocks.push(Block::MathBlock(MathBlock {
                    content: equation.expression().to_string(),
                    label: equation.label(),
                }));
            }
        }
    }
    flush_paragraph(&mut paragraph, &mut blocks);
    blocks
}

fn render_itemize(entries: Vec<String>) -> Block {
    Block::List(
        entries
            .into_iter()
            .map(|entry| vec![Block::Paragraph(vec![Inline::RawLatex(entry)])])
            .collect(),
    )
}

fn flush_paragraph(paragraph: &mut Vec<Inline>, blocks: &mut Vec<Block>) {
    if paragraph.iter().all(Inline::is_blank) {
        paragraph.clear();
        return;
    }
    blocks.push(Block::Paragraph(std::mem::take(paragraph)));
}
