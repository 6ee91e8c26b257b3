use whitepaper_ir::{Block, Document, EnvironmentBlock, Inline};
use whitepaper_latex_backend::render_document;

use crate::paper::{Author, Paper};

const IEEE_PACKAGES: &[&str] = &[
    "cite",
    "amsmath",
    "amssymb",
    "amsfonts",
    "algorithmic",
    "graphicx",
    "textcomp",
    "xcolor",
];

const BIBTEX_MACRO: &str = "\\def\\BibTeX{{\\rm B\\kern-.05em{\\sc i\\kern-.025em b}\\kern-.08em T\\kern-.1667em\\lower.7ex\\hbox{E}\\kern-.125emX}}";

pub fn render_ieee(paper: &Paper) -> String {
    let mut doc = Document::new(render_ieee_front_matter(paper));
    doc.extend(paper.body().blocks.iter().cloned());
    let body = render_document(&doc);

    let mut out = render_ieee_preamble();
    out.push_str("\\begin{document}\n");
    if !body.trim().is_empty() {
        out.push_str(&body);
        out.push('\n');
    }
    out.push_str("\\end{document}\n");
    out
}

fn render_ieee_preamble() -> String {
    let mut out = String::new();
    out.push_str("\\documentclass{IEEEtran}\n");
    out.push_str("\\usepackage[T1]{fontenc}\n");
    out.push_str("\\usepackage[utf8]{inputenc}\n");
    for package in IEEE_PACKAGES {
        out.push_str(&format!("\\usepackage{{{}}}\n", package));
    }
    out.push_str(BIBTEX_MACRO);
    out.push('\n');
    out
}

fn render_ieee_front_matter(paper: &Paper) -> Vec<Block> {
    let mut blocks = Vec::new();
    blocks.push(Block::raw(render_ieee_title(paper.title(), paper.sponsor())));
    if !paper.authors().is_empty() {
        blocks.push(Block::raw(format!(
            "\\author{{{}}}",
            render_ieee_author_block(paper.authors())
        )));
    }
    blocks.push(Block::raw("\\maketitle"));
    if let Some(abstract_text) = paper.abstract_text() {
        blocks.push(text_environment("abstract", abstract_text));
    }
    if let Some(keywords) = paper.keywords() {
        blocks.push(text_environment("IEEEkeywords", keywords));
    }
    blocks
}

fn render_ieee_title(title: &str, sponsor: Option<&str>) -> String {
    match sponsor {
        Some(sponsor) => format!("\\title{{{}\\\\ \\thanks{{{}}}}}", title, sponsor),
        None => format!("\\title{{{}}}", title),
    }
}

fn render_ieee_author_block(authors: &[Author]) -> String {
    authors
        .iter()
        .map(render_ieee_author)
        .collect::<Vec<_>>()
        .join("\n\\and ")
}

fn render_ieee_author(author: &Author) -> String {
    format!(
        "\\IEEEauthorblockN{{{}}} \\\\ \\IEEEauthorblockA{{\\textit{{{}}} \\\\ {} \\\\ {}}}",
        author.name, author.affiliation, author.location, author.email
    )
}

fn text_environment(name: &str, text: &str) -> Block {
    Block::Environment(EnvironmentBlock::new(
        name,
        vec![Block::Paragraph(vec![Inline::raw(text)])],
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn author(name: &str) -> Author {
        Author {
            name: name.to_string(),
            affiliation: "Org".to_string(),
            location: "City".to_string(),
            email: format!("{}@example.org", name.to_lowercase()),
        }
    }

    #[test]
    fn title_with_sponsor_uses_thanks() {
        assert_eq!(
            render_ieee_title("T", Some("Funded by X")),
            "\\title{T\\\\ \\thanks{Funded by X}}"
        );
        assert_eq!(render_ieee_title("T", None), "\\title{T}");
    }

    #[test]
    fn author_cell_layout() {
        assert_eq!(
            render_ieee_author(&author("Ada")),
            "\\IEEEauthorblockN{Ada} \\\\ \\IEEEauthorblockA{\\textit{Org} \\\\ City \\\\ ada@example.org}"
        );
    }

    #[test]
    fn authors_are_joined_with_and() {
        let block = render_ieee_author_block(&[author("A"), author("B")]);
        assert_eq!(block.matches("\\and").count(), 1);
        assert!(block.find("{A}").unwrap() < block.find("{B}").unwrap());
        assert!(!block.trim_end().ends_with("\\and"));
    }

    #[test]
    fn preamble_loads_ieee_class_and_packages() {
        let preamble = render_ieee_preamble();
        assert!(preamble.starts_with("\\documentclass{IEEEtran}\n"));
        for package in IEEE_PACKAGES {
            assert!(preamble.contains(&format!("\\usepackage{{{}}}", package)));
        }
        assert!(preamble.contains("\\def\\BibTeX"));
    }
}
