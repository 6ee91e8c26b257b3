use pretty_assertions::assert_eq;
use whitepaper_ir::{Block, Document, Inline, MathBlock};
use whitepaper_latex_backend::render_document;

fn math(content: &str, label: &str) -> Block {
    Block::MathBlock(MathBlock {
        content: content.to_string(),
        label: label.to_string(),
    })
}

#[test]
fn single_line_math_uses_equation_with_label() {
    let doc = Document::new(vec![math("a+b=\\gamma", "eq:1")]);
    let out = render_document(&doc);
    assert_eq!(out, "\\begin{equation}\na+b=\\gamma\\label{eq:1}\n\\end{equation}");
}

#[test]
fn multi_line_math_keeps_a_single_number() {
    let doc = Document::new(vec![math("a &= b \\\\ c &= d", "eq:1"), math("x=y", "eq:2")]);
    let out = render_document(&doc);
    let expected = "\\begin{equation}\n\\begin{split}\na &= b \\\\ c &= d\n\\end{split}\\label{eq:1}\n\\end{equation}\n\\begin{equation}\nx=y\\label{eq:2}\n\\end{equation}";
    assert_eq!(out, expected);
    assert_eq!(out.matches("\\begin{equation}").count(), 2);
    assert!(!out.contains("align"));
    assert!(!out.contains("gather"));
}

#[test]
fn line_breaks_without_alignment_also_use_split() {
    let doc = Document::new(vec![math("a \\\\ b", "eq:4")]);
    let out = render_document(&doc);
    assert!(out.starts_with("\\begin{equation}\n\\begin{split}\na \\\\ b\n\\end{split}"));
    assert!(out.ends_with("\\label{eq:4}\n\\end{equation}"));
}

#[test]
fn math_stays_inside_surrounding_paragraph() {
    let doc = Document::new(vec![
        Block::Paragraph(vec![Inline::raw("as in:")]),
        math("a+b=c", "eq:1"),
        Block::Paragraph(vec![
            Inline::raw("Use "),
            Inline::EquationRef("eq:1".to_string()),
            Inline::raw(" here."),
        ]),
        Block::heading(1, vec![Inline::raw("Next")]),
    ]);
    let out = render_document(&doc);
    let expected = "as in:\n\\begin{equation}\na+b=c\\label{eq:1}\n\\end{equation}\nUse \\eqref{eq:1} here.\n\n\\section{Next}";
    assert_eq!(out, expected);
}

#[test]
fn list_items_render_in_order() {
    let doc = Document::new(vec![Block::List(vec![
        vec![Block::Paragraph(vec![Inline::raw("first")])],
        vec![Block::Paragraph(vec![Inline::raw("second")])],
    ])]);
    let out = render_document(&doc);
    assert_eq!(
        out,
        "\\begin{itemize}\n  \\item first\n  \\item second\n\\end{itemize}"
    );
}

#[test]
fn blank_paragraphs_are_skipped() {
    let doc = Document::new(vec![
        Block::Paragraph(vec![Inline::raw("  ")]),
        Block::Paragraph(vec![Inline::raw("kept")]),
    ]);
    assert_eq!(render_document(&doc), "kept");
}
