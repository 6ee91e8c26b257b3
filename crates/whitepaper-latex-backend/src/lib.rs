//! IR to LaTeX backend.

use whitepaper_ir::{Block, Document, EnvironmentBlock, Inline, MathBlock};

/// Render the body blocks of `doc`, without preamble or `document` environment.
pub fn render_document(doc: &Document) -> String {
    render_block_sequence(&doc.blocks)
}

fn render_block_sequence(blocks: &[Block]) -> String {
    let mut out = String::new();
    let mut prev: Option<&Block> = None;
    for block in blocks {
        let chunk = render_block(block);
        if chunk.trim().is_empty() {
            continue;
        }
        if let Some(prev) = prev {
            out.push_str(block_separator(prev, block));
        }
        out.push_str(&chunk);
        prev = Some(block);
    }
    out
}

// Display math sits inside the surrounding paragraph; a blank line would end it.
fn block_separator(prev: &Block, next: &Block) -> &'static str {
    if matches!(prev, Block::MathBlock(_)) || matches!(next, Block::MathBlock(_)) {
        "\n"
    } else {
        "\n\n"
    }
}

fn render_block(block: &Block) -> String {
    match block {
        Block::Paragraph(inlines) => render_inlines(inlines).trim().to_string(),
        Block::Heading { level, content } => {
            let cmd = match *level {
                1 => "\\section",
                _ => "\\subsection",
            };
            format!(
                "{}{{{}}}",
                cmd,
                normalize_inline_whitespace(&render_inlines(content))
            )
        }
        Block::List(items) => {
            let mut out = String::from("\\begin{itemize}\n");
            for item in items {
                out.push_str("  \\item ");
                out.push_str(&render_blocks_inline(item));
                out.push('\n');
            }
            out.push_str("\\end{itemize}");
            out
        }
        Block::MathBlock(math) => render_math_block(math),
        Block::Environment(env) => render_environment(env),
        Block::Raw(raw) => raw.trim_end().to_string(),
    }
}

fn render_blocks_inline(blocks: &[Block]) -> String {
    let mut out = String::new();
    for (i, block) in blocks.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push_str(&render_block(block));
    }
    out
}

/// One `equation` per block, so each block takes exactly one display number.
/// Multi-line content is wrapped in `split` to keep it that way.
fn render_math_block(math: &MathBlock) -> String {
    let content = math.content.trim();
    let mut out = String::from("\\begin{equation}\n");
    if content.contains("\\\\") {
        out.push_str("\\begin{split}\n");
        out.push_str(content);
        out.push_str("\n\\end{split}");
    } else {
        out.push_str(content);
    }
    out.push_str("\\label{");
    out.push_str(&escape_latex(&math.label));
    out.push_str("}\n\\end{equation}");
    out
}

fn render_environment(env: &EnvironmentBlock) -> String {
    format!(
        "\\begin{{{name}}}\n{}\n\\end{{{name}}}",
        render_block_sequence(&env.blocks),
        name = env.name
    )
}

fn render_inlines(inlines: &[Inline]) -> String {
    let mut out = String::new();
    for inline in inlines {
        match inline {
            Inline::RawLatex(raw) => out.push_str(raw),
            Inline::EquationRef(label) => {
                out.push_str("\\eqref{");
                out.push_str(&escape_latex(label));
                out.push('}');
            }
        }
    }
    out
}

/// Escape the LaTeX special characters in plain text.
pub fn escape_latex(input: &str) -> String {
    let mut out = String::new();
    for ch in input.chars() {
        match ch {
            '\\' => out.push_str("\\textbackslash{}"),
            '{' => out.push_str("\\{"),
            '}' => out.push_str("\\}"),
            '$' => out.push_str("\\$"),
            '&' => out.push_str("\\&"),
            '%' => out.push_str("\\%"),
            '#' => out.push_str("\\#"),
            '_' => out.push_str("\\_"),
            '^' => out.push_str("\\textasciicircum{}"),
            '~' => out.push_str("\\textasciitilde{}"),
            _ => out.push(ch),
        }
    }
    out
}

fn normalize_inline_whitespace(input: &str) -> String {
    let mut out = String::new();
    let mut prev_space = false;
    for ch in input.chars() {
        if ch.is_whitespace() {
            if !prev_space {
                out.push(' ');
                prev_space = true;
            }
        } else {
            prev_space = false;
            out.push(ch);
        }
    }
    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_covers_specials() {
        assert_eq!(escape_latex("a_b & 50%"), "a\\_b \\& 50\\%");
        assert_eq!(escape_latex("~^"), "\\textasciitilde{}\\textasciicircum{}");
    }

    #[test]
    fn heading_whitespace_is_collapsed() {
        let block = Block::heading(2, vec![Inline::raw("  Units \n and   Measures ")]);
        assert_eq!(render_block(&block), "\\subsection{Units and Measures}");
    }

    #[test]
    fn environment_wraps_its_blocks() {
        let env = EnvironmentBlock::new(
            "IEEEkeywords",
            vec![Block::Paragraph(vec![Inline::raw("a, b")])],
        );
        assert_eq!(
            render_environment(&env),
            "\\begin{IEEEkeywords}\na, b\n\\end{IEEEkeywords}"
        );
    }
}
