//! Append-only registry of numbered display equations.

use crate::utils::error::{PaperError, PaperResult};

/// A registered equation: its 1-based number and the LaTeX expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MathEquation {
    index: usize,
    expression: String,
}

impl MathEquation {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    pub fn label(&self) -> String {
        equation_label(self.index)
    }
}

/// Cross-reference to a registered equation. Renders as `\eqref`, never
/// as the expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EquationIndex(usize);

impl EquationIndex {
    pub fn index(&self) -> usize {
        self.0
    }

    pub fn label(&self) -> String {
        equation_label(self.0)
    }
}

pub(crate) fn equation_label(index: usize) -> String {
    format!("eq:{}", index)
}

#[derive(Debug, Clone, Default)]
pub struct EquationRegistry {
    entries: Vec<MathEquation>,
}

impl EquationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, expression: &str) -> PaperResult<MathEquation> {
        if expression.trim().is_empty() {
            return Err(PaperError::EmptyEquation);
        }
        let equation = MathEquation {
            index: self.entries.len() + 1,
            expression: expression.to_string(),
        };
        self.entries.push(equation.clone());
        Ok(equation)
    }

    pub fn reference(&self, index: usize) -> PaperResult<EquationIndex> {
        self.get(index).map(|eq| EquationIndex(eq.index))
    }

    pub fn get(&self, index: usize) -> PaperResult<&MathEquation> {
        index
            .checked_sub(1)
            .and_then(|pos| self.entries.get(pos))
            .ok_or(PaperError::EquationOutOfRange {
                index,
                count: self.entries.len(),
            })
    }

    pub fn entries(&self) -> &[MathEquation] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
