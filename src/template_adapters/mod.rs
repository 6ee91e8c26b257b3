//! Per-format preamble and front matter.

pub mod ieee;

use std::fmt;
use std::str::FromStr;

use crate::paper::Paper;
use crate::utils::error::PaperError;

/// Recognized paper formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaperFormat {
    #[default]
    Ieee,
}

impl PaperFormat {
    pub fn name(&self) -> &'static str {
        match self {
            PaperFormat::Ieee => "IEEE",
        }
    }

    /// Full LaTeX source for `paper` in this format.
    pub fn render(&self, paper: &Paper) -> String {
        match self {
            PaperFormat::Ieee => ieee::render_ieee(paper),
        }
    }
}

impl FromStr for PaperFormat {
    type Err = PaperError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ieee" | "ieeetran" => Ok(PaperFormat::Ieee),
            _ => Err(PaperError::UnsupportedFormat(s.to_string())),
        }
    }
}

impl fmt::Display for PaperFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_formats() {
        assert_eq!("IEEE".parse::<PaperFormat>().unwrap(), PaperFormat::Ieee);
        assert_eq!(" ieee ".parse::<PaperFormat>().unwrap(), PaperFormat::Ieee);
        assert_eq!("IEEEtran".parse::<PaperFormat>().unwrap(), PaperFormat::Ieee);
    }

    #[test]
    fn rejects_unknown_formats() {
        let err = "ACM".parse::<PaperFormat>().unwrap_err();
        assert!(matches!(err, PaperError::UnsupportedFormat(ref name) if name == "ACM"));
    }
}
