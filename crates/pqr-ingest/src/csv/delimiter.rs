//! Delimiter detection from the header line.

use std::fmt;

/// Field delimiter of an ingested file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Delimiter {
    #[default]
    Comma,
    Semicolon,
}

impl Delimiter {
    pub fn as_char(&self) -> char {
        match self {
            Delimiter::Comma => ',',
            Delimiter::Semicolon => ';',
        }
    }
}

impl fmt::Display for Delimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Picks the delimiter by counting unquoted `,` and `;` in the header line.
///
/// Comma wins ties, including the case where neither appears.
pub fn detect_delimiter(header_line: &str) -> Delimiter {
    let mut commas = 0usize;
    let mut semicolons = 0usize;
    let mut in_quotes = false;

    for c in header_line.chars() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => commas += 1,
            ';' if !in_quotes => semicolons += 1,
            _ => {}
        }
    }

    if commas >= semicolons {
        Delimiter::Comma
    } else {
        Delimiter::Semicolon
    }
}
