//! Character-level CSV scanner.
//!
//! The scanner walks the text once carrying an `in_quotes` flag. It is
//! deliberately forgiving: nothing it sees is an error.

use std::collections::BTreeMap;

use super::delimiter::{Delimiter, detect_delimiter};
use crate::normalize::normalize_field;

/// One data row keyed by header name.
pub type CsvRecord = BTreeMap<String, String>;

/// Result of parsing a case file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedCsv {
    /// Header names in file order (trimmed, quotes removed).
    pub headers: Vec<String>,
    /// Data rows in file order.
    pub data: Vec<CsvRecord>,
    /// Delimiter detected from the header line.
    pub delimiter: Delimiter,
}

impl ParsedCsv {
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }
}

/// Parses a whole case file.
///
/// The first line is the header. Text without any newline, or with no
/// non-blank data row, yields an empty result (no headers, no data).
///
/// An opening quote that is never closed swallows the rest of the input
/// into the current field. That looks accidental, but it is kept as is:
/// files already imported this way must keep importing the same way.
pub fn parse_csv(text: &str) -> ParsedCsv {
    let Some(header_end) = text.find('\n') else {
        return ParsedCsv::default();
    };
    let header_line = text[..header_end].trim();
    let delimiter = detect_delimiter(header_line);

    let rows = scan_rows(&text[header_end + 1..], delimiter.as_char());
    if rows.is_empty() {
        tracing::debug!("case file has a header but no data rows");
        return ParsedCsv::default();
    }

    let headers = split_header(header_line, delimiter.as_char());
    let data = rows
        .into_iter()
        .map(|row| {
            headers
                .iter()
                .enumerate()
                .map(|(index, header)| {
                    let raw = row.get(index).map(String::as_str).unwrap_or("");
                    (header.clone(), normalize_field(header, raw))
                })
                .collect::<CsvRecord>()
        })
        .collect::<Vec<_>>();

    tracing::debug!(
        delimiter = %delimiter,
        columns = headers.len(),
        rows = data.len(),
        "parsed case file"
    );

    ParsedCsv {
        headers,
        data,
        delimiter,
    }
}

/// Splits the body into rows of raw fields, dropping blank rows.
fn scan_rows(body: &str, delimiter: char) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = body.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    field.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(c);
            }
            continue;
        }

        match c {
            '"' => in_quotes = true,
            '\n' => {
                row.push(std::mem::take(&mut field));
                push_row(&mut rows, std::mem::take(&mut row));
            }
            // Newline alone ends a row.
            '\r' => {}
            _ if c == delimiter => row.push(std::mem::take(&mut field)),
            _ => field.push(c),
        }
    }

    row.push(field);
    push_row(&mut rows, row);
    rows
}

fn push_row(rows: &mut Vec<Vec<String>>, row: Vec<String>) {
    if !row.concat().trim().is_empty() {
        rows.push(row);
    }
}

/// Splits the header line on unquoted delimiters and strips every quote.
fn split_header(line: &str, delimiter: char) -> Vec<String> {
    let mut headers = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for c in line.chars() {
        match c {
            '"' => in_quotes = !in_quotes,
            _ if c == delimiter && !in_quotes => {
                headers.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(c),
        }
    }
    headers.push(current.trim().to_string());
    headers
}
