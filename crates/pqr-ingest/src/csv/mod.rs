//! Lenient CSV parsing.

mod delimiter;
mod parser;

pub use delimiter::{Delimiter, detect_delimiter};
pub use parser::{CsvRecord, ParsedCsv, parse_csv};
