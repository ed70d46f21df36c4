//! Case ingestion utilities.
//!
//! This crate turns uploaded case files into header-keyed records.
//!
//! # Features
//!
//! - **Lenient CSV parsing**: character-level scan with quoted fields,
//!   embedded delimiters and embedded newlines; malformed quoting is
//!   tolerated, never reported
//! - **Delimiter detection**: comma or semicolon, decided by the header line
//! - **Field normalization**: national-id truncation and customer-name
//!   uppercasing
//! - **File loading**: size limit, BOM handling and Windows-1252 fallback
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use pqr_ingest::{parse_csv, read_case_file};
//!
//! let parsed = parse_csv("SN;Nombre_Cliente\n12345;juan perez\n");
//! assert_eq!(parsed.data[0]["Nombre_Cliente"], "JUAN PEREZ");
//!
//! let parsed = read_case_file(Path::new("casos.csv"))?;
//! ```

mod csv;
mod error;
mod normalize;
mod reader;

// === Error Types ===
pub use error::{IngestError, Result};

// === CSV Parsing ===
pub use csv::{CsvRecord, Delimiter, ParsedCsv, detect_delimiter, parse_csv};

// === Field Normalization ===
pub use normalize::{NATIONAL_ID_MAX_LEN, normalize_field, unquote};

// === File Loading ===
pub use reader::{
    MAX_CASE_FILE_SIZE, check_file_size, check_file_size_with_limit, decode_bytes,
    read_case_file, read_case_text,
};
