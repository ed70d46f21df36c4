//! Case output: quoted CSV export and dashboard summary counts.

pub mod error;
pub mod export;
pub mod summary;

pub use error::{ExportError, Result};
pub use export::{
    EXPORT_BASELINE, export_cases, export_headers, export_to_path, export_to_string,
    flatten_record, write_table,
};
pub use summary::CaseSummary;
