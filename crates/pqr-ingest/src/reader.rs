//! Case file loading with size and encoding checks.

use std::path::Path;

use encoding_rs::WINDOWS_1252;

use crate::csv::{ParsedCsv, parse_csv};
use crate::error::{IngestError, Result};

/// Maximum file size for case loading (50 MB default).
pub const MAX_CASE_FILE_SIZE: u64 = 50 * 1024 * 1024;

/// Check file size before loading.
pub fn check_file_size(path: &Path) -> Result<()> {
    check_file_size_with_limit(path, MAX_CASE_FILE_SIZE)
}

/// Check file size against a custom limit.
pub fn check_file_size_with_limit(path: &Path, max_size: u64) -> Result<()> {
    let metadata = std::fs::metadata(path).map_err(|e| IngestError::from_io(path, e))?;

    if metadata.len() > max_size {
        return Err(IngestError::FileTooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            max_size,
        });
    }

    Ok(())
}

/// Decodes raw file bytes to text.
///
/// UTF-16 byte-order marks are rejected. A UTF-8 BOM is stripped. Bytes that
/// are not valid UTF-8 are decoded as Windows-1252, the usual encoding of
/// spreadsheet exports on Spanish-locale desktops.
pub fn decode_bytes(bytes: &[u8], path: &Path) -> Result<String> {
    if bytes.starts_with(&[0xFF, 0xFE]) {
        return Err(IngestError::UnsupportedEncoding {
            path: path.to_path_buf(),
            encoding: "UTF-16 LE",
        });
    }
    if bytes.starts_with(&[0xFE, 0xFF]) {
        return Err(IngestError::UnsupportedEncoding {
            path: path.to_path_buf(),
            encoding: "UTF-16 BE",
        });
    }

    let bytes = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(text) => Ok(text.to_string()),
        Err(_) => {
            tracing::warn!(
                path = %path.display(),
                "file is not valid UTF-8, decoding as Windows-1252"
            );
            let (text, _, _) = WINDOWS_1252.decode(bytes);
            Ok(text.into_owned())
        }
    }
}

/// Reads a case file to text after size and encoding checks.
pub fn read_case_text(path: &Path) -> Result<String> {
    check_file_size(path)?;
    let bytes = std::fs::read(path).map_err(|e| IngestError::from_io(path, e))?;
    decode_bytes(&bytes, path)
}

/// Reads and parses a case file.
pub fn read_case_file(path: &Path) -> Result<ParsedCsv> {
    let text = read_case_text(path)?;
    let parsed = parse_csv(&text);
    tracing::info!(
        path = %path.display(),
        rows = parsed.len(),
        columns = parsed.headers.len(),
        "loaded case file"
    );
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_file(content: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content).unwrap();
        file
    }

    #[test]
    fn test_read_case_file_with_bom() {
        let file = create_temp_file("\u{feff}SN;Nombre_Cliente\n1;ana\n".as_bytes());
        let parsed = read_case_file(file.path()).unwrap();
        assert_eq!(parsed.headers, vec!["SN", "Nombre_Cliente"]);
        assert_eq!(parsed.data[0]["Nombre_Cliente"], "ANA");
    }

    #[test]
    fn test_windows_1252_fallback() {
        // "Peña" with 0xF1 for ñ.
        let file = create_temp_file(b"SN,Nombre_Cliente\n1,Pe\xF1a\n");
        let parsed = read_case_file(file.path()).unwrap();
        assert_eq!(parsed.data[0]["Nombre_Cliente"], "PEÑA");
    }

    #[test]
    fn test_utf16_rejected() {
        let file = create_temp_file(&[0xFF, 0xFE, b'S', 0]);
        let result = read_case_file(file.path());
        assert!(matches!(result, Err(IngestError::UnsupportedEncoding { .. })));
    }

    #[test]
    fn test_size_limit() {
        let file = create_temp_file(b"SN\n1\n");
        let result = check_file_size_with_limit(file.path(), 2);
        assert!(matches!(result, Err(IngestError::FileTooLarge { .. })));
        assert!(check_file_size_with_limit(file.path(), 1024).is_ok());
    }

    #[test]
    fn test_missing_file() {
        let result = read_case_file(Path::new("/nonexistent/casos.csv"));
        assert!(matches!(result, Err(IngestError::FileNotFound { .. })));
    }
}
