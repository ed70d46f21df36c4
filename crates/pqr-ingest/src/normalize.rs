//! Per-field normalization applied to every parsed value.

use pqr_model::keys;

/// National ids starting with `8` or `9` are cut to this many characters.
pub const NATIONAL_ID_MAX_LEN: usize = 9;

/// Strips one pair of surrounding quotes and unescapes `""`.
///
/// The scanner already removes quoting, so this only matters for values that
/// still carry literal quotes after scanning (for example `"""x"""`).
pub fn unquote(value: &str) -> String {
    if value.starts_with('"') && value.ends_with('"') {
        let inner = if value.len() >= 2 {
            &value[1..value.len() - 1]
        } else {
            ""
        };
        inner.replace("\"\"", "\"")
    } else {
        value.to_string()
    }
}

/// Normalizes a raw field value for the given header.
///
/// - trims surrounding whitespace and unquotes
/// - `Nro_Nuip_Cliente`: values starting with `8` or `9` and longer than
///   nine characters keep only their first nine characters
/// - `Nombre_Cliente`: uppercased
pub fn normalize_field(header: &str, raw: &str) -> String {
    let value = unquote(raw.trim());
    match header {
        keys::CUSTOMER_ID
            if (value.starts_with('8') || value.starts_with('9'))
                && value.chars().count() > NATIONAL_ID_MAX_LEN =>
        {
            value.chars().take(NATIONAL_ID_MAX_LEN).collect()
        }
        keys::CUSTOMER_NAME => value.to_uppercase(),
        _ => value,
    }
}
