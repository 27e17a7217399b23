use crate::foundation::error::{MockupError, MockupResult};

/// Parse `#RRGGBB` (leading `#` optional, case-insensitive) into RGB bytes.
///
/// Exactly six hex digits are accepted; shorthand and alpha forms are rejected.
pub fn parse_hex_rgb(s: &str) -> MockupResult<[u8; 3]> {
    let trimmed = s.trim();
    let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);

    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(MockupError::invalid_color_spec(format!(
            "hex color must be #RRGGBB, got \"{s}\""
        )));
    }

    fn hex_byte(pair: &str, whole: &str) -> MockupResult<u8> {
        u8::from_str_radix(pair, 16).map_err(|_| {
            MockupError::invalid_color_spec(format!("invalid hex byte \"{pair}\" in \"{whole}\""))
        })
    }

    Ok([
        hex_byte(&digits[0..2], s)?,
        hex_byte(&digits[2..4], s)?,
        hex_byte(&digits[4..6], s)?,
    ])
}

/// Format RGB bytes as an uppercase `#RRGGBB` string.
pub fn format_hex_rgb(rgb: [u8; 3]) -> String {
    format!("#{:02X}{:02X}{:02X}", rgb[0], rgb[1], rgb[2])
}
