//! Byte-to-text decoding for source files.

const BOM: char = '\u{feff}';

/// Decodes file contents as UTF-8.
///
/// Invalid sequences are replaced with U+FFFD rather than rejected, and a
/// leading byte-order mark is dropped.
pub fn decode_text(bytes: Vec<u8>) -> String {
    let text = match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    };
    match text.strip_prefix(BOM) {
        Some(rest) => rest.to_string(),
        None => text,
    }
}
