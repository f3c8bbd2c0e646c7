//! Text encoding detection for delimited sources.
//!
//! Spreadsheet exports are frequently Latin-1 or Windows-1252 rather than
//! UTF-8. Valid UTF-8 is taken as-is; anything else goes through `chardet`,
//! whose charset name is resolved with `encoding_rs` label lookup.

use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};
use std::borrow::Cow;

/// Resolve a charset name to an encoding, e.g. `"SHIFT_JIS"` or `"latin1"`.
pub fn encoding_for_label(label: &str) -> Option<&'static Encoding> {
    Encoding::for_label(label.trim().as_bytes())
}

/// Detect the encoding of raw bytes using chardet.
///
/// Names `encoding_rs` does not know fall back to Windows-1252, which maps
/// every byte and is the usual export default for Western spreadsheets.
pub fn detect_encoding(bytes: &[u8]) -> &'static Encoding {
    let charset = chardet::detect(bytes).0;

    encoding_for_label(&charset).unwrap_or_else(|| {
        tracing::debug!(%charset, "unknown charset, using windows-1252");
        WINDOWS_1252
    })
}

/// Decode bytes to text with `encoding`. A byte-order mark overrides
/// `encoding` and is removed; malformed sequences become U+FFFD.
pub fn decode_content<'a>(bytes: &'a [u8], encoding: &'static Encoding) -> Cow<'a, str> {
    encoding.decode(bytes).0
}

/// Decode a source file into text, stripping a leading byte-order mark.
///
/// Returns the text and the encoding that was used.
pub fn decode_auto(bytes: &[u8]) -> (Cow<'_, str>, &'static Encoding) {
    let encoding = match std::str::from_utf8(bytes) {
        Ok(_) => UTF_8,
        Err(_) => detect_encoding(bytes),
    };

    let (text, used, _) = encoding.decode(bytes);
    (text, used)
}
