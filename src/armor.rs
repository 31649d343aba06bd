//! Text armor for blobs stored in a gist file.

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::error::{Error, Result};

const LINE_LEN: usize = 64;

/// Base64-encodes `blob`, broken into lines of 64 characters.
pub fn encode(blob: &[u8]) -> String {
    let flat = STANDARD.encode(blob);
    let mut out = String::with_capacity(flat.len() + flat.len() / LINE_LEN);
    // base64 output is ASCII, so any byte offset is a char boundary
    let mut start = 0;
    while start < flat.len() {
        let end = (start + LINE_LEN).min(flat.len());
        if start > 0 {
            out.push('\n');
        }
        out.push_str(&flat[start..end]);
        start = end;
    }
    out
}

/// Decodes base64 text, ignoring any whitespace (line breaks included).
pub fn decode(text: &str) -> Result<Vec<u8>> {
    let compact: String = text.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    STANDARD
        .decode(compact)
        .map_err(|e| Error::Encoding(e.to_string()))
}
