//! Transport codec: data-URL encoding of file bytes
//!
//! Files travel as `data:<mime>;base64,<payload>` strings so the MIME type
//! survives the round trip through the store. Decoding tolerates the noise
//! real transports introduce: stray whitespace, NUL bytes, and stripped
//! `=` padding.

use crate::{DropError, Result};
use base64::Engine;

const PREFIX: &str = "data:";
const SEPARATOR: &str = ";base64,";

/// Encode bytes and a MIME type as a data URL
pub fn encode(bytes: &[u8], mime_type: &str) -> String {
    format!(
        "{}{}{}{}",
        PREFIX,
        mime_type,
        SEPARATOR,
        base64::engine::general_purpose::STANDARD.encode(bytes)
    )
}

/// Decode a data URL back into bytes and a MIME type
pub fn decode(text: &str) -> Result<(Vec<u8>, String)> {
    let rest = text
        .strip_prefix(PREFIX)
        .ok_or_else(|| DropError::Format("missing data: prefix".to_string()))?;

    // Media types may carry parameters (`text/plain;charset=utf-8`), so the
    // separator is the last `;base64,`; the payload alphabet cannot contain
    // a `;`, so the split is unambiguous.
    let sep = rest
        .rfind(SEPARATOR)
        .ok_or_else(|| DropError::Format("missing ;base64, separator".to_string()))?;
    let (mime_type, payload) = (&rest[..sep], &rest[sep + SEPARATOR.len()..]);

    if mime_type.is_empty() || !is_valid_mime(mime_type) {
        return Err(DropError::Format(format!(
            "malformed mime type: {:?}",
            mime_type
        )));
    }

    // Transport round-trips insert NULs and whitespace; strip before validating
    let mut cleaned: String = payload
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '\0')
        .collect();

    // Repair stripped padding
    while cleaned.len() % 4 != 0 {
        cleaned.push('=');
    }

    if !cleaned
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'+' || b == b'/' || b == b'=')
    {
        return Err(DropError::Format(
            "payload contains bytes outside the base64 alphabet".to_string(),
        ));
    }

    let bytes = base64::engine::general_purpose::STANDARD
        .decode(&cleaned)
        .map_err(|e| DropError::Format(format!("invalid base64 payload: {}", e)))?;

    Ok((bytes, mime_type.to_string()))
}

// Media type plus optional parameters, e.g. `text/plain;charset=utf-8`
fn is_valid_mime(mime: &str) -> bool {
    mime.bytes().all(|b| {
        b.is_ascii_alphanumeric() || matches!(b, b'/' | b'-' | b'+' | b'.' | b';' | b'=' | b' ')
    })
}
