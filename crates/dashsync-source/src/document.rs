//! Body decoding shared by every source.

use serde_json::Value;

use crate::error::{FetchError, Result, SourceKind};

/// Longest response excerpt kept in a status error.
const MAX_EXCERPT_CHARS: usize = 200;

/// Parse a response body as a JSON document.
///
/// A leading UTF-8 byte-order mark is ignored; files saved by some editors
/// carry one.
pub fn parse_document(origin: SourceKind, body: &[u8]) -> Result<Value> {
    let body = body.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(body);
    serde_json::from_slice(body).map_err(|e| FetchError::Parse {
        origin,
        message: e.to_string(),
    })
}

/// Short, lossy excerpt of a response body for error messages.
pub fn excerpt(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if text.chars().count() <= MAX_EXCERPT_CHARS {
        text.to_owned()
    } else {
        let cut: String = text.chars().take(MAX_EXCERPT_CHARS).collect();
        format!("{cut}...")
    }
}
