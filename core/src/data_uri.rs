//! Image transport encoding helpers.
//!
//! All images cross the application boundary as data-URI strings
//! (`data:<mime>;base64,<payload>`). The provider wants the bare base64
//! payload, so the prefix is stripped before transmission and re-attached
//! when a generated payload comes back.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::errors::{TutorError, TutorResult};

/// Returns the base64 payload of a data URI, or the input unchanged when no
/// data-URI prefix is present
pub fn strip_prefix(value: &str) -> &str {
    if value.starts_with("data:") {
        if let Some(idx) = value.find("base64,") {
            return &value[idx + "base64,".len()..];
        }
    }
    value
}

/// Returns the mime type of a data URI, if the input carries one
pub fn mime_type(value: &str) -> Option<&str> {
    let rest = value.strip_prefix("data:")?;
    let end = rest.find(';')?;
    Some(&rest[..end])
}

/// Builds a data URI from a mime type and a base64 payload
pub fn build(mime: &str, payload: &str) -> String {
    format!("data:{};base64,{}", mime, payload)
}

/// Decodes the base64 payload of a data URI into raw bytes
pub fn decode(value: &str) -> TutorResult<Vec<u8>> {
    STANDARD
        .decode(strip_prefix(value))
        .map_err(|e| TutorError::InvalidData(format!("Invalid base64 image payload: {}", e)))
}
