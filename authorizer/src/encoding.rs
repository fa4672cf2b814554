//! String and base64 helpers shared by both authorizers.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::{Error, Result};

/// Strips every character outside `[A-Za-z0-9]` from an identity string.
///
/// The gateway requires principal identifiers to be alphanumeric. The
/// result may be empty (e.g. for `"---"` or `""`); callers must treat an
/// empty result as a contract violation and deny.
pub fn sanitize_principal(s: &str) -> String {
    s.chars().filter(|c| c.is_ascii_alphanumeric()).collect()
}

/// Decodes base64 accepting either the standard or the url-safe alphabet,
/// with or without padding.
///
/// Token segments arrive base64url-encoded without padding, while MQTT
/// passwords arrive standard-encoded with padding; both funnel through
/// here. Empty input decodes to empty output. Input whose unpadded length
/// is 1 (mod 4) cannot be valid base64 of any alphabet and is rejected.
pub fn decode_base64_forgiving(s: &str) -> Result<Vec<u8>> {
    let mut normalized: String = s
        .trim()
        .chars()
        .filter(|c| *c != '=')
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            c => c,
        })
        .collect();

    match normalized.len() % 4 {
        0 => {}
        2 => normalized.push_str("=="),
        3 => normalized.push('='),
        _ => return Err(Error::Base64(base64::DecodeError::InvalidLength(normalized.len()))),
    }

    Ok(STANDARD.decode(&normalized)?)
}
