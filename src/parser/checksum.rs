//! NMEA 0183 checksum validation
//!
//! The checksum is the XOR of every character between the leading `$` and the
//! `*` delimiter, transmitted as two hexadecimal digits.

use crate::error::SentenceError;

/// Compute the checksum of a sentence body (the text between `$` and `*`)
pub fn checksum(body: &str) -> String {
    let value = body.chars().fold(0u32, |acc, c| acc ^ c as u32);
    format!("{:02x}", value)
}

/// Verify the checksum of a full sentence line.
///
/// The first character (the `$` marker) is excluded from the computation and
/// the transmitted checksum is compared case-insensitively.
pub fn verify_checksum(line: &str) -> Result<(), SentenceError> {
    let mut parts = line.split('*');
    let (body, transmitted) = match (parts.next(), parts.next(), parts.next()) {
        (Some(body), Some(transmitted), None) => (body, transmitted),
        _ => return Err(SentenceError::MissingChecksum),
    };

    let mut chars = body.chars();
    chars.next();
    let expected = checksum(chars.as_str());

    if expected.eq_ignore_ascii_case(transmitted) {
        Ok(())
    } else {
        Err(SentenceError::ChecksumMismatch {
            expected,
            actual: transmitted.to_string(),
        })
    }
}

/// Boolean form of [`verify_checksum`]
pub fn is_valid_sentence(line: &str) -> bool {
    verify_checksum(line).is_ok()
}
