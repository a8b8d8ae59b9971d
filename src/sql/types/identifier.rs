//! Identifier (UUID) codec
//!
//! Textual form is lowercase `xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx`; the
//! binary form is the 16 bytes of the hyphen-stripped hex, left to right.

use uuid::Uuid;

use crate::error::{Result, ValueError};

const HYPHENS: [usize; 4] = [8, 13, 18, 23];

/// Checks `text` against the canonical lowercase 8-4-4-4-12 layout
pub fn is_identifier(text: &str) -> bool {
    text.len() == 36
        && text.char_indices().all(|(i, c)| {
            if HYPHENS.contains(&i) {
                c == '-'
            } else {
                c.is_ascii_digit() || ('a'..='f').contains(&c)
            }
        })
}

pub fn parse_identifier(text: &str) -> Result<[u8; 16]> {
    if !is_identifier(text) {
        return Err(ValueError::InvalidIdentifier(text.to_string()).into());
    }
    let id = Uuid::parse_str(text).map_err(|_| ValueError::InvalidIdentifier(text.to_string()))?;
    Ok(*id.as_bytes())
}

pub fn format_identifier(bytes: &[u8; 16]) -> String {
    Uuid::from_bytes(*bytes).hyphenated().to_string()
}

/// Generates a random identifier in its textual form
pub fn new_identifier() -> String {
    Uuid::new_v4().hyphenated().to_string()
}
