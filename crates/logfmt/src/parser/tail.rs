//! Structured-tail extraction.
//!
//! Console encoders append the structured context of a log call as a JSON
//! object at the end of the line. This module finds that object by brace
//! counting and decodes it.

use serde_json::{Map, Value};

use super::model::ParseError;

/// Split `line` into its trailing JSON object and the text before it.
///
/// Fails with [`ParseError::NoTrailingObject`] when the trimmed line does not
/// end in `}`. A closing brace with no balancing opener, or a span that does
/// not decode as a JSON object, is [`ParseError::MalformedTrailingObject`];
/// no other split point is tried.
///
/// Braces are counted without regard to JSON strings, so a value such as
/// `"a } b"` throws the count off and the extraction fails as malformed.
pub fn extract_tail(line: &[u8]) -> Result<(Map<String, Value>, &[u8]), ParseError> {
    let trimmed = trim_ascii_end(line);
    if !trimmed.ends_with(b"}") {
        return Err(ParseError::NoTrailingObject);
    }

    let start = matching_open_brace(trimmed)
        .ok_or_else(|| ParseError::MalformedTrailingObject("unbalanced braces".to_string()))?;

    let object: Map<String, Value> = serde_json::from_slice(&trimmed[start..])
        .map_err(|e| ParseError::MalformedTrailingObject(e.to_string()))?;

    Ok((object, &line[..start]))
}

/// Index of the `{` that balances the final `}`.
fn matching_open_brace(bytes: &[u8]) -> Option<usize> {
    let mut depth = 0usize;
    for (i, &b) in bytes.iter().enumerate().rev() {
        match b {
            b'}' => depth += 1,
            b'{' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

fn trim_ascii_end(bytes: &[u8]) -> &[u8] {
    let mut end = bytes.len();
    while end > 0 && bytes[end - 1].is_ascii_whitespace() {
        end -= 1;
    }
    &bytes[..end]
}
