//! Helpers for pulling structured data out of free-text completions
//!
//! Models often wrap the JSON payload in prose or code fences, so the
//! outermost `{..}` (or `[..]`) span is extracted before deserializing.

use serde::de::DeserializeOwned;

use crate::error::{Error, Result};

const MAX_RAW_IN_ERROR: usize = 200;

fn truncated(text: &str) -> String {
    if text.len() > MAX_RAW_IN_ERROR {
        let mut end = MAX_RAW_IN_ERROR;
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &text[..end])
    } else {
        text.to_string()
    }
}

fn extract_between<T: DeserializeOwned>(response: &str, open: char, close: char) -> Result<T> {
    let response = response.trim();
    match (response.find(open), response.rfind(close)) {
        (Some(s), Some(e)) if s < e => {
            let json_str = &response[s..=e];
            serde_json::from_str(json_str).map_err(|e| {
                Error::InvalidData(format!(
                    "Invalid JSON in completion: {} | Raw: {}",
                    e,
                    truncated(json_str)
                ))
            })
        }
        _ => Err(Error::InvalidData(format!(
            "No JSON found in completion | Raw: {}",
            truncated(response)
        ))),
    }
}

/// Deserialize the first `{` .. last `}` span of a reply
pub fn extract_json_object<T: DeserializeOwned>(response: &str) -> Result<T> {
    extract_between(response, '{', '}')
}

/// Deserialize the first `[` .. last `]` span of a reply
pub fn extract_json_array<T: DeserializeOwned>(response: &str) -> Result<Vec<T>> {
    extract_between(response, '[', ']')
}

/// Non-empty lines with surrounding whitespace and bullet markers removed
pub fn response_lines(response: &str) -> Vec<String> {
    response
        .lines()
        .map(strip_bullet)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Trim whitespace and leading/trailing list markers ("-", "*", "•")
pub fn strip_bullet(line: &str) -> &str {
    line.trim_matches(|c: char| c.is_whitespace() || matches!(c, '-' | '*' | '•'))
}
