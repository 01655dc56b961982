// src/ai/json_extract.rs
//! Lenient JSON parsing of model output.
//!
//! Models wrap JSON in code fences, prepend chatter, or leave trailing commas.
//! `extract_json` tries, in order: the trimmed text, the fenced body, the first
//! balanced `{...}`/`[...]` block, and finally that block with trailing commas
//! removed.

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::utils::truncate_chars;

const EXCERPT_CHARS: usize = 200;

#[derive(Debug, Error)]
pub enum JsonExtractError {
    #[error("No JSON object found in model output: {excerpt}")]
    NotFound { excerpt: String },

    #[error("Model output is not valid JSON ({source}): {excerpt}")]
    Invalid {
        source: serde_json::Error,
        excerpt: String,
    },
}

pub fn extract_json<T: DeserializeOwned>(raw: &str) -> Result<T, JsonExtractError> {
    let text = strip_json_fences(raw);
    if let Ok(value) = serde_json::from_str(text) {
        return Ok(value);
    }

    let block = find_balanced_block(text).ok_or_else(|| JsonExtractError::NotFound {
        excerpt: truncate_chars(raw.trim(), EXCERPT_CHARS),
    })?;
    if let Ok(value) = serde_json::from_str(block) {
        return Ok(value);
    }

    let repaired = remove_trailing_commas(block);
    serde_json::from_str(&repaired).map_err(|source| JsonExtractError::Invalid {
        source,
        excerpt: truncate_chars(block, EXCERPT_CHARS),
    })
}

/// Body of the first ``` fence, without its language tag. Unfenced text is
/// returned trimmed.
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let Some(start) = text.find("```") else {
        return text;
    };
    let after = text[start + 3..].trim_start_matches(|c: char| c.is_ascii_alphabetic());
    match after.find("```") {
        Some(end) => after[..end].trim(),
        None => after.trim(),
    }
}

/// First `{...}` or `[...]` block whose brackets balance, ignoring brackets
/// inside strings.
pub fn find_balanced_block(text: &str) -> Option<&str> {
    let start = text.find(|c| c == '{' || c == '[')?;
    let mut stack: Vec<char> = Vec::new();
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in text[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            '"' => in_string = true,
            '{' => stack.push('}'),
            '[' => stack.push(']'),
            '}' | ']' => {
                if stack.pop() != Some(c) {
                    return None;
                }
                if stack.is_empty() {
                    return Some(&text[start..start + offset + c.len_utf8()]);
                }
            }
            _ => {}
        }
    }
    None
}

fn remove_trailing_commas(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut in_string = false;
    let mut escaped = false;

    for (i, &c) in chars.iter().enumerate() {
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        if c == ',' {
            let next = chars[i + 1..].iter().find(|n| !n.is_whitespace());
            if matches!(next, Some('}') | Some(']')) {
                continue;
            }
        }
        if c == '"' {
            in_string = true;
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::Value;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Versions {
        versions: Vec<Value>,
    }

    #[test]
    fn test_plain_json() {
        let v: Value = extract_json(r#"  {"a": 1}  "#).unwrap();
        assert_eq!(v["a"], 1);
    }

    #[test]
    fn test_fenced_json() {
        let raw = "```json\n{\"versions\": [1, 2]}\n```";
        let v: Versions = extract_json(raw).unwrap();
        assert_eq!(v.versions.len(), 2);

        assert_eq!(strip_json_fences("```\n[1]\n```"), "[1]");
        assert_eq!(strip_json_fences("[1]"), "[1]");
    }

    #[test]
    fn test_json_surrounded_by_chatter() {
        let raw = "Sure! Here you go:\n{\"versions\": [{\"text\": \"a } brace\"}]}\nHope it helps {";
        let v: Versions = extract_json(raw).unwrap();
        assert_eq!(v.versions[0]["text"], "a } brace");
    }

    #[test]
    fn test_trailing_commas_repaired() {
        let raw = "{\"tweaks\": [{\"field\": \"summary\", \"tweaked\": \"x, ]\",},],}";
        let v: Value = extract_json(raw).unwrap();
        assert_eq!(v["tweaks"][0]["tweaked"], "x, ]");
    }

    #[test]
    fn test_escaped_quotes_in_strings() {
        let block = find_balanced_block(r#"x {"a": "say \"}\" now"} y"#).unwrap();
        assert_eq!(block, r#"{"a": "say \"}\" now"}"#);
    }

    #[test]
    fn test_errors_include_excerpt() {
        let err = extract_json::<Value>("no json here").unwrap_err();
        assert!(matches!(err, JsonExtractError::NotFound { .. }));
        assert!(err.to_string().contains("no json here"));

        let err = extract_json::<Versions>("{\"other\": 1}").unwrap_err();
        assert!(matches!(err, JsonExtractError::Invalid { .. }));
    }
}
