// src/utils.rs

/// Make a name safe for file names: whitespace becomes `_`, anything else
/// outside `[A-Za-z0-9_.-]` is dropped.
pub fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
        .collect();
    let cleaned = cleaned.trim_matches('.');

    if cleaned.is_empty() {
        "CV".to_string()
    } else {
        cleaned.to_string()
    }
}

/// Export file name: `{Full_Name}_CV.{ext}`
pub fn export_filename(full_name: &str, extension: &str) -> String {
    format!("{}_CV.{}", sanitize_filename(full_name), extension)
}

/// Shorten text to at most `max` characters, marking the cut.
pub fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max).collect();
    out.push_str("...");
    out
}

pub fn is_http_url(s: &str) -> bool {
    let s = s.trim();
    (s.starts_with("http://") || s.starts_with("https://")) && !s.contains(char::is_whitespace)
}

/// Replace `{open}key{close}` placeholders in a single left-to-right pass.
/// Substituted values are never scanned again, and unknown keys stay as
/// written. Keys are limited to `[A-Za-z0-9_.-]`.
pub fn fill_placeholders<'a>(
    template: &str,
    delimiters: &[(&str, &str)],
    lookup: impl Fn(&str) -> Option<&'a str>,
) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    'scan: while !rest.is_empty() {
        for (open, close) in delimiters {
            let Some(after) = rest.strip_prefix(open) else {
                continue;
            };
            let Some(end) = after.find(close) else {
                continue;
            };
            let key = &after[..end];
            if !is_placeholder_key(key) {
                continue;
            }
            if let Some(value) = lookup(key) {
                out.push_str(value);
                rest = &after[end + close.len()..];
                continue 'scan;
            }
        }

        let mut chars = rest.chars();
        if let Some(c) = chars.next() {
            out.push(c);
        }
        rest = chars.as_str();
    }
    out
}

fn is_placeholder_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
}
