//! Folder and file name generation.

use crate::error::{Error, Result};

/// Characters stripped from titles before they become path components.
const STRIPPED: &[char] = &[
    '@', '#', '$', '%', '&', '*', '/', '\\', ':', '^', '{', '}', '<', '>', '?', '"', '|',
];

/// Strip characters that are unsafe in file names and trim the result.
///
/// Titles arrive in Portuguese with accents; those are kept untouched.
pub fn sanitize_string(name: &str) -> String {
    name.chars()
        .filter(|c| !STRIPPED.contains(c) && !c.is_control())
        .collect::<String>()
        .trim()
        .to_string()
}

/// Sanitize a title for use as a single path component.
///
/// Returns an error when nothing usable is left, or when the result would
/// refer to the current or parent directory.
pub fn sanitize_path_component(name: &str) -> Result<String> {
    let sanitized = sanitize_string(name);

    if sanitized.is_empty() {
        return Err(Error::InvalidFilename(format!(
            "'{}' is empty after sanitizing",
            name
        )));
    }

    if sanitized.chars().all(|c| c == '.') {
        return Err(Error::InvalidFilename(format!(
            "Path traversal detected: '{}'",
            name
        )));
    }

    Ok(sanitized)
}

/// Sanitize a title, falling back to `fallback` when nothing usable is left.
pub fn component_or(name: &str, fallback: &str) -> String {
    sanitize_path_component(name).unwrap_or_else(|_| fallback.to_string())
}

/// Prefix a title with its one-based position: `"03. Title"`.
pub fn numbered_name(index: usize, title: &str) -> String {
    format!("{:02}. {}", index, title)
}
