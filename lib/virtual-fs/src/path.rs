//! Lexical path handling shared by every backend.
//!
//! Paths are always `/` separated and never touch the host filesystem, so
//! symlinks play no part in normalization.

use std::path::Path;

/// Joins `segments` with `/` and cleans the result.
///
/// Empty segments are ignored; joining nothing (or only empty segments)
/// yields an empty string.
pub fn join(segments: &[&str]) -> String {
    let parts: Vec<&str> = segments
        .iter()
        .copied()
        .filter(|segment| !segment.is_empty())
        .collect();

    if parts.is_empty() {
        return String::new();
    }

    clean(&parts.join("/"))
}

/// Returns the shortest lexical equivalent of `path`.
///
/// Repeated separators and `.` segments are dropped and `..` removes the
/// previous segment. `..` never climbs above the start of the path. A
/// leading `/` is kept, and a relative path that cleans to nothing becomes
/// `"."`.
pub fn clean(path: &str) -> String {
    let rooted = path.starts_with('/');
    let mut stack: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                stack.pop();
            }
            other => stack.push(other),
        }
    }

    match (rooted, stack.is_empty()) {
        (true, _) => format!("/{}", stack.join("/")),
        (false, true) => ".".to_string(),
        (false, false) => stack.join("/"),
    }
}

/// Computes the lookup key of `path` inside `scope`.
///
/// The path is cleaned as if it were absolute before it is appended to
/// the scope, so `..` can never leave the scope. The key has no leading
/// `/` and the scope root itself maps to `""`.
pub fn scoped_key(scope: &str, path: &Path) -> String {
    let inner = clean(&format!("/{}", path.to_string_lossy()));
    let key = clean(&format!("{}/{}", clean(scope), inner));
    let key = key.trim_start_matches('/');

    if key == "." {
        String::new()
    } else {
        key.to_string()
    }
}

/// The lookup key of `path` relative to the root of a filesystem.
pub fn key(path: &Path) -> String {
    scoped_key("", path)
}

/// Splits a key into its parent key and base name.
pub fn split(key: &str) -> (&str, &str) {
    match key.rfind('/') {
        Some(index) => (&key[..index], &key[index + 1..]),
        None => ("", key),
    }
}
