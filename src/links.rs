// SPDX-License-Identifier: MIT OR Apache-2.0

//! Link construction and path helpers shared by the search box and the tree.

/// Link to a file's source view.
pub fn source(file_id: &str) -> String {
    format!("source/?file={file_id}")
}

/// Link to a specific line of a file's source view.
pub fn source_at(file_id: u64, line: u32) -> String {
    format!("source/?file={file_id}&line={line}")
}

/// Literal full-text search link for a raw query.
pub fn full_text_search(query: &str) -> String {
    format!("search?query={query}")
}

/// Final segment of a path. Directory paths keep a trailing slash in the
/// listing API; it is ignored here.
pub fn base_name(path: &str) -> &str {
    let trimmed = path.strip_suffix('/').unwrap_or(path);
    match trimmed.rfind('/') {
        Some(pos) => &trimmed[pos + 1..],
        None => trimmed,
    }
}

/// True when `full` starts with `prefix`.
pub fn is_prefix_of(full: &str, prefix: &str) -> bool {
    full.starts_with(prefix)
}
