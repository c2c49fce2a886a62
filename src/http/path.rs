//! URL path normalisation
//!
//! Lexical cleaning of request paths and percent-encoding helpers shared by
//! the router and the file server.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

/// Percent-decode a raw URI path. `None` if the result is not UTF-8.
pub fn decode_path(raw: &str) -> Option<Cow<'_, str>> {
    urlencoding::decode(raw).ok()
}

/// Percent-encode a path segment by segment, keeping the `/` separators
pub fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// Canonical form of a URL path
///
/// Always rooted, `.` and empty segments dropped, `..` resolved lexically
/// (never above `/`). A trailing slash survives unless the result is `/`.
pub fn clean_path(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }

    let mut cleaned = format!("/{}", segments.join("/"));
    if cleaned != "/" && path.ends_with('/') {
        cleaned.push('/');
    }
    cleaned
}

/// Join a request path under `root` after cleaning it
///
/// The cleaned path has no `..` left, so the result cannot escape `root`.
pub fn resolve_under(root: &Path, path: &str) -> PathBuf {
    let cleaned = clean_path(path);
    let mut resolved = root.to_path_buf();
    resolved.extend(cleaned.split('/').filter(|s| !s.is_empty()));
    resolved
}

/// Last non-empty segment of a URL path ("" for `/`)
pub fn base_name(path: &str) -> &str {
    path.trim_end_matches('/').rsplit('/').next().unwrap_or("")
}

/// Append `?query` to a location when a query string is present
pub fn with_query(location: &str, query: Option<&str>) -> String {
    match query {
        Some(q) if !q.is_empty() => format!("{location}?{q}"),
        _ => location.to_string(),
    }
}
