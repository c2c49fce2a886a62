//! MIME type detection module
//!
//! Content-Type comes from the file extension first; files with an unknown
//! or missing extension are sniffed from their leading bytes.

/// Number of leading bytes inspected when sniffing
const SNIFF_LEN: usize = 512;

const HTML_SIGNATURES: &[&[u8]] = &[
    b"<!doctype html",
    b"<html",
    b"<head",
    b"<body",
    b"<script",
    b"<h1",
    b"<div",
    b"<p",
    b"<!--",
];

/// Get MIME Content-Type based on file extension
pub fn get_content_type(extension: Option<&str>) -> Option<&'static str> {
    let ext = extension?.to_ascii_lowercase();
    let content_type = match ext.as_str() {
        // Text
        "html" | "htm" => "text/html; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "txt" | "md" => "text/plain; charset=utf-8",
        "xml" => "text/xml; charset=utf-8",
        "csv" => "text/csv; charset=utf-8",

        // JavaScript/WASM
        "js" | "mjs" | "cjs" => "text/javascript; charset=utf-8",
        "json" | "map" => "application/json",
        "wasm" => "application/wasm",

        // Images
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "webp" => "image/webp",
        "avif" => "image/avif",

        // Video
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "ogv" => "video/ogg",

        // Audio
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "ogg" => "audio/ogg",
        "flac" => "audio/flac",

        // Fonts
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        "otf" => "font/otf",

        // Documents
        "pdf" => "application/pdf",
        "zip" => "application/zip",
        "gz" => "application/gzip",
        "tar" => "application/x-tar",

        _ => return None,
    };
    Some(content_type)
}

/// Guess a Content-Type from the first bytes of a file
pub fn sniff_content_type(data: &[u8]) -> &'static str {
    let head = &data[..data.len().min(SNIFF_LEN)];
    let trimmed = trim_leading_whitespace(head);

    if HTML_SIGNATURES
        .iter()
        .any(|sig| starts_with_ignore_case(trimmed, sig) && tag_terminated(trimmed, sig.len()))
    {
        return "text/html; charset=utf-8";
    }

    if looks_like_text(head) {
        "text/plain; charset=utf-8"
    } else {
        "application/octet-stream"
    }
}

/// Resolve the Content-Type for a file from its extension and content
pub fn content_type_for(extension: Option<&str>, data: &[u8]) -> &'static str {
    get_content_type(extension).unwrap_or_else(|| sniff_content_type(data))
}

fn trim_leading_whitespace(data: &[u8]) -> &[u8] {
    let start = data
        .iter()
        .position(|b| !matches!(b, b'\t' | b'\n' | b'\x0c' | b'\r' | b' '))
        .unwrap_or(data.len());
    &data[start..]
}

fn starts_with_ignore_case(data: &[u8], prefix: &[u8]) -> bool {
    data.len() >= prefix.len() && data[..prefix.len()].eq_ignore_ascii_case(prefix)
}

// An HTML tag must be followed by a space or '>' to count ("<p" vs "<pre").
fn tag_terminated(data: &[u8], at: usize) -> bool {
    matches!(data.get(at), Some(b' ' | b'>')) || data[..at].ends_with(b"--")
}

fn looks_like_text(data: &[u8]) -> bool {
    // A cut in the middle of a multi-byte character is still text
    let valid = match std::str::from_utf8(data) {
        Ok(_) => true,
        Err(e) => e.error_len().is_none(),
    };
    valid
        && !data
            .iter()
            .any(|&b| b < 0x20 && !matches!(b, b'\t' | b'\n' | b'\r' | b'\x0c' | b'\x1b'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_types() {
        assert_eq!(get_content_type(Some("html")), Some("text/html; charset=utf-8"));
        assert_eq!(get_content_type(Some("css")), Some("text/css; charset=utf-8"));
        assert_eq!(
            get_content_type(Some("js")),
            Some("text/javascript; charset=utf-8")
        );
        assert_eq!(get_content_type(Some("wasm")), Some("application/wasm"));
        assert_eq!(get_content_type(Some("PNG")), Some("image/png"));
    }

    #[test]
    fn test_unknown_extension() {
        assert_eq!(get_content_type(Some("xyz")), None);
        assert_eq!(get_content_type(None), None);
    }

    #[test]
    fn test_sniff_html() {
        assert_eq!(
            sniff_content_type(b"  <!DOCTYPE html><html></html>"),
            "text/html; charset=utf-8"
        );
        assert_eq!(sniff_content_type(b"<h1>hi</h1>"), "text/html; charset=utf-8");
    }

    #[test]
    fn test_sniff_text_and_binary() {
        assert_eq!(sniff_content_type(b"plain notes\n"), "text/plain; charset=utf-8");
        assert_eq!(sniff_content_type(b"<pre>x"), "text/plain; charset=utf-8");
        assert_eq!(
            sniff_content_type(&[0x00, 0x61, 0x73, 0x6d]),
            "application/octet-stream"
        );
    }

    #[test]
    fn test_extension_wins_over_content() {
        assert_eq!(content_type_for(Some("js"), b"<html>"), "text/javascript; charset=utf-8");
        assert_eq!(content_type_for(None, b"<html>"), "text/html; charset=utf-8");
    }
}
