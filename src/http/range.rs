//! HTTP Range request parsing module
//!
//! Single byte-range support (RFC 9110 section 14). Multi-range requests are
//! answered with the full representation.

/// Inclusive byte span resolved against a file size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: u64,
    pub end: u64,
}

impl ByteRange {
    pub const fn length(self) -> u64 {
        self.end - self.start + 1
    }

    /// `Content-Range` header value for this span
    pub fn content_range(self, total: u64) -> String {
        format!("bytes {}-{}/{total}", self.start, self.end)
    }
}

/// Range header parse result
#[derive(Debug, PartialEq, Eq)]
pub enum RangeParseResult {
    /// Serve only this span (206)
    Valid(ByteRange),
    /// Syntactically fine but outside the file (416)
    NotSatisfiable,
    /// No usable Range header, serve everything
    None,
}

/// Parse a `Range` header value against a file of `size` bytes
pub fn parse_range_header(range_header: Option<&str>, size: u64) -> RangeParseResult {
    let Some(spec) = range_header.and_then(|h| h.trim().strip_prefix("bytes=")) else {
        return RangeParseResult::None;
    };
    if spec.contains(',') {
        return RangeParseResult::None;
    }
    let Some((first, last)) = spec.split_once('-') else {
        return RangeParseResult::None;
    };

    match (first.trim(), last.trim()) {
        ("", suffix) => suffix_range(suffix, size),
        (start, end) => bounded_range(start, end, size),
    }
}

// "-500": the last 500 bytes
fn suffix_range(suffix: &str, size: u64) -> RangeParseResult {
    let Ok(suffix) = suffix.parse::<u64>() else {
        return RangeParseResult::None;
    };
    if suffix == 0 || size == 0 {
        return RangeParseResult::NotSatisfiable;
    }
    RangeParseResult::Valid(ByteRange {
        start: size.saturating_sub(suffix),
        end: size - 1,
    })
}

// "100-" or "100-199"
fn bounded_range(start: &str, end: &str, size: u64) -> RangeParseResult {
    let Ok(start) = start.parse::<u64>() else {
        return RangeParseResult::None;
    };
    if start >= size {
        return RangeParseResult::NotSatisfiable;
    }

    let end = if end.is_empty() {
        size - 1
    } else {
        match end.parse::<u64>() {
            Ok(e) if e < start => return RangeParseResult::None,
            Ok(e) => e.min(size - 1),
            Err(_) => return RangeParseResult::None,
        }
    };

    RangeParseResult::Valid(ByteRange { start, end })
}
