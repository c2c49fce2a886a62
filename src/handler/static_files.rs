//! Static file serving module
//!
//! Resolves request paths under a root directory, handles directory index
//! and trailing-slash redirects, and builds file responses with
//! `Last-Modified`, conditional and byte-range support.

use super::{Handler, HandlerFuture, RequestContext};
use crate::http::{self, cache, mime, path, range::RangeParseResult};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::HeaderMap;
use hyper::{Method, Response};
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tokio::fs;

/// File served for a directory request ending in `/`
const INDEX_FILE: &str = "index.html";

/// Serves files below a fixed root directory
#[derive(Debug, Clone)]
pub struct FileServer {
    root: PathBuf,
}

impl FileServer {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    async fn serve_path(&self, ctx: &RequestContext) -> Response<Full<Bytes>> {
        let request_path = if ctx.path.starts_with('/') {
            ctx.path.clone()
        } else {
            format!("/{}", ctx.path)
        };
        let file_path = path::resolve_under(&self.root, &request_path);

        let metadata = match fs::metadata(&file_path).await {
            Ok(m) => m,
            Err(e) => return error_response(&file_path, &e),
        };

        if metadata.is_dir() {
            if !request_path.ends_with('/') {
                let target = format!("{}/", path::encode_path(path::base_name(&request_path)));
                let location = path::with_query(&target, ctx.query.as_deref());
                return http::build_redirect_response(&location);
            }
            return self.serve_index(ctx, &file_path).await;
        }

        if request_path.ends_with('/') {
            let target = format!("../{}", path::encode_path(path::base_name(&request_path)));
            let location = path::with_query(&target, ctx.query.as_deref());
            return http::build_redirect_response(&location);
        }

        serve_file(ctx, &file_path, metadata.modified().ok()).await
    }

    async fn serve_index(&self, ctx: &RequestContext, dir: &Path) -> Response<Full<Bytes>> {
        let index_path = dir.join(INDEX_FILE);
        match fs::metadata(&index_path).await {
            Ok(m) if m.is_file() => serve_file(ctx, &index_path, m.modified().ok()).await,
            // No directory listing: a directory without index is not found
            Ok(_) => http::build_404_response(),
            Err(e) => error_response(&index_path, &e),
        }
    }
}

impl Handler for FileServer {
    fn serve<'a>(&'a self, ctx: &'a RequestContext, headers: HeaderMap) -> HandlerFuture<'a> {
        Box::pin(async move { http::merge_headers(self.serve_path(ctx).await, &headers) })
    }
}

/// Read a file and answer with 200, 206, 304 or 416
async fn serve_file(
    ctx: &RequestContext,
    file_path: &Path,
    modified: Option<SystemTime>,
) -> Response<Full<Bytes>> {
    let last_modified = modified.map(cache::format_http_date);

    if matches!(ctx.method, Method::GET | Method::HEAD)
        && cache::not_modified_since(ctx.if_modified_since.as_deref(), modified)
    {
        return http::build_304_response(last_modified.as_deref());
    }

    let content = match fs::read(file_path).await {
        Ok(c) => Bytes::from(c),
        Err(e) => return error_response(file_path, &e),
    };
    let content_type =
        mime::content_type_for(file_path.extension().and_then(|e| e.to_str()), &content);
    let total_size = content.len() as u64;

    match http::parse_range_header(ctx.range_header.as_deref(), total_size) {
        RangeParseResult::Valid(range) => {
            let (start, end) = match (usize::try_from(range.start), usize::try_from(range.end)) {
                (Ok(s), Ok(e)) => (s, e),
                _ => return http::build_416_response(total_size),
            };
            http::response::build_partial_response(
                content.slice(start..=end),
                content_type,
                last_modified.as_deref(),
                range,
                total_size,
                ctx.is_head(),
            )
        }
        RangeParseResult::NotSatisfiable => http::build_416_response(total_size),
        RangeParseResult::None => http::response::build_file_response(
            content,
            content_type,
            last_modified.as_deref(),
            ctx.is_head(),
        ),
    }
}

/// Map a filesystem error to 404, 403 or 500
fn error_response(file_path: &Path, err: &io::Error) -> Response<Full<Bytes>> {
    match err.kind() {
        // Missing files are routine, not worth a log line
        io::ErrorKind::NotFound | io::ErrorKind::NotADirectory => http::build_404_response(),
        io::ErrorKind::PermissionDenied => {
            logger::log_warning(&format!("Permission denied: {}", file_path.display()));
            http::build_403_response()
        }
        _ => {
            logger::log_error(&format!(
                "Failed to read '{}': {err}",
                file_path.display()
            ));
            http::build_500_response()
        }
    }
}
