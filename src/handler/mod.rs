//! Request handler module
//!
//! Handlers compose: the router picks a mount, the mount's handler chain
//! (isolation headers, prefix strip, file server) produces the response.
//!
//! A handler receives the pending response header map by value. Headers a
//! wrapper places there before delegating end up on whatever response the
//! inner handler returns, error responses included.

pub mod isolation;
pub mod prefix;
pub mod router;
pub mod static_files;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{self, HeaderMap};
use hyper::{Method, Request, Response};
use std::future::Future;
use std::pin::Pin;

pub use isolation::isolate;
pub use prefix::StripPrefix;
pub use router::{handle_request, Router};
pub use static_files::FileServer;

/// Boxed response future returned by [`Handler::serve`]
pub type HandlerFuture<'a> = Pin<Box<dyn Future<Output = Response<Full<Bytes>>> + Send + 'a>>;

/// Anything that turns a request into a response
pub trait Handler: Send + Sync {
    /// Serve `ctx`, merging `headers` into the returned response
    fn serve<'a>(&'a self, ctx: &'a RequestContext, headers: HeaderMap) -> HandlerFuture<'a>;
}

/// Request context encapsulating information needed for request processing
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub method: Method,
    /// Percent-decoded request path
    pub path: String,
    /// Raw query string, without `?`
    pub query: Option<String>,
    pub if_modified_since: Option<String>,
    pub range_header: Option<String>,
}

impl RequestContext {
    /// Capture what the handlers need from `req`, using an already decoded path
    pub fn from_request<B>(req: &Request<B>, path: String) -> Self {
        let header_value = |name: header::HeaderName| {
            req.headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(ToString::to_string)
        };

        Self {
            method: req.method().clone(),
            path,
            query: req.uri().query().map(ToString::to_string),
            if_modified_since: header_value(header::IF_MODIFIED_SINCE),
            range_header: header_value(header::RANGE),
        }
    }

    pub fn is_head(&self) -> bool {
        self.method == Method::HEAD
    }

    /// Same request with a different path
    #[must_use]
    pub fn with_path(&self, path: String) -> Self {
        Self {
            path,
            ..self.clone()
        }
    }
}
