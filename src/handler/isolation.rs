//! Cross-origin isolation header wrapper
//!
//! `Isolated<H>` sets `Cross-Origin-Opener-Policy: same-origin` and
//! `Cross-Origin-Embedder-Policy: require-corp` on the pending headers and
//! then hands the whole request to `H`.

use super::{Handler, HandlerFuture, RequestContext};
use hyper::header::{HeaderMap, HeaderName, HeaderValue};

pub const CROSS_ORIGIN_OPENER_POLICY: HeaderName =
    HeaderName::from_static("cross-origin-opener-policy");
pub const CROSS_ORIGIN_EMBEDDER_POLICY: HeaderName =
    HeaderName::from_static("cross-origin-embedder-policy");

/// Insert both isolation headers, replacing any previous values
pub fn set_isolation_headers(headers: &mut HeaderMap) {
    headers.insert(
        CROSS_ORIGIN_OPENER_POLICY,
        HeaderValue::from_static("same-origin"),
    );
    headers.insert(
        CROSS_ORIGIN_EMBEDDER_POLICY,
        HeaderValue::from_static("require-corp"),
    );
}

/// Handler wrapper that attaches the isolation headers to every response
#[derive(Debug, Clone)]
pub struct Isolated<H> {
    inner: H,
}

impl<H> Isolated<H> {
    pub const fn new(inner: H) -> Self {
        Self { inner }
    }
}

/// Wrap `inner` so its responses carry the isolation headers
pub const fn isolate<H: Handler>(inner: H) -> Isolated<H> {
    Isolated::new(inner)
}

impl<H: Handler> Handler for Isolated<H> {
    fn serve<'a>(&'a self, ctx: &'a RequestContext, mut headers: HeaderMap) -> HandlerFuture<'a> {
        set_isolation_headers(&mut headers);
        self.inner.serve(ctx, headers)
    }
}
