//! Prefix stripping wrapper
//!
//! Removes a fixed URL prefix before delegating, so a mount at
//! `/node_modules/` can serve `/node_modules/foo/bar.js` as `/foo/bar.js`
//! from its own root.

use super::{Handler, HandlerFuture, RequestContext};
use crate::http;
use hyper::header::HeaderMap;

#[derive(Debug, Clone)]
pub struct StripPrefix<H> {
    prefix: String,
    inner: H,
}

impl<H> StripPrefix<H> {
    pub fn new(prefix: impl Into<String>, inner: H) -> Self {
        Self {
            prefix: prefix.into(),
            inner,
        }
    }
}

impl<H: Handler> Handler for StripPrefix<H> {
    fn serve<'a>(&'a self, ctx: &'a RequestContext, headers: HeaderMap) -> HandlerFuture<'a> {
        Box::pin(async move {
            let Some(rest) = ctx.path.strip_prefix(self.prefix.as_str()) else {
                return http::merge_headers(http::build_404_response(), &headers);
            };
            let stripped = ctx.with_path(format!("/{}", rest.trim_start_matches('/')));
            self.inner.serve(&stripped, headers).await
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::{BodyExt, Full};
    use hyper::body::Bytes;
    use hyper::{Method, Response, StatusCode};

    /// Echoes the path it was given as the body
    struct EchoPath;

    impl Handler for EchoPath {
        fn serve<'a>(&'a self, ctx: &'a RequestContext, headers: HeaderMap) -> HandlerFuture<'a> {
            Box::pin(async move {
                let resp = Response::new(Full::new(Bytes::from(ctx.path.clone())));
                http::merge_headers(resp, &headers)
            })
        }
    }

    fn ctx(path: &str) -> RequestContext {
        RequestContext {
            method: Method::GET,
            path: path.to_string(),
            query: None,
            if_modified_since: None,
            range_header: None,
        }
    }

    async fn body_of(resp: Response<Full<Bytes>>) -> String {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_strips_prefix() {
        let handler = StripPrefix::new("/node_modules/", EchoPath);
        let resp = handler.serve(&ctx("/node_modules/foo/bar.js"), HeaderMap::new()).await;
        assert_eq!(body_of(resp).await, "/foo/bar.js");

        let resp = handler.serve(&ctx("/node_modules/"), HeaderMap::new()).await;
        assert_eq!(body_of(resp).await, "/");
    }

    #[tokio::test]
    async fn test_missing_prefix_is_not_found() {
        let handler = StripPrefix::new("/node_modules/", EchoPath);
        let resp = handler.serve(&ctx("/src/app.js"), HeaderMap::new()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
