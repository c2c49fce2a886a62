//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: path decoding and cleaning,
//! mount selection (longest prefix wins) and dispatch.

use super::isolation::set_isolation_headers;
use super::{isolate, FileServer, Handler, RequestContext, StripPrefix};
use crate::config::ListenerConfig;
use crate::http::{self, path};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::HeaderMap;
use hyper::{Method, Request, Response};
use std::convert::Infallible;

/// A handler registered under a URL prefix
struct Mount {
    prefix: String,
    handler: Box<dyn Handler>,
}

/// Prefix router over a fixed set of mounts
#[derive(Default)]
pub struct Router {
    /// Sorted longest prefix first
    mounts: Vec<Mount>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for every path starting with `prefix`
    #[must_use]
    pub fn mount(mut self, prefix: impl Into<String>, handler: impl Handler + 'static) -> Self {
        self.mounts.push(Mount {
            prefix: prefix.into(),
            handler: Box::new(handler),
        });
        self.mounts.sort_by_key(|m| std::cmp::Reverse(m.prefix.len()));
        self
    }

    /// The gateway's two mounts: dependency root under its prefix, serving
    /// root for everything else. Both answer with isolation headers.
    pub fn from_listener_config(cfg: &ListenerConfig) -> Self {
        let prefix = cfg.dependency_prefix.clone();
        Self::new()
            .mount(
                prefix.clone(),
                isolate(StripPrefix::new(
                    prefix,
                    FileServer::new(&cfg.dependency_root),
                )),
            )
            .mount("/", isolate(FileServer::new(&cfg.serving_root)))
    }

    /// Route a request to its mount and produce the response
    pub async fn route<B>(&self, req: Request<B>) -> Response<Full<Bytes>> {
        let raw_path = req.uri().path();
        let query = req.uri().query();

        // Asterisk form addresses the server, not a file
        if raw_path == "*" {
            let response = if *req.method() == Method::OPTIONS {
                http::build_options_response()
            } else {
                http::build_400_response()
            };
            return router_response(response);
        }

        let Some(decoded) = path::decode_path(raw_path) else {
            return router_response(http::build_400_response());
        };

        let cleaned = path::clean_path(&decoded);
        if cleaned != decoded {
            let location = path::with_query(&path::encode_path(&cleaned), query);
            return router_response(http::build_redirect_response(&location));
        }

        if let Some(mount) = self.subtree_root(&cleaned) {
            let location = path::with_query(&path::encode_path(&mount.prefix), query);
            return router_response(http::build_redirect_response(&location));
        }

        let Some(mount) = self.find(&cleaned) else {
            return router_response(http::build_404_response());
        };

        let ctx = RequestContext::from_request(&req, cleaned);
        mount.handler.serve(&ctx, HeaderMap::new()).await
    }

    /// Longest mount prefix matching `path`
    fn find(&self, path: &str) -> Option<&Mount> {
        self.mounts.iter().find(|m| path.starts_with(m.prefix.as_str()))
    }

    /// Mount whose prefix is `path` plus a trailing slash (`/node_modules`)
    fn subtree_root(&self, path: &str) -> Option<&Mount> {
        self.mounts.iter().find(|m| {
            m.prefix.len() > 1 && m.prefix.strip_suffix('/') == Some(path)
        })
    }
}

/// Responses produced by the router itself still carry the isolation headers
fn router_response(response: Response<Full<Bytes>>) -> Response<Full<Bytes>> {
    let mut headers = HeaderMap::new();
    set_isolation_headers(&mut headers);
    http::merge_headers(response, &headers)
}

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    router: &Router,
) -> Result<Response<Full<Bytes>>, Infallible> {
    Ok(router.route(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use hyper::{header, StatusCode};
    use std::fs;

    const COOP: &str = "cross-origin-opener-policy";
    const COEP: &str = "cross-origin-embedder-policy";

    /// `<tmp>/app` is the serving root, `<tmp>/node_modules` the dependency root
    struct Workspace {
        _dir: tempfile::TempDir,
        router: Router,
    }

    fn workspace() -> Workspace {
        let dir = tempfile::tempdir().unwrap();
        let app = dir.path().join("app");
        let deps = dir.path().join("node_modules");
        fs::create_dir_all(app.join("assets")).unwrap();
        fs::create_dir_all(deps.join("foo")).unwrap();
        fs::write(app.join("index.html"), "<h1>hi</h1>").unwrap();
        fs::write(app.join("assets/app.js"), "run()").unwrap();
        fs::write(deps.join("foo/bar.js"), "console.log(1)").unwrap();

        let cfg = ListenerConfig {
            serving_root: app,
            dependency_root: deps,
            ..ListenerConfig::default()
        };
        Workspace {
            router: Router::from_listener_config(&cfg),
            _dir: dir,
        }
    }

    async fn send(router: &Router, method: Method, uri: &str) -> Response<Full<Bytes>> {
        let req = Request::builder().method(method).uri(uri).body(()).unwrap();
        handle_request(req, router).await.unwrap()
    }

    async fn get(router: &Router, uri: &str) -> Response<Full<Bytes>> {
        send(router, Method::GET, uri).await
    }

    async fn body_of(resp: Response<Full<Bytes>>) -> String {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn assert_isolated(resp: &Response<Full<Bytes>>) {
        assert_eq!(resp.headers()[COOP], "same-origin");
        assert_eq!(resp.headers()[COEP], "require-corp");
    }

    #[tokio::test]
    async fn test_root_file() {
        let ws = workspace();
        let resp = get(&ws.router, "/index.html").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_isolated(&resp);
        assert_eq!(body_of(resp).await, "<h1>hi</h1>");
    }

    #[tokio::test]
    async fn test_dependency_file() {
        let ws = workspace();
        let resp = get(&ws.router, "/node_modules/foo/bar.js").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers()[header::CONTENT_TYPE],
            "text/javascript; charset=utf-8"
        );
        assert_isolated(&resp);
        assert_eq!(body_of(resp).await, "console.log(1)");
    }

    #[tokio::test]
    async fn test_missing_dependency_is_404() {
        let ws = workspace();
        let resp = get(&ws.router, "/node_modules/does-not-exist.js").await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_isolated(&resp);
    }

    #[tokio::test]
    async fn test_missing_root_file_is_404() {
        let ws = workspace();
        let resp = get(&ws.router, "/missing-file.txt").await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_isolated(&resp);
    }

    #[tokio::test]
    async fn test_dependency_prefix_does_not_reach_serving_root() {
        let ws = workspace();
        // index.html lives in the serving root only
        let resp = get(&ws.router, "/node_modules/index.html").await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_prefix_without_slash_redirects() {
        let ws = workspace();
        let resp = get(&ws.router, "/node_modules?x=1").await;
        assert_eq!(resp.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(resp.headers()[header::LOCATION], "/node_modules/?x=1");
        assert_isolated(&resp);
    }

    #[tokio::test]
    async fn test_unclean_path_redirects() {
        let ws = workspace();
        let resp = get(&ws.router, "/node_modules/../index.html").await;
        assert_eq!(resp.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(resp.headers()[header::LOCATION], "/index.html");
        assert_isolated(&resp);

        let resp = get(&ws.router, "/assets//app.js").await;
        assert_eq!(resp.headers()[header::LOCATION], "/assets/app.js");
    }

    #[tokio::test]
    async fn test_encoded_traversal_is_cleaned() {
        let ws = workspace();
        let resp = get(&ws.router, "/node_modules/%2e%2e/%2e%2e/etc/passwd").await;
        assert_eq!(resp.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(resp.headers()[header::LOCATION], "/etc/passwd");
    }

    #[tokio::test]
    async fn test_invalid_encoding_is_400() {
        let ws = workspace();
        let resp = get(&ws.router, "/%ff.txt").await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_isolated(&resp);
    }

    #[tokio::test]
    async fn test_server_wide_options() {
        let ws = workspace();
        let resp = send(&ws.router, Method::OPTIONS, "*").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(!resp.headers().contains_key(header::LOCATION));
        assert_isolated(&resp);
        assert_eq!(body_of(resp).await, "");

        let resp = send(&ws.router, Method::GET, "*").await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_isolated(&resp);
    }

    #[tokio::test]
    async fn test_unopenable_name_is_500() {
        let ws = workspace();
        // NUL cannot appear in a filesystem path
        let resp = get(&ws.router, "/a%00b").await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_isolated(&resp);
        assert_eq!(body_of(resp).await, "500 Internal Server Error\n");
    }

    #[tokio::test]
    async fn test_percent_encoded_name() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a b.txt"), "spaced").unwrap();
        let router = Router::new().mount("/", isolate(FileServer::new(dir.path())));

        let resp = get(&router, "/a%20b.txt").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_of(resp).await, "spaced");
    }

    #[tokio::test]
    async fn test_directory_redirect_is_relative_to_mount() {
        let ws = workspace();
        let resp = get(&ws.router, "/node_modules/foo").await;
        assert_eq!(resp.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(resp.headers()[header::LOCATION], "foo/");
        assert_isolated(&resp);
    }

    #[tokio::test]
    async fn test_head_and_other_methods() {
        let ws = workspace();
        let resp = send(&ws.router, Method::HEAD, "/index.html").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_isolated(&resp);
        assert_eq!(body_of(resp).await, "");

        let resp = send(&ws.router, Method::POST, "/index.html").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_of(resp).await, "<h1>hi</h1>");
    }

    #[tokio::test]
    async fn test_no_matching_mount_is_404() {
        let router = Router::new();
        let resp = get(&router, "/anything").await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_isolated(&resp);
    }

    #[test]
    fn test_longest_prefix_first() {
        let router = Router::new()
            .mount("/", FileServer::new("."))
            .mount("/node_modules/", FileServer::new("../node_modules"));
        assert_eq!(router.find("/node_modules/x").unwrap().prefix, "/node_modules/");
        assert_eq!(router.find("/node_modulesx").unwrap().prefix, "/");
        assert_eq!(router.find("/src/app.js").unwrap().prefix, "/");
    }
}
