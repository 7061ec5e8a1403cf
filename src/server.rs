//! Static asset server.
//!
//! Serves the web dashboard assets over HTTP/1 with a single-page-app
//! fallback: any path that does not name an existing file is answered with
//! `index.html`. The current [`Snapshot`] is exposed as JSON at
//! `/api/snapshot` for the browser script to poll.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use parking_lot::RwLock;
//! use safewatch::server::{ServerConfig, StaticServer};
//! use safewatch::Snapshot;
//!
//! # tokio_test::block_on(async {
//! let snapshot = Arc::new(RwLock::new(Snapshot::default()));
//! let server = StaticServer::new(ServerConfig::default(), snapshot);
//! let listener = server.bind().await.unwrap();
//! // Dashboard available at http://localhost:3000/
//! server.serve(listener).await.unwrap();
//! # });
//! ```

use std::convert::Infallible;
use std::net::SocketAddr;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use parking_lot::RwLock;
use serde::Deserialize;
use tokio::net::TcpListener;

use crate::error::{Error, Result};
use crate::session::Snapshot;

/// Snapshot storage shared between the simulation loop and the server.
pub type SharedSnapshot = Arc<RwLock<Snapshot>>;

/// Assets the dashboard page needs. Missing ones are reported at startup.
pub const REQUIRED_ASSETS: [&str; 4] = ["index.html", "style.css", "script.js", "alarm.ogg"];

const INDEX: &str = "index.html";
const SNAPSHOT_PATH: &str = "/api/snapshot";

/// Configuration for the asset server.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to listen on.
    pub host: String,
    pub port: u16,
    /// Directory holding the web assets.
    pub assets: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            assets: PathBuf::from("web"),
        }
    }
}

impl ServerConfig {
    pub fn listen_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| Error::InvalidSetting(format!("listen address {}: {}", self.host, e)))
    }
}

/// Required assets that are not present in `dir`.
pub fn missing_assets(dir: &Path) -> Vec<&'static str> {
    REQUIRED_ASSETS
        .iter()
        .copied()
        .filter(|name| !dir.join(name).is_file())
        .collect()
}

/// Content type for a file, by extension.
pub fn content_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("html") => "text/html; charset=utf-8",
        Some("css") => "text/css",
        Some("js") => "application/javascript",
        Some("ogg") => "audio/ogg",
        Some("json") => "application/json",
        _ => "application/octet-stream",
    }
}

/// Map a request path onto the assets directory.
///
/// Returns `None` for paths that try to leave the directory.
pub fn resolve(assets: &Path, path: &str) -> Option<PathBuf> {
    let relative = Path::new(path.trim_start_matches('/'));
    if relative.as_os_str().is_empty() {
        return Some(assets.join(INDEX));
    }
    if relative
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
    {
        return None;
    }
    Some(assets.join(relative))
}

/// HTTP server for the dashboard assets and the snapshot endpoint.
#[derive(Debug, Clone)]
pub struct StaticServer {
    config: ServerConfig,
    snapshot: SharedSnapshot,
}

impl StaticServer {
    pub fn new(config: ServerConfig, snapshot: SharedSnapshot) -> Self {
        Self { config, snapshot }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Check the assets directory and bind the listening socket.
    pub async fn bind(&self) -> Result<TcpListener> {
        for name in missing_assets(&self.config.assets) {
            tracing::warn!(asset = name, dir = %self.config.assets.display(), "missing asset");
        }

        let addr = self.config.listen_addr()?;
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| Error::Bind { addr, source })?;
        tracing::info!(
            addr = %listener.local_addr().unwrap_or(addr),
            assets = %self.config.assets.display(),
            "asset server listening"
        );
        Ok(listener)
    }

    /// Accept connections until the task is dropped.
    pub async fn serve(self, listener: TcpListener) -> Result<()> {
        let assets = Arc::new(self.config.assets);

        loop {
            let (stream, peer) = listener.accept().await?;
            let io = TokioIo::new(stream);

            let assets = assets.clone();
            let snapshot = self.snapshot.clone();

            tokio::spawn(async move {
                let service = service_fn(move |req: Request<hyper::body::Incoming>| {
                    let assets = assets.clone();
                    let snapshot = snapshot.clone();

                    async move {
                        Ok::<_, Infallible>(
                            respond(req.method(), req.uri().path(), &assets, &snapshot).await,
                        )
                    }
                });

                if let Err(e) = http1::Builder::new().serve_connection(io, service).await {
                    tracing::debug!(%peer, error = %e, "connection error");
                }
            });
        }
    }

    /// Bind and serve on a background task.
    ///
    /// Returns a `JoinHandle` that can be used to await the server or abort it.
    pub fn start(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let listener = match self.bind().await {
                Ok(listener) => listener,
                Err(e) => {
                    tracing::error!(error = %e, "asset server failed to start");
                    return;
                }
            };
            if let Err(e) = self.serve(listener).await {
                tracing::error!(error = %e, "asset server stopped");
            }
        })
    }
}

/// Answer one request.
pub async fn respond(
    method: &Method,
    path: &str,
    assets: &Path,
    snapshot: &SharedSnapshot,
) -> Response<Full<Bytes>> {
    if method != Method::GET && method != Method::HEAD {
        return text(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed");
    }

    match path {
        "/health" | "/healthz" => return text(StatusCode::OK, "OK"),
        SNAPSHOT_PATH => {
            let body = serde_json::to_vec(&*snapshot.read());
            return match body {
                Ok(body) => response(StatusCode::OK, "application/json", body),
                Err(e) => {
                    tracing::error!(error = %e, "snapshot serialization failed");
                    text(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
                }
            };
        }
        _ => {}
    }

    let Some(file) = resolve(assets, path) else {
        return not_found();
    };
    if let Some(found) = read_file(&file).await {
        return found;
    }
    read_file(&assets.join(INDEX)).await.unwrap_or_else(not_found)
}

async fn read_file(path: &Path) -> Option<Response<Full<Bytes>>> {
    if !tokio::fs::metadata(path).await.ok()?.is_file() {
        return None;
    }
    let body = tokio::fs::read(path).await.ok()?;
    Some(response(StatusCode::OK, content_type(path), body))
}

fn response(status: StatusCode, content_type: &'static str, body: impl Into<Bytes>) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(body.into()));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    response
}

fn text(status: StatusCode, body: &'static str) -> Response<Full<Bytes>> {
    response(status, "text/plain", body)
}

fn not_found() -> Response<Full<Bytes>> {
    text(StatusCode::NOT_FOUND, "Not Found")
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    fn assets_dir(files: &[(&str, &str)]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for (name, content) in files {
            std::fs::write(dir.path().join(name), content).unwrap();
        }
        dir
    }

    fn shared() -> SharedSnapshot {
        Arc::new(RwLock::new(Snapshot::default()))
    }

    async fn body(response: Response<Full<Bytes>>) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn header(response: &Response<Full<Bytes>>) -> &str {
        response.headers()[CONTENT_TYPE].to_str().unwrap()
    }

    #[test]
    fn test_content_types() {
        assert_eq!(content_type(Path::new("index.html")), "text/html; charset=utf-8");
        assert_eq!(content_type(Path::new("style.css")), "text/css");
        assert_eq!(content_type(Path::new("script.js")), "application/javascript");
        assert_eq!(content_type(Path::new("alarm.ogg")), "audio/ogg");
        assert_eq!(content_type(Path::new("data.json")), "application/json");
        assert_eq!(content_type(Path::new("logo.PNG")), "application/octet-stream");
        assert_eq!(content_type(Path::new("README")), "application/octet-stream");
    }

    #[test]
    fn test_resolve_rejects_traversal() {
        let assets = Path::new("/srv/web");
        assert_eq!(resolve(assets, "/"), Some(PathBuf::from("/srv/web/index.html")));
        assert_eq!(resolve(assets, "/css/a.css"), Some(PathBuf::from("/srv/web/css/a.css")));
        assert_eq!(resolve(assets, "/../etc/passwd"), None);
        assert_eq!(resolve(assets, "/css/../../secret"), None);
    }

    #[test]
    fn test_missing_assets() {
        let dir = assets_dir(&[("index.html", "<html>"), ("script.js", "")]);
        assert_eq!(missing_assets(dir.path()), vec!["style.css", "alarm.ogg"]);
    }

    #[test]
    fn test_listen_addr() {
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
            ..Default::default()
        };
        assert_eq!(config.listen_addr().unwrap(), "127.0.0.1:8080".parse().unwrap());

        let bad = ServerConfig {
            host: "not a host".to_string(),
            ..Default::default()
        };
        assert!(matches!(bad.listen_addr(), Err(Error::InvalidSetting(_))));
    }

    #[tokio::test]
    async fn test_serves_existing_file() {
        let dir = assets_dir(&[("index.html", "<html>index</html>"), ("style.css", "body{}")]);
        let response = respond(&Method::GET, "/style.css", dir.path(), &shared()).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(header(&response), "text/css");
        assert_eq!(body(response).await, "body{}");
    }

    #[tokio::test]
    async fn test_unknown_path_falls_back_to_index() {
        let dir = assets_dir(&[("index.html", "<html>index</html>")]);
        let response = respond(&Method::GET, "/cameras/2", dir.path(), &shared()).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(header(&response), "text/html; charset=utf-8");
        assert_eq!(body(response).await, "<html>index</html>");
    }

    #[tokio::test]
    async fn test_directory_path_falls_back_to_index() {
        let dir = assets_dir(&[("index.html", "<html>index</html>")]);
        std::fs::create_dir(dir.path().join("sounds")).unwrap();
        let response = respond(&Method::GET, "/sounds", dir.path(), &shared()).await;
        assert_eq!(body(response).await, "<html>index</html>");
    }

    #[tokio::test]
    async fn test_missing_index_is_not_found() {
        let dir = assets_dir(&[]);
        let response = respond(&Method::GET, "/", dir.path(), &shared()).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_traversal_is_not_found() {
        let dir = assets_dir(&[("index.html", "<html>")]);
        let response = respond(&Method::GET, "/../index.html", dir.path(), &shared()).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_rejects_post() {
        let dir = assets_dir(&[("index.html", "<html>")]);
        let response = respond(&Method::POST, "/", dir.path(), &shared()).await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_snapshot_endpoint() {
        let dir = assets_dir(&[]);
        let snapshot = shared();
        snapshot.write().siren_active = true;

        let response = respond(&Method::GET, SNAPSHOT_PATH, dir.path(), &snapshot).await;
        assert_eq!(header(&response), "application/json");

        let json: serde_json::Value = serde_json::from_str(&body(response).await).unwrap();
        assert_eq!(json["siren_active"], true);
        assert_eq!(json["units"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_server_over_tcp() {
        let dir = assets_dir(&[("index.html", "<html>")]);
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            assets: dir.path().to_path_buf(),
        };
        let server = StaticServer::new(config, shared());
        let listener = server.bind().await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(server.serve(listener));

        let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
        stream
            .write_all(b"GET /health HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
            .await
            .unwrap();
        let mut raw = String::new();
        stream.read_to_string(&mut raw).await.unwrap();

        assert!(raw.starts_with("HTTP/1.1 200 OK"));
        assert!(raw.ends_with("OK"));
        handle.abort();
    }

    #[tokio::test]
    async fn test_bind_conflict_is_reported() {
        let taken = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: taken.local_addr().unwrap().port(),
            assets: PathBuf::from("web"),
        };
        let result = StaticServer::new(config, shared()).bind().await;
        assert!(matches!(result, Err(Error::Bind { .. })));
    }
}
