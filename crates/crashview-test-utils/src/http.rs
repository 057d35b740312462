//! In-process HTTP server serving source files for fetch tests.

use std::net::SocketAddr;
use std::time::Duration;

use axum::Router;
use axum::routing::get;
use tokio::net::TcpListener;

/// A running source server. The server task is aborted on drop.
pub struct SourceServer {
    addr: SocketAddr,
    task: tokio::task::JoinHandle<()>,
}

impl SourceServer {
    /// Serve each `(path, body)` pair with `200 OK`; anything else is `404`.
    /// `/slow` sleeps for `slow_delay` before answering.
    pub async fn start(files: &[(&str, &str)], slow_delay: Duration) -> Self {
        let mut app = Router::new().route(
            "/slow",
            get(move || async move {
                tokio::time::sleep(slow_delay).await;
                "late"
            }),
        );
        for (path, body) in files {
            let body = body.to_string();
            app = app.route(path, get(move || async move { body }));
        }

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind test listener");
        let addr = listener.local_addr().expect("listener has no address");
        tracing::debug!(%addr, files = files.len(), "source server listening");
        let task = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self { addr, task }
    }

    /// Absolute URL for `path` on this server.
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for SourceServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}
