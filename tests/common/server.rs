//! Test server management.
//!
//! Runs the real quillpost router inside the test process, bound to
//! `127.0.0.1:0`, against a fresh store per server.

use quillpost::config::{Backend, DatabaseConfig};
use quillpost::http::{self, AppState};
use quillpost::store::{self, Store};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use super::client::TestClient;

/// Every backend the behavioural tests run against.
#[allow(dead_code)]
pub const BACKENDS: [Backend; 2] = [Backend::Memory, Backend::Sqlite];

/// A test server instance. Shuts down when dropped.
pub struct TestServer {
    addr: SocketAddr,
    store: Arc<dyn Store>,
    shutdown: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

#[allow(dead_code)]
impl TestServer {
    /// Spawn a server over an empty store of the given backend.
    pub async fn spawn(backend: Backend) -> anyhow::Result<Self> {
        let config = DatabaseConfig {
            backend,
            path: ":memory:".to_string(),
            max_connections: 1,
        };
        let store = store::open(&config).await?;
        Self::spawn_with_store(store).await
    }

    /// Spawn a server over an existing store.
    pub async fn spawn_with_store(store: Arc<dyn Store>) -> anyhow::Result<Self> {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let app = http::router(AppState::new(Arc::clone(&store), "quillpost-test"));
        let (tx, rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(async move {
            let shutdown = async {
                let _ = rx.await;
            };
            if let Err(e) = http::serve(listener, app, shutdown).await {
                eprintln!("test server error: {e}");
            }
        });

        Ok(Self {
            addr,
            store,
            shutdown: Some(tx),
            handle: Some(handle),
        })
    }

    /// Get the server address.
    pub fn address(&self) -> SocketAddr {
        self.addr
    }

    /// The store behind this server.
    pub fn store(&self) -> &Arc<dyn Store> {
        &self.store
    }

    /// Create a new client for this server.
    pub fn client(&self) -> TestClient {
        TestClient::new(self.addr)
    }

    /// Stop serving and wait for in-flight requests to drain.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}
