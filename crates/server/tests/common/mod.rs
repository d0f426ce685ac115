//! # Common Test Utilities
//!
//! This module centralizes the test harness used across the `ctfrag-server`
//! integration tests. `TestApp` spawns the real server on a random port,
//! loaded from a temporary `config.yml` whose external endpoints all point at
//! an `httpmock::MockServer`, with a throwaway session root that tests can
//! inspect directly.

// Allow unused code because this is a test utility module, and not all
// functions might be used by every test file that includes it.
#![allow(unused)]

use anyhow::Result;
use ctfrag_server::{config, router, state::build_app_state};
use httpmock::MockServer;
use reqwest::Client;
use std::{fs::File, io::Write, net::SocketAddr, path::PathBuf};
use tempfile::{tempdir, TempDir};
use tokio::{net::TcpListener, task::JoinHandle};

/// A converter binary name that is never on `PATH`, so docx conversion
/// deterministically reports the converter as missing.
pub const MISSING_CONVERTER: &str = "ctfrag-converter-that-does-not-exist";

/// A harness for end-to-end testing of the Axum server.
///
/// The spawned server talks to a mock chat completion endpoint, a mock
/// embeddings endpoint, and a mock vector store, all hosted by the same
/// `MockServer`. Individual tests register the mocks they need; unmatched
/// calls get a 404, which for the retrieval stack simply degrades the
/// request to "no reference examples".
pub struct TestApp {
    pub address: String,
    pub client: Client,
    pub mock_server: MockServer,
    pub session_root: PathBuf,
    _config_dir: TempDir,
    _session_dir: TempDir,
    _server_handle: JoinHandle<()>,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestApp {
    /// Spawns the application server with the default mock-backed config.
    pub async fn spawn() -> Result<Self> {
        let mock_server = MockServer::start();
        let session_dir = tempdir()?;
        let config_content = format!(
            r#"
session:
  root: "{}"
  converter: "{MISSING_CONVERTER}"
generation:
  provider: "local"
  api_url: "{}"
  api_key: null
  model_name: "mock-chat-model"
retrieval:
  embedding:
    api_url: "{}"
    model_name: "mock-embedding-model"
    api_key: null
  vector:
    api_url: "{}"
    api_key: "mock-vector-key"
"#,
            session_dir.path().to_str().unwrap(),
            mock_server.url("/v1/chat/completions"),
            mock_server.url("/v1/embeddings"),
            mock_server.url("/query"),
        );
        Self::spawn_with_config(&config_content, mock_server, session_dir).await
    }

    /// Spawns the server from the given `config.yml` content.
    ///
    /// The caller owns the config text so tests can drop the generation or
    /// retrieval sections, or point the converter at a stub script.
    pub async fn spawn_with_config(
        config_content: &str,
        mock_server: MockServer,
        session_dir: TempDir,
    ) -> Result<Self> {
        dotenvy::dotenv().ok();
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .compact()
            .try_init();

        let config_dir = tempdir()?;
        let config_path = config_dir.path().join("config.yml");
        let mut file = File::create(&config_path)?;
        file.write_all(config_content.as_bytes())?;

        let config = config::get_config(Some(config_path.to_str().unwrap()))?;
        let app_state = build_app_state(config)?;

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr: SocketAddr = listener.local_addr()?;
        let address = format!("http://{addr}");

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
        let server_handle = tokio::spawn(async move {
            let app = router::create_router(app_state);
            let server = axum::serve(listener, app).with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            });
            if let Err(e) = server.await {
                tracing::error!("[TestApp] Server error: {}", e);
            }
        });

        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

        Ok(Self {
            address,
            client: Client::new(),
            mock_server,
            session_root: session_dir.path().to_path_buf(),
            _config_dir: config_dir,
            _session_dir: session_dir,
            _server_handle: server_handle,
            shutdown_tx: Some(shutdown_tx),
        })
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
