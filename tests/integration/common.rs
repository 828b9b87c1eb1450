//! Common test utilities: an isolated environment and a stub collaborator
//! server.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::TcpListener as StdTcpListener;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::thread;

use assert_cmd::Command;
use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use serde_json::Value;
use tempfile::TempDir;
use tokio::runtime::Builder;
use tokio::sync::oneshot;

/// Isolated config, state and working directories.
pub struct TestEnv {
    root: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        let root = TempDir::new().expect("Failed to create temp dir");
        for dir in ["config", "state", "work"] {
            std::fs::create_dir_all(root.path().join(dir)).unwrap();
        }
        Self { root }
    }

    pub fn config_home(&self) -> PathBuf {
        self.root.path().join("config")
    }

    pub fn state_dir(&self) -> PathBuf {
        self.root.path().join("state")
    }

    pub fn work_dir(&self) -> PathBuf {
        self.root.path().join("work")
    }

    /// Write the user config file.
    pub fn write_config(&self, yaml: &str) {
        let dir = self.config_home().join("ailingo");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("cli.yaml"), yaml).unwrap();
    }

    /// Point every collaborator at `stub`.
    pub fn use_stub(&self, stub: &StubServer) {
        self.write_config(&format!(
            "endpoints:\n  translate: {base}/translate\n  generate: {base}/generate\n  auth: {base}\n\
             api_key: test-key\ntimeout_secs: 5\n",
            base = stub.base_url()
        ));
    }

    /// Read a persisted session entry.
    pub fn entry(&self, key: &str) -> Option<String> {
        std::fs::read_to_string(self.state_dir().join(key)).ok()
    }

    /// Seed a persisted session entry.
    pub fn set_entry(&self, key: &str, value: &str) {
        std::fs::write(self.state_dir().join(key), value).unwrap();
    }

    /// The binary, isolated from the caller's config and locale.
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("ailingo"));
        cmd.current_dir(self.work_dir())
            .env("XDG_CONFIG_HOME", self.config_home())
            .env("AILINGO_STATE_DIR", self.state_dir())
            .env("LC_ALL", "en_US.UTF-8")
            .env_remove("AILINGO_LOCALE")
            .env_remove("AILINGO_TRANSLATE_URL")
            .env_remove("AILINGO_GENERATE_URL")
            .env_remove("AILINGO_AUTH_URL")
            .env_remove("AILINGO_API_KEY")
            .env_remove("AILINGO_PASSWORD")
            .env_remove("RUST_LOG");
        cmd
    }

    pub fn path(&self) -> &Path {
        self.root.path()
    }
}

/// Canned reply for one path.
#[derive(Clone, Debug)]
pub enum Reply {
    Json(u16, Value),
    Bytes(Vec<u8>),
}

/// A request the stub received.
#[derive(Clone, Debug)]
pub struct Recorded {
    pub path: String,
    pub api_key: Option<String>,
    pub authorization: Option<String>,
    pub body: Value,
}

#[derive(Clone)]
struct StubState {
    replies: Arc<HashMap<String, Reply>>,
    calls: Arc<Mutex<Vec<Recorded>>>,
}

/// Builder for [`StubServer`].
#[derive(Default)]
pub struct StubBuilder {
    replies: HashMap<String, Reply>,
}

impl StubBuilder {
    pub fn json(mut self, path: &str, status: u16, body: Value) -> Self {
        self.replies.insert(path.to_string(), Reply::Json(status, body));
        self
    }

    pub fn bytes(mut self, path: &str, body: &[u8]) -> Self {
        self.replies.insert(path.to_string(), Reply::Bytes(body.to_vec()));
        self
    }

    pub fn spawn(self) -> StubServer {
        StubServer::spawn(self.replies)
    }
}

/// HTTP server standing in for the translation, generation and auth
/// services.
pub struct StubServer {
    base_url: String,
    calls: Arc<Mutex<Vec<Recorded>>>,
    shutdown: Option<oneshot::Sender<()>>,
    join: Option<thread::JoinHandle<()>>,
}

impl StubServer {
    pub fn builder() -> StubBuilder {
        StubBuilder::default()
    }

    fn spawn(replies: HashMap<String, Reply>) -> Self {
        let listener = StdTcpListener::bind("127.0.0.1:0").unwrap();
        listener.set_nonblocking(true).unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        let calls = Arc::new(Mutex::new(Vec::new()));
        let state = StubState { replies: Arc::new(replies), calls: Arc::clone(&calls) };
        let app = Router::new().fallback(handle).with_state(state);

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let join = thread::spawn(move || {
            let runtime = Builder::new_current_thread().enable_all().build().unwrap();
            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::from_std(listener).unwrap();
                axum::serve(listener, app)
                    .with_graceful_shutdown(async move {
                        let _ = shutdown_rx.await;
                    })
                    .await
                    .unwrap();
            });
        });

        Self { base_url, calls, shutdown: Some(shutdown_tx), join: Some(join) }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Requests received on `path`.
    pub fn calls_to(&self, path: &str) -> Vec<Recorded> {
        self.calls.lock().unwrap().iter().filter(|c| c.path == path).cloned().collect()
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(join) = self.join.take() {
            let _ = join.join();
        }
    }
}

async fn handle(
    State(state): State<StubState>,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok()).map(String::from);
    let path = uri.path().to_string();

    state.calls.lock().unwrap().push(Recorded {
        path: path.clone(),
        api_key: header("apikey"),
        authorization: header("authorization"),
        body: serde_json::from_slice(&body).unwrap_or(Value::Null),
    });

    match state.replies.get(&path) {
        Some(Reply::Json(status, value)) => {
            (StatusCode::from_u16(*status).unwrap(), axum::Json(value.clone())).into_response()
        },
        Some(Reply::Bytes(bytes)) => bytes.clone().into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
