mod error;
mod handlers;
mod router;

use anyhow::Result;
use async_trait::async_trait;
use axum::response::IntoResponse;
use include_dir::{Dir, include_dir};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::info;

static ASSETS_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/assets");

use crate::core::avatars::ImageGenerator;
use crate::core::lifecycle::LifecycleComponent;
use crate::core::photos::PhotoStore;
use crate::core::store::RecordStore;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) store: Arc<RecordStore>,
    pub(crate) photos: Arc<PhotoStore>,
    /// `None` when avatar generation is disabled or has no API key.
    pub(crate) avatars: Option<Arc<dyn ImageGenerator>>,
    pub(crate) api_port: u16,
}

pub struct ApiServerConfig {
    pub store: Arc<RecordStore>,
    pub photos: Arc<PhotoStore>,
    pub avatars: Option<Arc<dyn ImageGenerator>>,
    pub api_host: String,
    pub api_port: u16,
}

pub struct ApiServer {
    state: AppState,
    api_host: String,
    api_port: u16,
    local_addr: Option<SocketAddr>,
    shutdown_tx: Option<oneshot::Sender<()>>,
    serve_task: Option<JoinHandle<()>>,
}

impl ApiServer {
    pub fn new(config: ApiServerConfig) -> Self {
        Self {
            state: AppState {
                store: config.store,
                photos: config.photos,
                avatars: config.avatars,
                api_port: config.api_port,
            },
            api_host: config.api_host,
            api_port: config.api_port,
            local_addr: None,
            shutdown_tx: None,
            serve_task: None,
        }
    }

    /// Bound address, available once started.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.local_addr
    }
}

async fn static_handler(uri: axum::http::Uri) -> impl IntoResponse {
    let mut path = uri.path().trim_start_matches('/');
    if path.is_empty() {
        path = "index.html";
    }

    match ASSETS_DIR.get_file(path) {
        Some(file) => {
            let mime = mime_guess::from_path(path).first_or_octet_stream();
            (
                [(axum::http::header::CONTENT_TYPE, mime.as_ref().to_string())],
                file.contents(),
            )
                .into_response()
        }
        None => (axum::http::StatusCode::NOT_FOUND, "404 Not Found").into_response(),
    }
}

#[async_trait]
impl LifecycleComponent for ApiServer {
    async fn on_init(&mut self) -> Result<()> {
        info!("Board API initializing...");
        Ok(())
    }

    async fn on_start(&mut self) -> Result<()> {
        let addr = format!("{}:{}", self.api_host, self.api_port);
        let listener = tokio::net::TcpListener::bind(&addr).await?;
        let local_addr = listener.local_addr()?;
        self.local_addr = Some(local_addr);

        let app = router::build_api_router(self.state.clone());
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        self.shutdown_tx = Some(shutdown_tx);

        self.serve_task = Some(tokio::spawn(async move {
            info!("Board running at http://{local_addr}");
            let shutdown = async {
                let _ = shutdown_rx.await;
            };
            if let Err(e) = axum::serve(listener, app)
                .with_graceful_shutdown(shutdown)
                .await
            {
                tracing::error!("Board API crashed: {}", e);
            }
        }));
        Ok(())
    }

    async fn on_shutdown(&mut self) -> Result<()> {
        info!("Board API shutting down...");
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(task) = self.serve_task.take() {
            task.await?;
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) async fn test_state(avatars: Option<Arc<dyn ImageGenerator>>) -> (AppState, tempfile::TempDir) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let store = RecordStore::open(dir.path()).await.expect("open store");
    let photos = PhotoStore::open(dir.path().join("photos"))
        .await
        .expect("open photo store");
    let state = AppState {
        store: Arc::new(store),
        photos: Arc::new(photos),
        avatars,
        api_port: 8000,
    };
    (state, dir)
}
