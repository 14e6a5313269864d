use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

use super::ServeArgs;
use crate::core::avatars::{GeminiImageClient, ImageGenerator};
use crate::core::config::{self, BoardConfig};
use crate::core::lifecycle::LifecycleManager;
use crate::core::photos::PhotoStore;
use crate::core::store::RecordStore;
use crate::core::terminal;
use crate::interfaces::web::{ApiServer, ApiServerConfig};

pub const LOG_FILE: &str = "quadboard.log";

pub(crate) fn resolve_data_dir(args: &ServeArgs) -> PathBuf {
    args.data_dir.clone().unwrap_or_else(config::default_data_dir)
}

fn build_avatar_client(config: &BoardConfig) -> Option<Arc<dyn ImageGenerator>> {
    if !config.avatars.enabled {
        info!("Avatar generation disabled in config.");
        return None;
    }
    match GeminiImageClient::from_config(&config.avatars) {
        Ok(client) => {
            info!(
                "Avatar generation enabled (model {}).",
                config.avatars.model
            );
            Some(Arc::new(client))
        }
        Err(e) => {
            warn!("Avatar generation unavailable: {}", e);
            None
        }
    }
}

pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let data_dir = resolve_data_dir(&args);
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("creating data directory {}", data_dir.display()))?;
    crate::logging::init(args.verbose, Some(&data_dir.join(LOG_FILE)));

    let mut board_config = BoardConfig::load(&data_dir).await?;
    if let Some(host) = args.host {
        board_config.server.host = host;
    }
    if let Some(port) = args.port {
        board_config.server.port = port;
    }

    let store = Arc::new(
        RecordStore::open(&data_dir)
            .await
            .context("opening record store")?,
    );
    let photos = Arc::new(PhotoStore::open(board_config.photos_dir(&data_dir)).await?);
    let photos_dir = photos.dir().display().to_string();
    let avatars = build_avatar_client(&board_config);

    let api_server = Arc::new(Mutex::new(ApiServer::new(ApiServerConfig {
        store,
        photos,
        avatars: avatars.clone(),
        api_host: board_config.server.host.clone(),
        api_port: board_config.server.port,
    })));

    let mut lifecycle = LifecycleManager::new();
    lifecycle.attach(api_server.clone());
    lifecycle.start().await?;

    let url = match api_server.lock().await.local_addr() {
        Some(addr) => format!("http://{addr}"),
        None => format!(
            "http://{}:{}",
            board_config.server.host, board_config.server.port
        ),
    };

    terminal::print_banner();
    terminal::print_status("Data", &data_dir.display().to_string());
    terminal::print_status("Photos", &photos_dir);
    terminal::print_status(
        "Avatars",
        if avatars.is_some() { "enabled" } else { "disabled" },
    );
    terminal::print_link("Open", &url);
    terminal::print_info("Press Ctrl+C to stop.");

    tokio::signal::ctrl_c().await?;
    lifecycle.shutdown().await?;
    terminal::print_goodbye();
    Ok(())
}
