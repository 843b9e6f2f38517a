use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tokio::signal;
use wordbook_config::GatewayMode;
use wordbook_config::storage::StorageConfig;
use wordbook_gateway::DirectGateway;
use wordbook_io::{DirDownloads, JsonFileStore, KeyValueStore};
use wordbook_store::CredentialStore;

pub mod controller;
pub mod events;
pub mod hotkey;
pub mod io;
pub mod logging;
pub mod profile;
pub mod scopes;
pub mod state;
pub mod transport;


use self::controller::AppController;
use self::state::AppState;
use self::transport::build_transport;

/// Select text anywhere, press the translate hotkey, collect vocabulary cards
#[derive(Parser, Debug)]
#[command(name = "wordbook", version)]
struct Cli {
    /// Profile name under <data_dir>/profiles
    #[arg(long, default_value = "main")]
    profile: String,

    /// Override the profile's gateway mode (direct or relay)
    #[arg(long)]
    gateway: Option<GatewayMode>,

    /// Save an OpenAI API key and exit
    #[arg(long, value_name = "KEY")]
    set_key: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    logging::init_tracing();

    let cli = Cli::parse();

    let profiles_dir = StorageConfig::new().profiles_dir();
    profile::init_user_config(&profiles_dir)?;
    let mut config = profile::load_user_profile(&profiles_dir, &cli.profile)?;
    if let Some(mode) = cli.gateway {
        config.gateway.mode = mode;
    }

    let kv_path = config.storage.kv_path();
    let kv: Arc<dyn KeyValueStore> = Arc::new(
        JsonFileStore::open(&kv_path)
            .with_context(|| format!("Failed to open storage at {}", kv_path.display()))?,
    );

    let credentials = CredentialStore::new(kv.clone());
    if let Some(key) = cli.set_key {
        credentials.set(&key)?;
        return Ok(());
    }
    if credentials.seed(std::env::var("OPENAI_API_KEY").ok().as_deref())? {
        tracing::info!("Seeded API key from environment");
    }

    let backend = Arc::new(DirectGateway::new(
        config.translator.api_url.clone(),
        Duration::from_millis(config.translator.timeout_ms),
    )?);
    let downloads = Arc::new(DirDownloads::new(config.storage.download_dir.clone()));
    let transport = build_transport(
        config.gateway.mode,
        config.gateway.relay_capacity,
        backend,
        downloads,
    );

    tracing::info!(
        "Starting wordbook (profile: {}, gateway: {:?}, target: {})",
        cli.profile,
        config.gateway.mode,
        config.translator.target_lang
    );

    let resolver = scopes::desktop_resolver(&config.selection);
    let state = Arc::new(AppState::new(
        config,
        kv,
        resolver,
        transport.gateway,
        transport.downloader,
    ));

    let controller = AppController::new(state);
    let mut tasks = controller.spawn_tasks(transport.relay);

    tokio::select! {
        _ = signal::ctrl_c() => {
            tracing::info!("Shutdown requested");
        }
        Some(result) = tasks.join_next() => {
            match result {
                Ok(Ok(())) => tracing::warn!("A task exited, shutting down"),
                Ok(Err(e)) => tracing::error!("Task failed: {e:#}"),
                Err(e) => tracing::error!("Task panicked: {e}"),
            }
        }
    }

    controller.shutdown();
    tasks.shutdown().await;

    // The console reader sits in a blocking stdin read that cannot be cancelled
    std::process::exit(0)
}
