use std::sync::Arc;
use std::time::Duration;

use kanal::AsyncSender;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use wordbook_config::hotkeys::HotkeyConfig;
use wordbook_io::clipboard::{self, ClipboardKind};
use wordbook_types::{AppEvent, TextSource};

use crate::hotkey::HotkeyManager;
use crate::state::AppState;

/// Hotkeys, selection and clipboard watchers, optional websocket feed. Everything
/// lands on `event_tx` for the event loop.
pub async fn watcher_io(
    state: Arc<AppState>,
    cancel: CancellationToken,
    event_tx: AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let (hotkeys, selection) = {
        let config = state.config.read().await;
        (config.hotkeys.clone(), config.selection.clone())
    };

    spawn_hotkey_listener(hotkeys, cancel.clone(), event_tx.clone());

    let period = Duration::from_millis(selection.poll_ms);
    let mut watchers = JoinSet::new();
    watchers.spawn(watch_buffer(
        ClipboardKind::Primary,
        TextSource::Selection,
        period,
        event_tx.clone(),
    ));
    watchers.spawn(watch_buffer(
        ClipboardKind::Clipboard,
        TextSource::Clipboard,
        period,
        event_tx.clone(),
    ));

    if selection.listen_to_ws {
        tracing::info!("Starting WebSocket listener on {}", selection.ws_url);

        let tx = event_tx.clone();
        let url = selection.ws_url.clone();
        watchers.spawn(async move {
            wordbook_io::ws::watch_ws(&url, move |text| {
                forward(&tx, text, TextSource::Websocket);
            })
            .await;
        });
    }

    cancel.cancelled().await;
    tracing::info!("Watchers stopping");
    watchers.shutdown().await;

    Ok(())
}

async fn watch_buffer(
    kind: ClipboardKind,
    source: TextSource,
    period: Duration,
    tx: AsyncSender<AppEvent>,
) {
    tracing::info!("Starting {kind:?} watcher");
    let result = clipboard::watch_clipboard(kind, period, move |text| {
        forward(&tx, text, source.clone());
    })
    .await;

    if let Err(e) = result {
        tracing::error!("{kind:?} watcher error: {e}");
    }
}

/// Sync callback to async channel
fn forward(tx: &AsyncSender<AppEvent>, text: String, source: TextSource) {
    let tx = tx.clone();
    tokio::spawn(async move {
        if let Err(e) = tx.send(AppEvent::SelectionChanged { text, source }).await {
            tracing::error!("Failed to forward selection to app: {e}");
        }
    });
}

fn spawn_hotkey_listener(
    config: HotkeyConfig,
    cancel: CancellationToken,
    tx: AsyncSender<AppEvent>,
) {
    tokio::task::spawn_blocking(move || {
        let manager = match HotkeyManager::new(&config) {
            Ok(manager) => manager,
            Err(e) => {
                tracing::error!("Hotkeys unavailable: {e:#}");
                return;
            }
        };

        tracing::info!(
            "Hotkeys registered (translate: {}, export: {}, dismiss: {})",
            config.translate,
            config.export,
            config.dismiss
        );

        while !cancel.is_cancelled() {
            if let Some(action) = manager.poll() {
                tracing::debug!("Hotkey pressed: {action:?}");
                if let Err(e) = tx.as_sync().send(action.event()) {
                    tracing::error!("Failed to send hotkey event: {e}");
                    break;
                }
            }

            std::thread::sleep(Duration::from_millis(50));
        }

        tracing::info!("Hotkey listener stopping");
    });
}
