use kanal::AsyncSender;
use wordbook_io::clipboard;
use wordbook_types::{AppEvent, Card};
use wordbook_ui::copy_text;

use crate::state::AppState;

pub async fn handle_copy(
    state: &AppState,
    card: Card,
    app_to_ui_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let text = copy_text(&card);
    state.note_copied(&text);

    let result = tokio::task::spawn_blocking(move || clipboard::write_text(&text)).await?;
    let notice = match result {
        Ok(()) => "Copied.".to_string(),
        Err(e) => {
            tracing::warn!("Clipboard write failed: {e}");
            format!("Copy failed: {e}")
        }
    };

    app_to_ui_tx.send(AppEvent::Toast(notice)).await?;
    Ok(())
}
