use kanal::AsyncSender;
use wordbook_types::{AppEvent, Card, PopupId};
use wordbook_ui::SAVED_TEXT;

use crate::state::AppState;

/// Add button. A duplicate still reports saved; the first copy is kept.
pub async fn handle_add_entry(
    state: &AppState,
    popup: PopupId,
    card: Card,
    app_to_ui_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let term = card.term.clone();

    let event = match state.vocabulary.add(card) {
        Ok(added) => {
            if added {
                tracing::info!("Saved '{term}' to wordbook");
            } else {
                tracing::debug!("'{term}' already in wordbook");
            }
            AppEvent::PopupStatus {
                id: popup,
                status: SAVED_TEXT.to_string(),
            }
        }
        Err(e) => {
            tracing::error!("Failed to save '{term}': {e}");
            AppEvent::Toast(format!("Couldn't save: {e}"))
        }
    };

    app_to_ui_tx.send(event).await?;
    Ok(())
}
