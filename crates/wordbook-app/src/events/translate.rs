use std::sync::Arc;

use kanal::AsyncSender;
use wordbook_core::{CapturedSelection, TranslateError};
use wordbook_types::{Anchor, AppEvent, PopupContent, PopupId};
use wordbook_ui::LOADING_TEXT;

use crate::state::AppState;

/// Precondition failures end in a toast and nothing is sent. Otherwise a loading
/// popup opens and the request runs in its own task, so overlapping translations
/// each get their own popup.
pub async fn start_translation(
    state: Arc<AppState>,
    selection: CapturedSelection,
    anchor: Anchor,
    app_to_ui_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let text = match state.pipeline.check_selection(&selection.text) {
        Ok(text) => text,
        Err(e) => {
            tracing::debug!("Translate skipped: {e}");
            app_to_ui_tx.send(AppEvent::Toast(e.to_string())).await?;
            return Ok(());
        }
    };

    let stored = state.credentials.get()?;
    let credential = match state.pipeline.check_credential(stored.as_deref()) {
        Ok(credential) => credential,
        Err(e) => {
            tracing::warn!("Translate skipped: no usable API key");
            app_to_ui_tx.send(AppEvent::Toast(e.to_string())).await?;
            return Ok(());
        }
    };

    let id = PopupId::new();
    app_to_ui_tx
        .send(AppEvent::ShowPopup {
            id,
            anchor,
            content: PopupContent::Loading(LOADING_TEXT.to_string()),
        })
        .await?;

    let pipeline = state.pipeline.clone();
    let tx = app_to_ui_tx.clone();
    tokio::spawn(async move {
        let content = match pipeline.request_card(&text, &credential, &selection.page).await {
            Ok(card) => {
                tracing::info!("Card ready for popup {id}: {}", card.term);
                PopupContent::Card(card)
            }
            Err(TranslateError::UnparsableResponse { raw_snippet }) => {
                PopupContent::Unparsable(raw_snippet)
            }
            Err(e) => {
                tracing::warn!("Translation for popup {id} failed: {e}");
                PopupContent::Error(e.to_string())
            }
        };

        if let Err(e) = tx.send(AppEvent::UpdatePopup { id, content }).await {
            tracing::error!("Failed to deliver result for popup {id}: {e}");
        }
    });

    Ok(())
}
