use std::sync::Arc;

use kanal::{AsyncReceiver, AsyncSender};
use wordbook_core::{CapturedSelection, Viewport, selection::anchor_below};
use wordbook_types::{AppEvent, Rect, TextSource, UiEvent};

use crate::scopes::page_for;
use crate::state::AppState;

pub mod add_entry;
pub mod copy_card;
pub mod export;
pub mod selection;
pub mod translate;

use add_entry::handle_add_entry;
use copy_card::handle_copy;
use export::handle_export;
use selection::handle_selection_changed;
use translate::start_translation;

/// App's main loop
pub async fn event_loop(
    state: Arc<AppState>,
    ui_to_app_rx: AsyncReceiver<AppEvent>,
    app_to_ui_tx: AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    app_to_ui_tx.send(AppEvent::BackendReady).await?;

    tracing::info!("Event loop started");
    loop {
        let event = ui_to_app_rx.recv().await?;

        tracing::debug!("Event received: {:?}", std::mem::discriminant(&event));
        if let Err(e) = handle_events(state.clone(), &app_to_ui_tx, event).await {
            tracing::error!("Event handler failed: {e:#}");
        }
    }
}

async fn handle_events(
    state: Arc<AppState>,
    app_to_ui_tx: &AsyncSender<AppEvent>,
    event: AppEvent,
) -> anyhow::Result<()> {
    match event {
        AppEvent::SelectionChanged { text, source } => {
            handle_selection_changed(&state, text, source).await?;
        }
        AppEvent::DismissRequested => {
            tracing::debug!("Selection cache cleared");
            state.resolver.clear();
        }
        AppEvent::TranslateRequested => {
            // Live scope reads touch the system clipboard
            let resolver = state.resolver.clone();
            let (selection, anchor) = tokio::task::spawn_blocking(move || {
                (
                    resolver.current_selection(),
                    resolver.popup_anchor(Viewport::default()),
                )
            })
            .await?;

            start_translation(state, selection, anchor, app_to_ui_tx).await?;
        }
        AppEvent::ExportRequested | AppEvent::UiEvent(UiEvent::Export) => {
            handle_export(&state, app_to_ui_tx).await?;
        }
        AppEvent::UiEvent(UiEvent::Add { popup, card }) => {
            handle_add_entry(&state, popup, card, app_to_ui_tx).await?;
        }
        AppEvent::UiEvent(UiEvent::Copy(card)) => {
            handle_copy(&state, card, app_to_ui_tx).await?;
        }
        AppEvent::UiEvent(UiEvent::Translate(text)) => {
            let page = {
                let config = state.config.read().await;
                page_for(&TextSource::Manual, &config.selection.ws_url)
            };
            let anchor = anchor_below(Rect::default(), Viewport::default());
            start_translation(state, CapturedSelection { text, page }, anchor, app_to_ui_tx)
                .await?;
        }
        AppEvent::ShowPopup { .. }
        | AppEvent::UpdatePopup { .. }
        | AppEvent::PopupStatus { .. }
        | AppEvent::Toast(_)
        | AppEvent::BackendReady => {
            // UI-only event, ignore in backend
        }
    }

    Ok(())
}
