use wordbook_types::TextSource;

use crate::scopes::page_for;
use crate::state::AppState;

/// Highlight changes act as a pointer-up: settle, then re-read the live scopes.
/// Clipboard and websocket text is cached as given.
pub async fn handle_selection_changed(
    state: &AppState,
    text: String,
    source: TextSource,
) -> anyhow::Result<()> {
    if state.is_own_copy(&text) {
        tracing::debug!("Ignoring clipboard echo of a copied card");
        return Ok(());
    }

    let page = {
        let config = state.config.read().await;
        page_for(&source, &config.selection.ws_url)
    };

    match source {
        TextSource::Selection => {
            state.resolver.set_page(page.clone());
            tokio::time::sleep(state.resolver.settle()).await;

            // Live scope reads touch the system clipboard
            let resolver = state.resolver.clone();
            let text =
                tokio::task::spawn_blocking(move || resolver.resolve_selection_text()).await?;
            state.resolver.record(&text, page);
        }
        TextSource::Clipboard | TextSource::Websocket | TextSource::Manual => {
            state.resolver.record(&text, page);
        }
    }

    Ok(())
}
