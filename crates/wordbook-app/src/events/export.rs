use kanal::AsyncSender;
use wordbook_types::AppEvent;

use crate::state::AppState;

pub async fn handle_export(
    state: &AppState,
    app_to_ui_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let notice = match state.vocabulary.export_csv() {
        Ok(None) => "Wordbook is empty.".to_string(),
        Ok(Some(export)) => match state.downloader.download(export.download).await {
            Ok(path) => {
                tracing::info!("Exported {} items to {}", export.count, path.display());
                format!("Exported {} items.", export.count)
            }
            Err(e) => {
                tracing::error!("Export download failed: {e}");
                format!("Export failed: {e}")
            }
        },
        Err(e) => {
            tracing::error!("Export failed: {e}");
            format!("Export failed: {e}")
        }
    };

    app_to_ui_tx.send(AppEvent::Toast(notice)).await?;
    Ok(())
}
