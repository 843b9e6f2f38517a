use std::sync::Arc;
use std::time::Duration;

use wordbook_config::selection::SelectionConfig;
use wordbook_core::{ScopeError, SelectedRange, SelectionResolver, SelectionScope};
use wordbook_io::clipboard::{self, ClipboardKind};
use wordbook_types::{PageContext, TextSource};

/// One clipboard buffer read as a selection scope. Buffers carry no geometry, so
/// popups opened from them use the default placement.
pub struct ClipboardScope {
    kind: ClipboardKind,
    name: &'static str,
}

impl ClipboardScope {
    /// Highlighted text
    pub fn primary() -> Self {
        Self {
            kind: ClipboardKind::Primary,
            name: "primary selection",
        }
    }

    pub fn clipboard() -> Self {
        Self {
            kind: ClipboardKind::Clipboard,
            name: "clipboard",
        }
    }
}

impl SelectionScope for ClipboardScope {
    fn name(&self) -> &str {
        self.name
    }

    fn selection(&self) -> Result<Option<SelectedRange>, ScopeError> {
        clipboard::read_text(self.kind)
            .map(|text| text.map(SelectedRange::text))
            .map_err(|e| ScopeError::Unavailable(e.to_string()))
    }
}

/// Highlighted text first, copied text as the fallback frame
pub fn desktop_resolver(config: &SelectionConfig) -> SelectionResolver {
    SelectionResolver::new(Arc::new(ClipboardScope::primary()))
        .with_frame(Arc::new(ClipboardScope::clipboard()))
        .with_settle(Duration::from_millis(config.settle_ms))
}

/// Provenance recorded on cards captured from `source`
pub fn page_for(source: &TextSource, ws_url: &str) -> PageContext {
    let (title, url) = match source {
        TextSource::Selection => ("Selection", ""),
        TextSource::Clipboard => ("Clipboard", ""),
        TextSource::Websocket => ("WebSocket", ws_url),
        TextSource::Manual => ("Console", ""),
    };
    PageContext {
        title: title.to_string(),
        url: url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_websocket_cards_keep_the_feed_url() {
        let page = page_for(&TextSource::Websocket, "ws://localhost:6677");
        assert_eq!(page.title, "WebSocket");
        assert_eq!(page.url, "ws://localhost:6677");

        let page = page_for(&TextSource::Manual, "ws://localhost:6677");
        assert_eq!(page.title, "Console");
        assert_eq!(page.url, "");
    }
}
