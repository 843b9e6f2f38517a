use std::time::Duration;

use arboard::Clipboard;
use tokio::time;

/// Which buffer to read. `Primary` is the highlighted text on X11/Wayland and
/// reads as empty on other platforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipboardKind {
    Clipboard,
    Primary,
}

fn get_text(clipboard: &mut Clipboard, kind: ClipboardKind) -> Option<String> {
    match kind {
        ClipboardKind::Clipboard => clipboard.get_text().ok(),
        #[cfg(target_os = "linux")]
        ClipboardKind::Primary => {
            use arboard::{GetExtLinux, LinuxClipboardKind};
            clipboard
                .get()
                .clipboard(LinuxClipboardKind::Primary)
                .text()
                .ok()
        }
        #[cfg(not(target_os = "linux"))]
        ClipboardKind::Primary => None,
    }
}

/// Current text of `kind`, `None` when empty or not text
pub fn read_text(kind: ClipboardKind) -> Result<Option<String>, anyhow::Error> {
    let mut clipboard = Clipboard::new()?;
    Ok(get_text(&mut clipboard, kind).filter(|t| !t.is_empty()))
}

pub fn write_text(text: &str) -> Result<(), anyhow::Error> {
    let mut clipboard = Clipboard::new()?;
    clipboard.set_text(text.to_string())?;
    Ok(())
}

/// Calls `on_text` whenever `kind` holds new non-empty text
pub async fn watch_clipboard<F>(
    kind: ClipboardKind,
    period: Duration,
    mut on_text: F,
) -> Result<(), anyhow::Error>
where
    F: FnMut(String) + Send + 'static,
{
    let mut clipboard = Clipboard::new()?;
    let mut last_text = get_text(&mut clipboard, kind).unwrap_or_default();

    let mut interval = time::interval(period);

    loop {
        interval.tick().await;
        if let Some(text) = get_text(&mut clipboard, kind)
            && !text.is_empty()
            && text != last_text
        {
            last_text = text.clone();
            on_text(text);
        }
    }
}
