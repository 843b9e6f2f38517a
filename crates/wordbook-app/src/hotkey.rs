use std::str::FromStr;

use anyhow::{Context, Result, bail};
use global_hotkey::{GlobalHotKeyEvent, GlobalHotKeyManager, HotKeyState, hotkey::HotKey};
use wordbook_config::hotkeys::HotkeyConfig;
use wordbook_types::AppEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HotkeyAction {
    Translate,
    Export,
    Dismiss,
}

impl HotkeyAction {
    pub fn event(self) -> AppEvent {
        match self {
            HotkeyAction::Translate => AppEvent::TranslateRequested,
            HotkeyAction::Export => AppEvent::ExportRequested,
            HotkeyAction::Dismiss => AppEvent::DismissRequested,
        }
    }
}

/// Parse the configured shortcuts without registering them
pub fn parse_bindings(config: &HotkeyConfig) -> Result<Vec<(HotKey, HotkeyAction)>> {
    [
        (config.translate.as_str(), HotkeyAction::Translate),
        (config.export.as_str(), HotkeyAction::Export),
        (config.dismiss.as_str(), HotkeyAction::Dismiss),
    ]
    .into_iter()
    .map(|(spec, action)| {
        let hotkey = HotKey::from_str(spec)
            .with_context(|| format!("Invalid {action:?} hotkey '{spec}'"))?;
        // Registration grabs the key globally
        if hotkey.mods.is_empty() {
            bail!("{action:?} hotkey '{spec}' needs a modifier");
        }
        Ok((hotkey, action))
    })
    .collect()
}

pub struct HotkeyManager {
    manager: GlobalHotKeyManager,
    bindings: Vec<(HotKey, HotkeyAction)>,
}

impl HotkeyManager {
    pub fn new(config: &HotkeyConfig) -> Result<Self> {
        let manager = GlobalHotKeyManager::new().context("Failed to create hotkey manager")?;
        let bindings = parse_bindings(config)?;

        for (hotkey, action) in &bindings {
            manager
                .register(*hotkey)
                .with_context(|| format!("Failed to register {action:?} hotkey"))?;
        }

        Ok(Self { manager, bindings })
    }

    /// Action for a pending key press (non-blocking). Releases are ignored.
    pub fn poll(&self) -> Option<HotkeyAction> {
        let event = GlobalHotKeyEvent::receiver().try_recv().ok()?;
        if !matches!(event.state, HotKeyState::Pressed) {
            return None;
        }

        self.bindings
            .iter()
            .find(|(hotkey, _)| hotkey.id() == event.id)
            .map(|(_, action)| *action)
    }
}

impl Drop for HotkeyManager {
    fn drop(&mut self) {
        for (hotkey, _) in &self.bindings {
            let _ = self.manager.unregister(*hotkey);
        }
    }
}
