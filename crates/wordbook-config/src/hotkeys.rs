use serde::{Deserialize, Serialize};

use crate::env_string;

fn default_translate() -> String {
    "control+KeyT".to_string()
}

fn default_export() -> String {
    "control+KeyE".to_string()
}

fn default_dismiss() -> String {
    "control+Escape".to_string()
}

/// Global shortcuts in `global-hotkey` string syntax. Each needs a modifier:
/// a registered key is grabbed from every other application.
#[derive(Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct HotkeyConfig {
    #[serde(default = "default_translate")]
    pub translate: String,
    #[serde(default = "default_export")]
    pub export: String,
    /// Clears the cached selection
    #[serde(default = "default_dismiss")]
    pub dismiss: String,
}

impl Default for HotkeyConfig {
    fn default() -> Self {
        Self {
            translate: default_translate(),
            export: default_export(),
            dismiss: default_dismiss(),
        }
    }
}

impl HotkeyConfig {
    pub fn new() -> Self {
        Self {
            translate: env_string("WORDBOOK_HOTKEY_TRANSLATE").unwrap_or_else(default_translate),
            export: env_string("WORDBOOK_HOTKEY_EXPORT").unwrap_or_else(default_export),
            dismiss: env_string("WORDBOOK_HOTKEY_DISMISS").unwrap_or_else(default_dismiss),
        }
    }
}
