use std::env;

use serde::{Deserialize, Serialize};

use self::gateway::GatewayConfig;
use self::hotkeys::HotkeyConfig;
use self::selection::SelectionConfig;
use self::storage::StorageConfig;
use self::translator::TranslatorConfig;
use self::ui::UiConfig;

pub mod gateway;
pub mod hotkeys;
pub mod selection;
pub mod storage;
pub mod translator;
pub mod ui;

pub use gateway::GatewayMode;

#[derive(Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub translator: TranslatorConfig,
    pub gateway: GatewayConfig,
    pub storage: StorageConfig,
    pub hotkeys: HotkeyConfig,
    pub selection: SelectionConfig,
    pub ui: UiConfig,
}

impl Config {
    /// Defaults overridden by `WORDBOOK_*` environment variables
    pub fn new() -> Self {
        Config {
            translator: TranslatorConfig::new(),
            gateway: GatewayConfig::new(),
            storage: StorageConfig::new(),
            hotkeys: HotkeyConfig::new(),
            selection: SelectionConfig::new(),
            ui: UiConfig::default(),
        }
    }
}

pub(crate) fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

pub(crate) fn env_string(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}
