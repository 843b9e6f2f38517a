use serde::{Deserialize, Serialize};

fn default_preview_chars() -> usize {
    240
}

#[derive(Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct UiConfig {
    /// Raw completion shown when a response cannot be parsed
    #[serde(default = "default_preview_chars")]
    pub preview_chars: usize,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            preview_chars: default_preview_chars(),
        }
    }
}
