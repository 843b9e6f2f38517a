use serde::{Deserialize, Serialize};

use crate::env_string;

fn default_settle_ms() -> u64 {
    10
}

fn default_poll_ms() -> u64 {
    500
}

fn default_ws_url() -> String {
    "ws://localhost:8080".to_string()
}

#[derive(Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct SelectionConfig {
    /// Delay between a pointer-up and reading the selection
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,
    /// Clipboard polling period
    #[serde(default = "default_poll_ms")]
    pub poll_ms: u64,
    /// Also accept selections pushed over a websocket
    pub listen_to_ws: bool,
    #[serde(default = "default_ws_url")]
    pub ws_url: String,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            settle_ms: default_settle_ms(),
            poll_ms: default_poll_ms(),
            listen_to_ws: false,
            ws_url: default_ws_url(),
        }
    }
}

impl SelectionConfig {
    pub fn new() -> Self {
        let ws_url = env_string("WS_URL");
        Self {
            listen_to_ws: ws_url.is_some(),
            ws_url: ws_url.unwrap_or_else(default_ws_url),
            ..Default::default()
        }
    }
}
