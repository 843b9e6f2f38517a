use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::env_string;

/// How completion requests leave the process
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GatewayMode {
    /// Call the API from the requesting task
    Direct,
    /// Hand the call to the background relay, which owns network access and downloads
    #[default]
    Relay,
}

impl FromStr for GatewayMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "direct" => Ok(GatewayMode::Direct),
            "relay" => Ok(GatewayMode::Relay),
            other => Err(format!("unknown gateway mode: {other}")),
        }
    }
}

fn default_relay_capacity() -> usize {
    16
}

#[derive(Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct GatewayConfig {
    pub mode: GatewayMode,
    /// Queue depth between requesters and the relay task
    #[serde(default = "default_relay_capacity")]
    pub relay_capacity: usize,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            mode: GatewayMode::default(),
            relay_capacity: default_relay_capacity(),
        }
    }
}

impl GatewayConfig {
    pub fn new() -> Self {
        let mode = env_string("WORDBOOK_GATEWAY")
            .and_then(|v| v.parse().ok())
            .unwrap_or_default();

        Self {
            mode,
            relay_capacity: default_relay_capacity(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_parses_case_insensitively() {
        assert_eq!("Direct".parse::<GatewayMode>(), Ok(GatewayMode::Direct));
        assert_eq!(" relay ".parse::<GatewayMode>(), Ok(GatewayMode::Relay));
        assert!("proxy".parse::<GatewayMode>().is_err());
    }
}
