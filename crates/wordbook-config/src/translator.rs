use serde::{Deserialize, Serialize};

use crate::{env_parse, env_string};

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_target_lang() -> String {
    "English".to_string()
}

fn default_max_chars() -> usize {
    280
}

fn default_api_url() -> String {
    "https://api.openai.com/v1/chat/completions".to_string()
}

fn default_timeout_ms() -> u64 {
    20_000
}

#[derive(Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct TranslatorConfig {
    #[serde(default = "default_model")]
    pub model: String,
    /// Language the gloss and example translation are written in
    #[serde(default = "default_target_lang")]
    pub target_lang: String,
    /// Longer selections are rejected before any request is made
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            target_lang: default_target_lang(),
            max_chars: default_max_chars(),
            api_url: default_api_url(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl TranslatorConfig {
    pub fn new() -> Self {
        Self {
            model: env_string("WORDBOOK_MODEL").unwrap_or_else(default_model),
            target_lang: env_string("WORDBOOK_TARGET_LANG").unwrap_or_else(default_target_lang),
            max_chars: env_parse("WORDBOOK_MAX_CHARS").unwrap_or_else(default_max_chars),
            api_url: env_string("WORDBOOK_API_URL").unwrap_or_else(default_api_url),
            timeout_ms: env_parse("WORDBOOK_TIMEOUT_MS").unwrap_or_else(default_timeout_ms),
        }
    }
}
