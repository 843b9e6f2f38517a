use std::sync::Arc;

use serde_json::{Map, Value};
use wordbook_config::translator::TranslatorConfig;
use wordbook_gateway::{CompletionGateway, CompletionRequest, check_credential};
use wordbook_types::{Card, PageContext};

use crate::error::TranslateError;
use crate::prompt;
use crate::response::extract_json_object;

/// Raw completion shown when a reply cannot be parsed
pub const DEFAULT_PREVIEW_CHARS: usize = 240;

#[derive(Debug, Clone, PartialEq)]
pub struct TranslateSettings {
    pub max_chars: usize,
    pub target_lang: String,
    pub model: String,
}

impl From<&TranslatorConfig> for TranslateSettings {
    fn from(config: &TranslatorConfig) -> Self {
        Self {
            max_chars: config.max_chars,
            target_lang: config.target_lang.clone(),
            model: config.model.clone(),
        }
    }
}

/// Selection → request → gateway → parse → card
pub struct TranslationPipeline {
    gateway: Arc<dyn CompletionGateway>,
    settings: TranslateSettings,
    preview_chars: usize,
}

impl TranslationPipeline {
    pub fn new(gateway: Arc<dyn CompletionGateway>, settings: TranslateSettings) -> Self {
        Self {
            gateway,
            settings,
            preview_chars: DEFAULT_PREVIEW_CHARS,
        }
    }

    pub fn with_preview_chars(mut self, preview_chars: usize) -> Self {
        self.preview_chars = preview_chars;
        self
    }

    pub fn settings(&self) -> &TranslateSettings {
        &self.settings
    }

    /// Trimmed text if it is non-empty and within the length limit
    pub fn check_selection(&self, text: &str) -> Result<String, TranslateError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(TranslateError::EmptySelection);
        }

        let length = text.chars().count();
        if length > self.settings.max_chars {
            return Err(TranslateError::SelectionTooLong {
                length,
                limit: self.settings.max_chars,
            });
        }

        Ok(text.to_string())
    }

    /// Fails fast on a missing or placeholder key
    pub fn check_credential(&self, credential: Option<&str>) -> Result<String, TranslateError> {
        let credential = credential.ok_or(TranslateError::MissingCredential)?;
        Ok(check_credential(credential)?.to_string())
    }

    pub fn build_request(&self, text: &str) -> CompletionRequest {
        prompt::build_request(&self.settings.model, &self.settings.target_lang, text)
    }

    /// Every precondition, then the request. Nothing is sent if a check fails.
    pub async fn translate(
        &self,
        text: &str,
        credential: Option<&str>,
        page: &PageContext,
    ) -> Result<Card, TranslateError> {
        let text = self.check_selection(text)?;
        let credential = self.check_credential(credential)?;
        self.request_card(&text, &credential, page).await
    }

    /// Single attempt against the gateway for already-checked text
    pub async fn request_card(
        &self,
        text: &str,
        credential: &str,
        page: &PageContext,
    ) -> Result<Card, TranslateError> {
        let request = self.build_request(text);

        tracing::debug!(
            "Requesting card via {} gateway ({} chars)",
            self.gateway.name(),
            text.chars().count()
        );
        let raw = self.gateway.complete(&request, credential).await?;

        let data = match extract_json_object(&raw) {
            Some(data) if field(&data, "term").is_some() => data,
            _ => {
                tracing::warn!("Unparsable completion ({} chars)", raw.chars().count());
                return Err(TranslateError::UnparsableResponse {
                    raw_snippet: raw.chars().take(self.preview_chars).collect(),
                });
            }
        };

        let timestamp = chrono::Utc::now().timestamp_millis();
        Ok(assemble_card(&data, text, &self.settings.target_lang, page, timestamp))
    }
}

/// Non-empty string (or number) value of `key`
fn field(data: &Map<String, Value>, key: &str) -> Option<String> {
    match data.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Parsed fields with their fallbacks, plus provenance
pub fn assemble_card(
    data: &Map<String, Value>,
    text: &str,
    target_lang: &str,
    page: &PageContext,
    timestamp: i64,
) -> Card {
    Card {
        term: field(data, "term").unwrap_or_default(),
        gloss: field(data, "gloss").unwrap_or_default(),
        pos: field(data, "pos").unwrap_or_default(),
        source_lang: field(data, "source_lang").unwrap_or_default(),
        target_lang: field(data, "target_lang").unwrap_or_else(|| target_lang.to_string()),
        example: field(data, "example").unwrap_or_else(|| text.to_string()),
        example_translation: field(data, "example_translation").unwrap_or_default(),
        page_title: page.title.clone(),
        page_url: page.url.clone(),
        timestamp,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use wordbook_gateway::GatewayError;

    struct ScriptedGateway {
        reply: Result<String, GatewayError>,
        requests: Mutex<Vec<CompletionRequest>>,
    }

    impl ScriptedGateway {
        fn new(reply: Result<&str, GatewayError>) -> Arc<Self> {
            Arc::new(Self {
                reply: reply.map(str::to_string),
                requests: Mutex::new(vec![]),
            })
        }

        fn calls(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    #[async_trait::async_trait]
    impl CompletionGateway for ScriptedGateway {
        async fn complete(
            &self,
            request: &CompletionRequest,
            _credential: &str,
        ) -> Result<String, GatewayError> {
            self.requests.lock().unwrap().push(request.clone());
            self.reply.clone()
        }

        fn name(&self) -> &'static str {
            "scripted"
        }
    }

    fn settings() -> TranslateSettings {
        TranslateSettings {
            max_chars: 280,
            target_lang: "English".to_string(),
            model: "gpt-4o-mini".to_string(),
        }
    }

    fn page() -> PageContext {
        PageContext {
            title: "Article".to_string(),
            url: "https://example.fr/a".to_string(),
        }
    }

    const BONJOUR: &str = r#"{"term":"bonjour","gloss":"hello","pos":"interjection","source_lang":"French","target_lang":"English","example":"Bonjour, comment ça va?","example_translation":"Hello, how are you?"}"#;

    #[tokio::test]
    async fn test_bonjour_card() {
        let gateway = ScriptedGateway::new(Ok(BONJOUR));
        let pipeline = TranslationPipeline::new(gateway.clone(), settings());

        let card = pipeline
            .translate("bonjour", Some("sk-test"), &page())
            .await
            .unwrap();

        assert_eq!(card.term, "bonjour");
        assert_eq!(card.gloss, "hello");
        assert_eq!(card.example_translation, "Hello, how are you?");
        assert_eq!(card.page_title, "Article");
        assert_eq!(card.page_url, "https://example.fr/a");
        assert!(card.timestamp > 0);
        assert_eq!(card.dedup_key(), "bonjour__hello");
        assert_eq!(gateway.calls(), 1);
    }

    #[tokio::test]
    async fn test_selection_is_sent_verbatim_once() {
        let selections = [
            "bonjour",
            "a \"quoted\" phrase",
            "multi\nline",
            "ünïcödé テキスト",
            &"x".repeat(280),
        ];

        for selection in selections {
            let gateway = ScriptedGateway::new(Ok(BONJOUR));
            let pipeline = TranslationPipeline::new(gateway.clone(), settings());
            pipeline
                .translate(selection, Some("sk-test"), &page())
                .await
                .unwrap();

            let requests = gateway.requests.lock().unwrap();
            assert_eq!(requests.len(), 1);
            let user = requests[0].user_content().unwrap();
            assert!(user.contains(&format!("\"\"\"{selection}\"\"\"")), "{user}");
            assert!(user.starts_with("Target language: English\n"));
        }
    }

    #[tokio::test]
    async fn test_too_long_selection_never_calls_gateway() {
        let gateway = ScriptedGateway::new(Ok(BONJOUR));
        let pipeline = TranslationPipeline::new(gateway.clone(), settings());

        let err = pipeline
            .translate(&"a".repeat(300), Some("sk-test"), &page())
            .await
            .unwrap_err();

        assert_eq!(
            err,
            TranslateError::SelectionTooLong {
                length: 300,
                limit: 280
            }
        );
        assert_eq!(gateway.calls(), 0);
    }

    #[tokio::test]
    async fn test_limit_counts_characters_not_bytes() {
        let pipeline = TranslationPipeline::new(
            ScriptedGateway::new(Ok(BONJOUR)),
            TranslateSettings {
                max_chars: 3,
                ..settings()
            },
        );
        assert_eq!(pipeline.check_selection(" été "), Ok("été".to_string()));
    }

    #[tokio::test]
    async fn test_blank_selection_and_missing_key() {
        let gateway = ScriptedGateway::new(Ok(BONJOUR));
        let pipeline = TranslationPipeline::new(gateway.clone(), settings());

        assert_eq!(
            pipeline.translate(" \n ", Some("sk"), &page()).await,
            Err(TranslateError::EmptySelection)
        );
        assert_eq!(
            pipeline.translate("bonjour", None, &page()).await,
            Err(TranslateError::MissingCredential)
        );
        assert_eq!(
            pipeline
                .translate("bonjour", Some("REPLACE_ME"), &page())
                .await,
            Err(TranslateError::MissingCredential)
        );
        assert_eq!(gateway.calls(), 0);
    }

    #[tokio::test]
    async fn test_reply_without_term_is_unparsable() {
        let long_reply = format!("I cannot help with that. {}", "z".repeat(400));
        let gateway = ScriptedGateway::new(Ok(long_reply.as_str()));
        let pipeline = TranslationPipeline::new(gateway, settings());

        match pipeline.translate("bonjour", Some("sk"), &page()).await {
            Err(TranslateError::UnparsableResponse { raw_snippet }) => {
                assert_eq!(raw_snippet.chars().count(), 240);
                assert!(raw_snippet.starts_with("I cannot help"));
            }
            other => panic!("unexpected {other:?}"),
        }

        let pipeline = TranslationPipeline::new(ScriptedGateway::new(Ok("{}")), settings());
        assert_eq!(
            pipeline.translate("bonjour", Some("sk"), &page()).await,
            Err(TranslateError::UnparsableResponse {
                raw_snippet: "{}".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_gateway_failure_is_surfaced() {
        let gateway = ScriptedGateway::new(Err(GatewayError::Http {
            status: 401,
            status_text: "Unauthorized".to_string(),
        }));
        let pipeline = TranslationPipeline::new(gateway, settings());
        let err = pipeline
            .translate("bonjour", Some("sk"), &page())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "HTTP 401: Unauthorized");
        assert!(!err.is_precondition());
    }

    #[test]
    fn test_fallbacks_fill_missing_fields() {
        let data = extract_json_object(r#"{"term":"chat","gloss":"","pos":null}"#).unwrap();
        let card = assemble_card(&data, "le chat dort", "German", &page(), 7);

        assert_eq!(card.term, "chat");
        assert_eq!(card.gloss, "");
        assert_eq!(card.pos, "");
        assert_eq!(card.source_lang, "");
        assert_eq!(card.target_lang, "German");
        assert_eq!(card.example, "le chat dort");
        assert_eq!(card.example_translation, "");
        assert_eq!(card.timestamp, 7);
    }
}
