use wordbook_gateway::{ChatMessage, CompletionRequest, ResponseFormat};

/// Fields the model must return, in order
pub const CARD_FIELDS: [&str; 7] = [
    "term",
    "gloss",
    "pos",
    "source_lang",
    "target_lang",
    "example",
    "example_translation",
];

pub const SYSTEM_INSTRUCTION: &str = "Return ONLY a JSON object with keys: term, gloss, pos, source_lang, target_lang, example, example_translation.";

pub fn user_message(target_lang: &str, text: &str) -> String {
    format!("Target language: {target_lang}\nText: \"\"\"{text}\"\"\"")
}

/// Deterministic, JSON-mode request for one selection
pub fn build_request(model: &str, target_lang: &str, text: &str) -> CompletionRequest {
    CompletionRequest {
        model: model.to_string(),
        response_format: ResponseFormat::json_object(),
        temperature: 0.0,
        messages: vec![
            ChatMessage::system(SYSTEM_INSTRUCTION),
            ChatMessage::user(user_message(target_lang, text)),
        ],
    }
}
