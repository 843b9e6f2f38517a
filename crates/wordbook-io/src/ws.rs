use std::time::Duration;

use futures_util::StreamExt;
use serde_json::Value;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

/// Wait between reconnect attempts
pub const RECONNECT_DELAY: Duration = Duration::from_secs(5);

/// Selected text carried by one frame. Plain text is taken as is; JSON objects
/// may carry it under `text` or `sentence`.
pub fn frame_text(frame: &str) -> Option<String> {
    let frame = frame.trim();
    if frame.is_empty() {
        return None;
    }

    if frame.starts_with('{')
        && let Ok(Value::Object(map)) = serde_json::from_str::<Value>(frame)
    {
        return ["text", "sentence"]
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_str))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string);
    }

    Some(frame.to_string())
}

/// Feeds the text of every frame from `url` to `on_text`, reconnecting whenever
/// the socket closes or cannot be reached. Runs until cancelled.
pub async fn watch_ws<F>(url: &str, mut on_text: F)
where
    F: FnMut(String) + Send + 'static,
{
    loop {
        match connect_async(url).await {
            Ok((ws_stream, _)) => {
                tracing::info!("WebSocket connected to {url}");
                let (_, mut read) = ws_stream.split();

                while let Some(msg) = read.next().await {
                    match msg {
                        Ok(Message::Text(frame)) => {
                            if let Some(text) = frame_text(frame.as_str()) {
                                on_text(text);
                            }
                        }
                        Ok(Message::Close(_)) => break,
                        Ok(_) => {}
                        Err(e) => {
                            tracing::warn!("WebSocket read failed: {e}");
                            break;
                        }
                    }
                }
                tracing::info!("WebSocket stream ended");
            }
            Err(e) => tracing::warn!("WebSocket connect to {url} failed: {e}"),
        }

        tokio::time::sleep(RECONNECT_DELAY).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_frames_are_trimmed() {
        assert_eq!(frame_text("  猫が好き \n"), Some("猫が好き".to_string()));
        assert_eq!(frame_text("   "), None);
    }

    #[test]
    fn test_json_frames_are_unpacked() {
        assert_eq!(
            frame_text(r#"{"sentence":" bonjour "}"#),
            Some("bonjour".to_string())
        );
        assert_eq!(frame_text(r#"{"text":"chat","sentence":"x"}"#), Some("chat".to_string()));
        assert_eq!(frame_text(r#"{"other":"x"}"#), None);
    }

    #[test]
    fn test_brace_text_that_is_not_json_passes_through() {
        assert_eq!(frame_text("{not json"), Some("{not json".to_string()));
    }
}
