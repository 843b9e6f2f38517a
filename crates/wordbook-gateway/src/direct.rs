use std::time::Duration;

use async_trait::async_trait;

use crate::request::CompletionRequest;
use crate::{CompletionGateway, GatewayError, check_credential, completion_content};

/// Calls the completion endpoint from the requesting task
#[derive(Clone)]
pub struct DirectGateway {
    client: reqwest::Client,
    api_url: String,
}

impl DirectGateway {
    pub fn new(api_url: String, timeout: Duration) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        Ok(Self { client, api_url })
    }
}

fn map_send_error(e: reqwest::Error) -> GatewayError {
    if e.is_timeout() {
        GatewayError::Timeout
    } else {
        GatewayError::Network(e.to_string())
    }
}

#[async_trait]
impl CompletionGateway for DirectGateway {
    async fn complete(
        &self,
        request: &CompletionRequest,
        credential: &str,
    ) -> Result<String, GatewayError> {
        let credential = check_credential(credential)?;

        tracing::debug!(
            "POST {} model={} messages={}",
            self.api_url,
            request.model,
            request.messages.len()
        );

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(credential)
            .json(request)
            .send()
            .await
            .map_err(map_send_error)?;

        let status = response.status();
        if status.as_u16() >= 400 {
            return Err(GatewayError::Http {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        let body = response.text().await.map_err(map_send_error)?;
        let json: serde_json::Value =
            serde_json::from_str(&body).map_err(|e| GatewayError::Decode(e.to_string()))?;

        Ok(completion_content(&json))
    }

    fn name(&self) -> &'static str {
        "direct"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{ChatMessage, ResponseFormat};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn request() -> CompletionRequest {
        CompletionRequest {
            model: "gpt-4o-mini".to_string(),
            response_format: ResponseFormat::json_object(),
            temperature: 0.0,
            messages: vec![ChatMessage::user("Text: \"\"\"bonjour\"\"\"")],
        }
    }

    /// Serves one canned response and hands back the raw request it received
    async fn serve_once(
        response: &'static str,
        delay: Duration,
    ) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/v1/chat/completions", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut received = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                received.extend_from_slice(&buf[..n]);
                let text = String::from_utf8_lossy(&received);
                if let Some(header_end) = text.find("\r\n\r\n") {
                    let length = text[..header_end]
                        .lines()
                        .find_map(|l| {
                            let (name, value) = l.split_once(':')?;
                            name.eq_ignore_ascii_case("content-length")
                                .then(|| value.trim().parse::<usize>().ok())
                                .flatten()
                        })
                        .unwrap_or(0);
                    if received.len() >= header_end + 4 + length {
                        break;
                    }
                }
                if n == 0 {
                    break;
                }
            }
            tokio::time::sleep(delay).await;
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
            String::from_utf8_lossy(&received).to_string()
        });

        (url, handle)
    }

    #[tokio::test]
    async fn test_success_returns_message_content() {
        let (url, server) = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 56\r\nConnection: close\r\n\r\n{\"choices\":[{\"message\":{\"content\":\"{\\\"term\\\":\\\"a\\\"}\"}}]}",
            Duration::ZERO,
        )
        .await;

        let gateway = DirectGateway::new(url, Duration::from_secs(5)).unwrap();
        let content = gateway.complete(&request(), "sk-test").await.unwrap();
        assert_eq!(content, r#"{"term":"a"}"#);

        let raw = server.await.unwrap();
        assert!(raw.starts_with("POST /v1/chat/completions"));
        assert!(raw.to_ascii_lowercase().contains("authorization: bearer sk-test"));
        assert!(raw.contains("\"response_format\":{\"type\":\"json_object\"}"));
    }

    #[tokio::test]
    async fn test_unauthorized_is_http_error() {
        let (url, _server) = serve_once(
            "HTTP/1.1 401 Unauthorized\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
            Duration::ZERO,
        )
        .await;

        let gateway = DirectGateway::new(url, Duration::from_secs(5)).unwrap();
        let err = gateway.complete(&request(), "sk-test").await.unwrap_err();
        assert_eq!(
            err,
            GatewayError::Http {
                status: 401,
                status_text: "Unauthorized".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_missing_content_path_defaults() {
        let (url, _server) = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 15\r\nConnection: close\r\n\r\n{\"choices\":[]}\n",
            Duration::ZERO,
        )
        .await;

        let gateway = DirectGateway::new(url, Duration::from_secs(5)).unwrap();
        assert_eq!(gateway.complete(&request(), "sk-test").await.unwrap(), "{}");
    }

    #[tokio::test]
    async fn test_slow_server_times_out() {
        let (url, _server) = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Length: 2\r\nConnection: close\r\n\r\n{}",
            Duration::from_secs(2),
        )
        .await;

        let gateway = DirectGateway::new(url, Duration::from_millis(200)).unwrap();
        let err = gateway.complete(&request(), "sk-test").await.unwrap_err();
        assert_eq!(err, GatewayError::Timeout);
    }

    #[tokio::test]
    async fn test_placeholder_credential_fails_before_connecting() {
        // Nothing listens on port 9; reaching the network would yield a Network error
        let gateway =
            DirectGateway::new("http://127.0.0.1:9/".to_string(), Duration::from_secs(1)).unwrap();
        let err = gateway
            .complete(&request(), "REPLACE_ME")
            .await
            .unwrap_err();
        assert_eq!(err, GatewayError::MissingCredential);
    }

    #[tokio::test]
    async fn test_refused_connection_is_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/", listener.local_addr().unwrap());
        drop(listener);

        let gateway = DirectGateway::new(url, Duration::from_secs(1)).unwrap();
        let err = gateway.complete(&request(), "sk-test").await.unwrap_err();
        assert!(matches!(err, GatewayError::Network(_)), "got {err:?}");
    }
}
