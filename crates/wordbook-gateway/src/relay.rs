use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use kanal::{AsyncReceiver, AsyncSender};
use tokio::sync::oneshot;
use wordbook_io::{Download, DownloadSink};

use crate::request::CompletionRequest;
use crate::{CompletionGateway, Downloader, GatewayError, check_credential};

/// Messages accepted by the background relay
pub enum RelayRequest {
    CallCompletion {
        request: CompletionRequest,
        credential: String,
        reply: oneshot::Sender<Result<String, GatewayError>>,
    },
    Download {
        download: Download,
        reply: oneshot::Sender<Result<PathBuf, GatewayError>>,
    },
}

/// Requester side of the relay. Network access and downloads happen in the relay task.
#[derive(Clone)]
pub struct RelayGateway {
    tx: AsyncSender<RelayRequest>,
}

impl RelayGateway {
    pub fn new(tx: AsyncSender<RelayRequest>) -> Self {
        Self { tx }
    }

    /// Gateway plus the receiver to hand to [`run_relay`]
    pub fn channel(capacity: usize) -> (Self, AsyncReceiver<RelayRequest>) {
        let (tx, rx) = kanal::bounded_async(capacity);
        (Self::new(tx), rx)
    }
}

#[async_trait]
impl CompletionGateway for RelayGateway {
    async fn complete(
        &self,
        request: &CompletionRequest,
        credential: &str,
    ) -> Result<String, GatewayError> {
        let credential = check_credential(credential)?.to_string();

        let (reply, response) = oneshot::channel();
        self.tx
            .send(RelayRequest::CallCompletion {
                request: request.clone(),
                credential,
                reply,
            })
            .await
            .map_err(|_| GatewayError::RelayClosed)?;

        response.await.map_err(|_| GatewayError::RelayClosed)?
    }

    fn name(&self) -> &'static str {
        "relay"
    }
}

#[async_trait]
impl Downloader for RelayGateway {
    async fn download(&self, download: Download) -> Result<PathBuf, GatewayError> {
        let (reply, response) = oneshot::channel();
        self.tx
            .send(RelayRequest::Download { download, reply })
            .await
            .map_err(|_| GatewayError::RelayClosed)?;

        response.await.map_err(|_| GatewayError::RelayClosed)?
    }
}

/// Background relay loop. Each completion runs in its own task so overlapping
/// requests do not wait on one another. Returns when every sender is dropped.
pub async fn run_relay(
    rx: AsyncReceiver<RelayRequest>,
    backend: Arc<dyn CompletionGateway>,
    downloads: Arc<dyn DownloadSink>,
) -> Result<(), GatewayError> {
    tracing::info!("Relay started (backend: {})", backend.name());

    while let Ok(message) = rx.recv().await {
        match message {
            RelayRequest::CallCompletion {
                request,
                credential,
                reply,
            } => {
                let backend = backend.clone();
                tokio::spawn(async move {
                    let result = backend.complete(&request, &credential).await;
                    if let Err(e) = &result {
                        tracing::warn!("Relayed completion failed: {e}");
                    }
                    // The requester may have gone away; nothing to do then
                    let _ = reply.send(result);
                });
            }
            RelayRequest::Download { download, reply } => {
                let downloads = downloads.clone();
                let result = tokio::task::spawn_blocking(move || downloads.save(&download))
                    .await
                    .map_err(|e| GatewayError::Download(e.to_string()))
                    .and_then(|r| r.map_err(|e| GatewayError::Download(e.to_string())));
                let _ = reply.send(result);
            }
        }
    }

    tracing::info!("Relay stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{ChatMessage, ResponseFormat};
    use std::sync::Mutex;
    use std::time::Duration;
    use wordbook_io::MemoryDownloads;

    struct EchoBackend {
        seen: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl CompletionGateway for EchoBackend {
        async fn complete(
            &self,
            request: &CompletionRequest,
            credential: &str,
        ) -> Result<String, GatewayError> {
            self.seen.lock().unwrap().push(credential.to_string());
            Ok(request.user_content().unwrap_or_default().to_string())
        }

        fn name(&self) -> &'static str {
            "echo"
        }
    }

    fn request(text: &str) -> CompletionRequest {
        CompletionRequest {
            model: "m".to_string(),
            response_format: ResponseFormat::json_object(),
            temperature: 0.0,
            messages: vec![ChatMessage::user(text)],
        }
    }

    #[tokio::test]
    async fn test_relay_forwards_completion_and_credential() {
        let backend = Arc::new(EchoBackend {
            seen: Mutex::new(vec![]),
        });
        let (gateway, rx) = RelayGateway::channel(4);
        tokio::spawn(run_relay(rx, backend.clone(), Arc::new(MemoryDownloads::new())));

        let content = tokio::time::timeout(
            Duration::from_secs(2),
            gateway.complete(&request("hola"), "sk-relay"),
        )
        .await
        .unwrap()
        .unwrap();

        assert_eq!(content, "hola");
        assert_eq!(*backend.seen.lock().unwrap(), vec!["sk-relay".to_string()]);
    }

    #[tokio::test]
    async fn test_relay_rejects_missing_credential_locally() {
        let (gateway, rx) = RelayGateway::channel(4);
        let err = gateway.complete(&request("x"), "").await.unwrap_err();
        assert_eq!(err, GatewayError::MissingCredential);
        assert!(rx.is_empty());
    }

    #[tokio::test]
    async fn test_relay_download_reaches_sink() {
        let sink = Arc::new(MemoryDownloads::new());
        let (gateway, rx) = RelayGateway::channel(4);
        let backend = Arc::new(EchoBackend {
            seen: Mutex::new(vec![]),
        });
        tokio::spawn(run_relay(rx, backend, sink.clone()));

        let path = gateway
            .download(Download {
                filename: "wordbook_2024-05-01.csv".to_string(),
                mime: "text/csv".to_string(),
                bytes: b"x".to_vec(),
            })
            .await
            .unwrap();

        assert_eq!(path, PathBuf::from("wordbook_2024-05-01.csv"));
        assert_eq!(sink.saved().len(), 1);
    }

    #[tokio::test]
    async fn test_closed_relay_reports_error() {
        let (gateway, rx) = RelayGateway::channel(1);
        drop(rx);
        let err = gateway.complete(&request("x"), "sk").await.unwrap_err();
        assert_eq!(err, GatewayError::RelayClosed);
    }
}
