use std::sync::Arc;

use kanal::AsyncReceiver;
use wordbook_config::GatewayMode;
use wordbook_gateway::{
    CompletionGateway, Downloader, LocalDownloader, RelayGateway, RelayRequest, run_relay,
};
use wordbook_io::DownloadSink;

/// What the rest of the app talks to for completions and downloads
pub struct Transport {
    pub gateway: Arc<dyn CompletionGateway>,
    pub downloader: Arc<dyn Downloader>,
    /// Present in relay mode; must be spawned for requests to make progress
    pub relay: Option<RelayTask>,
}

pub struct RelayTask {
    rx: AsyncReceiver<RelayRequest>,
    backend: Arc<dyn CompletionGateway>,
    downloads: Arc<dyn DownloadSink>,
}

impl RelayTask {
    pub async fn run(self) -> anyhow::Result<()> {
        run_relay(self.rx, self.backend, self.downloads).await?;
        Ok(())
    }
}

/// In direct mode callers use `backend` and `downloads` themselves. In relay mode
/// both stay behind the relay task and callers only hold its channel.
pub fn build_transport(
    mode: GatewayMode,
    relay_capacity: usize,
    backend: Arc<dyn CompletionGateway>,
    downloads: Arc<dyn DownloadSink>,
) -> Transport {
    match mode {
        GatewayMode::Direct => Transport {
            gateway: backend,
            downloader: Arc::new(LocalDownloader::new(downloads)),
            relay: None,
        },
        GatewayMode::Relay => {
            let (gateway, rx) = RelayGateway::channel(relay_capacity);
            let gateway = Arc::new(gateway);
            Transport {
                gateway: gateway.clone(),
                downloader: gateway,
                relay: Some(RelayTask {
                    rx,
                    backend,
                    downloads,
                }),
            }
        }
    }
}
