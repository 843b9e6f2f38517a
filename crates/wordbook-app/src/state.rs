use std::sync::{Arc, Mutex};

use tokio::sync::RwLock;
use wordbook_config::Config;
use wordbook_core::{SelectionResolver, TranslateSettings, TranslationPipeline};
use wordbook_gateway::{CompletionGateway, Downloader};
use wordbook_io::KeyValueStore;
use wordbook_store::{CredentialStore, VocabularyStore};

pub struct AppState {
    pub config: Arc<RwLock<Config>>,
    pub resolver: Arc<SelectionResolver>,
    pub pipeline: Arc<TranslationPipeline>,
    pub vocabulary: VocabularyStore,
    pub credentials: CredentialStore,
    pub downloader: Arc<dyn Downloader>,
    /// Text this app last put on the clipboard, so the watcher does not echo it back
    last_copied: Mutex<Option<String>>,
}

impl AppState {
    pub fn new(
        config: Config,
        kv: Arc<dyn KeyValueStore>,
        resolver: SelectionResolver,
        gateway: Arc<dyn CompletionGateway>,
        downloader: Arc<dyn Downloader>,
    ) -> Self {
        let pipeline = TranslationPipeline::new(gateway, TranslateSettings::from(&config.translator))
            .with_preview_chars(config.ui.preview_chars);

        Self {
            config: Arc::new(RwLock::new(config)),
            resolver: Arc::new(resolver),
            pipeline: Arc::new(pipeline),
            vocabulary: VocabularyStore::new(kv.clone()),
            credentials: CredentialStore::new(kv),
            downloader,
            last_copied: Mutex::new(None),
        }
    }

    pub fn note_copied(&self, text: &str) {
        *self.last_copied.lock().unwrap_or_else(|e| e.into_inner()) = Some(text.to_string());
    }

    pub fn is_own_copy(&self, text: &str) -> bool {
        self.last_copied
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .as_deref()
            == Some(text)
    }
}
