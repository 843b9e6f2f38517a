use std::sync::Arc;

use serde_json::Value;
use wordbook_io::KeyValueStore;

use crate::StoreError;

pub const CREDENTIAL_KEY: &str = "OPENAI_API_KEY";

/// The API key slot in host storage
#[derive(Clone)]
pub struct CredentialStore {
    kv: Arc<dyn KeyValueStore>,
}

impl CredentialStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    pub fn get(&self) -> Result<Option<String>, StoreError> {
        Ok(match self.kv.get(CREDENTIAL_KEY)? {
            Some(Value::String(key)) if !key.trim().is_empty() => Some(key),
            _ => None,
        })
    }

    /// Store a trimmed key; blank input is rejected
    pub fn set(&self, key: &str) -> Result<(), StoreError> {
        let key = key.trim();
        if key.is_empty() {
            return Err(StoreError::EmptyCredential);
        }
        self.kv.set(CREDENTIAL_KEY, Value::String(key.to_string()))?;
        tracing::info!("API key saved");
        Ok(())
    }

    /// Store `key` only when no key is saved yet. Returns whether it was stored.
    pub fn seed(&self, key: Option<&str>) -> Result<bool, StoreError> {
        match key {
            Some(key) if !key.trim().is_empty() && self.get()?.is_none() => {
                self.set(key)?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wordbook_io::MemoryStore;

    #[test]
    fn test_set_and_get() {
        let creds = CredentialStore::new(Arc::new(MemoryStore::new()));
        assert_eq!(creds.get().unwrap(), None);
        creds.set("  sk-123 ").unwrap();
        assert_eq!(creds.get().unwrap().as_deref(), Some("sk-123"));
    }

    #[test]
    fn test_blank_key_rejected() {
        let creds = CredentialStore::new(Arc::new(MemoryStore::new()));
        let err = creds.set("   ").unwrap_err();
        assert_eq!(err.to_string(), "Please enter an API key");
    }

    #[test]
    fn test_seed_does_not_overwrite() {
        let creds = CredentialStore::new(Arc::new(MemoryStore::new()));
        assert!(creds.seed(Some("sk-env")).unwrap());
        assert!(!creds.seed(Some("sk-other")).unwrap());
        assert!(!creds.seed(None).unwrap());
        assert_eq!(creds.get().unwrap().as_deref(), Some("sk-env"));
    }
}
