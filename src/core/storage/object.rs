use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use object_store::azure::MicrosoftAzureBuilder;
use object_store::memory::InMemory;
use object_store::path::Path as ObjectPath;
use object_store::{ObjectStore, PutPayload};
use tracing::info;

use super::{AudioStore, SasSigner, StorageError};
use crate::config::StorageCredentials;

/// Well-known Azurite development key, used by the in-memory store
const DEV_ACCOUNT: &str = "devstoreaccount1";
const DEV_ACCOUNT_KEY: &str =
    "Eby8vdM02xNOcqFlqUwJPLlmEtlCDXJ1OUzFT50uSRZ6IFsuFq2UVErCz4I6tq/K1SZFPTOtr/KBHBeksoGMGw==";

/// Audio store over an `object_store` backend with locally signed SAS URLs
#[derive(Debug, Clone)]
pub struct BlobAudioStore {
    store: Arc<dyn ObjectStore>,
    signer: SasSigner,
}

impl BlobAudioStore {
    pub fn new(store: Arc<dyn ObjectStore>, signer: SasSigner) -> Self {
        Self { store, signer }
    }

    /// Azure Blob Storage container from account credentials
    pub fn azure(credentials: &StorageCredentials) -> Result<Self, StorageError> {
        let store = MicrosoftAzureBuilder::new()
            .with_account(&credentials.account_name)
            .with_access_key(&credentials.account_key)
            .with_container_name(&credentials.container)
            .build()
            .map_err(|e| StorageError::Configuration(e.to_string()))?;
        let signer = SasSigner::new(
            &credentials.account_name,
            &credentials.account_key,
            &credentials.container,
        )?;
        Ok(Self::new(Arc::new(store), signer))
    }

    /// Process-local store for tests and local runs
    pub fn in_memory(container: &str) -> Result<Self, StorageError> {
        let signer = SasSigner::new(DEV_ACCOUNT, DEV_ACCOUNT_KEY, container)?;
        Ok(Self::new(Arc::new(InMemory::new()), signer))
    }

    pub fn container(&self) -> &str {
        self.signer.container()
    }

    pub(super) fn object_store(&self) -> &Arc<dyn ObjectStore> {
        &self.store
    }

    fn path(key: &str) -> Result<ObjectPath, StorageError> {
        ObjectPath::parse(key).map_err(|e| StorageError::Upload {
            key: key.to_string(),
            message: e.to_string(),
        })
    }

    /// Raw bytes stored under `key`
    pub async fn get(&self, key: &str) -> Result<Bytes, StorageError> {
        let read_error = |e: object_store::Error| StorageError::Read {
            key: key.to_string(),
            message: e.to_string(),
        };
        let result = self.store.get(&Self::path(key)?).await.map_err(read_error)?;
        result.bytes().await.map_err(read_error)
    }
}

#[async_trait]
impl AudioStore for BlobAudioStore {
    async fn put(&self, key: &str, bytes: Bytes) -> Result<(), StorageError> {
        let size_bytes = bytes.len();
        self.store
            .put(&Self::path(key)?, PutPayload::from(bytes))
            .await
            .map_err(|e| StorageError::Upload {
                key: key.to_string(),
                message: e.to_string(),
            })?;
        info!(key = %key, size_bytes, container = %self.container(), "Uploaded audio");
        Ok(())
    }

    async fn sign_url(&self, key: &str, expiry: Duration) -> Result<String, StorageError> {
        let expiry = chrono::Duration::from_std(expiry).map_err(|e| StorageError::Signing {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        self.signer.signed_url(key, Utc::now() + expiry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_overwrites_same_key() {
        let store = BlobAudioStore::in_memory("audio-files").unwrap();
        store
            .put("story_1a2b3c4d.mp3", Bytes::from_static(b"first"))
            .await
            .unwrap();
        store
            .put("story_1a2b3c4d.mp3", Bytes::from_static(b"second"))
            .await
            .unwrap();

        assert_eq!(
            store.get("story_1a2b3c4d.mp3").await.unwrap().as_ref(),
            b"second"
        );
        let stats = store.storage_stats().await.unwrap();
        assert_eq!(stats.total_blobs, 1);
    }

    #[tokio::test]
    async fn test_sign_url_points_at_blob() {
        let store = BlobAudioStore::in_memory("audio-files").unwrap();
        let url = store
            .sign_url("story_1a2b3c4d.mp3", Duration::from_secs(48 * 3600))
            .await
            .unwrap();
        assert!(url.starts_with(
            "https://devstoreaccount1.blob.core.windows.net/audio-files/story_1a2b3c4d.mp3?"
        ));
        assert!(url.contains("sp=r"));
    }

    #[test]
    fn test_azure_rejects_bad_key() {
        let err = BlobAudioStore::azure(&StorageCredentials {
            account_name: "acct".to_string(),
            account_key: "%%%".to_string(),
            container: "audio-files".to_string(),
        })
        .unwrap_err();
        assert!(matches!(err, StorageError::Configuration(_)));
    }
}
