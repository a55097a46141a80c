//! Container maintenance: usage statistics and removal of stale audio.

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use futures::TryStreamExt;
use object_store::ObjectMeta;
use serde::Serialize;
use tracing::{error, info};

use super::{BlobAudioStore, StorageError};

const MB: f64 = 1024.0 * 1024.0;
const GB: f64 = MB * 1024.0;

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StorageStats {
    pub container: String,
    pub total_blobs: usize,
    pub total_size_bytes: u64,
    pub total_size_mb: f64,
    pub total_size_gb: f64,
    pub oldest_blob: Option<DateTime<Utc>>,
    pub newest_blob: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlobInfo {
    pub name: String,
    pub size_bytes: u64,
    pub last_modified: DateTime<Utc>,
}

impl From<ObjectMeta> for BlobInfo {
    fn from(meta: ObjectMeta) -> Self {
        Self {
            name: meta.location.to_string(),
            size_bytes: u64::try_from(meta.size).unwrap_or(u64::MAX),
            last_modified: meta.last_modified,
        }
    }
}

/// Outcome of a cleanup run. A dry run lists the candidates and deletes nothing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CleanupReport {
    pub dry_run: bool,
    pub days_threshold: u32,
    pub blobs_found: usize,
    pub total_size_bytes: u64,
    pub total_size_mb: f64,
    pub deleted: Vec<String>,
    pub errors: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub blobs: Vec<BlobInfo>,
    pub message: String,
}

impl BlobAudioStore {
    async fn list_blobs(&self) -> Result<Vec<BlobInfo>, StorageError> {
        let listing: Vec<ObjectMeta> = self
            .object_store()
            .list(None)
            .try_collect()
            .await
            .map_err(|e| StorageError::Listing(e.to_string()))?;
        Ok(listing.into_iter().map(BlobInfo::from).collect())
    }

    pub async fn storage_stats(&self) -> Result<StorageStats, StorageError> {
        let blobs = self.list_blobs().await?;
        let total_size_bytes: u64 = blobs.iter().map(|b| b.size_bytes).sum();

        Ok(StorageStats {
            container: self.container().to_string(),
            total_blobs: blobs.len(),
            total_size_bytes,
            total_size_mb: round_to(total_size_bytes as f64 / MB, 2),
            total_size_gb: round_to(total_size_bytes as f64 / GB, 3),
            oldest_blob: blobs.iter().map(|b| b.last_modified).min(),
            newest_blob: blobs.iter().map(|b| b.last_modified).max(),
        })
    }

    /// Remove blobs last modified more than `days` days ago
    pub async fn cleanup_older_than(
        &self,
        days: u32,
        dry_run: bool,
    ) -> Result<CleanupReport, StorageError> {
        let cutoff = Utc::now() - ChronoDuration::days(i64::from(days));
        self.cleanup_before(cutoff, days, dry_run).await
    }

    pub async fn cleanup_before(
        &self,
        cutoff: DateTime<Utc>,
        days_threshold: u32,
        dry_run: bool,
    ) -> Result<CleanupReport, StorageError> {
        let old_blobs: Vec<BlobInfo> = self
            .list_blobs()
            .await?
            .into_iter()
            .filter(|b| b.last_modified < cutoff)
            .collect();
        let total_size_bytes: u64 = old_blobs.iter().map(|b| b.size_bytes).sum();
        let total_size_mb = round_to(total_size_bytes as f64 / MB, 2);

        let mut report = CleanupReport {
            dry_run,
            days_threshold,
            blobs_found: old_blobs.len(),
            total_size_bytes,
            total_size_mb,
            deleted: Vec::new(),
            errors: Vec::new(),
            blobs: Vec::new(),
            message: String::new(),
        };

        if dry_run {
            report.message = format!(
                "Would delete {} blobs ({total_size_mb} MB)",
                old_blobs.len()
            );
            report.blobs = old_blobs;
            return Ok(report);
        }

        for blob in &old_blobs {
            let path = object_store::path::Path::from(blob.name.as_str());
            match self.object_store().delete(&path).await {
                Ok(()) => {
                    info!(blob = %blob.name, "Deleted blob");
                    report.deleted.push(blob.name.clone());
                }
                Err(e) => {
                    let err = StorageError::Delete {
                        key: blob.name.clone(),
                        message: e.to_string(),
                    };
                    error!("{err}");
                    report.errors.push(err.to_string());
                }
            }
        }

        report.message = format!(
            "Deleted {} of {} blobs",
            report.deleted.len(),
            old_blobs.len()
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;
    use crate::core::storage::AudioStore;

    async fn seeded_store() -> BlobAudioStore {
        let store = BlobAudioStore::in_memory("audio-files").unwrap();
        store
            .put("a_11111111.mp3", Bytes::from(vec![0u8; 1024]))
            .await
            .unwrap();
        store
            .put("b_22222222.mp3", Bytes::from(vec![0u8; 2048]))
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn test_storage_stats() {
        let stats = seeded_store().await.storage_stats().await.unwrap();
        assert_eq!(stats.container, "audio-files");
        assert_eq!(stats.total_blobs, 2);
        assert_eq!(stats.total_size_bytes, 3072);
        assert!(stats.oldest_blob.is_some());
        assert!(stats.oldest_blob <= stats.newest_blob);
    }

    #[tokio::test]
    async fn test_empty_container_stats() {
        let store = BlobAudioStore::in_memory("audio-files").unwrap();
        let stats = store.storage_stats().await.unwrap();
        assert_eq!(stats.total_blobs, 0);
        assert_eq!(stats.oldest_blob, None);
    }

    #[tokio::test]
    async fn test_dry_run_keeps_blobs() {
        let store = seeded_store().await;
        let cutoff = Utc::now() + ChronoDuration::minutes(1);
        let report = store.cleanup_before(cutoff, 0, true).await.unwrap();

        assert!(report.dry_run);
        assert_eq!(report.blobs_found, 2);
        assert_eq!(report.blobs.len(), 2);
        assert!(report.deleted.is_empty());
        assert!(report.message.starts_with("Would delete 2 blobs"));
        assert_eq!(store.storage_stats().await.unwrap().total_blobs, 2);
    }

    #[tokio::test]
    async fn test_cleanup_deletes_only_old_blobs() {
        let store = seeded_store().await;

        let report = store.cleanup_older_than(7, false).await.unwrap();
        assert_eq!(report.blobs_found, 0);
        assert_eq!(report.message, "Deleted 0 of 0 blobs");

        let cutoff = Utc::now() + ChronoDuration::minutes(1);
        let report = store.cleanup_before(cutoff, 0, false).await.unwrap();
        assert_eq!(report.deleted.len(), 2);
        assert!(report.errors.is_empty());
        assert_eq!(store.storage_stats().await.unwrap().total_blobs, 0);
    }
}
