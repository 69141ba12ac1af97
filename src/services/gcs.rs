// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Durable object sink for the serialized extraction batch.
//!
//! The pipeline only ever performs a full-object overwrite of a single
//! configured object name, so the seam is one `upload` call. Production
//! writes to Google Cloud Storage; tests use the in-memory sink.

use crate::error::AppError;
use async_trait::async_trait;
use google_cloud_storage::client::{Client, ClientConfig};
use google_cloud_storage::http::objects::upload::{Media, UploadObjectRequest, UploadType};
use std::sync::RwLock;

/// Capability interface for durable blob storage.
///
/// `upload` overwrites any existing object under `object`; there is no
/// partial-write or append mode.
#[async_trait]
pub trait ObjectSink: Send + Sync {
    async fn upload(
        &self,
        bucket: &str,
        object: &str,
        content_type: &str,
        payload: Vec<u8>,
    ) -> Result<(), AppError>;
}

/// Google Cloud Storage sink.
pub struct GcsSink {
    client: Client,
}

impl GcsSink {
    /// Create a GCS sink using application-default credentials.
    pub async fn new() -> Result<Self, AppError> {
        let config = ClientConfig::default().with_auth().await.map_err(|e| {
            AppError::Sink(format!("Failed to create GCS auth config: {}", e))
        })?;

        Ok(Self {
            client: Client::new(config),
        })
    }
}

#[async_trait]
impl ObjectSink for GcsSink {
    async fn upload(
        &self,
        bucket: &str,
        object: &str,
        content_type: &str,
        payload: Vec<u8>,
    ) -> Result<(), AppError> {
        let size = payload.len();

        let mut media = Media::new(object.to_string());
        media.content_type = content_type.to_string().into();

        self.client
            .upload_object(
                &UploadObjectRequest {
                    bucket: bucket.to_string(),
                    ..Default::default()
                },
                payload,
                &UploadType::Simple(media),
            )
            .await
            .map_err(|e| AppError::Sink(format!("GCS upload failed: {}", e)))?;

        tracing::info!(bucket, object, size, "Uploaded object to GCS");
        Ok(())
    }
}

/// One object captured by [`MemorySink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub bucket: String,
    pub object: String,
    pub content_type: String,
    pub payload: Vec<u8>,
}

/// In-memory sink for tests.
///
/// Records every upload in order; not persistent.
#[derive(Debug, Default)]
pub struct MemorySink {
    uploads: RwLock<Vec<StoredObject>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All uploads recorded so far, oldest first.
    pub fn uploads(&self) -> Vec<StoredObject> {
        self.uploads.read().expect("sink lock poisoned").clone()
    }

    /// The most recent upload, if any.
    pub fn last_upload(&self) -> Option<StoredObject> {
        self.uploads().into_iter().next_back()
    }
}

#[async_trait]
impl ObjectSink for MemorySink {
    async fn upload(
        &self,
        bucket: &str,
        object: &str,
        content_type: &str,
        payload: Vec<u8>,
    ) -> Result<(), AppError> {
        self.uploads
            .write()
            .expect("sink lock poisoned")
            .push(StoredObject {
                bucket: bucket.to_string(),
                object: object.to_string(),
                content_type: content_type.to_string(),
                payload,
            });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_sink_overwrites_are_recorded_in_order() {
        let sink = MemorySink::new();

        sink.upload("b", "activities.json", "application/json", b"one".to_vec())
            .await
            .unwrap();
        sink.upload("b", "activities.json", "application/json", b"two".to_vec())
            .await
            .unwrap();

        let uploads = sink.uploads();
        assert_eq!(uploads.len(), 2);
        assert_eq!(uploads[0].payload, b"one");
        assert_eq!(sink.last_upload().unwrap().payload, b"two");
    }
}
