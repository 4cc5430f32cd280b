//! S3-compatible implementation of [`ObjectStore`].
//!
//! Works against AWS S3 or any S3-compatible endpoint (MinIO, R2) via the
//! optional `endpoint_url`. Object keys are the public ids, so deletion
//! needs no extra lookup.

use std::path::Path;

use aws_sdk_s3::primitives::ByteStream;

use crate::{probe_image, ObjectStore, StorageError, StoredObject, UploadOptions, UPLOAD_TIMEOUT};

/// Configuration for the S3 gateway, loaded from the environment by the API
/// crate and passed in explicitly.
#[derive(Debug, Clone)]
pub struct S3Config {
    pub bucket: String,
    pub region: String,
    /// Custom endpoint for S3-compatible providers. `None` means AWS.
    pub endpoint_url: Option<String>,
    /// Base URL under which stored objects are publicly served
    /// (e.g. a CDN distribution in front of the bucket).
    pub public_base_url: String,
}

/// S3-backed object store.
pub struct S3Store {
    client: aws_sdk_s3::Client,
    bucket: String,
    public_base_url: String,
}

impl S3Store {
    /// Build a store from config, resolving AWS credentials from the
    /// default provider chain.
    pub async fn connect(config: S3Config) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_sdk_s3::config::Region::new(config.region.clone()));
        if let Some(ref endpoint) = config.endpoint_url {
            loader = loader.endpoint_url(endpoint);
        }
        let sdk_config = loader.load().await;

        Self {
            client: aws_sdk_s3::Client::new(&sdk_config),
            bucket: config.bucket,
            public_base_url: config.public_base_url.trim_end_matches('/').to_string(),
        }
    }

    fn public_url(&self, public_id: &str) -> String {
        format!("{}/{}", self.public_base_url, public_id)
    }
}

#[async_trait::async_trait]
impl ObjectStore for S3Store {
    async fn upload(
        &self,
        local_path: &Path,
        options: &UploadOptions,
    ) -> Result<StoredObject, StorageError> {
        let (format, width, height) = probe_image(local_path)?;

        let public_id = options.resolve_public_id();

        // Refuse to clobber an existing object unless the caller asked for
        // an in-place overwrite.
        if !options.overwrite {
            let head = self
                .client
                .head_object()
                .bucket(&self.bucket)
                .key(&public_id)
                .send()
                .await;
            if head.is_ok() {
                return Err(StorageError::Unavailable(format!(
                    "Object '{public_id}' already exists and overwrite is disabled"
                )));
            }
        }

        let body = ByteStream::from_path(local_path)
            .await
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;

        let put = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(&public_id)
            .content_type(format!("image/{format}"))
            .body(body)
            .send();

        match tokio::time::timeout(UPLOAD_TIMEOUT, put).await {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => return Err(StorageError::Unavailable(e.to_string())),
            Err(_) => return Err(StorageError::Timeout(UPLOAD_TIMEOUT)),
        }

        Ok(StoredObject {
            url: self.public_url(&public_id),
            public_id,
            format,
            width,
            height,
        })
    }

    async fn delete(&self, public_id: &str) -> Result<(), StorageError> {
        // S3 DeleteObject succeeds for missing keys, which gives us the
        // idempotency the cascade-deletion path relies on.
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(public_id)
            .send()
            .await
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        Ok(())
    }
}
