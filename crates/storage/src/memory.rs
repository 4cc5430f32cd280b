//! In-memory [`ObjectStore`] test double.
//!
//! Records every upload and delete so tests can assert the asset lifecycle
//! ordering rules (new reference committed before old object deleted, delete
//! issued exactly once, and so on). Failure injection covers the
//! provider-down paths.

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use crate::{probe_image, ObjectStore, StorageError, StoredObject, UploadOptions};

/// In-memory object store for tests.
#[derive(Default)]
pub struct MemoryStore {
    objects: Mutex<HashMap<String, Vec<u8>>>,
    uploads: Mutex<Vec<String>>,
    deletes: Mutex<Vec<String>>,
    fail_uploads: AtomicBool,
    fail_deletes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent uploads fail with [`StorageError::Unavailable`].
    pub fn fail_uploads(&self, fail: bool) {
        self.fail_uploads.store(fail, Ordering::SeqCst);
    }

    /// Make subsequent deletes fail with [`StorageError::Unavailable`].
    pub fn fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    /// Public ids of every successful upload, in order.
    pub fn uploaded_ids(&self) -> Vec<String> {
        self.uploads.lock().unwrap().clone()
    }

    /// Public ids of every delete call (including idempotent misses), in order.
    pub fn deleted_ids(&self) -> Vec<String> {
        self.deletes.lock().unwrap().clone()
    }

    /// Whether an object is currently live in the store.
    pub fn contains(&self, public_id: &str) -> bool {
        self.objects.lock().unwrap().contains_key(public_id)
    }

    /// Number of live objects.
    pub fn object_count(&self) -> usize {
        self.objects.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl ObjectStore for MemoryStore {
    async fn upload(
        &self,
        local_path: &Path,
        options: &UploadOptions,
    ) -> Result<StoredObject, StorageError> {
        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("injected upload failure".into()));
        }

        let (format, width, height) = probe_image(local_path)?;
        let bytes = tokio::fs::read(local_path).await?;

        let public_id = options.resolve_public_id();

        {
            let mut objects = self.objects.lock().unwrap();
            if !options.overwrite && objects.contains_key(&public_id) {
                return Err(StorageError::Unavailable(format!(
                    "Object '{public_id}' already exists and overwrite is disabled"
                )));
            }
            objects.insert(public_id.clone(), bytes);
        }
        self.uploads.lock().unwrap().push(public_id.clone());

        Ok(StoredObject {
            url: format!("memory://{public_id}"),
            public_id,
            format,
            width,
            height,
        })
    }

    async fn delete(&self, public_id: &str) -> Result<(), StorageError> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("injected delete failure".into()));
        }

        // Idempotent: removing a missing key is still a recorded, successful call.
        self.objects.lock().unwrap().remove(public_id);
        self.deletes.lock().unwrap().push(public_id.to_string());
        Ok(())
    }
}
