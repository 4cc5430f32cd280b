//! Object Storage Gateway: a thin client over an external binary-object
//! store.
//!
//! The gateway is a trait object injected into the asset lifecycle service
//! (never a global singleton), so production code talks to S3 while tests
//! use [`MemoryStore`].

use std::path::Path;
use std::time::Duration;

use serde::Serialize;

pub mod memory;
pub mod s3;
pub mod staged;

pub use memory::MemoryStore;
pub use s3::S3Store;
pub use staged::StagedFile;

/// Bound on a single object upload. A slow provider surfaces as
/// [`StorageError::Timeout`]; retry is left to the caller.
pub const UPLOAD_TIMEOUT: Duration = Duration::from_secs(60);

/// Errors from the object store boundary.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Provider rejected the call or is unreachable.
    #[error("Object storage unavailable: {0}")]
    Unavailable(String),

    /// The upload exceeded [`UPLOAD_TIMEOUT`].
    #[error("Upload timed out after {0:?}")]
    Timeout(Duration),

    /// The staged input is not a supported image.
    #[error("Unsupported or corrupt image: {0}")]
    InvalidImage(String),

    /// Local filesystem error while staging or reading the input.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// What kind of binary the object holds. Only images today; the enum keeps
/// the wire shape explicit rather than stringly-typed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    Image,
}

/// Options for a single upload.
#[derive(Debug, Clone)]
pub struct UploadOptions {
    /// Logical folder prefix for the stored object (e.g. `"portfolios/42"`).
    pub folder: String,
    /// Desired public id. `None` generates `{folder}/{uuid}`.
    pub public_id: Option<String>,
    /// Whether an existing object under the same public id may be replaced.
    pub overwrite: bool,
    pub resource_type: ResourceType,
}

impl UploadOptions {
    /// Image upload into `folder` with a generated public id.
    pub fn image(folder: impl Into<String>) -> Self {
        Self {
            folder: folder.into(),
            public_id: None,
            overwrite: false,
            resource_type: ResourceType::Image,
        }
    }

    /// Resolve the public id for this upload, generating one when absent.
    pub fn resolve_public_id(&self) -> String {
        self.public_id
            .clone()
            .unwrap_or_else(|| format!("{}/{}", self.folder, uuid::Uuid::new_v4()))
    }
}

/// A successfully stored object, as referenced from database records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredObject {
    /// Publicly reachable URL.
    pub url: String,
    /// Content-addressed id used for later deletion.
    pub public_id: String,
    /// Image format (e.g. `"png"`, `"jpeg"`).
    pub format: String,
    pub width: u32,
    pub height: u32,
}

/// The external binary-object store.
///
/// `delete` is idempotent: deleting a public id that no longer exists is not
/// an error, so cascade deletion and replace-cleanup can retry blindly.
#[async_trait::async_trait]
pub trait ObjectStore: Send + Sync {
    /// Upload a staged local file. Bounded by [`UPLOAD_TIMEOUT`].
    async fn upload(
        &self,
        local_path: &Path,
        options: &UploadOptions,
    ) -> Result<StoredObject, StorageError>;

    /// Delete a stored object by public id.
    async fn delete(&self, public_id: &str) -> Result<(), StorageError>;
}

/// Probe an image file's format and pixel dimensions without decoding it.
///
/// Reads only the header, so this is cheap even for large files.
pub(crate) fn probe_image(path: &Path) -> Result<(String, u32, u32), StorageError> {
    let reader = image::ImageReader::open(path)?
        .with_guessed_format()
        .map_err(StorageError::Io)?;

    let format = reader
        .format()
        .ok_or_else(|| StorageError::InvalidImage("unrecognized image format".into()))?;

    let (width, height) = reader
        .into_dimensions()
        .map_err(|e| StorageError::InvalidImage(e.to_string()))?;

    Ok((
        format.extensions_str().first().unwrap_or(&"bin").to_string(),
        width,
        height,
    ))
}
