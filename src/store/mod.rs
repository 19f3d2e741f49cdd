//! Object storage backends.
//!
//! The delivery pipeline only talks to [`ObjectStore`]. A bucket is a flat
//! namespace of keys; how keys map to bytes is up to the backend.

mod directory;
mod memory;

pub use directory::DirectoryStore;
pub use memory::MemoryStore;

use std::io::{self, Read};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("object not found: {bucket}/{key}")]
    NotFound { bucket: String, key: String },

    #[error("access denied: {bucket}/{key}")]
    PermissionDenied { bucket: String, key: String },

    #[error("invalid object key: {key:?}")]
    InvalidKey { key: String },

    #[error("storage I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("backend error: {0}")]
    Backend(String),
}

impl StoreError {
    pub(crate) fn from_io(err: io::Error, bucket: &str, key: &str) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => StoreError::NotFound {
                bucket: bucket.to_string(),
                key: key.to_string(),
            },
            io::ErrorKind::PermissionDenied => StoreError::PermissionDenied {
                bucket: bucket.to_string(),
                key: key.to_string(),
            },
            _ => StoreError::Io(err),
        }
    }
}

/// Metadata reported by the backend for a single object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectAttrs {
    pub size: u64,
    /// Content type recorded by the backend, empty when it has none.
    pub content_type: String,
}

pub type ObjectReader = Box<dyn Read + Send>;

pub trait ObjectStore: Send + Sync {
    fn attrs(&self, bucket: &str, key: &str) -> Result<ObjectAttrs, StoreError>;

    fn open(&self, bucket: &str, key: &str) -> Result<ObjectReader, StoreError>;

    /// Metadata and a reader in one call. Backends that can look the object
    /// up once for both should override this.
    fn open_with_attrs(
        &self,
        bucket: &str,
        key: &str,
    ) -> Result<(ObjectAttrs, ObjectReader), StoreError> {
        let attrs = self.attrs(bucket, key)?;
        let reader = self.open(bucket, key)?;
        Ok((attrs, reader))
    }
}
