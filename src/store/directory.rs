use std::fs::{self, File};
use std::io;
use std::path::{Component, Path, PathBuf};
use std::time::Instant;

use super::{ObjectAttrs, ObjectReader, ObjectStore, StoreError};
use crate::log_error;

/// Serves buckets out of a local directory tree.
///
/// Each bucket is a subdirectory of `root` and each object key is a relative
/// file path inside it. Keys that would leave the bucket directory, either
/// through `..` or through a symlink, are rejected.
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn object_path(&self, bucket: &str, key: &str) -> Result<PathBuf, StoreError> {
        let start_time = Instant::now();
        log::trace!("Resolving object path - bucket: {}, key: {}", bucket, key);

        let bucket_dir = clean_relative(bucket)
            .filter(|p| p.components().count() == 1)
            .ok_or_else(|| StoreError::InvalidKey {
                key: bucket.to_string(),
            })?;
        let rel = clean_relative(key).ok_or_else(|| StoreError::InvalidKey {
            key: key.to_string(),
        })?;

        let base = self.root.join(bucket_dir);
        let canonical_base = fs::canonicalize(&base).map_err(|e| {
            log::debug!("Bucket directory unavailable {}: {}", base.display(), e);
            StoreError::from_io(e, bucket, key)
        })?;
        let requested = canonical_base.join(&rel);

        match fs::canonicalize(&requested) {
            Ok(path) if path.starts_with(&canonical_base) => {
                log::trace!(
                    "Object path resolved in {:?}: {}",
                    start_time.elapsed(),
                    path.display()
                );
                Ok(path)
            }
            Ok(path) => {
                log::warn!("Object path escapes bucket directory: {}", path.display());
                Err(StoreError::InvalidKey {
                    key: key.to_string(),
                })
            }
            Err(e) => {
                if e.kind() != io::ErrorKind::NotFound {
                    log_error!(
                        e,
                        format!("Failed to canonicalize {}", requested.display())
                    );
                }
                Err(StoreError::from_io(e, bucket, key))
            }
        }
    }
}

/// Keeps only normal path components. Returns `None` for keys that try to
/// climb out with `..` or that are empty once cleaned.
fn clean_relative(key: &str) -> Option<PathBuf> {
    let mut cleaned = PathBuf::new();
    for component in Path::new(key).components() {
        match component {
            Component::Normal(part) => cleaned.push(part),
            Component::CurDir | Component::RootDir => {}
            Component::ParentDir | Component::Prefix(_) => return None,
        }
    }
    if cleaned.as_os_str().is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

fn file_attrs(
    path: &Path,
    metadata: &fs::Metadata,
    bucket: &str,
    key: &str,
) -> Result<ObjectAttrs, StoreError> {
    if !metadata.is_file() {
        log::debug!("Not a regular file: {}", path.display());
        return Err(StoreError::NotFound {
            bucket: bucket.to_string(),
            key: key.to_string(),
        });
    }
    Ok(ObjectAttrs {
        size: metadata.len(),
        content_type: String::new(),
    })
}

impl ObjectStore for DirectoryStore {
    fn attrs(&self, bucket: &str, key: &str) -> Result<ObjectAttrs, StoreError> {
        let path = self.object_path(bucket, key)?;
        let metadata = fs::metadata(&path).map_err(|e| StoreError::from_io(e, bucket, key))?;
        file_attrs(&path, &metadata, bucket, key)
    }

    fn open(&self, bucket: &str, key: &str) -> Result<ObjectReader, StoreError> {
        self.open_with_attrs(bucket, key).map(|(_, reader)| reader)
    }

    fn open_with_attrs(
        &self,
        bucket: &str,
        key: &str,
    ) -> Result<(ObjectAttrs, ObjectReader), StoreError> {
        let path = self.object_path(bucket, key)?;
        let file = File::open(&path).map_err(|e| StoreError::from_io(e, bucket, key))?;
        let metadata = file
            .metadata()
            .map_err(|e| StoreError::from_io(e, bucket, key))?;
        let attrs = file_attrs(&path, &metadata, bucket, key)?;
        let reader: ObjectReader = Box::new(file);
        Ok((attrs, reader))
    }
}
