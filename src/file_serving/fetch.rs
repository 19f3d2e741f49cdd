use std::io::Read;
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use super::content_type::content_type;
use crate::store::{ObjectStore, StoreError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedObject {
    pub body: Vec<u8>,
    pub content_type: String,
    /// Size as reported by the backend metadata.
    pub size: u64,
}

pub type FetchResult = Result<FetchedObject, StoreError>;

/// Reads whole objects out of one bucket.
#[derive(Clone)]
pub struct Fetcher {
    store: Arc<dyn ObjectStore>,
    bucket: String,
}

impl Fetcher {
    pub fn new(store: Arc<dyn ObjectStore>, bucket: impl Into<String>) -> Self {
        Self {
            store,
            bucket: bucket.into(),
        }
    }

    pub fn fetch(&self, key: &str) -> FetchResult {
        let start_time = Instant::now();
        let (attrs, mut reader) = self.store.open_with_attrs(&self.bucket, key)?;

        let mut body = Vec::new();
        reader.read_to_end(&mut body)?;

        let content_type = content_type(key, &attrs.content_type);
        log::debug!(
            "Fetched {}/{} ({} bytes, {}) in {:?}",
            self.bucket,
            key,
            body.len(),
            content_type,
            start_time.elapsed()
        );
        Ok(FetchedObject {
            body,
            content_type,
            size: attrs.size,
        })
    }

    /// Fetches every key on its own thread and waits for all of them.
    ///
    /// Results come back in the order of `keys`, not completion order.
    pub fn fetch_many(&self, keys: &[String]) -> Vec<FetchResult> {
        if keys.len() <= 1 {
            return keys.iter().map(|key| self.fetch(key)).collect();
        }

        thread::scope(|scope| {
            let handles: Vec<_> = keys
                .iter()
                .map(|key| scope.spawn(move || self.fetch(key)))
                .collect();

            handles
                .into_iter()
                .zip(keys)
                .map(|(handle, key)| {
                    handle.join().unwrap_or_else(|_| {
                        Err(StoreError::Backend(format!("fetch of {} panicked", key)))
                    })
                })
                .collect()
        })
    }
}
