use std::collections::HashMap;
use std::io::Cursor;

use super::{ObjectAttrs, ObjectReader, ObjectStore, StoreError};

#[derive(Debug, Clone)]
struct StoredObject {
    data: Vec<u8>,
    content_type: String,
}

/// In-memory backend, populated up front and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    objects: HashMap<(String, String), StoredObject>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        bucket: impl Into<String>,
        key: impl Into<String>,
        data: impl Into<Vec<u8>>,
        content_type: impl Into<String>,
    ) {
        self.objects.insert(
            (bucket.into(), key.into()),
            StoredObject {
                data: data.into(),
                content_type: content_type.into(),
            },
        );
    }

    pub fn with_object(
        mut self,
        bucket: impl Into<String>,
        key: impl Into<String>,
        data: impl Into<Vec<u8>>,
    ) -> Self {
        self.insert(bucket, key, data, "");
        self
    }

    fn get(&self, bucket: &str, key: &str) -> Result<&StoredObject, StoreError> {
        self.objects
            .get(&(bucket.to_string(), key.to_string()))
            .ok_or_else(|| StoreError::NotFound {
                bucket: bucket.to_string(),
                key: key.to_string(),
            })
    }
}

impl ObjectStore for MemoryStore {
    fn attrs(&self, bucket: &str, key: &str) -> Result<ObjectAttrs, StoreError> {
        let object = self.get(bucket, key)?;
        Ok(ObjectAttrs {
            size: object.data.len() as u64,
            content_type: object.content_type.clone(),
        })
    }

    fn open(&self, bucket: &str, key: &str) -> Result<ObjectReader, StoreError> {
        let object = self.get(bucket, key)?;
        Ok(Box::new(Cursor::new(object.data.clone())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn reports_stored_content_type() {
        let mut store = MemoryStore::new();
        store.insert("b", "data.bin", vec![1, 2, 3], "application/custom");

        let attrs = store.attrs("b", "data.bin").unwrap();
        assert_eq!(attrs.size, 3);
        assert_eq!(attrs.content_type, "application/custom");

        let mut body = Vec::new();
        store.open("b", "data.bin").unwrap().read_to_end(&mut body).unwrap();
        assert_eq!(body, vec![1, 2, 3]);
    }

    #[test]
    fn buckets_are_separate() {
        let store = MemoryStore::new().with_object("a", "index.html", "x");
        assert!(store.attrs("a", "index.html").is_ok());
        assert!(matches!(
            store.open("b", "index.html"),
            Err(StoreError::NotFound { .. })
        ));
    }
}
