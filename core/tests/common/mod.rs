#![allow(dead_code)]

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use s3backup_core::{Acl, BoxError, ObjectStore};

#[derive(Default)]
struct StoredBucket {
    acl: Option<Acl>,
    objects: BTreeMap<String, StoredObject>,
}

#[derive(Clone, Debug)]
pub struct StoredObject {
    pub body: Vec<u8>,
    pub acl: Option<Acl>,
}

/// Object store kept in memory, with lookups the real service would need
/// extra requests for.
#[derive(Default)]
pub struct MemoryStore {
    buckets: Mutex<BTreeMap<String, StoredBucket>>,
    puts: Mutex<usize>,
    failing_key: Option<String>,
}

impl MemoryStore {
    pub fn with_bucket(name: &str) -> Self {
        let store = Self::default();
        store
            .buckets
            .lock()
            .unwrap()
            .insert(name.to_string(), StoredBucket::default());
        store
    }

    /// Makes every upload of `key` fail like a dropped connection.
    pub fn failing_on(mut self, key: &str) -> Self {
        self.failing_key = Some(key.to_string());
        self
    }

    pub fn bucket_names(&self) -> Vec<String> {
        self.buckets.lock().unwrap().keys().cloned().collect()
    }

    pub fn bucket_acl(&self, bucket: &str) -> Option<Acl> {
        self.buckets.lock().unwrap().get(bucket)?.acl
    }

    pub fn keys(&self, bucket: &str) -> Vec<String> {
        self.buckets
            .lock()
            .unwrap()
            .get(bucket)
            .map(|bucket| bucket.objects.keys().cloned().collect())
            .unwrap_or_default()
    }

    pub fn object(&self, bucket: &str, key: &str) -> Option<StoredObject> {
        self.buckets
            .lock()
            .unwrap()
            .get(bucket)?
            .objects
            .get(key)
            .cloned()
    }

    pub fn put_count(&self) -> usize {
        *self.puts.lock().unwrap()
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn list_buckets(&self) -> Result<Vec<String>, BoxError> {
        Ok(self.bucket_names())
    }

    async fn create_bucket(&self, bucket: &str) -> Result<(), BoxError> {
        let mut buckets = self.buckets.lock().unwrap();
        if buckets.contains_key(bucket) {
            return Err("BucketAlreadyOwnedByYou".into());
        }
        buckets.insert(bucket.to_string(), StoredBucket::default());
        Ok(())
    }

    async fn put_bucket_acl(&self, bucket: &str, acl: Acl) -> Result<(), BoxError> {
        let mut buckets = self.buckets.lock().unwrap();
        let bucket = buckets.get_mut(bucket).ok_or("NoSuchBucket")?;
        bucket.acl = Some(acl);
        Ok(())
    }

    async fn put_object(&self, bucket: &str, key: &str, path: &Path) -> Result<(), BoxError> {
        if self.failing_key.as_deref() == Some(key) {
            return Err("connection reset by peer".into());
        }
        let body = tokio::fs::read(path).await?;
        *self.puts.lock().unwrap() += 1;
        let mut buckets = self.buckets.lock().unwrap();
        let bucket = buckets.get_mut(bucket).ok_or("NoSuchBucket")?;
        bucket
            .objects
            .insert(key.to_string(), StoredObject { body, acl: None });
        Ok(())
    }

    async fn put_object_acl(&self, bucket: &str, key: &str, acl: Acl) -> Result<(), BoxError> {
        let mut buckets = self.buckets.lock().unwrap();
        let object = buckets
            .get_mut(bucket)
            .ok_or("NoSuchBucket")?
            .objects
            .get_mut(key)
            .ok_or("NoSuchKey")?;
        object.acl = Some(acl);
        Ok(())
    }
}
