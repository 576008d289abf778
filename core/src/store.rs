use std::path::Path;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::acl::Acl;
use crate::error::BoxError;

/// The storage-service calls the upload workflow is made of.
///
/// Implementations return the service's errors untouched; the workflow wraps
/// them into [`crate::Error::Storage`] without retrying.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Names of every bucket the credentials can see.
    async fn list_buckets(&self) -> Result<Vec<String>, BoxError>;

    async fn create_bucket(&self, bucket: &str) -> Result<(), BoxError>;

    async fn put_bucket_acl(&self, bucket: &str, acl: Acl) -> Result<(), BoxError>;

    /// Uploads the whole content of `path` as the body of `key`.
    async fn put_object(&self, bucket: &str, key: &str, path: &Path) -> Result<(), BoxError>;

    async fn put_object_acl(&self, bucket: &str, key: &str, acl: Acl) -> Result<(), BoxError>;
}
