use serde::Serialize;

use crate::acl::Acl;

/// A bucket known to exist. Only [`crate::resolve_bucket`] hands these out,
/// so an upload can't start against a bucket that was never looked up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bucket {
    name: String,
    created: bool,
}

impl Bucket {
    pub(crate) fn existing(name: String) -> Self {
        Self {
            name,
            created: false,
        }
    }

    pub(crate) fn created(name: String) -> Self {
        Self {
            name,
            created: true,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// True when this invocation created the bucket.
    pub fn was_created(&self) -> bool {
        self.created
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadedObject {
    pub key: String,
    pub size: u64,
    pub acl: Acl,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadReport {
    pub bucket: String,
    pub bucket_created: bool,
    pub objects: Vec<UploadedObject>,
}

impl UploadReport {
    pub fn total_size(&self) -> u64 {
        self.objects.iter().map(|object| object.size).sum()
    }
}
