use std::fmt;
use std::path::PathBuf;

use crate::acl::Acl;
use crate::error::{Error, Result};

pub const DEFAULT_REGION: &str = "us-east-1";

/// Access key pair handed to the storage client as-is.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"** redacted **")
            .finish()
    }
}

/// Everything one invocation needs, fixed once the arguments are parsed.
#[derive(Debug, Clone)]
pub struct Config {
    pub credentials: Credentials,
    pub region: String,
    pub endpoint_url: Option<String>,
    pub path_style: bool,

    pub bucket: String,
    pub create_bucket: bool,
    pub bucket_acl: Acl,

    pub file: PathBuf,
    pub key_name: Option<String>,
    pub key_acl: Acl,
    pub recursive: bool,
}

impl Config {
    /// Rejects settings the storage service would refuse later, after a
    /// bucket may already have been created.
    pub fn validate(self) -> Result<Self> {
        if self.bucket.is_empty() {
            return Err(Error::InvalidInput("bucket name is empty".to_string()));
        }
        if !self.bucket_acl.applies_to_bucket() {
            return Err(Error::InvalidInput(format!(
                "ACL `{}` can only be applied to objects, not buckets",
                self.bucket_acl
            )));
        }
        if let Some(key) = &self.key_name {
            if key.is_empty() {
                return Err(Error::InvalidInput("key name is empty".to_string()));
            }
        }
        Ok(self)
    }
}
