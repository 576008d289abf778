pub mod acl;
pub mod config;
pub mod error;
pub mod store;
pub mod types;
pub mod uploader;

pub use crate::acl::Acl;
pub use crate::config::{Config, Credentials};
pub use crate::error::{BoxError, Error, Result};
pub use crate::store::ObjectStore;
pub use crate::types::{Bucket, UploadReport, UploadedObject};
pub use crate::uploader::{resolve_bucket, run, upload_dir, upload_file};
