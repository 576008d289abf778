use std::fs::Metadata;
use std::io;
use std::path::{Path, PathBuf};

use bytesize::ByteSize;
use walkdir::WalkDir;

use crate::acl::Acl;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::store::ObjectStore;
use crate::types::{Bucket, UploadReport, UploadedObject};

async fn inspect(path: &Path) -> Result<Metadata> {
    match tokio::fs::metadata(path).await {
        Ok(metadata) => Ok(metadata),
        Err(error) if error.kind() == io::ErrorKind::NotFound => {
            Err(Error::invalid_path(path, "no such file or directory"))
        }
        Err(error) => Err(Error::invalid_path(path, &error.to_string())),
    }
}

fn default_key(path: &Path) -> Result<String> {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
        .ok_or_else(|| Error::invalid_path(path, "can't derive a key name from this path"))
}

/// Joins the optional prefix and the components of `relative` with `/`,
/// whatever the platform separator is.
fn object_key(prefix: Option<&str>, relative: &Path) -> Result<String> {
    let mut parts = Vec::new();
    if let Some(prefix) = prefix.map(|prefix| prefix.trim_end_matches('/')) {
        if !prefix.is_empty() {
            parts.push(prefix);
        }
    }
    for component in relative.components() {
        let part = component
            .as_os_str()
            .to_str()
            .ok_or_else(|| Error::invalid_path(relative, "path is not valid UTF-8"))?;
        parts.push(part);
    }
    Ok(parts.join("/"))
}

/// Looks `name` up among the buckets visible to `store`, creating it with
/// `acl` when it is missing and `create_if_missing` is set.
///
/// Returns `Ok(None)` when the bucket doesn't exist and wasn't created.
pub async fn resolve_bucket<S: ObjectStore + ?Sized>(
    store: &S,
    name: &str,
    create_if_missing: bool,
    acl: Acl,
) -> Result<Option<Bucket>> {
    let buckets = store
        .list_buckets()
        .await
        .map_err(Error::storage("ListBuckets"))?;

    if buckets.iter().any(|bucket| bucket == name) {
        tracing::debug!(bucket = name, "found existing bucket");
        return Ok(Some(Bucket::existing(name.to_string())));
    }

    if !create_if_missing {
        tracing::debug!(bucket = name, "bucket not found");
        return Ok(None);
    }

    if !acl.applies_to_bucket() {
        return Err(Error::InvalidInput(format!(
            "ACL `{acl}` can only be applied to objects, not buckets"
        )));
    }

    tracing::info!(bucket = name, %acl, "creating bucket");
    store
        .create_bucket(name)
        .await
        .map_err(Error::storage("CreateBucket"))?;
    store
        .put_bucket_acl(name, acl)
        .await
        .map_err(Error::storage("PutBucketAcl"))?;

    Ok(Some(Bucket::created(name.to_string())))
}

/// Uploads a single regular file under `key`, or under its base name when no
/// key is given, then applies `acl` to the new object.
///
/// Directories are rejected here; see [`upload_dir`].
#[tracing::instrument(skip_all, fields(bucket = bucket.name(), path = %path.display()))]
pub async fn upload_file<S: ObjectStore + ?Sized>(
    store: &S,
    bucket: &Bucket,
    path: &Path,
    key: Option<&str>,
    acl: Acl,
) -> Result<UploadedObject> {
    let metadata = inspect(path).await?;
    if metadata.is_dir() {
        return Err(Error::invalid_path(
            path,
            "is a directory, only files can be uploaded without --recursive",
        ));
    }
    if !metadata.is_file() {
        return Err(Error::invalid_path(path, "is not a regular file"));
    }

    let key = match key {
        Some(key) => key.to_string(),
        None => default_key(path)?,
    };
    let size = metadata.len();

    tracing::info!(%key, size = %ByteSize(size), "uploading file");
    store
        .put_object(bucket.name(), &key, path)
        .await
        .map_err(Error::storage("PutObject"))?;
    store
        .put_object_acl(bucket.name(), &key, acl)
        .await
        .map_err(Error::storage("PutObjectAcl"))?;

    Ok(UploadedObject { key, size, acl })
}

/// Collects the regular files below `dir`, following symlinks like the
/// top-level path does. A dangling link or a link loop fails the walk.
fn walk(dir: &Path, prefix: Option<&str>) -> Result<Vec<(PathBuf, String)>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).follow_links(true).sort_by_file_name() {
        let entry = entry
            .map_err(|error| Error::invalid_path(dir, &format!("failed to walk: {error}")))?;
        let file_type = entry.file_type();
        if file_type.is_dir() {
            continue;
        }
        if !file_type.is_file() {
            tracing::warn!(path = %entry.path().display(), "skipping entry that is not a regular file");
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(dir)
            .map_err(|_| Error::invalid_path(entry.path(), "outside of the uploaded directory"))?;
        files.push((entry.path().to_path_buf(), object_key(prefix, relative)?));
    }
    Ok(files)
}

async fn upload_files<S: ObjectStore + ?Sized>(
    store: &S,
    bucket: &Bucket,
    files: Vec<(PathBuf, String)>,
    acl: Acl,
) -> Result<Vec<UploadedObject>> {
    let mut uploaded = Vec::with_capacity(files.len());
    for (path, key) in files {
        uploaded.push(upload_file(store, bucket, &path, Some(key.as_str()), acl).await?);
    }
    Ok(uploaded)
}

/// Uploads every regular file below `dir`, one after another, each under its
/// path relative to `dir` (prefixed with `prefix/` when given).
///
/// Stops at the first failure.
pub async fn upload_dir<S: ObjectStore + ?Sized>(
    store: &S,
    bucket: &Bucket,
    dir: &Path,
    prefix: Option<&str>,
    acl: Acl,
) -> Result<Vec<UploadedObject>> {
    if !inspect(dir).await?.is_dir() {
        return Err(Error::invalid_path(dir, "is not a directory"));
    }

    let files = walk(dir, prefix)?;
    tracing::info!(dir = %dir.display(), count = files.len(), "uploading directory");
    upload_files(store, bucket, files, acl).await
}

/// Runs one whole invocation: checks the local target, resolves the bucket,
/// then uploads.
///
/// The local path (and for a directory, its file list) is checked before any
/// request is made so that a typo in the path never leaves a freshly
/// created, empty bucket behind.
pub async fn run<S: ObjectStore + ?Sized>(store: &S, config: &Config) -> Result<UploadReport> {
    let key_name = config.key_name.as_deref();

    let tree = if inspect(&config.file).await?.is_dir() {
        if !config.recursive {
            return Err(Error::invalid_path(
                &config.file,
                "is a directory, only files can be uploaded without --recursive",
            ));
        }
        let files = walk(&config.file, key_name)?;
        if files.is_empty() {
            return Err(Error::invalid_path(
                &config.file,
                "directory contains no files to upload",
            ));
        }
        Some(files)
    } else {
        None
    };

    let bucket = resolve_bucket(
        store,
        &config.bucket,
        config.create_bucket,
        config.bucket_acl,
    )
    .await?
    .ok_or_else(|| Error::BucketUnavailable {
        bucket: config.bucket.clone(),
    })?;

    let objects = match tree {
        Some(files) => {
            tracing::info!(dir = %config.file.display(), count = files.len(), "uploading directory");
            upload_files(store, &bucket, files, config.key_acl).await?
        }
        None => vec![upload_file(store, &bucket, &config.file, key_name, config.key_acl).await?],
    };

    Ok(UploadReport {
        bucket: bucket.name().to_string(),
        bucket_created: bucket.was_created(),
        objects,
    })
}
