use std::path::PathBuf;

/// Error type returned by storage backends. Kept opaque so the service's own
/// error reaches the user unchanged.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("missing required argument `--{0}`")]
    MissingArgument(&'static str),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("bucket {bucket} doesn't exist and --create-bucket was not given")]
    BucketUnavailable { bucket: String },

    #[error("{operation} failed")]
    Storage {
        operation: &'static str,
        #[source]
        source: BoxError,
    },
}

impl Error {
    pub(crate) fn invalid_path(path: impl Into<PathBuf>, reason: &str) -> Self {
        Self::InvalidInput(format!("{}: {reason}", path.into().display()))
    }

    pub(crate) fn storage(operation: &'static str) -> impl FnOnce(BoxError) -> Self {
        move |source| Self::Storage { operation, source }
    }
}
