use s3backup_core::Error;

/// Process exit status, one per failure class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Success = 0,
    Internal = 1,
    Usage = 2,
    InvalidInput = 3,
    BucketUnavailable = 4,
    Storage = 5,
}

impl ExitCode {
    pub fn for_error(error: &anyhow::Error) -> Self {
        match error.downcast_ref::<Error>() {
            Some(Error::MissingArgument(_)) => ExitCode::Usage,
            Some(Error::InvalidInput(_)) => ExitCode::InvalidInput,
            Some(Error::BucketUnavailable { .. }) => ExitCode::BucketUnavailable,
            Some(Error::Storage { .. }) => ExitCode::Storage,
            None => ExitCode::Internal,
        }
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        Self::from(code as u8)
    }
}
