use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Canned access-control policy for a bucket or an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Acl {
    Private,
    PublicRead,
    PublicReadWrite,
    AuthenticatedRead,
    AwsExecRead,
    BucketOwnerRead,
    BucketOwnerFullControl,
}

impl Acl {
    pub const ALL: [Acl; 7] = [
        Acl::Private,
        Acl::PublicRead,
        Acl::PublicReadWrite,
        Acl::AuthenticatedRead,
        Acl::AwsExecRead,
        Acl::BucketOwnerRead,
        Acl::BucketOwnerFullControl,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Acl::Private => "private",
            Acl::PublicRead => "public-read",
            Acl::PublicReadWrite => "public-read-write",
            Acl::AuthenticatedRead => "authenticated-read",
            Acl::AwsExecRead => "aws-exec-read",
            Acl::BucketOwnerRead => "bucket-owner-read",
            Acl::BucketOwnerFullControl => "bucket-owner-full-control",
        }
    }

    /// Whether the policy can be applied to a bucket. The `aws-exec-read` and
    /// `bucket-owner-*` policies only exist for objects.
    pub fn applies_to_bucket(self) -> bool {
        matches!(
            self,
            Acl::Private | Acl::PublicRead | Acl::PublicReadWrite | Acl::AuthenticatedRead
        )
    }
}

impl fmt::Display for Acl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Acl {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Acl::ALL
            .into_iter()
            .find(|acl| acl.as_str() == s)
            .ok_or_else(|| {
                let expected = Acl::ALL.map(Acl::as_str).join(", ");
                Error::InvalidInput(format!("unknown ACL `{s}`, expected one of: {expected}"))
            })
    }
}
