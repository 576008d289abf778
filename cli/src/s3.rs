use std::path::Path;

use async_trait::async_trait;
use aws_config::retry::RetryConfig;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::{
    config::Credentials,
    primitives::ByteStream,
    types::{BucketCannedAcl, BucketLocationConstraint, CreateBucketConfiguration, ObjectCannedAcl},
    Client,
};
use s3backup_core::config::DEFAULT_REGION;
use s3backup_core::{Acl, BoxError, Config, ObjectStore};

/// [`ObjectStore`] backed by Amazon S3 or any S3-compatible service.
pub struct S3Store {
    client: Client,
    region: String,
}

impl S3Store {
    /// Builds a client from the configured key pair. Nothing is sent yet, so
    /// bad credentials only show up on the first request.
    pub async fn connect(config: &Config) -> Self {
        let credentials = Credentials::new(
            &config.credentials.access_key_id,
            &config.credentials.secret_access_key,
            None,
            None,
            "s3backup",
        );

        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .credentials_provider(credentials)
            .retry_config(RetryConfig::disabled());
        if let Some(endpoint_url) = &config.endpoint_url {
            loader = loader.endpoint_url(endpoint_url);
        }
        let sdk_config = loader.load().await;

        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(config.path_style)
            .build();

        tracing::debug!(
            region = %config.region,
            endpoint_url = ?config.endpoint_url,
            access_key_id = %config.credentials.access_key_id,
            "created s3 client"
        );

        Self {
            client: Client::from_conf(s3_config),
            region: config.region.clone(),
        }
    }
}

fn bucket_canned_acl(acl: Acl) -> Result<BucketCannedAcl, BoxError> {
    Ok(match acl {
        Acl::Private => BucketCannedAcl::Private,
        Acl::PublicRead => BucketCannedAcl::PublicRead,
        Acl::PublicReadWrite => BucketCannedAcl::PublicReadWrite,
        Acl::AuthenticatedRead => BucketCannedAcl::AuthenticatedRead,
        other => return Err(format!("ACL `{other}` can't be applied to a bucket").into()),
    })
}

fn object_canned_acl(acl: Acl) -> ObjectCannedAcl {
    match acl {
        Acl::Private => ObjectCannedAcl::Private,
        Acl::PublicRead => ObjectCannedAcl::PublicRead,
        Acl::PublicReadWrite => ObjectCannedAcl::PublicReadWrite,
        Acl::AuthenticatedRead => ObjectCannedAcl::AuthenticatedRead,
        Acl::AwsExecRead => ObjectCannedAcl::AwsExecRead,
        Acl::BucketOwnerRead => ObjectCannedAcl::BucketOwnerRead,
        Acl::BucketOwnerFullControl => ObjectCannedAcl::BucketOwnerFullControl,
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn list_buckets(&self) -> Result<Vec<String>, BoxError> {
        let output = self.client.list_buckets().send().await?;
        Ok(output
            .buckets()
            .iter()
            .filter_map(|bucket| bucket.name().map(str::to_string))
            .collect())
    }

    async fn create_bucket(&self, bucket: &str) -> Result<(), BoxError> {
        let mut request = self.client.create_bucket().bucket(bucket);
        // us-east-1 is the implicit location and is refused as an explicit constraint
        if self.region != DEFAULT_REGION {
            request = request.create_bucket_configuration(
                CreateBucketConfiguration::builder()
                    .location_constraint(BucketLocationConstraint::from(self.region.as_str()))
                    .build(),
            );
        }
        request.send().await?;
        Ok(())
    }

    async fn put_bucket_acl(&self, bucket: &str, acl: Acl) -> Result<(), BoxError> {
        self.client
            .put_bucket_acl()
            .bucket(bucket)
            .acl(bucket_canned_acl(acl)?)
            .send()
            .await?;
        Ok(())
    }

    async fn put_object(&self, bucket: &str, key: &str, path: &Path) -> Result<(), BoxError> {
        let body = ByteStream::from_path(path).await?;
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(body)
            .send()
            .await?;
        Ok(())
    }

    async fn put_object_acl(&self, bucket: &str, key: &str, acl: Acl) -> Result<(), BoxError> {
        self.client
            .put_object_acl()
            .bucket(bucket)
            .key(key)
            .acl(object_canned_acl(acl))
            .send()
            .await?;
        Ok(())
    }
}
