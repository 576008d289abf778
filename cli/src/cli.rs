use std::io;
use std::path::PathBuf;

use clap::{CommandFactory, Parser, ValueEnum};
use s3backup_core::config::DEFAULT_REGION;
use s3backup_core::{Acl, Config, Credentials, Error};
use url::Url;

const EXIT_CODES: &str = "\
Exit codes:
  0  upload finished
  1  unexpected internal failure
  2  usage error (a required argument is missing or a flag is unknown)
  3  invalid input (missing path, directory without --recursive or without
     files, unknown ACL, malformed endpoint URL)
  4  bucket doesn't exist and --create-bucket was not given
  5  the storage service returned an error";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Output {
    Table,
    Json,
}

/// Upload a file to an S3 bucket
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None, after_help = EXIT_CODES)]
pub struct Args {
    /// Your AWS access key
    #[arg(env = "AWS_ACCESS_KEY_ID", hide_env_values = true, long, short, value_name = "AWS-ACCESS-KEY")]
    pub access_key: Option<String>,
    /// Your AWS secret key
    #[arg(env = "AWS_SECRET_ACCESS_KEY", hide_env_values = true, long, short, value_name = "AWS-SECRET-KEY")]
    pub secret_key: Option<String>,
    /// Destination bucket
    #[arg(env = "S3_BUCKET_NAME", long, short)]
    pub bucket: Option<String>,
    /// Create the bucket if it doesn't exist
    #[arg(long, short)]
    pub create_bucket: bool,
    /// Access control for a newly created bucket
    #[arg(long, short = 'u', default_value = "private", value_name = "ACCESS-CONTROL")]
    pub bucket_acl: String,
    /// Access control for uploaded keys
    #[arg(long, short, default_value = "public-read", value_name = "ACCESS-CONTROL")]
    pub key_acl: String,
    /// File to upload
    #[arg(long, short)]
    pub file: Option<PathBuf>,
    /// Key name to use, or key prefix with --recursive [default: file name]
    #[arg(long, short = 'n')]
    pub key_name: Option<String>,
    /// Upload every file below the given directory, one key per file
    #[arg(long, short)]
    pub recursive: bool,
    /// Region of the bucket
    #[arg(env = "AWS_REGION", long, default_value = DEFAULT_REGION)]
    pub region: String,
    /// Endpoint of an S3-compatible service
    #[arg(env = "AWS_ENDPOINT_URL", long)]
    pub endpoint_url: Option<String>,
    /// Address buckets as `<endpoint>/<bucket>` instead of `<bucket>.<endpoint>`
    #[arg(long)]
    pub path_style: bool,
    /// Format of the upload report
    #[arg(long, short, value_enum, default_value_t = Output::Table)]
    pub output: Output,
}

impl Args {
    pub fn into_config(self) -> Result<Config, Error> {
        let credentials = Credentials {
            access_key_id: self.access_key.ok_or(Error::MissingArgument("access-key"))?,
            secret_access_key: self.secret_key.ok_or(Error::MissingArgument("secret-key"))?,
        };
        let bucket = self.bucket.ok_or(Error::MissingArgument("bucket"))?;
        let file = self.file.ok_or(Error::MissingArgument("file"))?;

        let bucket_acl = self.bucket_acl.parse::<Acl>()?;
        let key_acl = self.key_acl.parse::<Acl>()?;
        let endpoint_url = self
            .endpoint_url
            .map(|url| {
                Url::parse(&url)
                    .map(String::from)
                    .map_err(|error| Error::InvalidInput(format!("endpoint URL `{url}`: {error}")))
            })
            .transpose()?;

        Config {
            credentials,
            region: self.region,
            endpoint_url,
            path_style: self.path_style,
            bucket,
            create_bucket: self.create_bucket,
            bucket_acl,
            file,
            key_name: self.key_name,
            key_acl,
            recursive: self.recursive,
        }
        .validate()
    }
}

/// Writes the `--help` text, exit code table included.
pub fn write_usage(out: &mut impl io::Write) -> io::Result<()> {
    Args::command().write_help(out)?;
    out.flush()
}
