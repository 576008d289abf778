mod cli;
mod exit_code;
mod report;
mod s3;

use anyhow::Result;
use aws_sdk_s3::error::DisplayErrorContext;
use clap::Parser;
use s3backup_core::{Error, UploadReport};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::cli::Args;
use crate::exit_code::ExitCode;
use crate::s3::S3Store;

async fn upload(args: Args) -> Result<UploadReport> {
    let config = args.into_config()?;

    let store = S3Store::connect(&config).await;
    let report = s3backup_core::run(&store, &config).await?;

    Ok(report)
}

fn report_error(error: &anyhow::Error) {
    match error.downcast_ref::<Error>() {
        Some(Error::MissingArgument(_)) => {
            if let Err(write_error) = cli::write_usage(&mut std::io::stdout().lock()) {
                tracing::warn!(%write_error, "failed to print usage");
            }
            eprintln!("\nerror: {error}");
        }
        Some(Error::Storage { operation, source }) => {
            eprintln!("error: {operation} failed: {}", DisplayErrorContext(&**source));
        }
        _ => eprintln!("error: {error:#}"),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> std::process::ExitCode {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_file(true)
                .with_line_number(true),
        )
        .init();

    let args = Args::parse();
    let output = args.output;

    let code = match upload(args).await {
        Ok(report) => match report::print(&report, output) {
            Ok(()) => ExitCode::Success,
            Err(error) => {
                report_error(&error);
                ExitCode::Internal
            }
        },
        Err(error) => {
            report_error(&error);
            ExitCode::for_error(&error)
        }
    };
    code.into()
}
