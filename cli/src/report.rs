use std::io;

use anyhow::Result;
use bytesize::ByteSize;
use cli_table::{
    format::{Border, Justify, Separator},
    Cell, Table, TableStruct,
};
use s3backup_core::UploadReport;

use crate::cli::Output;

fn table(report: &UploadReport) -> TableStruct {
    report
        .objects
        .iter()
        .map(|object| {
            vec![
                object.key.as_str().cell(),
                ByteSize(object.size)
                    .to_string()
                    .cell()
                    .justify(Justify::Right),
                object.acl.cell(),
            ]
        })
        .collect::<Vec<_>>()
        .table()
        .title(vec!["KEY".cell(), "SIZE".cell(), "ACL".cell()])
        .separator(
            Separator::builder()
                .column(None)
                .row(None)
                .title(None)
                .build(),
        )
        .border(Border::builder().build())
}

fn summary(report: &UploadReport) -> String {
    let created = if report.bucket_created {
        " (created)"
    } else {
        ""
    };
    format!(
        "{} object(s), {} uploaded to bucket {}{created}",
        report.objects.len(),
        ByteSize(report.total_size()),
        report.bucket,
    )
}

pub fn print(report: &UploadReport, output: Output) -> Result<()> {
    match output {
        Output::Table => {
            cli_table::print_stdout(table(report))?;
            println!("{}", summary(report));
        }
        Output::Json => {
            serde_json::to_writer_pretty(io::stdout().lock(), report)?;
            println!();
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use s3backup_core::{Acl, UploadedObject};

    use super::*;

    fn report() -> UploadReport {
        UploadReport {
            bucket: "backups".to_string(),
            bucket_created: true,
            objects: vec![
                UploadedObject {
                    key: "www/index.html".to_string(),
                    size: 2048,
                    acl: Acl::PublicRead,
                },
                UploadedObject {
                    key: "www/app.js".to_string(),
                    size: 10,
                    acl: Acl::PublicRead,
                },
            ],
        }
    }

    #[test]
    fn table_lists_every_object() {
        let rendered = table(&report()).display().unwrap().to_string();
        assert!(rendered.contains("KEY"));
        assert!(rendered.contains("www/index.html"));
        assert!(rendered.contains("www/app.js"));
        assert!(rendered.contains("public-read"));
    }

    #[test]
    fn summary_mentions_created_bucket() {
        let line = summary(&report());
        assert!(line.starts_with("2 object(s)"));
        assert!(line.ends_with("bucket backups (created)"));
    }

    #[test]
    fn json_report_uses_acl_names() {
        let value = serde_json::to_value(report()).unwrap();
        assert_eq!(value["bucket_created"], true);
        assert_eq!(value["objects"][0]["key"], "www/index.html");
        assert_eq!(value["objects"][0]["acl"], "public-read");
        assert_eq!(value["objects"][1]["size"], 10);
    }
}
