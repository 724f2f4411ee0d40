use crate::api::Mode;
use crate::args::CheckArgs;
use crate::commands::{fetch_statement, Out, OutputFormat};
use crate::error::{ErrorType, IntoResult};
use crate::summary::{validate_records, RecordIssue};
use crate::Result;
use anyhow::Context;
use chrono::NaiveDate;
use serde::Serialize;
use std::path::Path;

/// The records of a statement that the summary leaves out, in whole or in part.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckReport {
    pub reference_date: NaiveDate,
    pub record_count: usize,
    pub issues: Vec<RecordIssue>,
}

/// Fetches the statement and reports every record that `wallet summary` would skip, and why.
/// Finding issues is not an error; the command only fails if the statement cannot be fetched.
pub async fn check(
    wallet_home: &Path,
    mode: Mode,
    args: &CheckArgs,
    today: NaiveDate,
) -> Result<Out<CheckReport>> {
    let fetched = fetch_statement(wallet_home, mode, args.statement(), today).await?;
    let transactions = &fetched.statement.transactions;
    let report = CheckReport {
        reference_date: fetched.reference_date,
        record_count: transactions.len(),
        issues: validate_records(transactions, fetched.reference_date),
    };
    let output = render(&report, args.format()).pub_result(ErrorType::Output)?;
    let message = match report.issues.len() {
        0 => format!("All {} records are fully counted", report.record_count),
        n => format!("Found {n} issues in {} records", report.record_count),
    };
    Ok(Out::new(message, report).with_output(output))
}

fn render(report: &CheckReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(report).context("Unable to serialize the check report")
        }
        OutputFormat::Table if report.issues.is_empty() => Ok(format!(
            "No issues in {} records for the window ending {}",
            report.record_count, report.reference_date
        )),
        OutputFormat::Table => Ok(report
            .issues
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")),
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(Vec::new());
            writer.write_record(["index", "kind", "detail"])?;
            for issue in &report.issues {
                writer.write_record([
                    issue.index.to_string().as_str(),
                    issue.kind.name(),
                    issue.kind.to_string().as_str(),
                ])?;
            }
            let bytes = writer
                .into_inner()
                .map_err(|e| e.into_error())
                .context("Unable to flush the CSV writer")?;
            String::from_utf8(bytes).context("The CSV output is not valid UTF-8")
        }
    }
}
