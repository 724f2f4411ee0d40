use crate::api::Mode;
use crate::args::SummaryArgs;
use crate::commands::{fetch_statement, Out, OutputFormat};
use crate::error::{ErrorType, IntoResult};
use crate::model::Amount;
use crate::summary::{build_summary, SummaryView};
use crate::Result;
use anyhow::Context;
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt::Write;
use std::path::Path;
use tracing::debug;

/// The summary together with the balance it was built next to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletReport {
    pub balance: Option<Amount>,
    pub reference_date: NaiveDate,
    #[serde(flatten)]
    pub summary: SummaryView,
}

/// Fetches the statement, builds the summary view for the six months ending at the reference
/// date, and renders it in the requested format.
///
/// # Arguments
/// - `wallet_home` - The wallet data directory. Only required when calling the REST API.
/// - `mode` - Whether to call the REST API or use the built-in test wallet.
/// - `args` - Input file, reference date, highlighted month and output format.
/// - `today` - Used as the reference date when `args` does not carry one.
pub async fn summary(
    wallet_home: &Path,
    mode: Mode,
    args: &SummaryArgs,
    today: NaiveDate,
) -> Result<Out<WalletReport>> {
    let fetched = fetch_statement(wallet_home, mode, args.statement(), today).await?;
    let view = build_summary(
        &fetched.statement.transactions,
        fetched.reference_date,
        args.month(),
        &fetched.palette,
    )
    .pub_result(ErrorType::Summary)?;

    let report = WalletReport {
        balance: fetched.statement.balance,
        reference_date: fetched.reference_date,
        summary: view,
    };
    let output = render(&report, args.format()).pub_result(ErrorType::Output)?;
    debug!("Rendered the summary as {}", args.format());

    let message = match &report.summary.selected_month {
        Some(selected) => format!(
            "Summarized {} transactions, {} {} moved {} tickets",
            fetched.statement.transactions.len(),
            selected.label,
            selected.year,
            selected.total_tickets
        ),
        None => format!(
            "Summarized {} transactions",
            fetched.statement.transactions.len()
        ),
    };
    Ok(Out::new(message, report).with_output(output))
}

/// Renders `report` as JSON, an aligned text table or CSV.
pub fn render(report: &WalletReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(report).context("Unable to serialize the summary")
        }
        OutputFormat::Table => Ok(render_table(report)),
        OutputFormat::Csv => render_csv(report),
    }
}

fn render_table(report: &WalletReport) -> String {
    let mut s = String::new();
    let balance = report
        .balance
        .map(|b| b.to_string())
        .unwrap_or_else(|| "unknown".to_string());
    // Writing to a String cannot fail.
    let _ = writeln!(s, "Balance: {balance} tickets");
    let _ = writeln!(s, "Reference date: {}", report.reference_date);
    let _ = writeln!(s);

    let _ = writeln!(s, "{:<10} {:>12}", "Month", "Tickets");
    let selected = report.summary.selected_month.as_ref();
    for bucket in &report.summary.monthly {
        let marker = if selected == Some(bucket) { " *" } else { "" };
        let _ = writeln!(
            s,
            "{:<10} {:>12}{marker}",
            format!("{} {}", bucket.label, bucket.year),
            bucket.total_tickets.to_string()
        );
    }
    let _ = writeln!(s);

    let width = report
        .summary
        .categories
        .iter()
        .map(|c| c.name.chars().count())
        .max()
        .unwrap_or(0)
        .max("Category".len());
    let _ = writeln!(
        s,
        "{:<width$} {:>12} {:>12}  Color",
        "Category", "Transactions", "Tickets"
    );
    for category in &report.summary.categories {
        let _ = writeln!(
            s,
            "{:<width$} {:>12} {:>12}  {}",
            category.name,
            category.transaction_count,
            category.ticket_amount.to_string(),
            category.color
        );
    }
    s.trim_end().to_string()
}

/// A flat row so that months and categories share one CSV header.
#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    section: &'static str,
    key: String,
    label: &'a str,
    transactions: Option<u64>,
    tickets: Option<Amount>,
    color: Option<&'a str>,
}

fn render_csv(report: &WalletReport) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer.serialize(CsvRow {
        section: "balance",
        key: report.reference_date.to_string(),
        label: "",
        transactions: None,
        tickets: report.balance,
        color: None,
    })?;
    for bucket in &report.summary.monthly {
        let section = if report.summary.selected_month.as_ref() == Some(bucket) {
            "selected_month"
        } else {
            "month"
        };
        writer.serialize(CsvRow {
            section,
            key: bucket.year_month().to_string(),
            label: &bucket.label,
            transactions: None,
            tickets: Some(bucket.total_tickets),
            color: None,
        })?;
    }
    for category in &report.summary.categories {
        writer.serialize(CsvRow {
            section: "category",
            key: category.name.clone(),
            label: &category.name,
            transactions: Some(category.transaction_count),
            tickets: Some(category.ticket_amount),
            color: Some(&category.color),
        })?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| e.into_error())
        .context("Unable to flush the CSV writer")?;
    String::from_utf8(bytes).context("The CSV output is not valid UTF-8")
}
