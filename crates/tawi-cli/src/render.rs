//! Terminal output for the `tawi` commands.
//!
//! Tables are built as strings so they can be tested; `main` prints them.

use std::fmt::Write as _;

use anyhow::Context;
use clap::ValueEnum;
use rust_decimal::Decimal;
use serde::Serialize;
use tawi_core::models::{format_transaction_date, Statistics, SubmissionResult, Transaction};
use tawi_core::format_currency_from_minor;
use tawi_core::validation::format_phone_number;

use crate::truncate_string;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

pub fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize response")?;
    println!("{}", out);
    Ok(())
}

/// Successful and failed rows of a bulk submission.
pub fn submission_table(result: &SubmissionResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n=== Bulk Recharge Results ===\n");
    let _ = writeln!(out, "Total processed: {}", result.total_processed);

    if !result.successful_transactions.is_empty() {
        let _ = writeln!(
            out,
            "\nSuccessful Transactions ({})",
            result.successful_transactions.len()
        );
        let _ = writeln!(out, "{:<16} {:>12}", "Phone Number", "Amount");
        let _ = writeln!(out, "{}", "-".repeat(29));
        for tx in &result.successful_transactions {
            let _ = writeln!(
                out,
                "{:<16} {:>12}",
                truncate_string(&tx.receiver_msisdn, 16),
                tx.amount_major_units
            );
        }
    }

    if !result.failed_transactions.is_empty() {
        let _ = writeln!(
            out,
            "\nFailed Transactions ({})",
            result.failed_transactions.len()
        );
        let _ = writeln!(out, "{:<16} {:<40}", "Phone Number", "Error");
        let _ = writeln!(out, "{}", "-".repeat(57));
        for tx in &result.failed_transactions {
            let _ = writeln!(
                out,
                "{:<16} {:<40}",
                truncate_string(&tx.receiver_msisdn, 16),
                truncate_string(&tx.error, 40)
            );
        }
    }

    out
}

/// Dashboard cards, monthly series and one page of transactions.
pub fn dashboard_report(
    statistics: &Statistics,
    transactions: &[Transaction],
    page: u32,
    pages: u32,
    currency: &str,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n=== Dashboard ===\n");
    let _ = writeln!(
        out,
        "Spent this month: {}",
        format_currency_from_minor(statistics.monthly_total, currency)
    );
    let _ = writeln!(out, "New clients:      {}", statistics.new_clients);
    let _ = writeln!(
        out,
        "Activity:         {}",
        format_currency_from_minor(statistics.activity(), currency)
    );

    let series = statistics.chart_series();
    if !series.is_empty() {
        let _ = writeln!(out, "\n--- Monthly Trends ---");
        for point in &series {
            let _ = writeln!(
                out,
                "{:<6} {:>18}",
                point.name,
                format_currency_from_minor(point.amount, currency)
            );
        }
    }

    let _ = writeln!(out, "\n--- Transactions (page {} of {}) ---", page, pages.max(1));
    if transactions.is_empty() {
        let _ = writeln!(out, "\nNo transactions found.");
        return out;
    }

    let _ = writeln!(
        out,
        "{:<14} {:<14} {:>16} {:<20} {:<10} {:<12}",
        "From", "To", "Amount", "Transaction ID", "Status", "Date"
    );
    let _ = writeln!(out, "{}", "-".repeat(91));
    for tx in transactions {
        let _ = writeln!(
            out,
            "{:<14} {:<14} {:>16} {:<20} {:<10} {:<12}",
            format_phone_number(&tx.sender_msisdn),
            format_phone_number(&tx.receiver_msisdn),
            format_currency_from_minor(tx.amount, currency),
            truncate_string(&tx.transaction_id, 20),
            truncate_string(&tx.status, 10),
            format_transaction_date(&tx.created_at)
        );
    }

    out
}

/// Machine-readable dashboard for `--format json`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardJson<'a> {
    pub monthly_total: Decimal,
    pub new_clients: u64,
    pub activity: Decimal,
    pub monthly_data: Vec<tawi_core::models::ChartPoint>,
    pub transactions: &'a [Transaction],
    pub page: u32,
    pub pages: u32,
}

impl<'a> DashboardJson<'a> {
    pub fn new(
        statistics: &Statistics,
        transactions: &'a [Transaction],
        page: u32,
        pages: u32,
    ) -> Self {
        Self {
            monthly_total: statistics.monthly_total,
            new_clients: statistics.new_clients,
            activity: statistics.activity(),
            monthly_data: statistics.chart_series(),
            transactions,
            page,
            pages,
        }
    }
}
