//! Bulk recharge CSV handling
//!
//! Users upload `receiverMsisdn,amount` files with amounts in major units.
//! The API expects minor units, so the amount column is rewritten before the
//! file is sent. The header line is passed through untouched.

use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Terminator, Trim, WriterBuilder};
use serde::Serialize;

use crate::error::{AppError, ValidationError};
use crate::money::to_minor_units;

/// Name of the downloadable template file
pub const TEMPLATE_FILE_NAME: &str = "bulk_recharge_template.csv";

/// Exact bytes of the downloadable template (major units).
pub const TEMPLATE_CONTENT: &str =
    "receiverMsisdn,amount\n254712345678,50\n254723456789,100\n254734567890,250\n";

/// Expected header of an uploaded file
pub const EXPECTED_HEADER: &str = "receiverMsisdn,amount";

/// Content type of the rewritten upload
pub const CSV_CONTENT_TYPE: &str = "text/csv";

/// A file chosen by the user. Immutable once selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub name: String,
    pub content: String,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Read a file from disk, keeping only its file name.
    pub fn from_path(path: &Path) -> Result<Self, AppError> {
        let content = std::fs::read_to_string(path)?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("bulk_recharge.csv")
            .to_string();
        Ok(Self { name, content })
    }

    /// The template offered for download, as if the user had picked it.
    pub fn template() -> Self {
        Self::new(TEMPLATE_FILE_NAME, TEMPLATE_CONTENT)
    }
}

/// One data line of the uploaded file.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CsvRow {
    pub receiver_msisdn: String,
    pub amount: f64,
}

/// One data line after the amount has been converted to minor units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformedCsvRow {
    pub receiver_msisdn: String,
    pub amount_minor_units: i64,
}

/// Outgoing payload: same file name, header kept, amounts in minor units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformedCsv {
    pub file_name: String,
    pub header: String,
    pub rows: Vec<TransformedCsvRow>,
}

impl TransformedCsv {
    pub fn content_type(&self) -> &'static str {
        CSV_CONTENT_TYPE
    }

    /// Header and rows joined with `\n`, no trailing newline. Fields that
    /// need it (an msisdn containing a comma or a quote) are quoted again.
    pub fn content(&self) -> Result<String, AppError> {
        let mut writer = WriterBuilder::new()
            .terminator(Terminator::Any(b'\n'))
            .from_writer(Vec::new());
        for row in &self.rows {
            let amount = row.amount_minor_units.to_string();
            writer
                .write_record([row.receiver_msisdn.as_str(), amount.as_str()])
                .map_err(|e| AppError::Internal(format!("Failed to write CSV row: {}", e)))?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| AppError::Internal(format!("Failed to flush CSV payload: {}", e)))?;
        let body = String::from_utf8(bytes)
            .map_err(|e| AppError::Internal(format!("CSV payload is not UTF-8: {}", e)))?;

        let mut content = self.header.clone();
        if !body.is_empty() {
            content.push('\n');
            content.push_str(body.trim_end_matches('\n'));
        }
        Ok(content)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Parse the data lines of an uploaded file.
///
/// The first non-blank line is the header and is kept verbatim. Blank lines
/// (including whitespace-only ones) and lines with fewer than two fields are
/// skipped. A line whose amount is not a finite number, or which carries extra
/// fields, is rejected.
pub fn parse_rows(file: &UploadedFile) -> Result<(String, Vec<CsvRow>), ValidationError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(file.content.as_bytes());

    let mut header = None;
    let mut rows = Vec::new();
    let mut record = StringRecord::new();
    loop {
        let more = reader
            .read_record(&mut record)
            .map_err(|e| ValidationError::InvalidCsvRow {
                line: e.position().map(|p| p.line() as usize).unwrap_or(0),
                reason: e.to_string(),
            })?;
        if !more {
            break;
        }

        let line = record.position().map(|p| p.line() as usize).unwrap_or(0);
        if record.iter().all(str::is_empty) {
            continue;
        }

        if header.is_none() {
            header = Some(raw_line(file, line, &record));
            continue;
        }

        if let Some(row) = parse_record(&record, line)? {
            rows.push(row);
        }
    }

    let header = header.ok_or_else(|| ValidationError::InvalidCsvRow {
        line: 1,
        reason: "file is empty".to_string(),
    })?;

    if header.trim() != EXPECTED_HEADER {
        tracing::debug!(header = %header, "Uploaded CSV header differs from the template");
    }

    Ok((header, rows))
}

/// The source text of a 1-based line, falling back to the parsed fields.
fn raw_line(file: &UploadedFile, line: usize, record: &StringRecord) -> String {
    line.checked_sub(1)
        .and_then(|index| file.content.lines().nth(index))
        .map(|text| text.trim_end_matches('\r').to_string())
        .unwrap_or_else(|| record.iter().collect::<Vec<_>>().join(","))
}

fn parse_record(record: &StringRecord, line: usize) -> Result<Option<CsvRow>, ValidationError> {
    if record.len() < 2 {
        tracing::debug!(line, "Skipping CSV line with fewer than two fields");
        return Ok(None);
    }

    if record.len() > 2 {
        return Err(ValidationError::InvalidCsvRow {
            line,
            reason: format!("expected 2 fields, found {}", record.len()),
        });
    }

    let receiver_msisdn = record[0].to_string();
    let amount_text = &record[1];
    let amount = amount_text
        .parse::<f64>()
        .ok()
        .filter(|a| a.is_finite())
        .ok_or_else(|| ValidationError::InvalidCsvRow {
            line,
            reason: format!("amount '{}' is not a number", amount_text),
        })?;

    Ok(Some(CsvRow {
        receiver_msisdn,
        amount,
    }))
}

/// Rewrite every amount of the uploaded file from major to minor units.
pub fn transform_amounts_to_minor_units(
    file: &UploadedFile,
) -> Result<TransformedCsv, ValidationError> {
    let (header, rows) = parse_rows(file)?;

    let rows = rows
        .into_iter()
        .map(|row| {
            Ok(TransformedCsvRow {
                amount_minor_units: to_minor_units(row.amount)?,
                receiver_msisdn: row.receiver_msisdn,
            })
        })
        .collect::<Result<Vec<_>, ValidationError>>()?;

    tracing::debug!(file = %file.name, rows = rows.len(), "Transformed bulk recharge CSV");

    Ok(TransformedCsv {
        file_name: file.name.clone(),
        header,
        rows,
    })
}
