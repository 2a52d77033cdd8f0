//! Tawi Core Library
//!
//! This crate provides the domain models, error types, configuration and
//! validation shared by the Tawi API client and CLI. Nothing in here talks to
//! the network.

pub mod bulk_csv;
pub mod config;
pub mod error;
pub mod models;
pub mod money;
pub mod roles;
pub mod validation;

// Re-export commonly used types
pub use bulk_csv::{
    transform_amounts_to_minor_units, CsvRow, TransformedCsv, TransformedCsvRow, UploadedFile,
    TEMPLATE_CONTENT, TEMPLATE_FILE_NAME,
};
pub use config::ClientConfig;
pub use error::{AppError, ErrorMetadata, LogLevel, ValidationError};
pub use money::{
    format_currency, format_currency_from_minor, minor_to_major_string, to_minor_units,
};
pub use roles::{CallerRole, Role};
pub use validation::{Msisdn, MsisdnPattern, Pin};
