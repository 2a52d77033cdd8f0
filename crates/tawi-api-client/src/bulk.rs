//! Bulk recharge form.
//!
//! Holds the selected file, the PIN and the last rendered result, and runs a
//! submission through `Idle -> Validating -> Uploading -> {Success | Error}`.
//! A new submission restarts from `Idle`. `submit` borrows the form mutably,
//! so one form instance can only have one upload in flight.

use tawi_core::models::SubmissionResult;
use tawi_core::{
    transform_amounts_to_minor_units, AppError, ErrorMetadata, LogLevel, Pin, TransformedCsv,
    UploadedFile, ValidationError,
};

use crate::api::RechargeApi;

/// Fallback when the server answers `success: false` without an `error` text.
pub const BULK_RECHARGE_FAILED: &str = "Bulk recharge failed";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    Validating,
    Uploading,
    Success,
    Error,
}

/// The single user-visible status line of the form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    Idle,
    Success(String),
    Error(String),
}

impl Status {
    pub fn message(&self) -> &str {
        match self {
            Status::Idle => "",
            Status::Success(message) | Status::Error(message) => message,
        }
    }
}

/// Side effect the front-end must carry out after a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// The session was rejected; discard it and show the login screen.
    NavigateToLogin,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitOutcome {
    pub state: SubmissionState,
    pub status: Status,
    pub effect: Option<Effect>,
}

#[derive(Debug, Default)]
pub struct BulkRechargeForm {
    file: Option<UploadedFile>,
    pin: String,
    state: SubmissionState,
    status: Status,
    result: Option<SubmissionResult>,
}

impl BulkRechargeForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select_file(&mut self, file: Option<UploadedFile>) {
        self.file = file;
    }

    pub fn set_pin(&mut self, pin: impl Into<String>) {
        self.pin = pin.into();
    }

    pub fn file(&self) -> Option<&UploadedFile> {
        self.file.as_ref()
    }

    pub fn pin(&self) -> &str {
        &self.pin
    }

    pub fn state(&self) -> SubmissionState {
        self.state
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    /// Result of the last successful submission. Replaced, never merged.
    pub fn result(&self) -> Option<&SubmissionResult> {
        self.result.as_ref()
    }

    /// Validate, transform, upload and record the outcome.
    ///
    /// Validation failures never reach `api`. On success the file and PIN are
    /// cleared; on any failure they are kept so the user can retry.
    pub async fn submit<A>(&mut self, api: &A) -> SubmitOutcome
    where
        A: RechargeApi + ?Sized,
    {
        self.status = Status::Idle;
        self.state = SubmissionState::Validating;
        let (csv, pin) = match self.validate() {
            Ok(ready) => ready,
            Err(err) => return self.fail(AppError::Validation(err)),
        };

        self.state = SubmissionState::Uploading;
        match api.bulk_recharge(&csv, &pin).await {
            Ok(response) if response.success => {
                let result = SubmissionResult::from(response);
                tracing::info!(
                    file = %csv.file_name,
                    total_processed = result.total_processed,
                    succeeded = result.successful_transactions.len(),
                    failed = result.failed_transactions.len(),
                    "Bulk recharge processed"
                );

                let message = format!("Processed {} transactions", result.total_processed);
                self.result = Some(result);
                self.file = None;
                self.pin.clear();
                self.finish(SubmissionState::Success, Status::Success(message), None)
            }
            Ok(response) => {
                let message = response
                    .error
                    .filter(|e| !e.trim().is_empty())
                    .unwrap_or_else(|| BULK_RECHARGE_FAILED.to_string());
                self.fail(AppError::server(None, message))
            }
            Err(err) => self.fail(err),
        }
    }

    fn validate(&self) -> Result<(TransformedCsv, Pin), ValidationError> {
        let file = self.file.as_ref().ok_or(ValidationError::NoFileSelected)?;
        let pin = Pin::parse(&self.pin)?;
        let csv = transform_amounts_to_minor_units(file)?;
        Ok((csv, pin))
    }

    fn fail(&mut self, err: AppError) -> SubmitOutcome {
        match err.log_level() {
            LogLevel::Debug => {
                tracing::debug!(code = err.error_code(), error = %err, "Bulk recharge rejected")
            }
            LogLevel::Warn => {
                tracing::warn!(code = err.error_code(), error = %err, "Bulk recharge failed")
            }
            LogLevel::Error => {
                tracing::error!(code = err.error_code(), error = %err, "Bulk recharge failed")
            }
        }
        let effect = err.requires_login().then_some(Effect::NavigateToLogin);
        self.finish(
            SubmissionState::Error,
            Status::Error(err.client_message()),
            effect,
        )
    }

    fn finish(
        &mut self,
        state: SubmissionState,
        status: Status,
        effect: Option<Effect>,
    ) -> SubmitOutcome {
        self.state = state;
        self.status = status.clone();
        SubmitOutcome {
            state,
            status,
            effect,
        }
    }
}
