//! Domain methods for the Tawi API client.
//!
//! Every method takes an already-validated request from `tawi_core`; the
//! client never sends a body that failed client-side validation.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use tawi_core::models::{
    AirtimeRequest, ApiAck, BulkRechargeResponse, ChangePinRequest, LoginRequest, LoginResponse,
    RechargeRequest, RechargeResponse, RegisterRequest, Statistics, StatisticsResponse,
    TransactionQuery, TransactionsResponse,
};
use tawi_core::{AppError, Pin, TransformedCsv};

use crate::ApiClient;

/// Multipart field carrying the rewritten CSV
pub const CSV_FILE_FIELD: &str = "csvFile";

/// Multipart field carrying the service PIN
pub const SERVICE_PIN_FIELD: &str = "servicePin";

/// The remote operation behind the bulk recharge form.
#[async_trait]
pub trait RechargeApi: Send + Sync {
    /// Upload a transformed CSV with the service PIN. Returns the raw body;
    /// `success: false` is left for the caller to interpret.
    async fn bulk_recharge(
        &self,
        csv: &TransformedCsv,
        pin: &Pin,
    ) -> Result<BulkRechargeResponse, AppError>;
}

#[async_trait]
impl RechargeApi for ApiClient {
    async fn bulk_recharge(
        &self,
        csv: &TransformedCsv,
        pin: &Pin,
    ) -> Result<BulkRechargeResponse, AppError> {
        let file_part = Part::text(csv.content()?)
            .file_name(csv.file_name.clone())
            .mime_str(csv.content_type())
            .map_err(|e| AppError::Internal(format!("Invalid CSV content type: {}", e)))?;

        let form = Form::new()
            .part(CSV_FILE_FIELD, file_part)
            .text(SERVICE_PIN_FIELD, pin.as_str().to_string());

        tracing::debug!(file = %csv.file_name, rows = csv.row_count(), "Uploading bulk recharge");
        self.post_multipart("/recharge/bulk-recharge", form).await
    }
}

impl ApiClient {
    /// Exchange phone and PIN for a session token.
    pub async fn login(&self, phone: &str, pin: &Pin) -> Result<String, AppError> {
        let body = LoginRequest {
            phone: phone.trim().to_string(),
            pin: pin.clone(),
        };
        let response: LoginResponse = self.post_json("/auth/login", &body).await?;

        match response.token {
            Some(token) if !token.is_empty() => Ok(token),
            _ => Err(AppError::InvalidResponse(
                response
                    .error
                    .or(response.message)
                    .unwrap_or_else(|| "Invalid response from server".to_string()),
            )),
        }
    }

    /// Create a user account. Returns the server's message, if any.
    pub async fn register(&self, request: &RegisterRequest) -> Result<String, AppError> {
        let ack: ApiAck = self.post_json("/auth/register", request).await?;
        if ack.success == Some(false) {
            return Err(AppError::server(
                None,
                ack.error.unwrap_or_else(|| "Registration failed".to_string()),
            ));
        }

        Ok(ack
            .message
            .unwrap_or_else(|| "User registered successfully".to_string()))
    }

    /// Change the service PIN of the logged-in user.
    pub async fn change_pin(&self, request: &ChangePinRequest) -> Result<(), AppError> {
        let ack: ApiAck = self.post_json("/auth/change-pin", request).await?;
        if ack.success != Some(true) {
            return Err(AppError::server(
                None,
                ack.error.unwrap_or_else(|| "Failed to update PIN".to_string()),
            ));
        }

        Ok(())
    }

    /// Single recharge; the request amount is already in minor units.
    pub async fn recharge(&self, request: &RechargeRequest) -> Result<String, AppError> {
        let response: RechargeResponse = self.post_json("/recharge", request).await?;
        if !response.is_success() {
            return Err(AppError::server(None, response.error_message("Recharge failed")));
        }

        tracing::info!(response_id = ?response.response_id, "Recharge completed");
        Ok(response.success_message("Recharge completed successfully!"))
    }

    /// Airtime transfer in major units with an explicit currency code.
    pub async fn airtime_recharge(&self, request: &AirtimeRequest) -> Result<String, AppError> {
        let response: RechargeResponse = self.post_json("/recharge/airtime", request).await?;
        if !response.is_success() {
            return Err(AppError::server(
                None,
                response.error_message("Airtime transfer failed"),
            ));
        }

        tracing::info!(response_id = ?response.response_id, "Airtime transfer completed");
        Ok(response.success_message("Airtime sent successfully!"))
    }

    /// Dashboard statistics (monthly total, new clients, monthly series).
    pub async fn statistics(&self) -> Result<Statistics, AppError> {
        let response: StatisticsResponse = self.get("/recharge/statistics", &[]).await?;
        match response.statistics {
            Some(statistics) if response.success => Ok(statistics),
            _ => Err(AppError::server(
                None,
                response
                    .error
                    .unwrap_or_else(|| "Failed to fetch dashboard data".to_string()),
            )),
        }
    }

    /// One page of the transactions list.
    pub async fn transactions(
        &self,
        query: &TransactionQuery,
    ) -> Result<TransactionsResponse, AppError> {
        let response: TransactionsResponse = self
            .get("/recharge/transactions", &query.to_query_pairs())
            .await?;
        if !response.success {
            return Err(AppError::server(
                None,
                response
                    .error
                    .unwrap_or_else(|| "Failed to fetch dashboard data".to_string()),
            ));
        }

        Ok(response)
    }
}
