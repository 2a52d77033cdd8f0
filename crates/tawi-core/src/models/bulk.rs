use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::money::minor_to_major_string;

/// Raw body of `POST /recharge/bulk-recharge`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkRechargeResponse {
    pub success: bool,
    #[serde(default)]
    pub results: Option<Vec<BulkRechargeResult>>,
    #[serde(default)]
    pub errors: Option<Vec<FailedTransaction>>,
    #[serde(default)]
    pub total_processed: Option<u64>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// A row the server recharged. `amount` is in minor units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkRechargeResult {
    pub receiver_msisdn: String,
    pub amount: Decimal,
}

/// A row the server rejected, passed through verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailedTransaction {
    #[serde(default)]
    pub receiver_msisdn: String,
    #[serde(default)]
    pub error: String,
}

/// A successful row ready for display, amount in major units (`"50.00"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuccessfulTransaction {
    pub receiver_msisdn: String,
    pub amount_major_units: String,
}

/// What the bulk recharge screen renders after a successful submission.
///
/// `total_processed` comes from the server and is not recomputed from the two
/// lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResult {
    pub successful_transactions: Vec<SuccessfulTransaction>,
    pub failed_transactions: Vec<FailedTransaction>,
    pub total_processed: u64,
}

impl From<BulkRechargeResponse> for SubmissionResult {
    fn from(response: BulkRechargeResponse) -> Self {
        let successful_transactions = response
            .results
            .unwrap_or_default()
            .into_iter()
            .map(|r| SuccessfulTransaction {
                amount_major_units: minor_to_major_string(r.amount),
                receiver_msisdn: r.receiver_msisdn,
            })
            .collect();

        SubmissionResult {
            successful_transactions,
            failed_transactions: response.errors.unwrap_or_default(),
            total_processed: response.total_processed.unwrap_or(0),
        }
    }
}
