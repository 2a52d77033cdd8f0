#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tawi_api_client::{ApiClient, Auth, RechargeApi};
use tawi_core::models::BulkRechargeResponse;
use tawi_core::{AppError, Pin, TransformedCsv, UploadedFile};

pub const TEST_TOKEN: &str = "test-token";

pub const SAMPLE_CSV: &str = "receiverMsisdn,amount\n254712345678,50\n254723456789,12.5\n";

/// Client pointed at a mockito server, authenticated with [`TEST_TOKEN`].
pub fn client_for(server_url: &str) -> ApiClient {
    ApiClient::new(
        server_url.to_string(),
        Duration::from_secs(5),
        Auth::Bearer(TEST_TOKEN.to_string()),
    )
    .expect("client")
}

pub fn sample_file() -> UploadedFile {
    UploadedFile::new("batch.csv", SAMPLE_CSV)
}

/// In-memory [`RechargeApi`] that records every upload it receives.
pub struct RecordingApi {
    response: Mutex<Option<Result<BulkRechargeResponse, AppError>>>,
    calls: AtomicUsize,
    uploads: Mutex<Vec<String>>,
}

impl RecordingApi {
    pub fn responding(response: Result<BulkRechargeResponse, AppError>) -> Self {
        Self {
            response: Mutex::new(Some(response)),
            calls: AtomicUsize::new(0),
            uploads: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn uploads(&self) -> Vec<String> {
        self.uploads.lock().unwrap().clone()
    }
}

#[async_trait]
impl RechargeApi for RecordingApi {
    async fn bulk_recharge(
        &self,
        csv: &TransformedCsv,
        _pin: &Pin,
    ) -> Result<BulkRechargeResponse, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.uploads.lock().unwrap().push(csv.content().unwrap());
        self.response
            .lock()
            .unwrap()
            .take()
            .unwrap_or_else(|| Err(AppError::Internal("no response configured".to_string())))
    }
}
