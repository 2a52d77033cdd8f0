//! Shared HTTP client for the Tawi recharge API.
//!
//! One configured client (base URL, timeout, auth header) serves every
//! screen. The credential is passed in explicitly through [`Auth`]; nothing
//! here reads ambient session state. Domain methods (login, recharge, bulk
//! recharge, statistics) live in [`api`]; the bulk recharge form state machine
//! lives in [`bulk`].

pub mod api;
pub mod bulk;

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tawi_core::{AppError, ClientConfig};

/// Credential attached to each request.
#[derive(Clone)]
pub enum Auth {
    /// `Authorization: Bearer {token}`
    Bearer(String),
    /// No credential, for login and other public endpoints.
    Anonymous,
}

impl std::fmt::Debug for Auth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Auth::Bearer(_) => f.write_str("Bearer(****)"),
            Auth::Anonymous => f.write_str("Anonymous"),
        }
    }
}

impl Auth {
    /// Bearer auth when a token is present, anonymous otherwise.
    pub fn from_token(token: Option<String>) -> Self {
        match token {
            Some(token) if !token.trim().is_empty() => Auth::Bearer(token.trim().to_string()),
            _ => Auth::Anonymous,
        }
    }

    pub fn token(&self) -> Option<&str> {
        match self {
            Auth::Bearer(token) => Some(token.as_str()),
            Auth::Anonymous => None,
        }
    }
}

/// HTTP client for the Tawi API with explicit auth.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    auth: Auth,
}

impl ApiClient {
    pub fn new(base_url: String, timeout: Duration, auth: Auth) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth,
        })
    }

    /// Build a client from loaded configuration and a credential.
    pub fn from_config(config: &ClientConfig, auth: Auth) -> Result<Self, AppError> {
        Self::new(
            config.api_url.clone(),
            Duration::from_secs(config.timeout_secs),
            auth,
        )
    }

    /// Same client, different credential (e.g. right after login).
    pub fn with_auth(&self, auth: Auth) -> Self {
        Self {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            auth,
        }
    }

    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn apply_auth(&self, request: RequestBuilder) -> RequestBuilder {
        let request = request.header("Accept", "application/json");
        match &self.auth {
            Auth::Bearer(token) => request.header("Authorization", format!("Bearer {}", token)),
            Auth::Anonymous => request,
        }
    }

    /// GET request with optional query parameters. Deserializes JSON response.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, AppError> {
        let url = self.build_url(path);
        let mut request = self.apply_auth(self.client.get(&url));

        if !query.is_empty() {
            request = request.query(query);
        }

        tracing::debug!(method = "GET", url = %url, "Sending API request");
        self.execute(request).await
    }

    /// POST JSON body and deserialize response.
    pub async fn post_json<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, AppError> {
        let url = self.build_url(path);
        let request = self.apply_auth(self.client.post(&url).json(body));

        tracing::debug!(method = "POST", url = %url, "Sending API request");
        self.execute(request).await
    }

    /// POST multipart form and deserialize response.
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<T, AppError> {
        let url = self.build_url(path);
        let request = self.apply_auth(self.client.post(&url).multipart(form));

        tracing::debug!(method = "POST", url = %url, "Sending multipart API request");
        self.execute(request).await
    }

    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, AppError> {
        let response = request.send().await.map_err(|e| {
            tracing::warn!(error = %e, "API request could not be sent");
            AppError::Network(e.to_string())
        })?;

        parse_response(response).await
    }
}

/// Map a response to `T`, or to the error taxonomy: 401 becomes
/// [`AppError::Unauthorized`] whatever the body says, any other non-2xx
/// becomes [`AppError::Server`] carrying the body's `error`/`message`.
async fn parse_response<T: DeserializeOwned>(response: Response) -> Result<T, AppError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| AppError::Network(format!("Failed to read response body: {}", e)))?;

    if status == StatusCode::UNAUTHORIZED {
        let message = server_message(&body).unwrap_or_else(|| "Unauthorized".to_string());
        return Err(AppError::Unauthorized(message));
    }

    if !status.is_success() {
        let message = server_message(&body)
            .unwrap_or_else(|| format!("API request failed with status {}", status));
        tracing::warn!(status = status.as_u16(), message = %message, "API request failed");
        return Err(AppError::server(Some(status.as_u16()), message));
    }

    serde_json::from_str(&body)
        .map_err(|e| AppError::InvalidResponse(format!("Failed to parse response as JSON: {}", e)))
}

/// `error`, then `message`, from a JSON error body.
pub(crate) fn server_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["error", "message"]
        .iter()
        .find_map(|key| value.get(*key).and_then(|v| v.as_str()))
        .filter(|m| !m.trim().is_empty())
        .map(String::from)
}

// Re-export domain types for convenience.
pub use api::RechargeApi;
pub use bulk::{BulkRechargeForm, Effect, Status, SubmissionState, SubmitOutcome};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_message_prefers_error_field() {
        assert_eq!(
            server_message(r#"{"error":"Invalid PIN","message":"ignored"}"#),
            Some("Invalid PIN".to_string())
        );
        assert_eq!(
            server_message(r#"{"message":"Token expired"}"#),
            Some("Token expired".to_string())
        );
        assert_eq!(server_message("<html>502</html>"), None);
        assert_eq!(server_message(r#"{"error":""}"#), None);
    }

    #[test]
    fn auth_from_token_ignores_blank_values() {
        assert_eq!(Auth::from_token(None).token(), None);
        assert_eq!(Auth::from_token(Some("  ".to_string())).token(), None);
        assert_eq!(Auth::from_token(Some("abc\n".to_string())).token(), Some("abc"));
        assert_eq!(format!("{:?}", Auth::Bearer("secret".to_string())), "Bearer(****)");
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = ApiClient::new(
            "http://localhost:4000/api/".to_string(),
            Duration::from_secs(5),
            Auth::Anonymous,
        )
        .unwrap();
        assert_eq!(client.build_url("/recharge"), "http://localhost:4000/api/recharge");
    }
}
