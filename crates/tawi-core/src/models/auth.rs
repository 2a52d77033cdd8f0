use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::roles::{CallerRole, Role};
use crate::validation::{Msisdn, MsisdnPattern, Pin};

/// Body of `POST /auth/login`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub phone: String,
    pub pin: Pin,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Body of `POST /auth/change-pin`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePinRequest {
    pub current_pin: Pin,
    pub new_pin: Pin,
}

/// Body of `POST /auth/register`. The confirmation PIN stays client-side.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub phone: Msisdn,
    pub pin: Pin,
    pub user_type: Role,
}

/// `{success, error, message}` acknowledgement used by the auth endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiAck {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Registration form as typed by the user.
#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    pub username: String,
    pub phone: String,
    pub pin: String,
    pub confirm_pin: String,
    pub user_type: Option<Role>,
}

impl RegistrationForm {
    /// Check the form in the order the screen reports problems and build the
    /// request body. `caller` limits which user types may be created.
    pub fn validate(&self, caller: &CallerRole) -> Result<RegisterRequest, ValidationError> {
        let username = self.username.trim();
        if username.is_empty() {
            return Err(ValidationError::MissingField("Username"));
        }

        let phone = Msisdn::parse(&self.phone, MsisdnPattern::Registration)?;
        let pin = Pin::parse(&self.pin)?;

        if self.pin != self.confirm_pin {
            return Err(ValidationError::PinMismatch);
        }

        let user_type = self.user_type.ok_or(ValidationError::MissingField("User type"))?;
        caller.check_can_register(user_type)?;

        Ok(RegisterRequest {
            username: username.to_string(),
            phone,
            pin,
            user_type,
        })
    }
}
