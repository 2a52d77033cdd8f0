use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::money::to_minor_units;
use crate::validation::{
    validate_airtime_amount, validate_recharge_amount, Msisdn, MsisdnPattern, Pin,
};

/// Single recharge form as typed by the user (amount in major units).
#[derive(Debug, Clone, Default)]
pub struct RechargeForm {
    pub receiver_msisdn: String,
    pub amount: String,
    pub pin: String,
}

impl RechargeForm {
    /// Validate phone, amount window and PIN, converting the amount to minor units.
    pub fn validate(&self) -> Result<RechargeRequest, ValidationError> {
        let receiver_msisdn = Msisdn::parse(&self.receiver_msisdn, MsisdnPattern::Recharge)?;
        let amount = validate_recharge_amount(&self.amount)?;
        let service_pin = Pin::parse(&self.pin)?;

        Ok(RechargeRequest {
            receiver_msisdn,
            amount: to_minor_units(amount)?,
            service_pin,
        })
    }
}

/// Airtime transfer form. The currency defaults to KES.
#[derive(Debug, Clone)]
pub struct AirtimeForm {
    pub receiver_msisdn: String,
    pub amount: String,
    pub currency_code: String,
}

impl Default for AirtimeForm {
    fn default() -> Self {
        Self {
            receiver_msisdn: String::new(),
            amount: String::new(),
            currency_code: "KES".to_string(),
        }
    }
}

impl AirtimeForm {
    pub fn validate(&self) -> Result<AirtimeRequest, ValidationError> {
        let receiver_msisdn = Msisdn::parse(&self.receiver_msisdn, MsisdnPattern::Recharge)?;
        let amount = validate_airtime_amount(&self.amount)?;

        Ok(AirtimeRequest {
            receiver_msisdn,
            amount,
            currency_code: self.currency_code.trim().to_uppercase(),
        })
    }
}

/// Body of `POST /recharge`. `amount` is in minor units.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RechargeRequest {
    pub receiver_msisdn: Msisdn,
    pub amount: i64,
    pub service_pin: Pin,
}

/// Body of `POST /recharge/airtime`. `amount` is in major units.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AirtimeRequest {
    pub receiver_msisdn: Msisdn,
    pub amount: f64,
    pub currency_code: String,
}

/// Response shared by the single and airtime recharge endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RechargeResponse {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub response_id: Option<String>,
    #[serde(default)]
    pub response_status: Option<String>,
    #[serde(default)]
    pub response_desc: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
}

impl RechargeResponse {
    /// `success: true` or a `SUCCESS` status from the upstream provider.
    pub fn is_success(&self) -> bool {
        self.success == Some(true) || self.response_status.as_deref() == Some("SUCCESS")
    }

    /// Server error text: `error`, then `details`, then `fallback`.
    pub fn error_message(&self, fallback: &str) -> String {
        self.error
            .clone()
            .or_else(|| self.details.clone())
            .unwrap_or_else(|| fallback.to_string())
    }

    /// Success text: `responseDesc`, else `fallback`.
    pub fn success_message(&self, fallback: &str) -> String {
        self.response_desc
            .clone()
            .unwrap_or_else(|| fallback.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::MsisdnPattern;

    #[test]
    fn recharge_request_uses_api_field_names() {
        let request = RechargeRequest {
            receiver_msisdn: Msisdn::parse("0712345678", MsisdnPattern::Recharge).unwrap(),
            amount: 5000,
            service_pin: Pin::parse("1234").unwrap(),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "receiverMsisdn": "0712345678",
                "amount": 5000,
                "servicePin": "1234"
            })
        );
    }

    #[test]
    fn recharge_form_converts_amount_to_minor_units() {
        let form = RechargeForm {
            receiver_msisdn: "+254712345678".to_string(),
            amount: "49.99".to_string(),
            pin: "4321".to_string(),
        };
        let request = form.validate().unwrap();
        assert_eq!(request.amount, 4999);
        assert_eq!(request.receiver_msisdn.as_str(), "+254712345678");
    }

    #[test]
    fn recharge_form_checks_phone_then_amount_then_pin() {
        let mut form = RechargeForm {
            receiver_msisdn: "12345".to_string(),
            amount: "1".to_string(),
            pin: "x".to_string(),
        };
        assert!(matches!(
            form.validate(),
            Err(ValidationError::InvalidMsisdn(_))
        ));
        form.receiver_msisdn = "0712345678".to_string();
        assert!(matches!(
            form.validate(),
            Err(ValidationError::InvalidAmount(_))
        ));
        form.amount = "100".to_string();
        assert_eq!(form.validate().unwrap_err(), ValidationError::InvalidPin);
    }

    #[test]
    fn airtime_form_keeps_major_units_and_currency() {
        let form = AirtimeForm {
            receiver_msisdn: "0712345678".to_string(),
            amount: "20".to_string(),
            ..AirtimeForm::default()
        };
        let json = serde_json::to_value(form.validate().unwrap()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "receiverMsisdn": "0712345678",
                "amount": 20.0,
                "currencyCode": "KES"
            })
        );
    }

    #[test]
    fn provider_status_counts_as_success() {
        let response: RechargeResponse =
            serde_json::from_str(r#"{"responseStatus": "SUCCESS", "responseDesc": "Done"}"#)
                .unwrap();
        assert!(response.is_success());
        assert_eq!(response.success_message("fallback"), "Done");
    }

    #[test]
    fn error_message_prefers_error_then_details() {
        let response: RechargeResponse =
            serde_json::from_str(r#"{"success": false, "details": "Float too low"}"#).unwrap();
        assert!(!response.is_success());
        assert_eq!(response.error_message("Recharge failed"), "Float too low");
        assert_eq!(
            RechargeResponse::default().error_message("Recharge failed"),
            "Recharge failed"
        );
    }
}
