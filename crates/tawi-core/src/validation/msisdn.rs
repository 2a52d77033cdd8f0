//! Kenyan MSISDN (phone number) validation

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::error::ValidationError;

static RECHARGE_MSISDN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:254|\+254|0)?([7-9][0-9]{8})$").expect("recharge msisdn pattern compiles")
});

static REGISTRATION_MSISDN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\+?254|0)?[17][0-9]{8}$").expect("registration msisdn pattern compiles")
});

/// The two phone formats the API accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MsisdnPattern {
    /// Recharge recipients: optional `254`/`+254`/`0` prefix, then `[7-9]` and 8 digits.
    Recharge,
    /// Account registration: optional `254`/`+254`/`0` prefix, then `[17]` and 8 digits.
    Registration,
}

impl MsisdnPattern {
    fn regex(self) -> &'static Regex {
        match self {
            MsisdnPattern::Recharge => &RECHARGE_MSISDN,
            MsisdnPattern::Registration => &REGISTRATION_MSISDN,
        }
    }

    pub fn is_match(self, value: &str) -> bool {
        self.regex().is_match(value)
    }
}

/// A phone number that passed validation. Kept exactly as the user typed it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Msisdn(String);

impl Msisdn {
    pub fn parse(value: &str, pattern: MsisdnPattern) -> Result<Self, ValidationError> {
        let value = value.trim();
        if pattern.is_match(value) {
            Ok(Msisdn(value.to_string()))
        } else {
            Err(ValidationError::InvalidMsisdn(value.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Display form used by the transactions table: `+254` followed by the last 9 digits.
pub fn format_phone_number(phone: &str) -> String {
    let chars: Vec<char> = phone.chars().collect();
    let start = chars.len().saturating_sub(9);
    let tail: String = chars[start..].iter().collect();
    format!("+254{}", tail)
}
