//! Service PIN validation
//!
//! A PIN is exactly four ASCII digits. It is sent verbatim to the API and
//! never stored or logged.

use std::fmt;

use serde::Serialize;

use crate::error::ValidationError;

/// Required PIN length
pub const PIN_LENGTH: usize = 4;

/// A validated 4-digit PIN. `Debug` output is redacted.
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Pin(String);

impl Pin {
    /// Accepts only values matching `^\d{4}$` (ASCII digits).
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        if value.len() == PIN_LENGTH && value.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Pin(value.to_string()))
        } else {
            Err(ValidationError::InvalidPin)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Pin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Pin(****)")
    }
}

/// Check a change-PIN form: all three must be valid PINs and the new PIN must
/// equal its confirmation. Returns `(current, new)`.
pub fn validate_pin_change(
    current: &str,
    new: &str,
    confirm: &str,
) -> Result<(Pin, Pin), ValidationError> {
    let current = Pin::parse(current)?;
    let new_pin = Pin::parse(new)?;
    let confirm = Pin::parse(confirm)?;

    if new_pin != confirm {
        return Err(ValidationError::PinMismatch);
    }

    Ok((current, new_pin))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_four_digits() {
        let pin = Pin::parse("0420").unwrap();
        assert_eq!(pin.as_str(), "0420");
    }

    #[test]
    fn rejects_malformed_pins() {
        for bad in ["123", "12a4", "12345", "", " 123", "١٢٣٤"] {
            assert_eq!(Pin::parse(bad), Err(ValidationError::InvalidPin), "{bad:?}");
        }
    }

    #[test]
    fn debug_output_is_redacted() {
        let pin = Pin::parse("9876").unwrap();
        assert_eq!(format!("{:?}", pin), "Pin(****)");
    }

    #[test]
    fn serializes_as_plain_string() {
        let pin = Pin::parse("1234").unwrap();
        assert_eq!(serde_json::to_string(&pin).unwrap(), "\"1234\"");
    }

    #[test]
    fn pin_change_requires_matching_confirmation() {
        assert!(validate_pin_change("1111", "2222", "2222").is_ok());
        assert_eq!(
            validate_pin_change("1111", "2222", "3333"),
            Err(ValidationError::PinMismatch)
        );
        assert_eq!(
            validate_pin_change("111", "2222", "2222"),
            Err(ValidationError::InvalidPin)
        );
    }
}
