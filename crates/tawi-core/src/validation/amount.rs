//! Recharge amount limits (major units)

use crate::error::ValidationError;

/// Smallest single recharge, in KES
pub const MIN_RECHARGE_AMOUNT: f64 = 5.0;

/// Largest single recharge, in KES
pub const MAX_RECHARGE_AMOUNT: f64 = 35_000.0;

/// Parse a user-typed amount for a single recharge and enforce the KES 5..=35,000 window.
pub fn validate_recharge_amount(value: &str) -> Result<f64, ValidationError> {
    let amount = parse_amount(value)
        .filter(|a| (MIN_RECHARGE_AMOUNT..=MAX_RECHARGE_AMOUNT).contains(a))
        .ok_or_else(|| {
            ValidationError::InvalidAmount(
                "Amount must be between KES 5 and KES 35,000".to_string(),
            )
        })?;
    Ok(amount)
}

/// Airtime transfers only require a positive amount.
pub fn validate_airtime_amount(value: &str) -> Result<f64, ValidationError> {
    parse_amount(value)
        .filter(|a| *a > 0.0)
        .ok_or_else(|| ValidationError::InvalidAmount("Please enter a valid amount".to_string()))
}

fn parse_amount(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|a| a.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recharge_window_is_inclusive() {
        assert_eq!(validate_recharge_amount("5").unwrap(), 5.0);
        assert_eq!(validate_recharge_amount("35000").unwrap(), 35_000.0);
        assert!(validate_recharge_amount("4.99").is_err());
        assert!(validate_recharge_amount("35000.01").is_err());
        assert!(validate_recharge_amount("ten").is_err());
    }

    #[test]
    fn airtime_requires_positive_amount() {
        assert_eq!(validate_airtime_amount(" 20 ").unwrap(), 20.0);
        assert!(validate_airtime_amount("0").is_err());
        assert!(validate_airtime_amount("-3").is_err());
        assert!(validate_airtime_amount("NaN").is_err());
    }
}
