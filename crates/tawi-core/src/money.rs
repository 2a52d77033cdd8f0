//! Major/minor currency unit conversion and display formatting.
//!
//! Amounts travel to the API in minor units (cents). Users type and read
//! major units.

use rust_decimal::prelude::*;

use crate::error::ValidationError;

/// `round(amount * 100)`, half away from zero, computed on the multiplied float.
pub fn to_minor_units(amount: f64) -> Result<i64, ValidationError> {
    if !amount.is_finite() {
        return Err(ValidationError::InvalidAmount(format!(
            "Amount must be a number (got {})",
            amount
        )));
    }

    let minor = (amount * 100.0).round();
    if minor > i64::MAX as f64 || minor < i64::MIN as f64 {
        return Err(ValidationError::InvalidAmount(format!(
            "Amount {} is out of range",
            amount
        )));
    }

    Ok(minor as i64)
}

/// Minor units back to major units, rounded to 2 decimal places.
pub fn minor_to_major(minor: Decimal) -> Decimal {
    (minor / Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Display form of a minor-unit amount: `5000` becomes `"50.00"`.
pub fn minor_to_major_string(minor: Decimal) -> String {
    format!("{:.2}", minor_to_major(minor))
}

/// `KES 1,234.56` style rendering of a major-unit amount.
pub fn format_currency(amount: Decimal, currency: &str) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let text = format!("{:.2}", rounded.abs());
    let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };

    format!("{}{} {}.{}", sign, currency, group_thousands(whole), fraction)
}

/// Same as [`format_currency`] for an amount expressed in minor units.
pub fn format_currency_from_minor(minor: Decimal, currency: &str) -> String {
    format_currency(minor_to_major(minor), currency)
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_major_to_minor() {
        assert_eq!(to_minor_units(50.0).unwrap(), 5000);
        assert_eq!(to_minor_units(12.34).unwrap(), 1234);
        assert_eq!(to_minor_units(0.29).unwrap(), 29);
        assert_eq!(to_minor_units(0.0).unwrap(), 0);
    }

    #[test]
    fn rounds_half_away_from_zero() {
        assert_eq!(to_minor_units(0.125).unwrap(), 13);
        assert_eq!(to_minor_units(-0.125).unwrap(), -13);
    }

    #[test]
    fn rejects_non_finite_amounts() {
        assert!(to_minor_units(f64::NAN).is_err());
        assert!(to_minor_units(f64::INFINITY).is_err());
    }

    #[test]
    fn displays_minor_as_major() {
        assert_eq!(minor_to_major_string(Decimal::from(5000)), "50.00");
        assert_eq!(minor_to_major_string(Decimal::from(1)), "0.01");
        assert_eq!(minor_to_major_string(Decimal::from(123456)), "1234.56");
    }

    #[test]
    fn round_trip_within_one_cent() {
        for cents in [0_i64, 1, 5, 99, 100, 1234, 3_500_000] {
            let major = cents as f64 / 100.0;
            let text = format!("{:.2}", major);
            let parsed: f64 = text.parse().unwrap();
            let minor = to_minor_units(parsed).unwrap();
            assert_eq!(minor_to_major_string(Decimal::from(minor)), text);
        }
    }

    #[test]
    fn formats_currency_with_grouping() {
        assert_eq!(format_currency(Decimal::new(123456, 2), "KES"), "KES 1,234.56");
        assert_eq!(format_currency(Decimal::from(35000), "KES"), "KES 35,000.00");
        assert_eq!(format_currency(Decimal::from(5), "KES"), "KES 5.00");
        assert_eq!(format_currency(Decimal::new(-150, 0), "KES"), "-KES 150.00");
        assert_eq!(
            format_currency_from_minor(Decimal::from(100_000_000), "KES"),
            "KES 1,000,000.00"
        );
    }
}
