//! Validation modules

pub mod amount;
pub mod msisdn;
pub mod pin;

pub use amount::{
    validate_airtime_amount, validate_recharge_amount, MAX_RECHARGE_AMOUNT, MIN_RECHARGE_AMOUNT,
};
pub use msisdn::{format_phone_number, Msisdn, MsisdnPattern};
pub use pin::{validate_pin_change, Pin};
