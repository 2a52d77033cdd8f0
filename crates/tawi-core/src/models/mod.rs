//! Data models for the remote API
//!
//! Request and response bodies, grouped by the screen that uses them. Field
//! names follow the API's camelCase JSON.

mod auth;
mod bulk;
mod recharge;
mod stats;

// Re-export all models for convenient imports
pub use auth::*;
pub use bulk::*;
pub use recharge::*;
pub use stats::*;
