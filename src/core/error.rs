//! Error handling - typed, recoverable business-rule failures

use rust_decimal::Decimal;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Nivesh error hierarchy.
///
/// Every variant is recoverable: a failed operation leaves ledger state
/// untouched and the caller may resubmit.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Registration/identity errors (invalid email, duplicate account, ...)
    #[error("Registration error: {0}")]
    Registration(String),

    /// Zero or negative quantity/amount/price where a positive value is required
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Order or withdrawal exceeds the available cash balance
    #[error("insufficient funds: required {required}, available {available}")]
    InsufficientFunds { required: Decimal, available: Decimal },

    /// Sell quantity exceeds the held position quantity
    #[error("insufficient quantity: requested {requested}, held {held}")]
    InsufficientQuantity { requested: Decimal, held: Decimal },

    /// Redemption units exceed the held fund units
    #[error("insufficient units: requested {requested}, held {held}")]
    InsufficientUnits { requested: Decimal, held: Decimal },

    /// No position exists for the symbol/exchange pair
    #[error("no position in {0}")]
    NoPosition(String),

    /// No holding exists for the fund
    #[error("no holding in {0}")]
    NoHolding(String),

    /// OTP presented after its validity window elapsed
    #[error("OTP expired")]
    OtpExpired,

    /// OTP does not match the live session (or no session exists)
    #[error("OTP mismatch")]
    OtpMismatch,
}
