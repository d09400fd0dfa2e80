use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Environment variable error: {0}")]
    Env(#[from] std::env::VarError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    #[error("Router error: {0}")]
    Router(String),
}

/// Errors surfaced to the presentation layer by a swap session.
///
/// These are values, not failures: the session keeps running and the user can
/// correct the input that caused them.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QuoteError {
    #[error("Invalid amount: {0:?}")]
    InvalidAmountFormat(String),

    #[error("Invalid slippage tolerance: {0:?}")]
    SlippageFormat(String),

    #[error("No route found from {send} to {out}")]
    NoRoute { send: String, out: String },

    #[error("Failed to find currency {0}")]
    CurrencyNotFound(String),

    #[error("Spot price is zero")]
    UndefinedPrice,

    #[error("Insufficient balance: {available} {denom} available")]
    InsufficientBalance { denom: String, available: String },

    #[error("Router failed: {0}")]
    Router(String),
}

impl From<AppError> for QuoteError {
    fn from(error: AppError) -> Self {
        QuoteError::Router(error.to_string())
    }
}
