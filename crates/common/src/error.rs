use thiserror::Error;

/// Exit code used when the startup configuration is rejected.
pub const CONFIG_EXIT_CODE: i32 = 84;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Malformed command '{line}': {reason}")]
    Protocol { line: String, reason: String },

    #[error("Invalid number '{value}' for field '{field}'")]
    InvalidNumber { field: String, value: String },

    #[error("Candle record has {actual} fields but the candle format names {expected}")]
    SchemaMismatch { expected: usize, actual: usize },

    #[error("Candle format does not contain field '{0}'")]
    MissingField(String),

    #[error("No candle format received before the first candle update")]
    MissingCandleFormat,

    #[error("Invalid currency pair '{0}'")]
    InvalidPair(String),

    #[error("Unknown currency: {0}")]
    UnknownCurrency(String),

    #[error("No history for pair: {0}")]
    UnknownPair(String),

    #[error("Mean of an empty series")]
    EmptySeries,

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Process exit code for a fatal error of this kind.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Config(_) => CONFIG_EXIT_CODE,
            _ => 1,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
