//! Shared error type across tsvault crates.

use thiserror::Error;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// A required query parameter was absent.
    MissingParameter,
    /// Field name outside `field1|field2|field3`.
    InvalidField,
    /// Date bound did not parse.
    InvalidDateFormat,
    /// Query string could not be decoded (e.g. a repeated parameter).
    InvalidQuery,
    /// Query matched zero records.
    NoData,
    /// Backing store unreachable or failed.
    StorageUnavailable,
    /// Configuration rejected at startup.
    BadConfig,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    /// String representation used in JSON responses.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::MissingParameter => "MISSING_PARAMETER",
            ClientCode::InvalidField => "INVALID_FIELD",
            ClientCode::InvalidDateFormat => "INVALID_DATE_FORMAT",
            ClientCode::InvalidQuery => "INVALID_QUERY",
            ClientCode::NoData => "NO_DATA",
            ClientCode::StorageUnavailable => "STORAGE_UNAVAILABLE",
            ClientCode::BadConfig => "BAD_CONFIG",
            ClientCode::Internal => "INTERNAL",
        }
    }

    /// Validation failures are detected before the store is touched.
    pub fn is_validation(self) -> bool {
        matches!(
            self,
            ClientCode::MissingParameter
                | ClientCode::InvalidField
                | ClientCode::InvalidDateFormat
                | ClientCode::InvalidQuery
        )
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, TsVaultError>;

/// Unified error type used by core and gateway.
#[derive(Debug, Error)]
pub enum TsVaultError {
    #[error("Missing required parameters: {0}")]
    MissingParameter(String),
    #[error("Invalid field name '{0}'. Must be field1, field2, or field3")]
    InvalidField(String),
    #[error("Invalid date format '{0}'. Use YYYY-MM-DD")]
    InvalidDateFormat(String),
    #[error("Invalid query string: {0}")]
    InvalidQuery(String),
    /// A range scan matched nothing.
    #[error("No data found in the specified range")]
    EmptyRange,
    /// Nothing to aggregate.
    #[error("No data found")]
    EmptyResult,
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),
    #[error("invalid config: {0}")]
    Config(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl TsVaultError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            TsVaultError::MissingParameter(_) => ClientCode::MissingParameter,
            TsVaultError::InvalidField(_) => ClientCode::InvalidField,
            TsVaultError::InvalidDateFormat(_) => ClientCode::InvalidDateFormat,
            TsVaultError::InvalidQuery(_) => ClientCode::InvalidQuery,
            TsVaultError::EmptyRange | TsVaultError::EmptyResult => ClientCode::NoData,
            TsVaultError::StorageUnavailable(_) => ClientCode::StorageUnavailable,
            TsVaultError::Config(_) => ClientCode::BadConfig,
            TsVaultError::Internal(_) => ClientCode::Internal,
        }
    }
}
