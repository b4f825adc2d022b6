//! Diary error types
//!
//! Every failure the client can hit falls into one of two kinds: the wallet
//! could not be reached or authorized, or a contract call was rejected.

use thiserror::Error;

use super::types::FormField;

/// Errors that can occur while talking to the wallet or the diary contract
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DiaryError {
    /// No injected wallet (or node) is available
    #[error("No wallet found")]
    NoWallet,

    /// The user refused the account request, or no account was returned
    #[error("Authorization declined: {0}")]
    AuthorizationDeclined(String),

    /// An action that needs a contract handle ran before `connect`
    #[error("Wallet is not connected")]
    NotConnected,

    /// A numeric form field is not an integer of the expected width
    #[error("Invalid value for {field}: {value:?}")]
    InvalidField { field: FormField, value: String },

    /// JSON-RPC error returned by the provider
    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// The request never reached the provider or the reply was unusable
    #[error("Transport error: {0}")]
    Transport(String),

    /// The transaction was mined with a failure status
    #[error("Transaction {0} reverted")]
    TransactionReverted(String),

    /// Contract return data or a provider reply could not be decoded
    #[error("Decode error: {0}")]
    Decode(String),
}

/// Coarse classification used when reporting to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Wallet missing or authorization declined
    Connection,
    /// Submission or fetch rejected by the contract or network
    Call,
}

impl DiaryError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            DiaryError::NoWallet | DiaryError::AuthorizationDeclined(_) => ErrorKind::Connection,
            _ => ErrorKind::Call,
        }
    }
}

impl From<serde_json::Error> for DiaryError {
    fn from(err: serde_json::Error) -> Self {
        DiaryError::Decode(err.to_string())
    }
}

impl From<hex::FromHexError> for DiaryError {
    fn from(err: hex::FromHexError) -> Self {
        DiaryError::Decode(err.to_string())
    }
}

/// Result type alias for diary operations
pub type DiaryResult<T> = Result<T, DiaryError>;
