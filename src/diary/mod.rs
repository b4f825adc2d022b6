//! Health Diary Client
//!
//! The controller and the capabilities it depends on:
//!
//! - [`WalletAuthorizer`]: asks the wallet for an account and hands back a
//!   contract handle bound to it
//! - [`DiaryContract`]: the two contract entry points plus confirmation
//! - [`Notifier`]: surfaces success and failure messages to the user
//!
//! Front-ends (the CLI, the browser app) plug their own implementations into
//! [`DiaryClient`]; tests substitute fakes.

mod client;
mod error;
mod types;

pub use client::DiaryClient;
pub use error::{DiaryError, DiaryResult, ErrorKind};
pub use types::{Entry, FormField, FormState, NewEntry};

use async_trait::async_trait;

use crate::abi::{Address, TxHash};

/// Address of the deployed diary contract
pub const DEFAULT_CONTRACT_ADDRESS: &str = "0xDe65B2b24558Ef18B923D31E9E6be966b9e3b0Bd";

/// Result of a successful wallet authorization
pub struct Authorization<C> {
    /// Account the user authorized
    pub account: Address,
    /// Contract handle that signs as `account`
    pub contract: C,
}

/// Confirmation of a mined transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub transaction_hash: TxHash,
    pub block_number: u64,
}

/// Wallet capable of authorizing an account
#[async_trait(?Send)]
pub trait WalletAuthorizer {
    type Contract: DiaryContract;

    /// Request account access and return a contract handle for it
    async fn authorize(&self) -> DiaryResult<Authorization<Self::Contract>>;
}

/// The diary contract as seen by the connected account
#[cfg_attr(test, mockall::automock)]
#[async_trait(?Send)]
pub trait DiaryContract {
    /// Send the state-changing `addEntry` call
    async fn add_entry(&self, entry: &NewEntry) -> DiaryResult<TxHash>;

    /// Suspend until the transaction is mined
    async fn wait_for_confirmation(&self, tx: &TxHash) -> DiaryResult<Receipt>;

    /// Read-only `getMyEntries` call
    async fn my_entries(&self) -> DiaryResult<Vec<Entry>>;
}

/// Severity of a user-facing message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// A message for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Sink for user-facing messages
#[cfg_attr(test, mockall::automock)]
pub trait Notifier {
    fn notify(&self, notice: Notice);
}
