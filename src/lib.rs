//! # Health Diary
//!
//! Client for a daily health diary kept in an on-chain contract: record
//! weight, steps and calories, then list the entries your account has made.
//!
//! ## Modules
//!
//! - [`diary`]: Entry types, capability traits and the [`DiaryClient`] controller
//! - [`abi`]: Call-data encoding and return-data decoding for the contract
//! - [`provider`]: Wallet and contract capabilities over an EIP-1193 provider
//! - `config`: TOML configuration (native builds)
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use health_diary::provider::{HttpProvider, ProviderWallet};
//! use health_diary::{DiaryClient, FormField, Notice, Notifier};
//! use std::time::Duration;
//!
//! struct Print;
//!
//! impl Notifier for Print {
//!     fn notify(&self, notice: Notice) {
//!         println!("{}", notice.message);
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = HttpProvider::new("http://localhost:8545", Duration::from_secs(30))?;
//!     let wallet = ProviderWallet::new(
//!         Some(provider),
//!         health_diary::DEFAULT_CONTRACT_ADDRESS.parse()?,
//!     );
//!
//!     let client = DiaryClient::new(wallet, Print);
//!     client.connect().await?;
//!
//!     client.set_field(FormField::WeightKg, "82");
//!     client.set_field(FormField::Steps, "9000");
//!     client.set_field(FormField::CaloriesIn, "2100");
//!     client.set_field(FormField::CaloriesOut, "2400");
//!     client.submit_entry().await?;
//!
//!     println!("{} entries", client.entries().len());
//!     Ok(())
//! }
//! ```

pub mod abi;
#[cfg(feature = "native")]
pub mod config;
pub mod diary;
pub mod provider;

// Re-export top-level types for convenience
pub use abi::{Address, TxHash};

pub use diary::{
    Authorization, DiaryClient, DiaryContract, DiaryError, DiaryResult, Entry,
    ErrorKind, FormField, FormState, NewEntry, Notice, NoticeLevel, Notifier, Receipt,
    WalletAuthorizer, DEFAULT_CONTRACT_ADDRESS,
};

pub use provider::{Provider, ProviderContract, ProviderWallet};

#[cfg(feature = "native")]
pub use provider::HttpProvider;

#[cfg(feature = "native")]
pub use config::{generate_default_config, Config, ConfigError, LoggingConfig, NetworkConfig};
