//! UI Components
//!
//! Leptos components for the diary page.

pub mod entry_form;
pub mod entry_list;
pub mod loading;
pub mod toast;
pub mod wallet_status;

pub use entry_form::EntryForm;
pub use entry_list::EntryList;
pub use loading::InlineLoading;
pub use toast::Toast;
pub use wallet_status::WalletStatus;
