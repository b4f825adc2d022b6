//! State Management
//!
//! Reactive mirror of the diary controller and the user actions that drive it.

pub mod actions;
pub mod global;

pub use global::{provide_global_state, GlobalState, ToastNotifier, WebDiaryClient};
