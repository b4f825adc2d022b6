//! Health Diary Front-end
//!
//! Browser app built with Leptos (WASM).
//!
//! # Features
//!
//! - Connect an injected wallet (MetaMask or any EIP-1193 provider)
//! - Submit a daily entry: weight, steps, calories in/out, note
//! - List the entries recorded by the connected account
//!
//! # Architecture
//!
//! This is a client-side rendered (CSR) Leptos application that compiles to
//! WebAssembly. It drives the shared `DiaryClient` controller through the
//! `window.ethereum` provider and mirrors its state into signals.

use leptos::*;

mod app;
mod components;
mod state;
mod wallet;

fn main() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();

    // Mount the app to the document body
    mount_to_body(|| view! { <app::App /> });
}
