//! Injected Wallet Provider
//!
//! Bridges `window.ethereum` (EIP-1193) to the shared `Provider` trait.

use async_trait::async_trait;
use health_diary::{Address, DiaryError, DiaryResult, Provider, DEFAULT_CONTRACT_ADDRESS};
use js_sys::{Function, Promise, Reflect};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

/// Local storage key for a contract address override
const CONTRACT_STORAGE_KEY: &str = "health_diary_contract";

/// The wallet object a browser extension injects into the page
#[derive(Clone)]
pub struct InjectedProvider {
    ethereum: JsValue,
}

impl InjectedProvider {
    /// Look for `window.ethereum`
    pub fn detect() -> Option<Self> {
        let window = web_sys::window()?;
        let ethereum = Reflect::get(&window, &JsValue::from_str("ethereum")).ok()?;
        if ethereum.is_undefined() || ethereum.is_null() {
            return None;
        }
        Some(Self { ethereum })
    }

    fn request_fn(&self) -> DiaryResult<Function> {
        Reflect::get(&self.ethereum, &JsValue::from_str("request"))
            .ok()
            .and_then(|f| f.dyn_into::<Function>().ok())
            .ok_or_else(|| DiaryError::Transport("wallet has no request method".to_string()))
    }
}

#[derive(Serialize)]
struct RequestArguments<'a> {
    method: &'a str,
    params: Value,
}

/// Convert a rejected request into a diary error
///
/// EIP-1193 errors are objects with a numeric `code` and a `message`.
fn provider_error(err: JsValue) -> DiaryError {
    let code = Reflect::get(&err, &JsValue::from_str("code"))
        .ok()
        .and_then(|c| c.as_f64());
    let message = Reflect::get(&err, &JsValue::from_str("message"))
        .ok()
        .and_then(|m| m.as_string())
        .or_else(|| err.as_string());
    classify_provider_error(code, message)
}

/// A coded rejection is an RPC error; anything else failed in transport
fn classify_provider_error(code: Option<f64>, message: Option<String>) -> DiaryError {
    let message = message.unwrap_or_else(|| "unknown wallet error".to_string());
    match code {
        Some(code) => DiaryError::Rpc {
            code: code as i64,
            message,
        },
        None => DiaryError::Transport(message),
    }
}

#[async_trait(?Send)]
impl Provider for InjectedProvider {
    async fn request(&self, method: &str, params: Value) -> DiaryResult<Value> {
        let args = RequestArguments { method, params }
            .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
            .map_err(|e| DiaryError::Transport(format!("bad request arguments: {}", e)))?;

        let promise: Promise = self
            .request_fn()?
            .call1(&self.ethereum, &args)
            .map_err(provider_error)?
            .dyn_into()
            .map_err(|_| DiaryError::Transport("wallet did not return a promise".to_string()))?;

        let result = JsFuture::from(promise).await.map_err(provider_error)?;
        serde_wasm_bindgen::from_value(result).map_err(|e| DiaryError::Decode(e.to_string()))
    }

    async fn sleep(&self, duration: Duration) {
        gloo_timers::future::sleep(duration).await;
    }
}

/// Contract address from local storage, or the deployed default
pub fn contract_address() -> Address {
    let stored = web_sys::window()
        .and_then(|w| w.local_storage().ok().flatten())
        .and_then(|s| s.get_item(CONTRACT_STORAGE_KEY).ok().flatten());
    resolve_contract_address(stored)
}

fn resolve_contract_address(stored: Option<String>) -> Address {
    if let Some(raw) = stored {
        match raw.parse() {
            Ok(address) => return address,
            Err(e) => web_sys::console::warn_1(
                &format!("Ignoring stored contract address {:?}: {}", raw, e).into(),
            ),
        }
    }
    DEFAULT_CONTRACT_ADDRESS
        .parse()
        .expect("default contract address is valid")
}
