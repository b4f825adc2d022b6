//! Ethereum Provider Layer
//!
//! A [`Provider`] is anything that answers EIP-1193 style `request` calls:
//! an injected browser wallet or a JSON-RPC node over HTTP. The wallet and
//! contract capabilities are implemented once on top of it.

mod contract;
#[cfg(feature = "native")]
mod http;
mod wallet;

pub use contract::ProviderContract;
#[cfg(feature = "native")]
pub use http::HttpProvider;
pub use wallet::ProviderWallet;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

use crate::diary::{DiaryError, DiaryResult};

/// EIP-1193: the user rejected the request
pub const USER_REJECTED: i64 = 4001;

/// JSON-RPC: the method does not exist
pub const METHOD_NOT_FOUND: i64 = -32601;

/// Default interval between receipt polls
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1000);

/// Request/response access to an Ethereum node or wallet
#[async_trait(?Send)]
pub trait Provider: Clone {
    /// Send one JSON-RPC request and return its `result`
    async fn request(&self, method: &str, params: Value) -> DiaryResult<Value>;

    /// Wait before polling again
    async fn sleep(&self, duration: Duration);
}

/// Error object carried by a JSON-RPC or EIP-1193 failure
#[derive(Debug, Clone, Deserialize)]
pub struct RpcErrorObject {
    pub code: i64,
    #[serde(default)]
    pub message: String,
}

impl From<RpcErrorObject> for DiaryError {
    fn from(err: RpcErrorObject) -> Self {
        DiaryError::Rpc {
            code: err.code,
            message: err.message,
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted provider shared by the wallet and contract tests

    use super::*;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    pub struct ScriptedProvider {
        replies: Rc<RefCell<VecDeque<(String, DiaryResult<Value>)>>>,
        pub calls: Rc<RefCell<Vec<(String, Value)>>>,
        pub sleeps: Rc<RefCell<u32>>,
    }

    impl ScriptedProvider {
        pub fn reply(self, method: &str, result: DiaryResult<Value>) -> Self {
            self.replies
                .borrow_mut()
                .push_back((method.to_string(), result));
            self
        }
    }

    #[async_trait(?Send)]
    impl Provider for ScriptedProvider {
        async fn request(&self, method: &str, params: Value) -> DiaryResult<Value> {
            self.calls.borrow_mut().push((method.to_string(), params));
            let (expected, result) = self
                .replies
                .borrow_mut()
                .pop_front()
                .expect("unexpected provider request");
            assert_eq!(expected, method);
            result
        }

        async fn sleep(&self, _duration: Duration) {
            *self.sleeps.borrow_mut() += 1;
        }
    }
}
