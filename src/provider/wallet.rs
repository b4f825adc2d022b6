//! Account authorization over a provider

use async_trait::async_trait;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

use super::{Provider, ProviderContract, DEFAULT_POLL_INTERVAL, METHOD_NOT_FOUND, USER_REJECTED};
use crate::abi::Address;
use crate::diary::{Authorization, DiaryError, DiaryResult, WalletAuthorizer};

/// Wallet backed by a provider that may or may not be present
pub struct ProviderWallet<P> {
    provider: Option<P>,
    contract_address: Address,
    poll_interval: Duration,
}

impl<P: Provider> ProviderWallet<P> {
    /// `provider` is `None` when no wallet was detected
    pub fn new(provider: Option<P>, contract_address: Address) -> Self {
        Self {
            provider,
            contract_address,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Builder method: set the receipt polling interval
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    async fn request_accounts(provider: &P) -> DiaryResult<Vec<Address>> {
        let accounts = match provider.request("eth_requestAccounts", json!([])).await {
            Ok(accounts) => accounts,
            Err(DiaryError::Rpc { code, .. }) if code == METHOD_NOT_FOUND => {
                // Plain nodes expose their unlocked accounts without a prompt
                debug!("eth_requestAccounts unsupported, falling back to eth_accounts");
                provider.request("eth_accounts", json!([])).await?
            }
            Err(DiaryError::Rpc { code, message }) if code == USER_REJECTED => {
                return Err(DiaryError::AuthorizationDeclined(message));
            }
            Err(e) => return Err(e),
        };

        Ok(serde_json::from_value(accounts)?)
    }
}

#[async_trait(?Send)]
impl<P: Provider> WalletAuthorizer for ProviderWallet<P> {
    type Contract = ProviderContract<P>;

    async fn authorize(&self) -> DiaryResult<Authorization<ProviderContract<P>>> {
        let provider = self.provider.as_ref().ok_or(DiaryError::NoWallet)?;

        let account = Self::request_accounts(provider)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| DiaryError::AuthorizationDeclined("no accounts returned".to_string()))?;

        let contract = ProviderContract::new(provider.clone(), self.contract_address, account)
            .poll_interval(self.poll_interval);

        Ok(Authorization { account, contract })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diary::DEFAULT_CONTRACT_ADDRESS;
    use crate::provider::testing::ScriptedProvider;

    const ACCOUNT: &str = "0x00000000000000000000000000000000000000aa";

    fn wallet(provider: Option<ScriptedProvider>) -> ProviderWallet<ScriptedProvider> {
        ProviderWallet::new(provider, DEFAULT_CONTRACT_ADDRESS.parse().unwrap())
    }

    #[tokio::test]
    async fn test_authorize_uses_first_account() {
        let provider = ScriptedProvider::default().reply(
            "eth_requestAccounts",
            Ok(json!([ACCOUNT, "0x00000000000000000000000000000000000000bb"])),
        );

        let auth = wallet(Some(provider)).authorize().await.unwrap();
        assert_eq!(auth.account, ACCOUNT.parse().unwrap());
        assert_eq!(auth.contract.account(), auth.account);
    }

    #[tokio::test]
    async fn test_authorize_without_provider() {
        let result = wallet(None).authorize().await;
        assert_eq!(result.err(), Some(DiaryError::NoWallet));
    }

    #[tokio::test]
    async fn test_authorize_rejected_by_user() {
        let provider = ScriptedProvider::default().reply(
            "eth_requestAccounts",
            Err(DiaryError::Rpc {
                code: USER_REJECTED,
                message: "User rejected the request.".to_string(),
            }),
        );

        let result = wallet(Some(provider)).authorize().await;
        assert_eq!(
            result.err(),
            Some(DiaryError::AuthorizationDeclined(
                "User rejected the request.".to_string()
            ))
        );
    }

    #[tokio::test]
    async fn test_authorize_falls_back_to_eth_accounts() {
        let provider = ScriptedProvider::default()
            .reply(
                "eth_requestAccounts",
                Err(DiaryError::Rpc {
                    code: METHOD_NOT_FOUND,
                    message: "Method not found".to_string(),
                }),
            )
            .reply("eth_accounts", Ok(json!([ACCOUNT])));

        let auth = wallet(Some(provider.clone())).authorize().await.unwrap();
        assert_eq!(auth.account, ACCOUNT.parse().unwrap());
        assert_eq!(provider.calls.borrow().len(), 2);
    }

    #[tokio::test]
    async fn test_authorize_empty_account_list() {
        let provider = ScriptedProvider::default().reply("eth_requestAccounts", Ok(json!([])));
        let result = wallet(Some(provider)).authorize().await;
        assert!(matches!(
            result.err(),
            Some(DiaryError::AuthorizationDeclined(_))
        ));
    }
}
