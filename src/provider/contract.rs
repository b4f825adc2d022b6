//! Diary contract calls over a provider

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, trace};

use super::{Provider, DEFAULT_POLL_INTERVAL};
use crate::abi::{self, Address, TxHash};
use crate::diary::{DiaryContract, DiaryError, DiaryResult, Entry, NewEntry, Receipt};

/// Contract handle that sends transactions as `from`
#[derive(Clone)]
pub struct ProviderContract<P> {
    provider: P,
    address: Address,
    from: Address,
    poll_interval: Duration,
}

impl<P: Provider> ProviderContract<P> {
    pub fn new(provider: P, address: Address, from: Address) -> Self {
        Self {
            provider,
            address,
            from,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Builder method: set the receipt polling interval
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Account the handle signs for
    pub fn account(&self) -> Address {
        self.from
    }

    fn call_object(&self, data: &[u8]) -> Value {
        json!({
            "from": self.from,
            "to": self.address,
            "data": abi::to_hex_data(data),
        })
    }
}

/// The receipt fields the client cares about
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawReceipt {
    transaction_hash: String,
    block_number: Option<String>,
    /// Absent on pre-Byzantium chains
    status: Option<String>,
}

#[async_trait(?Send)]
impl<P: Provider> DiaryContract for ProviderContract<P> {
    async fn add_entry(&self, entry: &NewEntry) -> DiaryResult<TxHash> {
        let data = abi::encode_add_entry(entry);
        let hash = self
            .provider
            .request("eth_sendTransaction", json!([self.call_object(&data)]))
            .await?;

        let hash: String = serde_json::from_value(hash)?;
        hash.parse()
    }

    async fn wait_for_confirmation(&self, tx: &TxHash) -> DiaryResult<Receipt> {
        loop {
            let receipt = self
                .provider
                .request("eth_getTransactionReceipt", json!([tx.to_string()]))
                .await?;

            if receipt.is_null() {
                trace!(%tx, "Transaction still pending");
                self.provider.sleep(self.poll_interval).await;
                continue;
            }

            let raw: RawReceipt = serde_json::from_value(receipt)?;
            if raw.status.as_deref() == Some("0x0") {
                return Err(DiaryError::TransactionReverted(raw.transaction_hash));
            }

            let block_number = match raw.block_number.as_deref() {
                Some(n) => abi::parse_quantity(n)?,
                None => {
                    self.provider.sleep(self.poll_interval).await;
                    continue;
                }
            };

            debug!(%tx, block_number, "Transaction mined");
            return Ok(Receipt {
                transaction_hash: raw.transaction_hash.parse()?,
                block_number,
            });
        }
    }

    async fn my_entries(&self) -> DiaryResult<Vec<Entry>> {
        let data = abi::encode_get_my_entries();
        let result = self
            .provider
            .request("eth_call", json!([self.call_object(&data), "latest"]))
            .await?;

        let result: String = serde_json::from_value(result)?;
        abi::decode_entries(&abi::from_hex_data(&result)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::testing::ScriptedProvider;

    const HASH: &str = "0x1111111111111111111111111111111111111111111111111111111111111111";

    fn contract(provider: ScriptedProvider) -> ProviderContract<ScriptedProvider> {
        ProviderContract::new(
            provider,
            "0xDe65B2b24558Ef18B923D31E9E6be966b9e3b0Bd".parse().unwrap(),
            "0x00000000000000000000000000000000000000aa".parse().unwrap(),
        )
    }

    #[tokio::test]
    async fn test_add_entry_sends_transaction() {
        let provider =
            ScriptedProvider::default().reply("eth_sendTransaction", Ok(json!(HASH)));
        let entry = NewEntry {
            weight_kg: 82,
            steps: 9000,
            calories_in: 2100,
            calories_out: 2400,
            note: "ok".to_string(),
        };

        let tx = contract(provider.clone()).add_entry(&entry).await.unwrap();
        assert_eq!(tx.to_string(), HASH);

        let calls = provider.calls.borrow();
        let params = &calls[0].1[0];
        assert_eq!(params["from"], "0x00000000000000000000000000000000000000aa");
        assert_eq!(params["to"], "0xde65b2b24558ef18b923d31e9e6be966b9e3b0bd");
        assert_eq!(
            params["data"].as_str().unwrap(),
            abi::to_hex_data(&abi::encode_add_entry(&entry))
        );
    }

    #[tokio::test]
    async fn test_wait_polls_until_mined() {
        let provider = ScriptedProvider::default()
            .reply("eth_getTransactionReceipt", Ok(Value::Null))
            .reply("eth_getTransactionReceipt", Ok(Value::Null))
            .reply(
                "eth_getTransactionReceipt",
                Ok(json!({
                    "transactionHash": HASH,
                    "blockNumber": "0x2a",
                    "status": "0x1",
                })),
            );

        let tx: TxHash = HASH.parse().unwrap();
        let receipt = contract(provider.clone())
            .wait_for_confirmation(&tx)
            .await
            .unwrap();

        assert_eq!(receipt.block_number, 42);
        assert_eq!(receipt.transaction_hash, tx);
        assert_eq!(*provider.sleeps.borrow(), 2);
    }

    #[tokio::test]
    async fn test_wait_reports_revert() {
        let provider = ScriptedProvider::default().reply(
            "eth_getTransactionReceipt",
            Ok(json!({
                "transactionHash": HASH,
                "blockNumber": "0x2a",
                "status": "0x0",
            })),
        );

        let tx: TxHash = HASH.parse().unwrap();
        let result = contract(provider).wait_for_confirmation(&tx).await;
        assert_eq!(
            result.unwrap_err(),
            DiaryError::TransactionReverted(HASH.to_string())
        );
    }

    #[tokio::test]
    async fn test_my_entries_decodes_call_result() {
        // One entry: timestamp 1700000000, 82 kg, 9000 steps, 2100/2400 kcal, note "ok"
        let words = [
            "0000000000000000000000000000000000000000000000000000000000000020",
            "0000000000000000000000000000000000000000000000000000000000000001",
            "0000000000000000000000000000000000000000000000000000000000000020",
            "000000000000000000000000000000000000000000000000000000006553f100",
            "0000000000000000000000000000000000000000000000000000000000000052",
            "0000000000000000000000000000000000000000000000000000000000002328",
            "0000000000000000000000000000000000000000000000000000000000000834",
            "0000000000000000000000000000000000000000000000000000000000000960",
            "00000000000000000000000000000000000000000000000000000000000000c0",
            "0000000000000000000000000000000000000000000000000000000000000002",
            "6f6b000000000000000000000000000000000000000000000000000000000000",
        ];
        let provider = ScriptedProvider::default()
            .reply("eth_call", Ok(json!(format!("0x{}", words.concat()))));

        let entries = contract(provider.clone()).my_entries().await.unwrap();
        assert_eq!(
            entries,
            vec![Entry {
                timestamp: 1_700_000_000,
                weight_kg: 82,
                steps: 9000,
                calories_in: 2100,
                calories_out: 2400,
                note: "ok".to_string(),
            }]
        );

        let calls = provider.calls.borrow();
        assert_eq!(calls[0].1[0]["data"], "0x13191a6e");
        assert_eq!(calls[0].1[1], "latest");
    }

    #[tokio::test]
    async fn test_my_entries_propagates_rpc_error() {
        let provider = ScriptedProvider::default().reply(
            "eth_call",
            Err(DiaryError::Rpc {
                code: -32000,
                message: "execution reverted".to_string(),
            }),
        );
        assert!(matches!(
            contract(provider).my_entries().await,
            Err(DiaryError::Rpc { code: -32000, .. })
        ));
    }
}
