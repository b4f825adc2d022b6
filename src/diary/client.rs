//! Diary Controller
//!
//! Owns the UI state (connection, entries, form) and performs the three
//! user actions. Every mutation goes through a method here; front-ends read
//! snapshots after each action.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, error, info, warn};

use super::{
    Authorization, DiaryContract, DiaryError, DiaryResult, Entry, ErrorKind, FormField, FormState,
    Notice, Notifier, Receipt, WalletAuthorizer,
};
use crate::abi::Address;

const NO_WALLET_MESSAGE: &str = "No wallet found. Install MetaMask to use this app.";
const NOT_CONNECTED_MESSAGE: &str = "Connect your wallet first.";
const ENTRY_ADDED_MESSAGE: &str = "Entry added!";

/// An authorized account and the contract handle signing for it
struct Connection<C> {
    account: Address,
    contract: Rc<C>,
}

/// Controller for the diary front-end
///
/// Methods take `&self`: state sits behind `RefCell`s and no borrow is held
/// across an await, so a second action may start while one is in flight.
pub struct DiaryClient<W: WalletAuthorizer, N: Notifier> {
    wallet: W,
    notifier: N,
    connection: RefCell<Option<Connection<W::Contract>>>,
    entries: RefCell<Vec<Entry>>,
    form: RefCell<FormState>,
}

impl<W: WalletAuthorizer, N: Notifier> DiaryClient<W, N> {
    /// Create a disconnected client
    pub fn new(wallet: W, notifier: N) -> Self {
        Self {
            wallet,
            notifier,
            connection: RefCell::new(None),
            entries: RefCell::new(Vec::new()),
            form: RefCell::new(FormState::default()),
        }
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Connected account, if any
    pub fn account(&self) -> Option<Address> {
        self.connection.borrow().as_ref().map(|c| c.account)
    }

    pub fn is_connected(&self) -> bool {
        self.connection.borrow().is_some()
    }

    /// Entries from the last successful fetch, in contract order
    pub fn entries(&self) -> Vec<Entry> {
        self.entries.borrow().clone()
    }

    /// Current form text
    pub fn form(&self) -> FormState {
        self.form.borrow().clone()
    }

    /// Update one form field (called on every keystroke)
    pub fn set_field(&self, field: FormField, value: impl Into<String>) {
        self.form.borrow_mut().set(field, value);
    }

    fn contract(&self) -> Option<Rc<W::Contract>> {
        self.connection
            .borrow()
            .as_ref()
            .map(|c| Rc::clone(&c.contract))
    }

    /// Ask the wallet for an account, then load its entries
    pub async fn connect(&self) -> DiaryResult<()> {
        match self.wallet.authorize().await {
            Ok(Authorization { account, contract }) => {
                info!(%account, "Wallet connected");
                *self.connection.borrow_mut() = Some(Connection {
                    account,
                    contract: Rc::new(contract),
                });

                // A failed fetch is reported on its own and does not undo the connection
                if self.fetch_entries().await.is_err() {
                    debug!("Initial entry fetch failed");
                }
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Wallet connection failed");
                let message = match (&e, e.kind()) {
                    (DiaryError::NoWallet, _) => NO_WALLET_MESSAGE.to_string(),
                    (_, ErrorKind::Connection) => format!("Wallet access refused: {}", e),
                    (_, ErrorKind::Call) => format!("Wallet connection failed: {}", e),
                };
                self.notifier.notify(Notice::error(message));
                Err(e)
            }
        }
    }

    /// Submit the current form as a new entry and wait for it to be mined
    ///
    /// On success the form is cleared and the list re-fetched. On failure the
    /// form is left exactly as it was.
    pub async fn submit_entry(&self) -> DiaryResult<()> {
        let Some(contract) = self.contract() else {
            warn!("Entry submitted before connecting a wallet");
            self.notifier.notify(Notice::error(NOT_CONNECTED_MESSAGE));
            return Err(DiaryError::NotConnected);
        };

        let form = self.form();
        match Self::send_entry(&contract, &form).await {
            Ok(receipt) => {
                info!(
                    tx = %receipt.transaction_hash,
                    block = receipt.block_number,
                    "Entry confirmed"
                );
                self.notifier.notify(Notice::success(ENTRY_ADDED_MESSAGE));
                self.form.borrow_mut().clear();

                if self.fetch_entries().await.is_err() {
                    debug!("Refresh after submission failed");
                }
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Failed to add entry");
                self.notifier
                    .notify(Notice::error(format!("Failed to add entry: {}", e)));
                Err(e)
            }
        }
    }

    async fn send_entry(contract: &W::Contract, form: &FormState) -> DiaryResult<Receipt> {
        let entry = form.parse()?;
        let tx = contract.add_entry(&entry).await?;
        debug!(%tx, "Entry sent, waiting for confirmation");
        contract.wait_for_confirmation(&tx).await
    }

    /// Replace the displayed list with the contract's current entries
    ///
    /// On failure the previous list is kept.
    pub async fn fetch_entries(&self) -> DiaryResult<()> {
        let Some(contract) = self.contract() else {
            debug!("Skipping fetch, no wallet connected");
            return Err(DiaryError::NotConnected);
        };

        match contract.my_entries().await {
            Ok(entries) => {
                debug!(count = entries.len(), "Fetched entries");
                *self.entries.borrow_mut() = entries;
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Failed to fetch entries");
                self.notifier
                    .notify(Notice::error(format!("Failed to load entries: {}", e)));
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abi::TxHash;
    use crate::diary::{MockDiaryContract, MockNotifier, NewEntry, NoticeLevel};
    use async_trait::async_trait;

    struct FakeWallet {
        outcome: RefCell<Option<DiaryResult<MockDiaryContract>>>,
    }

    impl FakeWallet {
        fn with_contract(contract: MockDiaryContract) -> Self {
            Self {
                outcome: RefCell::new(Some(Ok(contract))),
            }
        }

        fn failing(err: DiaryError) -> Self {
            Self {
                outcome: RefCell::new(Some(Err(err))),
            }
        }
    }

    #[async_trait(?Send)]
    impl WalletAuthorizer for FakeWallet {
        type Contract = MockDiaryContract;

        async fn authorize(&self) -> DiaryResult<Authorization<MockDiaryContract>> {
            let outcome = self
                .outcome
                .borrow_mut()
                .take()
                .unwrap_or(Err(DiaryError::NoWallet));
            outcome.map(|contract| Authorization {
                account: test_account(),
                contract,
            })
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        notices: RefCell<Vec<Notice>>,
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, notice: Notice) {
            self.notices.borrow_mut().push(notice);
        }
    }

    impl RecordingNotifier {
        fn levels(&self) -> Vec<NoticeLevel> {
            self.notices.borrow().iter().map(|n| n.level).collect()
        }
    }

    fn test_account() -> Address {
        "0x00000000000000000000000000000000000000aa".parse().unwrap()
    }

    fn test_hash() -> TxHash {
        TxHash([0x11; 32])
    }

    fn entry(timestamp: u64, note: &str) -> Entry {
        Entry {
            timestamp,
            weight_kg: 82,
            steps: 9000,
            calories_in: 2100,
            calories_out: 2400,
            note: note.to_string(),
        }
    }

    fn fill_form<W: WalletAuthorizer, N: Notifier>(client: &DiaryClient<W, N>) {
        client.set_field(FormField::WeightKg, "82");
        client.set_field(FormField::Steps, "9000");
        client.set_field(FormField::CaloriesIn, "2100");
        client.set_field(FormField::CaloriesOut, "2400");
        client.set_field(FormField::Note, "ok");
    }

    #[tokio::test]
    async fn test_connect_stores_account_and_fetches() {
        let mut contract = MockDiaryContract::new();
        contract
            .expect_my_entries()
            .times(1)
            .returning(|| Ok(vec![entry(1_700_000_000, "first")]));

        let client = DiaryClient::new(
            FakeWallet::with_contract(contract),
            RecordingNotifier::default(),
        );
        client.connect().await.unwrap();

        assert!(client.is_connected());
        assert_eq!(client.account(), Some(test_account()));
        assert_eq!(client.entries(), vec![entry(1_700_000_000, "first")]);
        assert!(client.notifier().levels().is_empty());
    }

    #[tokio::test]
    async fn test_connect_without_wallet_notifies() {
        let mut notifier = MockNotifier::new();
        notifier
            .expect_notify()
            .withf(|n| n.level == NoticeLevel::Error && n.message == NO_WALLET_MESSAGE)
            .times(1)
            .return_const(());

        let client = DiaryClient::new(FakeWallet::failing(DiaryError::NoWallet), notifier);
        let err = client.connect().await.unwrap_err();

        assert_eq!(err, DiaryError::NoWallet);
        assert!(!client.is_connected());
        assert_eq!(client.account(), None);
    }

    #[tokio::test]
    async fn test_connect_declined_is_not_fatal() {
        let client = DiaryClient::new(
            FakeWallet::failing(DiaryError::AuthorizationDeclined("User rejected".into())),
            RecordingNotifier::default(),
        );
        assert!(client.connect().await.is_err());
        assert!(!client.is_connected());
        assert_eq!(client.notifier().levels(), vec![NoticeLevel::Error]);
        assert_eq!(
            client.notifier().notices.borrow()[0].message,
            "Wallet access refused: Authorization declined: User rejected"
        );
    }

    #[tokio::test]
    async fn test_connect_transport_failure_reported_as_connection_failure() {
        let client = DiaryClient::new(
            FakeWallet::failing(DiaryError::Transport("connection refused".into())),
            RecordingNotifier::default(),
        );
        assert!(client.connect().await.is_err());
        assert_eq!(
            client.notifier().notices.borrow()[0].message,
            "Wallet connection failed: Transport error: connection refused"
        );
    }

    #[tokio::test]
    async fn test_submit_parses_form_and_refreshes() {
        let mut contract = MockDiaryContract::new();
        let mut fetches = 0;
        contract.expect_my_entries().times(2).returning(move || {
            fetches += 1;
            if fetches == 1 {
                Ok(Vec::new())
            } else {
                Ok(vec![entry(1_700_000_000, "ok")])
            }
        });
        contract
            .expect_add_entry()
            .withf(|e: &NewEntry| {
                *e == NewEntry {
                    weight_kg: 82,
                    steps: 9000,
                    calories_in: 2100,
                    calories_out: 2400,
                    note: "ok".to_string(),
                }
            })
            .times(1)
            .returning(|_| Ok(test_hash()));
        contract
            .expect_wait_for_confirmation()
            .withf(|tx: &TxHash| *tx == test_hash())
            .times(1)
            .returning(|tx| {
                Ok(Receipt {
                    transaction_hash: *tx,
                    block_number: 42,
                })
            });

        let client = DiaryClient::new(
            FakeWallet::with_contract(contract),
            RecordingNotifier::default(),
        );
        client.connect().await.unwrap();
        assert!(client.entries().is_empty());

        fill_form(&client);
        client.submit_entry().await.unwrap();

        assert!(client.form().is_empty());
        assert_eq!(client.entries(), vec![entry(1_700_000_000, "ok")]);
        assert_eq!(client.notifier().levels(), vec![NoticeLevel::Success]);
    }

    #[tokio::test]
    async fn test_submit_failure_keeps_form() {
        let mut contract = MockDiaryContract::new();
        contract.expect_my_entries().times(1).returning(|| Ok(Vec::new()));
        contract.expect_add_entry().times(1).returning(|_| {
            Err(DiaryError::Rpc {
                code: 4001,
                message: "User denied transaction signature".to_string(),
            })
        });
        contract.expect_wait_for_confirmation().never();

        let client = DiaryClient::new(
            FakeWallet::with_contract(contract),
            RecordingNotifier::default(),
        );
        client.connect().await.unwrap();
        fill_form(&client);
        let before = client.form();

        assert!(client.submit_entry().await.is_err());
        assert_eq!(client.form(), before);
        assert_eq!(client.notifier().levels(), vec![NoticeLevel::Error]);
    }

    #[tokio::test]
    async fn test_submit_reverted_keeps_form() {
        let mut contract = MockDiaryContract::new();
        contract.expect_my_entries().times(1).returning(|| Ok(Vec::new()));
        contract
            .expect_add_entry()
            .times(1)
            .returning(|_| Ok(test_hash()));
        contract
            .expect_wait_for_confirmation()
            .times(1)
            .returning(|tx| Err(DiaryError::TransactionReverted(tx.to_string())));

        let client = DiaryClient::new(
            FakeWallet::with_contract(contract),
            RecordingNotifier::default(),
        );
        client.connect().await.unwrap();
        fill_form(&client);

        let err = client.submit_entry().await.unwrap_err();
        assert!(matches!(err, DiaryError::TransactionReverted(_)));
        assert_eq!(client.form().weight_kg, "82");
    }

    #[tokio::test]
    async fn test_submit_invalid_number_sends_nothing() {
        let mut contract = MockDiaryContract::new();
        contract.expect_my_entries().times(1).returning(|| Ok(Vec::new()));
        contract.expect_add_entry().never();

        let client = DiaryClient::new(
            FakeWallet::with_contract(contract),
            RecordingNotifier::default(),
        );
        client.connect().await.unwrap();
        fill_form(&client);
        client.set_field(FormField::Steps, "nine thousand");

        let err = client.submit_entry().await.unwrap_err();
        assert!(matches!(
            err,
            DiaryError::InvalidField {
                field: FormField::Steps,
                ..
            }
        ));
        assert_eq!(client.form().steps, "nine thousand");
    }

    #[tokio::test]
    async fn test_submit_before_connect_is_rejected() {
        let client = DiaryClient::new(
            FakeWallet::failing(DiaryError::NoWallet),
            RecordingNotifier::default(),
        );
        fill_form(&client);

        assert_eq!(
            client.submit_entry().await.unwrap_err(),
            DiaryError::NotConnected
        );
        assert_eq!(client.form().note, "ok");
        let notices = client.notifier().notices.borrow();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].message, NOT_CONNECTED_MESSAGE);
    }

    #[tokio::test]
    async fn test_fetch_failure_keeps_previous_list() {
        let mut contract = MockDiaryContract::new();
        let mut fetches = 0;
        contract.expect_my_entries().times(2).returning(move || {
            fetches += 1;
            if fetches == 1 {
                Ok(vec![entry(1, "a"), entry(2, "b")])
            } else {
                Err(DiaryError::Transport("connection reset".to_string()))
            }
        });

        let client = DiaryClient::new(
            FakeWallet::with_contract(contract),
            RecordingNotifier::default(),
        );
        client.connect().await.unwrap();
        assert_eq!(client.entries().len(), 2);

        assert!(client.fetch_entries().await.is_err());
        assert_eq!(client.entries(), vec![entry(1, "a"), entry(2, "b")]);
    }

    #[tokio::test]
    async fn test_fetch_without_connection() {
        let client = DiaryClient::new(
            FakeWallet::failing(DiaryError::NoWallet),
            RecordingNotifier::default(),
        );
        assert_eq!(
            client.fetch_entries().await.unwrap_err(),
            DiaryError::NotConnected
        );
        assert!(client.notifier().notices.borrow().is_empty());
    }
}
