//! Global Application State
//!
//! Reactive state management using Leptos signals. The `DiaryClient` owns the
//! real state; these signals hold the snapshot the views render.

use health_diary::{
    Address, DiaryClient, Entry, FormState, Notice, NoticeLevel, Notifier, ProviderWallet,
};
use gloo_timers::callback::Timeout;
use leptos::*;

use crate::wallet::InjectedProvider;

/// The controller as wired up in the browser
pub type WebDiaryClient = DiaryClient<ProviderWallet<InjectedProvider>, ToastNotifier>;

/// Global application state provided to all components
#[derive(Clone, Copy)]
pub struct GlobalState {
    /// Connected account, if any
    pub account: RwSignal<Option<Address>>,
    /// Entries from the last successful fetch
    pub entries: RwSignal<Vec<Entry>>,
    /// Form text
    pub form: RwSignal<FormState>,
    /// Number of actions in flight
    pub pending: RwSignal<u32>,
    /// Error message to display
    pub error: ToastSlot,
    /// Success message (for toasts)
    pub success: ToastSlot,
}

/// One toast line that clears itself after a delay
#[derive(Clone, Copy)]
pub struct ToastSlot {
    pub message: RwSignal<Option<String>>,
    shown: StoredValue<u64>,
    timer: StoredValue<Option<Timeout>>,
}

impl ToastSlot {
    fn new() -> Self {
        Self {
            message: create_rw_signal(None),
            shown: store_value(0),
            timer: store_value(None),
        }
    }

    /// Replace the message and return its generation
    fn replace(&self, message: &str) -> u64 {
        self.shown.update_value(|n| *n += 1);
        self.message.set(Some(message.to_string()));
        self.shown.get_value()
    }

    /// Clear the message if `generation` is still the one on screen
    fn expire(&self, generation: u64) {
        if self.shown.get_value() == generation {
            self.message.set(None);
        }
    }

    /// Show `message` for `millis`, cancelling the previous message's timer
    pub fn show(&self, message: &str, millis: u32) {
        let generation = self.replace(message);
        let slot = *self;
        // Dropping the old handle cancels its timeout
        self.timer
            .set_value(Some(Timeout::new(millis, move || slot.expire(generation))));
    }
}

/// Provide global state to the component tree
pub fn provide_global_state() -> GlobalState {
    let state = GlobalState {
        account: create_rw_signal(None),
        entries: create_rw_signal(Vec::new()),
        form: create_rw_signal(FormState::default()),
        pending: create_rw_signal(0),
        error: ToastSlot::new(),
        success: ToastSlot::new(),
    };

    provide_context(state);
    state
}

impl GlobalState {
    /// Copy the controller's current state into the signals
    pub fn sync(&self, client: &WebDiaryClient) {
        self.account.set(client.account());
        self.entries.set(client.entries());
        self.form.set(client.form());
    }

    pub fn is_busy(&self) -> bool {
        self.pending.get() > 0
    }

    /// Show a success message (auto-clears after timeout)
    pub fn show_success(&self, message: &str) {
        self.success.show(message, 3000);
    }

    /// Show an error message (auto-clears after timeout)
    pub fn show_error(&self, message: &str) {
        self.error.show(message, 5000);
    }
}

/// Routes controller notices to the toast area and the browser console
#[derive(Clone, Copy)]
pub struct ToastNotifier {
    state: GlobalState,
}

impl ToastNotifier {
    pub fn new(state: GlobalState) -> Self {
        Self { state }
    }
}

impl Notifier for ToastNotifier {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Success => self.state.show_success(&notice.message),
            NoticeLevel::Error => {
                web_sys::console::error_1(&notice.message.clone().into());
                self.state.show_error(&notice.message);
            }
        }
    }
}
