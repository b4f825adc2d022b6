//! App Root Component
//!
//! Wires the controller to the injected wallet and provides global state.

use health_diary::{DiaryClient, ProviderWallet};
use leptos::*;
use std::rc::Rc;

use crate::components::{EntryForm, EntryList, Toast, WalletStatus};
use crate::state::{actions, provide_global_state, ToastNotifier, WebDiaryClient};
use crate::wallet::{self, InjectedProvider};

/// Root application component
#[component]
pub fn App() -> impl IntoView {
    let state = provide_global_state();

    let wallet = ProviderWallet::new(InjectedProvider::detect(), wallet::contract_address());
    let client: Rc<WebDiaryClient> = Rc::new(DiaryClient::new(wallet, ToastNotifier::new(state)));
    provide_context(Rc::clone(&client));

    // Ask for the account as soon as the page loads
    actions::connect(client, state);

    view! {
        <div class="p-4 max-w-2xl mx-auto">
            <h1 class="text-2xl font-bold mb-4">"Health Diary"</h1>

            <WalletStatus />
            <EntryForm />
            <EntryList />

            // Toast notifications
            <Toast />
        </div>
    }
}
