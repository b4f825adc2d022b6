//! Wallet Status Component
//!
//! Connect button while no account is authorized, the address afterwards.

use leptos::*;
use std::rc::Rc;

use crate::state::{actions, GlobalState, WebDiaryClient};

#[component]
pub fn WalletStatus() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let client = use_context::<Rc<WebDiaryClient>>().expect("DiaryClient not found");

    view! {
        {move || match state.account.get() {
            Some(account) => view! {
                <p class="mb-4 text-sm text-gray-600" title=account.to_string()>
                    "Connected: " {account.short()}
                </p>
            }.into_view(),
            None => {
                let client = Rc::clone(&client);
                view! {
                    <button
                        on:click=move |_| actions::connect(Rc::clone(&client), state)
                        class="px-4 py-2 bg-green-600 hover:bg-green-700 text-white rounded mb-4"
                    >
                        "Connect wallet"
                    </button>
                }.into_view()
            }
        }}
    }
}
