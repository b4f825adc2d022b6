//! Entry List Component
//!
//! Shows the connected account's entries in the order the contract returns them.

use health_diary::Entry;
use leptos::*;
use std::rc::Rc;

use crate::state::{actions, GlobalState, WebDiaryClient};

#[component]
pub fn EntryList() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let client = use_context::<Rc<WebDiaryClient>>().expect("DiaryClient not found");

    view! {
        <div>
            <div class="flex items-center justify-between mb-2">
                <h2 class="text-xl font-semibold">"Your Entries:"</h2>
                {move || state.account.get().is_some().then(|| {
                    let client = Rc::clone(&client);
                    view! {
                        <button
                            on:click=move |_| actions::refresh(Rc::clone(&client), state)
                            class="text-sm text-blue-600 hover:underline"
                        >
                            "Refresh"
                        </button>
                    }
                })}
            </div>

            {move || {
                let entries = state.entries.get();
                if entries.is_empty() {
                    view! { <p>"No entries yet."</p> }.into_view()
                } else {
                    view! {
                        <ul class="space-y-3">
                            {entries.into_iter()
                                .map(|entry| view! { <EntryCard entry=entry /> })
                                .collect_view()}
                        </ul>
                    }.into_view()
                }
            }}
        </div>
    }
}

#[component]
fn EntryCard(entry: Entry) -> impl IntoView {
    let balance = entry.calorie_balance();
    let balance_class = if balance >= 0 { "text-green-600" } else { "text-red-600" };

    view! {
        <li class="border p-3 rounded">
            <p><strong>"Date: "</strong>{local_date(&entry)}</p>
            <p><strong>"Weight: "</strong>{entry.weight_kg}" kg"</p>
            <p><strong>"Steps: "</strong>{entry.steps}</p>
            <p><strong>"Calories In: "</strong>{entry.calories_in}</p>
            <p>
                <strong>"Calories Out: "</strong>{entry.calories_out}
                <span class=format!("ml-2 text-xs {}", balance_class)>
                    {format!("({:+})", balance)}
                </span>
            </p>
            {(!entry.note.is_empty()).then(|| view! {
                <p><strong>"Note: "</strong>{entry.note.clone()}</p>
            })}
        </li>
    }
}

/// Entry date in the browser's locale and time zone
fn local_date(entry: &Entry) -> String {
    i64::try_from(entry.timestamp)
        .ok()
        .and_then(|secs| chrono::DateTime::from_timestamp(secs, 0))
        .map(|dt| dt.with_timezone(&chrono::Local).format("%x").to_string())
        .unwrap_or_else(|| entry.date_label())
}
