//! Entry Form Component
//!
//! Inputs for one day's numbers and a note, plus the submit button.

use health_diary::FormField;
use leptos::*;
use std::rc::Rc;

use super::InlineLoading;
use crate::state::{actions, GlobalState, WebDiaryClient};

/// Daily entry form
#[component]
pub fn EntryForm() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let client = use_context::<Rc<WebDiaryClient>>().expect("DiaryClient not found");

    // No in-flight guard: a second click starts a second submission
    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        actions::submit(Rc::clone(&client), state);
    };

    view! {
        <form on:submit=on_submit class="mb-6 space-y-2">
            <NumberInput field=FormField::WeightKg />
            <NumberInput field=FormField::Steps />
            <NumberInput field=FormField::CaloriesIn />
            <NumberInput field=FormField::CaloriesOut />
            <NoteInput />

            <div class="flex items-center space-x-3">
                <button
                    type="submit"
                    class="px-4 py-2 bg-blue-600 hover:bg-blue-700 text-white rounded"
                >
                    "Submit Entry"
                </button>
                {move || state.is_busy().then(|| view! { <InlineLoading /> })}
            </div>
        </form>
    }
}

#[component]
fn NumberInput(field: FormField) -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let client = use_context::<Rc<WebDiaryClient>>().expect("DiaryClient not found");

    view! {
        <input
            type="text"
            inputmode="numeric"
            placeholder=field.placeholder()
            prop:value=move || state.form.with(|f| f.get(field).to_string())
            on:input=move |ev| actions::edit(&client, state, field, event_target_value(&ev))
            class="w-full p-2 border rounded"
        />
    }
}

#[component]
fn NoteInput() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let client = use_context::<Rc<WebDiaryClient>>().expect("DiaryClient not found");

    view! {
        <textarea
            placeholder=FormField::Note.placeholder()
            prop:value=move || state.form.with(|f| f.note.clone())
            on:input=move |ev| {
                actions::edit(&client, state, FormField::Note, event_target_value(&ev))
            }
            class="w-full p-2 border rounded"
        />
    }
}
