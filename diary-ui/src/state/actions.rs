//! User Actions
//!
//! Each click starts one async chain on the controller and re-syncs the
//! signals when it finishes. Chains may overlap.

use health_diary::{DiaryResult, FormField};
use leptos::*;
use std::future::Future;
use std::rc::Rc;

use super::global::{GlobalState, WebDiaryClient};

fn run<F, Fut>(client: Rc<WebDiaryClient>, state: GlobalState, action: F)
where
    F: FnOnce(Rc<WebDiaryClient>) -> Fut + 'static,
    Fut: Future<Output = DiaryResult<()>> + 'static,
{
    state.pending.update(|n| *n += 1);

    spawn_local(async move {
        // Failures were already reported through the notifier
        let _ = action(Rc::clone(&client)).await;
        state.sync(&client);
        state.pending.update(|n| *n = n.saturating_sub(1));
    });
}

/// Request wallet access and load the account's entries
pub fn connect(client: Rc<WebDiaryClient>, state: GlobalState) {
    run(client, state, |c| async move { c.connect().await });
}

/// Submit the form as a new entry
pub fn submit(client: Rc<WebDiaryClient>, state: GlobalState) {
    run(client, state, |c| async move { c.submit_entry().await });
}

/// Reload the entry list
pub fn refresh(client: Rc<WebDiaryClient>, state: GlobalState) {
    run(client, state, |c| async move { c.fetch_entries().await });
}

/// Record a keystroke in one form field
pub fn edit(client: &WebDiaryClient, state: GlobalState, field: FormField, value: String) {
    client.set_field(field, value);
    state.form.set(client.form());
}
