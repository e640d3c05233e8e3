//! Glue between store types and Dioxus signals.

use chrono::NaiveDate;
use dioxus::prelude::*;
use store::{Completion, Decimal, FlowError, Id, Resource, ResourceStore, SyncError};

use crate::{log_activity, log_error, ActivityLog, LogLevel};

/// Fetch the user's list and replace the store on success.
///
/// The signal is only written after the response arrived, never held across the await.
pub async fn reload<T: Resource + 'static>(
    mut store: Signal<ResourceStore<T>>,
    user_id: Id,
) -> Result<(), SyncError> {
    let client = api::client()?;
    let result = client.list::<T>(user_id).await;
    store.write().apply(result)
}

/// A store signal that loads once `user_id` is known and again whenever it changes.
pub fn use_resource_store<T: Resource + 'static>(
    user_id: Memo<Option<Id>>,
    mut log: Signal<ActivityLog>,
    what: &'static str,
) -> Signal<ResourceStore<T>> {
    let store = use_signal(ResourceStore::<T>::new);
    let _ = use_resource(move || async move {
        let Some(id) = user_id() else {
            return;
        };
        if let Err(e) = reload(store, id).await {
            log_error(&mut log, &format!("Loading {what}"), &e);
        }
    });
    store
}

/// Finish a mutation: on success report `saved` and reload, on failure report the
/// message. A failed form stays open showing the same message.
pub async fn settle<T: Resource + 'static>(
    done: Result<Completion, FlowError>,
    store: Signal<ResourceStore<T>>,
    user_id: Id,
    mut log: Signal<ActivityLog>,
    saved: &str,
) {
    match done {
        Ok(Completion::Saved) => {
            log_activity(&mut log, LogLevel::Success, saved);
            if let Err(e) = reload(store, user_id).await {
                log_error(&mut log, "Refreshing after save", &e);
            }
        }
        Ok(Completion::Failed(message)) => {
            tracing::warn!("mutation failed: {message}");
            log_activity(&mut log, LogLevel::Error, &message);
        }
        Err(e) => tracing::warn!("mutation completed twice: {e}"),
    }
}

/// Amount with the configured currency symbol.
pub fn money(amount: Decimal) -> String {
    store::view::format_currency(amount, &api::config().display.currency_symbol)
}

/// Today's date in the user's local time zone.
#[cfg(target_arch = "wasm32")]
pub fn today() -> NaiveDate {
    let now = js_sys::Date::new_0();
    NaiveDate::from_ymd_opt(now.get_full_year() as i32, now.get_month() + 1, now.get_date())
        .unwrap_or_default()
}

#[cfg(not(target_arch = "wasm32"))]
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}
