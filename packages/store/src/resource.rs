//! # Resource store: the client's copy of a resource list
//!
//! A [`ResourceStore`] holds the full list of one resource type (tasks or loans) for
//! the active user. It has no incremental update path: every mutation is followed by a
//! full reload, so server-computed fields such as a loan's remaining balance are always
//! the server's values.
//!
//! - [`ResourceStore::load`] fetches through a [`Client`] and replaces the list.
//! - [`ResourceStore::apply`] performs the same replace-or-keep step for a fetch the
//!   caller already awaited (UI signals must not be borrowed across an `.await`).
//!
//! A failed load leaves the previous list untouched and hands the error back.

use serde::de::DeserializeOwned;

use crate::client::{Client, LOANS_PATH, TASKS_PATH};
use crate::error::SyncError;
use crate::models::{Id, Loan, Task};
use crate::remote::Remote;

/// An entity type that is listed per user.
pub trait Resource: Clone + DeserializeOwned {
    /// `GET` endpoint returning every entity of the user.
    const LIST_PATH: &'static str;

    fn id(&self) -> Id;
}

impl Resource for Task {
    const LIST_PATH: &'static str = TASKS_PATH;

    fn id(&self) -> Id {
        self.id
    }
}

impl Resource for Loan {
    const LIST_PATH: &'static str = LOANS_PATH;

    fn id(&self) -> Id {
        self.id
    }
}

/// In-memory list of one resource type.
#[derive(Clone, Debug, PartialEq)]
pub struct ResourceStore<T> {
    items: Vec<T>,
    loaded: bool,
    generation: u64,
}

impl<T> Default for ResourceStore<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loaded: false,
            generation: 0,
        }
    }
}

impl<T: Resource> ResourceStore<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn get(&self, id: Id) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether at least one load has succeeded.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Number of successful replacements so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Replace the whole collection.
    pub fn replace(&mut self, items: Vec<T>) {
        self.items = items;
        self.loaded = true;
        self.generation += 1;
    }

    /// Replace on success, keep the current list on failure.
    pub fn apply(&mut self, result: Result<Vec<T>, SyncError>) -> Result<(), SyncError> {
        match result {
            Ok(items) => {
                tracing::info!("loaded {} entries from {}", items.len(), T::LIST_PATH);
                self.replace(items);
                Ok(())
            }
            Err(e) => {
                tracing::error!("loading {} failed: {e}", T::LIST_PATH);
                Err(e)
            }
        }
    }

    /// Fetch the user's list and replace the local copy.
    pub async fn load<R: Remote>(
        &mut self,
        client: &Client<R>,
        user_id: Id,
    ) -> Result<&[T], SyncError> {
        let result = client.list::<T>(user_id).await;
        self.apply(result)?;
        Ok(&self.items)
    }

    /// Drop everything, e.g. on logout.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
