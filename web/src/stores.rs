use dioxus::prelude::*;

use crate::api::{DashboardApi, Record};
use crate::utils::error::{AppError, Result};

/// Items of one collection plus the bookkeeping of requests touching it.
///
/// `in_flight` counts started loads that have not settled yet; every load
/// settles exactly once, whatever its outcome, so the count always returns
/// to zero.
#[derive(Debug, Clone, PartialEq)]
pub struct Collection<T> {
    pub items: Vec<T>,
    pub in_flight: usize,
    pub error: Option<AppError>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            in_flight: 0,
            error: None,
        }
    }
}

impl<T: Record> Collection<T> {
    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    pub fn begin_load(&mut self) {
        self.in_flight += 1;
    }

    /// A superseded load leaves the items alone; the request that replaced it
    /// settles on its own.
    pub fn finish_load(&mut self, result: Result<Vec<T>>) {
        self.in_flight = self.in_flight.saturating_sub(1);
        match result {
            Ok(items) => {
                self.items = items;
                self.error = None;
            }
            Err(e) if e.is_superseded() => {}
            Err(e) => {
                log::warn!("Loading {} failed: {e}", T::LABEL);
                self.error = Some(e);
            }
        }
    }

    /// Returns the stored record on success.
    pub fn finish_save(&mut self, result: Result<T>) -> Option<T> {
        match result {
            Ok(saved) => {
                upsert(&mut self.items, saved.clone());
                self.error = None;
                Some(saved)
            }
            Err(e) if e.is_superseded() => None,
            Err(e) => {
                log::warn!("Saving {} failed: {e}", T::LABEL);
                self.error = Some(e);
                None
            }
        }
    }

    pub fn finish_remove(&mut self, id: i64, result: Result<()>) {
        match result {
            Ok(()) => remove_by_id(&mut self.items, id),
            Err(e) if e.is_superseded() => {}
            Err(e) => self.error = Some(e),
        }
    }
}

/// Replace the record with the same id, or append it.
pub fn upsert<T: Record>(items: &mut Vec<T>, record: T) {
    match record
        .id()
        .and_then(|id| items.iter().position(|r| r.id() == Some(id)))
    {
        Some(pos) => items[pos] = record,
        None => items.push(record),
    }
}

pub fn remove_by_id<T: Record>(items: &mut Vec<T>, id: i64) {
    items.retain(|r| r.id() != Some(id));
}

/// Client-side state of one record collection.
pub struct Store<T: Record> {
    pub state: Signal<Collection<T>>,
}

impl<T: Record> Clone for Store<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: Record> Copy for Store<T> {}

impl<T: Record> PartialEq for Store<T> {
    fn eq(&self, other: &Self) -> bool {
        self.state == other.state
    }
}

pub fn use_store<T: Record>() -> Store<T> {
    Store {
        state: use_signal(Collection::default),
    }
}

impl<T: Record> Store<T> {
    pub fn items(&self) -> Vec<T> {
        self.state.read().items.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.read().is_loading()
    }

    pub fn error(&self) -> Option<AppError> {
        self.state.read().error.clone()
    }

    pub fn rows(&self) -> Vec<Vec<String>> {
        self.state.read().items.iter().map(Record::cells).collect()
    }

    pub fn refresh(self, api: DashboardApi) {
        let mut state = self.state;
        spawn(async move {
            state.write().begin_load();
            let result = api.list::<T>().await;
            state.write().finish_load(result);
        });
    }

    /// Create or update `record`, then run `on_saved` with the stored version.
    pub fn save(self, api: DashboardApi, record: T, on_saved: impl FnOnce(&T) + 'static) {
        let mut state = self.state;
        spawn(async move {
            let result = api.save(&record).await;
            if let Some(saved) = state.write().finish_save(result) {
                on_saved(&saved);
            }
        });
    }

    pub fn remove(self, api: DashboardApi, id: i64) {
        let mut state = self.state;
        spawn(async move {
            let result = api.delete::<T>(id).await;
            state.write().finish_remove(id, result);
        });
    }
}
