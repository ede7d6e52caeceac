use std::future::Future;

use dioxus::prelude::*;

use crate::utils::error::AppError;

/// Outcome of a single-value API call.
///
/// `data` keeps the last settled outcome; a superseded call only lowers the
/// in-flight count.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadState<T> {
    pub in_flight: usize,
    pub data: Option<Result<T, AppError>>,
}

impl<T> Default for LoadState<T> {
    fn default() -> Self {
        Self {
            in_flight: 0,
            data: None,
        }
    }
}

impl<T: Clone> LoadState<T> {
    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    pub fn begin(&mut self) {
        self.in_flight += 1;
    }

    pub fn finish(&mut self, result: Result<T, AppError>) {
        self.in_flight = self.in_flight.saturating_sub(1);
        if !matches!(&result, Err(e) if e.is_superseded()) {
            self.data = Some(result);
        }
    }

    pub fn value(&self) -> Option<T> {
        self.data.as_ref()?.as_ref().ok().cloned()
    }

    pub fn error(&self) -> Option<AppError> {
        self.data.as_ref()?.as_ref().err().cloned()
    }
}

pub struct ApiState<T: Clone + 'static> {
    pub state: Signal<LoadState<T>>,
}

impl<T: Clone + 'static> Clone for ApiState<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: Clone + 'static> Copy for ApiState<T> {}

impl<T: Clone + 'static> ApiState<T> {
    pub fn is_loading(&self) -> bool {
        self.state.read().is_loading()
    }

    pub fn error(&self) -> Option<AppError> {
        self.state.read().error()
    }

    pub fn value(&self) -> Option<T> {
        self.state.read().value()
    }

    /// Run `fetch` and store its outcome.
    pub fn load<F>(self, fetch: F)
    where
        F: Future<Output = Result<T, AppError>> + 'static,
    {
        let mut state = self.state;
        spawn(async move {
            state.write().begin();
            let result = fetch.await;
            state.write().finish(result);
        });
    }
}

pub fn use_api_state<T: Clone + 'static>() -> ApiState<T> {
    ApiState {
        state: use_signal(LoadState::default),
    }
}
