use dioxus::prelude::*;

use crate::api::{DashboardApi, Record};
use crate::components::common::{EmptyState, ErrorState, LoadingState};
use crate::components::table_view::TableView;
use crate::stores::Store;

pub mod csddd;
pub mod emissions;
pub mod governance;
pub mod kpi;
pub mod strategy;

/// Loading, error, empty or table view of a store.
fn record_table<T: Record>(store: Store<T>, api: DashboardApi) -> Element {
    let ids: Vec<Option<i64>> = store.state.read().items.iter().map(Record::id).collect();
    let loading = store.is_loading();
    let error = store.error();

    rsx! {
        if let Some(err) = error {
            ErrorState { error: err, title: Some(format!("Could not load {}", T::LABEL)) }
        } else if loading && ids.is_empty() {
            LoadingState { message: None }
        } else if ids.is_empty() {
            EmptyState { message: format!("No {} records yet", T::LABEL) }
        } else {
            TableView {
                headers: T::columns(),
                data: store.rows(),
                on_delete: move |idx: usize| {
                    if let Some(id) = ids.get(idx).copied().flatten() {
                        store.remove(api.clone(), id);
                    }
                },
            }
        }
    }
}

pub(crate) fn parse_number<N: std::str::FromStr>(field: &str, raw: &str) -> crate::utils::error::Result<N> {
    raw.trim()
        .parse()
        .map_err(|_| crate::utils::error::AppError::Validation(format!("{field} must be a number")))
}
