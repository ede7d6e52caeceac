use chrono::{Datelike, Utc};
use dioxus::prelude::*;
use serde::{Deserialize, Serialize};

use super::{parse_number, record_table};
use crate::api::{DashboardApi, EmissionRecord, EmissionSummary, Scope};
use crate::components::card::Card;
use crate::components::common::{EmptyState, ErrorState, LoadingState, PageTitle};
use crate::drafts::DraftStore;
use crate::hooks::use_api_state;
use crate::stores::{use_store, Store};
use crate::utils::error::{AppError, Result};

const FORM: &str = "emissions";

/// Raw form input; kept as text so half-typed values survive in the draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmissionForm {
    pub site: String,
    pub year: String,
    pub scope: Scope,
    pub source: String,
    pub tonnes_co2e: String,
}

impl Default for EmissionForm {
    fn default() -> Self {
        Self {
            site: String::new(),
            year: Utc::now().year().to_string(),
            scope: Scope::Scope1,
            source: String::new(),
            tonnes_co2e: String::new(),
        }
    }
}

impl EmissionForm {
    pub fn to_record(&self) -> Result<EmissionRecord> {
        let record = EmissionRecord {
            id: None,
            site: self.site.trim().to_string(),
            year: parse_number("year", &self.year)?,
            scope: self.scope,
            source: self.source.trim().to_string(),
            tonnes_co2e: parse_number("t CO2e", &self.tonnes_co2e)?,
        };
        record.validate()?;
        Ok(record)
    }
}

fn parse_scope(value: &str) -> Scope {
    match value {
        "scope2" => Scope::Scope2,
        _ => Scope::Scope1,
    }
}

#[component]
pub fn EmissionsPage() -> Element {
    let api = use_context::<DashboardApi>();
    let store = use_store::<EmissionRecord>();
    let summary = use_api_state::<EmissionSummary>();
    let year = Utc::now().year();

    let refresh_api = api.clone();
    use_effect(move || store.refresh(refresh_api.clone()));

    let summary_api = api.clone();
    use_effect(move || {
        // Reload whenever the records change.
        let _ = store.state.read().items.len();
        let api = summary_api.clone();
        summary.load(async move { api.emission_summary(year).await });
    });

    rsx! {
        PageTitle { title: "Scope 1 & 2 emissions".to_string(), subtitle: None }
        Card {
            title: format!("{year} totals"),
            if let Some(err) = summary.error() {
                ErrorState { error: err, title: None }
            } else if let Some(s) = summary.value() {
                dl {
                    dt { "Scope 1" } dd { {format!("{:.2} t CO2e", s.scope1)} }
                    dt { "Scope 2" } dd { {format!("{:.2} t CO2e", s.scope2)} }
                    dt { "Total" } dd { {format!("{:.2} t CO2e", s.total())} }
                }
            } else if summary.is_loading() {
                LoadingState { message: None }
            } else {
                EmptyState { message: "No totals yet".to_string() }
            }
        }
        Card {
            title: "Add emission".to_string(),
            EmissionFormView { store }
        }
        Card {
            title: "Records".to_string(),
            {record_table(store, api)}
        }
    }
}

#[component]
fn EmissionFormView(store: Store<EmissionRecord>) -> Element {
    let api = use_context::<DashboardApi>();
    let mut form = use_signal(|| {
        DraftStore::local()
            .load::<EmissionForm>(FORM)
            .ok()
            .flatten()
            .map(|draft| draft.data)
            .unwrap_or_default()
    });
    let mut form_error = use_signal(|| None::<AppError>);

    use_effect(move || {
        let current = form.read().clone();
        let drafts = DraftStore::local();
        let result = if current == EmissionForm::default() {
            drafts.clear(FORM)
        } else {
            drafts.save(FORM, &current)
        };
        if let Err(e) = result {
            log::warn!("Could not store emission draft: {e}");
        }
    });

    let submit = move |_: Event<MouseData>| {
        let parsed = form.read().to_record();
        match parsed {
            Ok(record) => {
                form_error.set(None);
                store.save(api.clone(), record, move |_| {
                    if let Err(e) = DraftStore::local().clear(FORM) {
                        log::warn!("Could not clear emission draft: {e}");
                    }
                    form.set(EmissionForm::default());
                });
            }
            Err(e) => form_error.set(Some(e)),
        }
    };

    let current = form.read().clone();
    rsx! {
        div {
            class: "form",
            label { "Site" input { value: "{current.site}", oninput: move |e| form.write().site = e.value() } }
            label { "Year" input { r#type: "number", value: "{current.year}", oninput: move |e| form.write().year = e.value() } }
            label {
                "Scope"
                select {
                    onchange: move |e| form.write().scope = parse_scope(&e.value()),
                    option { value: "scope1", selected: current.scope == Scope::Scope1, "Scope 1" }
                    option { value: "scope2", selected: current.scope == Scope::Scope2, "Scope 2" }
                }
            }
            label { "Source" input { value: "{current.source}", oninput: move |e| form.write().source = e.value() } }
            label { "t CO2e" input { r#type: "number", value: "{current.tonnes_co2e}", oninput: move |e| form.write().tonnes_co2e = e.value() } }
            if let Some(err) = form_error.read().clone() {
                ErrorState { error: err, title: None }
            }
            if let Some(err) = store.error() {
                ErrorState { error: err, title: Some("Save failed".to_string()) }
            }
            button { onclick: submit, "Save" }
        }
    }
}
