use dioxus::prelude::*;
use serde::{Deserialize, Serialize};

use super::{parse_number, record_table};
use crate::api::{rank_by_progress, DashboardApi, KpiGoal};
use crate::components::card::Card;
use crate::components::common::{EmptyState, ErrorState, LoadingState, PageTitle};
use crate::drafts::DraftStore;
use crate::stores::{use_store, Store};
use crate::utils::error::{AppError, Result};

const FORM: &str = "kpi";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KpiForm {
    pub name: String,
    pub unit: String,
    pub baseline: String,
    pub target: String,
    pub current: String,
    pub target_year: String,
}

impl KpiForm {
    pub fn to_goal(&self) -> Result<KpiGoal> {
        let goal = KpiGoal {
            id: None,
            name: self.name.trim().to_string(),
            unit: self.unit.trim().to_string(),
            baseline: parse_number("baseline", &self.baseline)?,
            target: parse_number("target", &self.target)?,
            current: parse_number("current", &self.current)?,
            target_year: parse_number("target year", &self.target_year)?,
        };
        goal.validate()?;
        Ok(goal)
    }
}

#[component]
pub fn KpiPage() -> Element {
    let api = use_context::<DashboardApi>();
    let store = use_store::<KpiGoal>();

    let refresh_api = api.clone();
    use_effect(move || store.refresh(refresh_api.clone()));

    let lagging = use_memo(move || {
        rank_by_progress(&store.state.read().items)
            .into_iter()
            .filter(|(goal, _)| !goal.is_achieved())
            .take(5)
            .map(|(goal, p)| (goal.name, format!("{:.0}", p * 100.0)))
            .collect::<Vec<(String, String)>>()
    });
    let lagging = lagging.read().clone();
    let has_goals = !store.state.read().items.is_empty();

    rsx! {
        PageTitle { title: "KPIs & NetZero".to_string(), subtitle: None }
        Card {
            title: "Least advanced goals".to_string(),
            if !lagging.is_empty() {
                ul {
                    for (name, pct) in lagging {
                        li {
                            "{name}: "
                            progress { max: "100", value: "{pct}" }
                            " {pct}%"
                        }
                    }
                }
            } else if store.is_loading() {
                LoadingState { message: None }
            } else if has_goals {
                EmptyState { message: "All goals reached".to_string() }
            } else {
                EmptyState { message: "No goals yet".to_string() }
            }
        }
        Card {
            title: "New goal".to_string(),
            KpiFormView { store }
        }
        Card {
            title: "Goals".to_string(),
            {record_table(store, api)}
        }
    }
}

#[component]
fn KpiFormView(store: Store<KpiGoal>) -> Element {
    let api = use_context::<DashboardApi>();
    let mut form = use_signal(|| {
        DraftStore::local()
            .load::<KpiForm>(FORM)
            .ok()
            .flatten()
            .map(|draft| draft.data)
            .unwrap_or_default()
    });
    let mut form_error = use_signal(|| None::<AppError>);

    use_effect(move || {
        let current = form.read().clone();
        let drafts = DraftStore::local();
        let result = if current == KpiForm::default() {
            drafts.clear(FORM)
        } else {
            drafts.save(FORM, &current)
        };
        if let Err(e) = result {
            log::warn!("Could not store KPI draft: {e}");
        }
    });

    let submit = move |_: Event<MouseData>| {
        let parsed = form.read().to_goal();
        match parsed {
            Ok(goal) => {
                form_error.set(None);
                store.save(api.clone(), goal, move |_| {
                    if let Err(e) = DraftStore::local().clear(FORM) {
                        log::warn!("Could not clear KPI draft: {e}");
                    }
                    form.set(KpiForm::default());
                });
            }
            Err(e) => form_error.set(Some(e)),
        }
    };

    let current = form.read().clone();
    rsx! {
        div {
            class: "form",
            label { "Name" input { value: "{current.name}", oninput: move |e| form.write().name = e.value() } }
            label { "Unit" input { value: "{current.unit}", oninput: move |e| form.write().unit = e.value() } }
            label { "Baseline" input { r#type: "number", value: "{current.baseline}", oninput: move |e| form.write().baseline = e.value() } }
            label { "Target" input { r#type: "number", value: "{current.target}", oninput: move |e| form.write().target = e.value() } }
            label { "Current" input { r#type: "number", value: "{current.current}", oninput: move |e| form.write().current = e.value() } }
            label { "Target year" input { r#type: "number", value: "{current.target_year}", oninput: move |e| form.write().target_year = e.value() } }
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
