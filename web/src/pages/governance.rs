use dioxus::prelude::*;

use super::record_table;
use crate::api::{Committee, DashboardApi};
use crate::components::card::Card;
use crate::components::common::PageTitle;
use crate::stores::use_store;

#[component]
pub fn GovernancePage() -> Element {
    let api = use_context::<DashboardApi>();
    let store = use_store::<Committee>();

    let refresh_api = api.clone();
    use_effect(move || store.refresh(refresh_api.clone()));

    let low_independence: Vec<String> = store
        .items()
        .iter()
        .filter(|c| !c.members.is_empty() && c.independence_ratio() < 0.5)
        .map(|c| c.name.clone())
        .collect();

    rsx! {
        PageTitle { title: "Governance".to_string(), subtitle: Some("Committees with ESG oversight".to_string()) }
        if !low_independence.is_empty() {
            Card {
                title: "Below 50% independent members".to_string(),
                ul {
                    for name in low_independence {
                        li { "{name}" }
                    }
                }
            }
        }
        Card {
            title: "Committees".to_string(),
            {record_table(store, api)}
        }
    }
}
