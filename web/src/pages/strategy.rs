use dioxus::prelude::*;

use super::record_table;
use crate::api::{ClimateStrategy, DashboardApi};
use crate::components::card::Card;
use crate::components::common::PageTitle;
use crate::stores::use_store;

#[component]
pub fn StrategyPage() -> Element {
    let api = use_context::<DashboardApi>();
    let store = use_store::<ClimateStrategy>();

    let refresh_api = api.clone();
    use_effect(move || store.refresh(refresh_api.clone()));

    rsx! {
        PageTitle { title: "Climate strategy".to_string(), subtitle: Some("Transition plans and climate risks".to_string()) }
        Card {
            title: "Strategies".to_string(),
            {record_table(store, api)}
        }
    }
}
