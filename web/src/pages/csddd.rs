use dioxus::prelude::*;

use super::record_table;
use crate::api::{open_assessments, DashboardApi, DueDiligenceAssessment};
use crate::components::card::Card;
use crate::components::common::{EmptyState, LoadingState, PageTitle};
use crate::stores::use_store;

#[component]
pub fn CsdddPage() -> Element {
    let api = use_context::<DashboardApi>();
    let store = use_store::<DueDiligenceAssessment>();

    let refresh_api = api.clone();
    use_effect(move || store.refresh(refresh_api.clone()));

    let flagged = use_memo(move || {
        open_assessments(&store.state.read().items)
            .iter()
            .filter(|a| a.needs_remediation())
            .map(|a| format!("{} ({})", a.supplier, a.country))
            .collect::<Vec<String>>()
    });
    let flagged = flagged.read().clone();

    rsx! {
        PageTitle { title: "CSDDD due diligence".to_string(), subtitle: Some("Supplier human rights and environmental risk".to_string()) }
        Card {
            title: "Open assessments needing remediation".to_string(),
            if store.is_loading() && flagged.is_empty() {
                LoadingState { message: None }
            } else if flagged.is_empty() {
                EmptyState { message: "None".to_string() }
            } else {
                ul {
                    for supplier in flagged {
                        li { "{supplier}" }
                    }
                }
            }
        }
        Card {
            title: "Assessments".to_string(),
            {record_table(store, api)}
        }
    }
}
