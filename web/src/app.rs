use dioxus::prelude::*;

use crate::api::DashboardApi;
use crate::components::common::ErrorState;
use crate::pages::csddd::CsdddPage;
use crate::pages::emissions::EmissionsPage;
use crate::pages::governance::GovernancePage;
use crate::pages::kpi::KpiPage;
use crate::pages::strategy::StrategyPage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Emissions,
    Csddd,
    Governance,
    Strategy,
    Kpis,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::Emissions,
        Section::Csddd,
        Section::Governance,
        Section::Strategy,
        Section::Kpis,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Section::Emissions => "Emissions",
            Section::Csddd => "CSDDD",
            Section::Governance => "Governance",
            Section::Strategy => "Strategy",
            Section::Kpis => "KPIs & NetZero",
        }
    }
}

#[component]
pub fn App() -> Element {
    match use_hook(DashboardApi::browser) {
        Ok(api) => rsx! { Shell { api } },
        Err(err) => rsx! {
            ErrorState { error: err, title: Some("Could not start the API client".to_string()) }
        },
    }
}

#[component]
fn Shell(api: DashboardApi) -> Element {
    use_context_provider(|| api);
    let mut section = use_signal(|| Section::Emissions);

    rsx! {
        header {
            class: "app-header",
            nav {
                for s in Section::ALL {
                    button {
                        key: "{s:?}",
                        class: if *section.read() == s { "active" } else { "" },
                        onclick: move |_| section.set(s),
                        {s.title()}
                    }
                }
            }
        }
        main {
            match *section.read() {
                Section::Emissions => rsx! { EmissionsPage {} },
                Section::Csddd => rsx! { CsdddPage {} },
                Section::Governance => rsx! { GovernancePage {} },
                Section::Strategy => rsx! { StrategyPage {} },
                Section::Kpis => rsx! { KpiPage {} },
            }
        }
    }
}
