use serde::{Deserialize, Serialize};

use super::Record;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Horizon {
    Short,
    Medium,
    Long,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClimateRiskKind {
    Physical,
    Transition,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClimateRisk {
    pub kind: ClimateRiskKind,
    pub description: String,
    pub horizon: Horizon,
}

/// Climate strategy disclosure: transition plan and identified risks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClimateStrategy {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub title: String,
    pub base_year: i32,
    pub net_zero_year: i32,
    #[serde(default)]
    pub transition_plan: String,
    #[serde(default)]
    pub risks: Vec<ClimateRisk>,
}

impl Record for ClimateStrategy {
    const ENDPOINT: &'static str = "/api/v1/strategy";
    const LABEL: &'static str = "Climate strategy";

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn columns() -> Vec<String> {
        ["Title", "Base year", "Net zero", "Risks"]
            .map(String::from)
            .to_vec()
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.title.clone(),
            self.base_year.to_string(),
            self.net_zero_year.to_string(),
            self.risks.len().to_string(),
        ]
    }
}
