use serde::{Deserialize, Serialize};

use super::Record;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitteeMember {
    pub name: String,
    pub role: String,
    #[serde(default)]
    pub independent: bool,
}

/// Board committee with ESG oversight duties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Committee {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    pub mandate: String,
    #[serde(default)]
    pub members: Vec<CommitteeMember>,
    pub meetings_per_year: u32,
}

impl Committee {
    /// Share of independent members, 0.0 for an empty committee.
    pub fn independence_ratio(&self) -> f64 {
        if self.members.is_empty() {
            return 0.0;
        }
        let independent = self.members.iter().filter(|m| m.independent).count();
        independent as f64 / self.members.len() as f64
    }
}

impl Record for Committee {
    const ENDPOINT: &'static str = "/api/v1/governance/committees";
    const LABEL: &'static str = "Governance";

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn columns() -> Vec<String> {
        ["Committee", "Mandate", "Members", "Independent", "Meetings/yr"]
            .map(String::from)
            .to_vec()
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.mandate.clone(),
            self.members.len().to_string(),
            format!("{:.0}%", self.independence_ratio() * 100.0),
            self.meetings_per_year.to_string(),
        ]
    }
}
