use serde::{Deserialize, Serialize};

use super::Record;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Severe,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentStatus {
    Draft,
    InReview,
    Completed,
}

/// Supply-chain due-diligence assessment of one supplier (CSDDD).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DueDiligenceAssessment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub supplier: String,
    pub country: String,
    pub human_rights_risk: RiskLevel,
    pub environmental_risk: RiskLevel,
    pub status: AssessmentStatus,
    #[serde(default)]
    pub remediation_actions: Vec<String>,
}

impl DueDiligenceAssessment {
    pub fn overall_risk(&self) -> RiskLevel {
        self.human_rights_risk.max(self.environmental_risk)
    }

    /// High or severe risk without any remediation action on file.
    pub fn needs_remediation(&self) -> bool {
        self.overall_risk() >= RiskLevel::High && self.remediation_actions.is_empty()
    }
}

impl Record for DueDiligenceAssessment {
    const ENDPOINT: &'static str = "/api/v1/csddd/assessments";
    const LABEL: &'static str = "Due diligence";

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn columns() -> Vec<String> {
        ["Supplier", "Country", "Risk", "Status", "Actions"]
            .map(String::from)
            .to_vec()
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.supplier.clone(),
            self.country.clone(),
            format!("{:?}", self.overall_risk()),
            format!("{:?}", self.status),
            self.remediation_actions.len().to_string(),
        ]
    }
}

/// Assessments not yet completed.
pub fn open_assessments(all: &[DueDiligenceAssessment]) -> Vec<DueDiligenceAssessment> {
    all.iter()
        .filter(|a| a.status != AssessmentStatus::Completed)
        .cloned()
        .collect()
}
