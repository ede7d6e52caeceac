use serde::{Deserialize, Serialize};

use super::{require, Record};
use crate::utils::error::Result;

/// KPI or NetZero goal tracked against a baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiGoal {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    pub unit: String,
    pub baseline: f64,
    pub target: f64,
    pub current: f64,
    pub target_year: i32,
}

impl KpiGoal {
    /// Fraction of the way from baseline to target, clamped to `0.0..=1.0`.
    ///
    /// Works for reduction goals (target below baseline) as well as growth
    /// goals. A goal whose target equals its baseline counts as reached.
    pub fn progress(&self) -> f64 {
        let span = self.target - self.baseline;
        if span == 0.0 {
            return 1.0;
        }
        ((self.current - self.baseline) / span).clamp(0.0, 1.0)
    }

    pub fn is_achieved(&self) -> bool {
        self.progress() >= 1.0
    }

    pub fn validate(&self) -> Result<()> {
        require(!self.name.trim().is_empty(), "name is required")?;
        require(!self.unit.trim().is_empty(), "unit is required")?;
        require(
            self.baseline.is_finite() && self.target.is_finite() && self.current.is_finite(),
            "values must be numbers",
        )
    }
}

impl Record for KpiGoal {
    const ENDPOINT: &'static str = "/api/v1/kpis";
    const LABEL: &'static str = "KPIs & NetZero";

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn columns() -> Vec<String> {
        ["KPI", "Baseline", "Current", "Target", "Year", "Progress"]
            .map(String::from)
            .to_vec()
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            format!("{} {}", self.baseline, self.unit),
            format!("{} {}", self.current, self.unit),
            format!("{} {}", self.target, self.unit),
            self.target_year.to_string(),
            format!("{:.0}%", self.progress() * 100.0),
        ]
    }
}

/// Goals with their progress, least advanced first.
pub fn rank_by_progress(goals: &[KpiGoal]) -> Vec<(KpiGoal, f64)> {
    let mut with_progress: Vec<(KpiGoal, f64)> = goals
        .iter()
        .map(|g| (g.clone(), g.progress()))
        .collect();
    with_progress.sort_by(|a, b| a.1.total_cmp(&b.1));
    with_progress
}

#[cfg(test)]
mod tests {
    use super::*;

    fn goal(baseline: f64, target: f64, current: f64) -> KpiGoal {
        KpiGoal {
            id: None,
            name: "Scope 1+2".to_string(),
            unit: "t".to_string(),
            baseline,
            target,
            current,
            target_year: 2030,
        }
    }

    #[test]
    fn test_reduction_goal_progress() {
        assert_eq!(goal(1000.0, 0.0, 750.0).progress(), 0.25);
        assert_eq!(goal(1000.0, 0.0, 1200.0).progress(), 0.0);
        assert!(goal(1000.0, 0.0, -5.0).is_achieved());
    }

    #[test]
    fn test_growth_goal_progress() {
        assert_eq!(goal(20.0, 100.0, 60.0).progress(), 0.5);
        assert_eq!(goal(20.0, 100.0, 150.0).progress(), 1.0);
    }

    #[test]
    fn test_flat_goal_counts_as_reached() {
        assert!(goal(5.0, 5.0, 0.0).is_achieved());
    }

    #[test]
    fn test_rank_by_progress_least_advanced_first() {
        let ranked = rank_by_progress(&[
            goal(0.0, 100.0, 80.0),
            goal(0.0, 100.0, 10.0),
            goal(0.0, 100.0, 50.0),
        ]);
        let order: Vec<f64> = ranked.iter().map(|(_, p)| *p).collect();
        assert_eq!(order, vec![0.1, 0.5, 0.8]);
    }

    #[test]
    fn test_validate_rejects_nan() {
        assert!(goal(1.0, 0.0, f64::NAN).validate().is_err());
        assert!(goal(1.0, 0.0, 0.5).validate().is_ok());
    }
}
