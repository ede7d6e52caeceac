use serde::{Deserialize, Serialize};

use super::{require, DashboardApi, Record};
use crate::utils::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    /// Direct emissions from owned or controlled sources.
    Scope1,
    /// Indirect emissions from purchased energy.
    Scope2,
}

impl Scope {
    pub fn label(&self) -> &'static str {
        match self {
            Scope::Scope1 => "Scope 1",
            Scope::Scope2 => "Scope 2",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmissionRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub site: String,
    pub year: i32,
    pub scope: Scope,
    /// Activity category, e.g. "stationary combustion" or "purchased electricity".
    pub source: String,
    pub tonnes_co2e: f64,
}

impl EmissionRecord {
    pub fn validate(&self) -> Result<()> {
        require(!self.site.trim().is_empty(), "site is required")?;
        require(self.tonnes_co2e >= 0.0, "emissions cannot be negative")?;
        require((1990..=2100).contains(&self.year), "year out of range")
    }
}

impl Record for EmissionRecord {
    const ENDPOINT: &'static str = "/api/v1/emissions";
    const LABEL: &'static str = "Emissions";

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn columns() -> Vec<String> {
        ["Site", "Year", "Scope", "Source", "t CO2e"]
            .map(String::from)
            .to_vec()
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.site.clone(),
            self.year.to_string(),
            self.scope.label().to_string(),
            self.source.clone(),
            format!("{:.2}", self.tonnes_co2e),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmissionSummary {
    pub year: i32,
    pub scope1: f64,
    pub scope2: f64,
}

impl EmissionSummary {
    pub fn total(&self) -> f64 {
        self.scope1 + self.scope2
    }

    /// Sum the given records for `year`; other years are ignored.
    pub fn from_records(year: i32, records: &[EmissionRecord]) -> Self {
        records
            .iter()
            .filter(|r| r.year == year)
            .fold(Self { year, ..Default::default() }, |mut acc, r| {
                match r.scope {
                    Scope::Scope1 => acc.scope1 += r.tonnes_co2e,
                    Scope::Scope2 => acc.scope2 += r.tonnes_co2e,
                }
                acc
            })
    }
}

/// Scope 1/2 emissions API
impl DashboardApi {
    pub async fn emissions_for_year(&self, year: i32) -> Result<Vec<EmissionRecord>> {
        self.list_where(&[("year", year.to_string())]).await
    }

    pub async fn emission_summary(&self, year: i32) -> Result<EmissionSummary> {
        let records = self.emissions_for_year(year).await?;
        Ok(EmissionSummary::from_records(year, &records))
    }
}
