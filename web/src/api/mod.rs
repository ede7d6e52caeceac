use esg_core::ApiClient;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::browser::{build_time_origin, BrowserContext, LocalStorageToken};
use crate::utils::error::{AppError, Result};

/// A record type served by a CRUD collection under `/api/v1`.
pub trait Record: Clone + PartialEq + Serialize + DeserializeOwned + 'static {
    /// Collection path, e.g. `/api/v1/kpis`.
    const ENDPOINT: &'static str;
    /// Human readable name of the collection.
    const LABEL: &'static str;

    /// Server-assigned id; `None` until the record has been created.
    fn id(&self) -> Option<i64>;

    fn columns() -> Vec<String>;

    fn cells(&self) -> Vec<String>;
}

/// Dashboard-facing API, one shared client for all domains.
#[derive(Clone, Debug)]
pub struct DashboardApi {
    client: ApiClient,
}

/// Two handles are equal when they share the pending-request registry.
impl PartialEq for DashboardApi {
    fn eq(&self, other: &Self) -> bool {
        std::sync::Arc::ptr_eq(self.client.registry(), other.client.registry())
    }
}

impl DashboardApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Client wired to the page: origin from the build or `window.location`,
    /// token from `localStorage`.
    pub fn browser() -> Result<Self> {
        let client = ApiClient::builder()
            .origin_source(build_time_origin())
            .context(BrowserContext)
            .tokens(LocalStorageToken::default())
            .build()?;
        Ok(Self::new(client))
    }

    pub async fn list<T: Record>(&self) -> Result<Vec<T>> {
        Ok(self.client.get_json(T::ENDPOINT).await?)
    }

    pub async fn list_where<T: Record>(&self, params: &[(&str, String)]) -> Result<Vec<T>> {
        let path = format!("{}{}", T::ENDPOINT, query_string(params));
        Ok(self.client.get_json(&path).await?)
    }

    pub async fn fetch<T: Record>(&self, id: i64) -> Result<T> {
        Ok(self.client.get_json(&record_path::<T>(id)).await?)
    }

    pub async fn create<T: Record>(&self, record: &T) -> Result<T> {
        Ok(self.client.post_json(T::ENDPOINT, record).await?)
    }

    pub async fn update<T: Record>(&self, id: i64, record: &T) -> Result<T> {
        Ok(self.client.put_json(&record_path::<T>(id), record).await?)
    }

    pub async fn delete<T: Record>(&self, id: i64) -> Result<()> {
        self.client.delete(&record_path::<T>(id)).await?;
        Ok(())
    }

    /// Create new records, update existing ones.
    pub async fn save<T: Record>(&self, record: &T) -> Result<T> {
        match record.id() {
            Some(id) => self.update(id, record).await,
            None => self.create(record).await,
        }
    }
}

pub fn record_path<T: Record>(id: i64) -> String {
    format!("{}/{}", T::ENDPOINT, id)
}

/// `?a=1&b=x%20y`, or an empty string without parameters.
pub fn query_string(params: &[(&str, String)]) -> String {
    if params.is_empty() {
        return String::new();
    }
    let pairs: Vec<String> = params
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect();
    format!("?{}", pairs.join("&"))
}

pub(crate) fn require(condition: bool, message: &str) -> Result<()> {
    if condition {
        Ok(())
    } else {
        Err(AppError::Validation(message.to_string()))
    }
}

mod csddd;
mod emissions;
mod governance;
mod kpi;
mod strategy;

pub use csddd::*;
pub use emissions::*;
pub use governance::*;
pub use kpi::*;
pub use strategy::*;

#[cfg(test)]
pub(crate) mod testing;
