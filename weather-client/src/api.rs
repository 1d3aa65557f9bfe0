use crate::{
    ClientConfig,
    api::http::HttpApi,
    model::{
        CreatedRecord, EntryId, NewRecord, RecordDetail, RecordEntry, RecordUpdate, SearchEntry,
        WeatherResult,
    },
    query::Query,
};
use async_trait::async_trait;
use std::fmt::Debug;
use thiserror::Error;

pub mod http;

/// Failure of a single API call.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Non-2xx response; displays the raw response body.
    #[error("{body}")]
    Status { status: u16, body: String },

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Could not decode response: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// The backend's JSON API as seen by the view-controller.
#[async_trait]
pub trait WeatherApi: Send + Sync + Debug {
    /// `GET /api/weather`
    async fn weather(&self, query: &Query) -> ApiResult<WeatherResult>;

    /// `GET /api/searches`
    async fn searches(&self) -> ApiResult<Vec<SearchEntry>>;

    /// `DELETE /api/searches/{id}`
    async fn delete_search(&self, id: EntryId) -> ApiResult<()>;

    /// `GET /api/records`
    async fn records(&self) -> ApiResult<Vec<RecordEntry>>;

    /// `POST /api/records`
    async fn create_record(&self, record: &NewRecord) -> ApiResult<CreatedRecord>;

    /// `GET /api/records/{id}`
    async fn record(&self, id: EntryId) -> ApiResult<RecordDetail>;

    /// `PUT /api/records/{id}`
    async fn update_record(&self, id: EntryId, update: &RecordUpdate) -> ApiResult<CreatedRecord>;

    /// `DELETE /api/records/{id}`
    async fn delete_record(&self, id: EntryId) -> ApiResult<()>;
}

#[async_trait]
impl<T: WeatherApi + ?Sized> WeatherApi for Box<T> {
    async fn weather(&self, query: &Query) -> ApiResult<WeatherResult> {
        (**self).weather(query).await
    }

    async fn searches(&self) -> ApiResult<Vec<SearchEntry>> {
        (**self).searches().await
    }

    async fn delete_search(&self, id: EntryId) -> ApiResult<()> {
        (**self).delete_search(id).await
    }

    async fn records(&self) -> ApiResult<Vec<RecordEntry>> {
        (**self).records().await
    }

    async fn create_record(&self, record: &NewRecord) -> ApiResult<CreatedRecord> {
        (**self).create_record(record).await
    }

    async fn record(&self, id: EntryId) -> ApiResult<RecordDetail> {
        (**self).record(id).await
    }

    async fn update_record(&self, id: EntryId, update: &RecordUpdate) -> ApiResult<CreatedRecord> {
        (**self).update_record(id, update).await
    }

    async fn delete_record(&self, id: EntryId) -> ApiResult<()> {
        (**self).delete_record(id).await
    }
}

/// Construct the HTTP client from config.
pub fn api_from_config(config: &ClientConfig) -> anyhow::Result<Box<dyn WeatherApi>> {
    config.validate()?;
    let api = HttpApi::new(config)?;
    Ok(Box::new(api))
}

/// Page route showing one past search.
pub fn search_page_path(id: EntryId) -> String {
    format!("/searches/{id}/")
}

/// Page route showing one saved record.
pub fn record_page_path(id: EntryId) -> String {
    format!("/records/{id}/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_displays_raw_body() {
        let err = ApiError::Status { status: 400, body: "missing q or lat/lon".into() };
        assert_eq!(err.to_string(), "missing q or lat/lon");
        assert_eq!(err.status(), Some(400));
        assert_eq!(ApiError::Transport("refused".into()).status(), None);
    }

    #[test]
    fn api_from_config_rejects_invalid_config() {
        let cfg = ClientConfig { base_url: "localhost".into(), ..Default::default() };
        let err = api_from_config(&cfg).unwrap_err();
        assert!(err.to_string().contains("Invalid base_url"));
    }

    #[test]
    fn api_from_config_works_for_defaults() {
        assert!(api_from_config(&ClientConfig::default()).is_ok());
    }

    #[test]
    fn page_paths() {
        assert_eq!(search_page_path(7), "/searches/7/");
        assert_eq!(record_page_path(12), "/records/12/");
    }
}
