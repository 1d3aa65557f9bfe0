use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::{
    ClientConfig,
    model::{
        CreatedRecord, EntryId, NewRecord, RecordDetail, RecordEntry, RecordUpdate, SearchEntry,
        WeatherResult,
    },
    query::Query,
};

use super::{ApiError, ApiResult, WeatherApi};

/// `reqwest`-backed client for the weather web app's JSON API.
#[derive(Debug, Clone)]
pub struct HttpApi {
    base_url: String,
    search_limit: Option<u32>,
    http: Client,
}

impl HttpApi {
    pub fn new(config: &ClientConfig) -> ApiResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            search_limit: config.search_limit,
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        debug!(%method, path, "api request");
        self.http.request(method, format!("{}{}", self.base_url, path))
    }

    /// Send, then hand back the body of a 2xx response. Any other status
    /// becomes `ApiError::Status` carrying the body verbatim.
    async fn send(&self, request: RequestBuilder) -> ApiResult<String> {
        let res = request.send().await.map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = res.status();
        let body = res.text().await.map_err(|e| ApiError::Transport(e.to_string()))?;

        if !status.is_success() {
            debug!(status = status.as_u16(), "api request rejected");
            return Err(ApiError::Status { status: status.as_u16(), body });
        }

        Ok(body)
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> ApiResult<T> {
        let body = self.send(request).await?;
        serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[async_trait]
impl WeatherApi for HttpApi {
    #[instrument(skip(self, query), fields(query = %query))]
    async fn weather(&self, query: &Query) -> ApiResult<WeatherResult> {
        let request = self.request(Method::GET, "/api/weather").query(&query.params());
        self.send_json(request).await
    }

    #[instrument(skip(self))]
    async fn searches(&self) -> ApiResult<Vec<SearchEntry>> {
        let mut request = self.request(Method::GET, "/api/searches");
        if let Some(limit) = self.search_limit {
            request = request.query(&[("limit", limit)]);
        }
        self.send_json(request).await
    }

    #[instrument(skip(self))]
    async fn delete_search(&self, id: EntryId) -> ApiResult<()> {
        let request = self.request(Method::DELETE, &format!("/api/searches/{id}"));
        self.send(request).await.map(drop)
    }

    #[instrument(skip(self))]
    async fn records(&self) -> ApiResult<Vec<RecordEntry>> {
        let request = self.request(Method::GET, "/api/records");
        self.send_json(request).await
    }

    #[instrument(skip(self, record), fields(location = %record.location))]
    async fn create_record(&self, record: &NewRecord) -> ApiResult<CreatedRecord> {
        let request = self.request(Method::POST, "/api/records").json(record);
        self.send_json(request).await
    }

    #[instrument(skip(self))]
    async fn record(&self, id: EntryId) -> ApiResult<RecordDetail> {
        let request = self.request(Method::GET, &format!("/api/records/{id}"));
        self.send_json(request).await
    }

    #[instrument(skip(self, update))]
    async fn update_record(&self, id: EntryId, update: &RecordUpdate) -> ApiResult<CreatedRecord> {
        let request = self.request(Method::PUT, &format!("/api/records/{id}")).json(update);
        self.send_json(request).await
    }

    #[instrument(skip(self))]
    async fn delete_record(&self, id: EntryId) -> ApiResult<()> {
        let request = self.request(Method::DELETE, &format!("/api/records/{id}"));
        self.send(request).await.map(drop)
    }
}
