//! Record store backed by a hosted PostgREST table (the Supabase REST API).

use crate::config::PostgrestConfig;
use crate::models::{NewWeatherRequest, RecordFilters, WeatherRequestPatch, WeatherRequestRecord};
use crate::services::store::{RecordStore, StoreError};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use tracing::{debug, error};

/// Store that talks to `{url}/rest/v1/{table}`
pub struct PostgrestStore {
    http: Client,
    table_url: String,
    api_key: String,
}

impl PostgrestStore {
    pub fn new(config: PostgrestConfig) -> Result<Self, reqwest::Error> {
        let http = Client::builder().build()?;
        Ok(Self {
            http,
            table_url: format!("{}/rest/v1/{}", config.url, config.table),
            api_key: config.api_key,
        })
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    /// Send the request and fail on any non-success status
    async fn send(&self, operation: &str, builder: RequestBuilder) -> Result<Response, StoreError> {
        let response = self
            .authorized(builder)
            .send()
            .await
            .map_err(StoreError::Transport)?;

        let status = response.status();
        debug!(operation, status = status.as_u16(), "Store responded");
        if status.is_success() {
            return Ok(response);
        }

        let message = response.text().await.unwrap_or_default();
        error!(operation, status = status.as_u16(), body = %message, "Store request rejected");
        Err(StoreError::Backend {
            status: status.as_u16(),
            message,
        })
    }

    async fn rows(response: Response) -> Result<Vec<WeatherRequestRecord>, StoreError> {
        response
            .json::<Vec<WeatherRequestRecord>>()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))
    }
}

/// `col=eq.value` pair for PostgREST horizontal filtering
fn eq_param(column: &str, value: impl std::fmt::Display) -> (String, String) {
    (column.to_string(), format!("eq.{value}"))
}

#[async_trait]
impl RecordStore for PostgrestStore {
    async fn insert(&self, record: NewWeatherRequest) -> Result<WeatherRequestRecord, StoreError> {
        let request = self
            .http
            .post(&self.table_url)
            .header("Prefer", "return=representation")
            .json(&record);

        let response = self.send("insert", request).await?;
        Self::rows(response)
            .await?
            .into_iter()
            .next()
            .ok_or(StoreError::NoRowReturned)
    }

    async fn list(&self, filters: &RecordFilters) -> Result<Vec<WeatherRequestRecord>, StoreError> {
        let mut query = vec![("select".to_string(), "*".to_string())];
        query.extend(filters.iter().map(|(column, value)| eq_param(column, value)));

        let response = self
            .send("list", self.http.get(&self.table_url).query(&query))
            .await?;
        Self::rows(response).await
    }

    async fn get(&self, id: i64) -> Result<WeatherRequestRecord, StoreError> {
        let query = [("select".to_string(), "*".to_string()), eq_param("id", id)];

        let response = self
            .send("get", self.http.get(&self.table_url).query(&query))
            .await?;
        Self::rows(response)
            .await?
            .into_iter()
            .next()
            .ok_or(StoreError::NotFound)
    }

    async fn update(
        &self,
        id: i64,
        patch: &WeatherRequestPatch,
    ) -> Result<WeatherRequestRecord, StoreError> {
        let request = self
            .http
            .patch(&self.table_url)
            .query(&[eq_param("id", id)])
            .header("Prefer", "return=representation")
            .json(patch);

        let response = self.send("update", request).await?;
        Self::rows(response)
            .await?
            .into_iter()
            .next()
            .ok_or(StoreError::UpdateFailed)
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let request = self.http.delete(&self.table_url).query(&[eq_param("id", id)]);

        match self.send("delete", request).await {
            Ok(_) => Ok(()),
            Err(StoreError::Backend { .. }) => Err(StoreError::DeleteFailed),
            Err(e) => Err(e),
        }
    }
}
