//! Record store abstraction over the `weather_requests` table.
//!
//! Each operation is one independent round trip to the backend: no
//! transactions span calls and nothing is retried.

use crate::models::{NewWeatherRequest, RecordFilters, WeatherRequestPatch, WeatherRequestRecord};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Mutex;

/// Errors reported by a record store
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("No data returned from insert")]
    NoRowReturned,

    #[error("Not found")]
    NotFound,

    #[error("Update failed")]
    UpdateFailed,

    #[error("Delete failed")]
    DeleteFailed,

    #[error("Store backend returned status {status}: {message}")]
    Backend { status: u16, message: String },

    #[error("Store request failed: {0}")]
    Transport(reqwest::Error),

    #[error("Store returned an unreadable body: {0}")]
    Decode(String),
}

/// Persistence for weather request records
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Insert a record and return it with its assigned id
    async fn insert(&self, record: NewWeatherRequest) -> Result<WeatherRequestRecord, StoreError>;

    /// Records matching every filter; empty when nothing matches
    async fn list(&self, filters: &RecordFilters) -> Result<Vec<WeatherRequestRecord>, StoreError>;

    async fn get(&self, id: i64) -> Result<WeatherRequestRecord, StoreError>;

    /// Apply the fields present in `patch` to record `id`
    async fn update(
        &self,
        id: i64,
        patch: &WeatherRequestPatch,
    ) -> Result<WeatherRequestRecord, StoreError>;

    async fn delete(&self, id: i64) -> Result<(), StoreError>;
}

#[derive(Debug, Default)]
struct MemoryTable {
    last_id: i64,
    rows: BTreeMap<i64, WeatherRequestRecord>,
}

/// Process-local table used for development runs and tests
#[derive(Debug, Default)]
pub struct InMemoryStore {
    table: Mutex<MemoryTable>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn table(&self) -> std::sync::MutexGuard<'_, MemoryTable> {
        // A panic while holding the lock cannot leave a row half-written
        self.table.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl RecordStore for InMemoryStore {
    async fn insert(&self, record: NewWeatherRequest) -> Result<WeatherRequestRecord, StoreError> {
        let mut table = self.table();
        table.last_id += 1;
        let stored = WeatherRequestRecord::from_new(table.last_id, record);
        table.rows.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn list(&self, filters: &RecordFilters) -> Result<Vec<WeatherRequestRecord>, StoreError> {
        Ok(self
            .table()
            .rows
            .values()
            .filter(|record| record.matches(filters))
            .cloned()
            .collect())
    }

    async fn get(&self, id: i64) -> Result<WeatherRequestRecord, StoreError> {
        self.table().rows.get(&id).cloned().ok_or(StoreError::NotFound)
    }

    async fn update(
        &self,
        id: i64,
        patch: &WeatherRequestPatch,
    ) -> Result<WeatherRequestRecord, StoreError> {
        let mut table = self.table();
        let record = table.rows.get_mut(&id).ok_or(StoreError::UpdateFailed)?;
        record.apply(patch);
        Ok(record.clone())
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        // Deleting a missing row succeeds, as it does against the hosted table
        self.table().rows.remove(&id);
        Ok(())
    }
}
