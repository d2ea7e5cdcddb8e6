//! Persisted weather request records and the shapes used to write them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Column names a list filter may reference
pub const FILTERABLE_COLUMNS: &[&str] = &[
    "id",
    "user_name",
    "location_input",
    "date_",
    "type",
    "start_date",
    "end_date",
];

/// How the weather payload of a record was obtained
///
/// Rows written by other clients may carry any tag; those are kept verbatim
/// in `Other` so reading the table never fails on them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RecordType {
    /// Provider "current weather" lookup
    Current,
    /// One day of a historical date range
    History,
    Other(String),
}

impl RecordType {
    pub fn as_str(&self) -> &str {
        match self {
            RecordType::Current => "current",
            RecordType::History => "history",
            RecordType::Other(tag) => tag,
        }
    }
}

impl From<String> for RecordType {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "current" => RecordType::Current,
            "history" => RecordType::History,
            _ => RecordType::Other(tag),
        }
    }
}

impl From<RecordType> for String {
    fn from(record_type: RecordType) -> Self {
        match record_type {
            RecordType::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A row of the `weather_requests` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherRequestRecord {
    pub id: i64,
    pub user_name: String,
    pub location_input: String,
    #[serde(rename = "date_")]
    pub date: Option<NaiveDate>,
    #[serde(rename = "type")]
    pub record_type: RecordType,
    /// Raw provider response, stored verbatim
    pub data: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

impl WeatherRequestRecord {
    /// Build the stored row for `new` under a store-assigned id
    pub fn from_new(id: i64, new: NewWeatherRequest) -> Self {
        Self {
            id,
            user_name: new.user_name,
            location_input: new.location_input,
            date: Some(new.date),
            record_type: new.record_type,
            data: new.data,
            start_date: None,
            end_date: None,
        }
    }

    /// Apply the fields present in `patch`
    pub fn apply(&mut self, patch: &WeatherRequestPatch) {
        if let Some(location_input) = &patch.location_input {
            self.location_input = location_input.clone();
        }
        if let Some(start_date) = patch.start_date {
            self.start_date = Some(start_date);
        }
        if let Some(end_date) = patch.end_date {
            self.end_date = Some(end_date);
        }
    }

    /// Column value rendered the way an equality filter compares it
    pub fn column_value(&self, column: &str) -> Option<String> {
        match column {
            "id" => Some(self.id.to_string()),
            "user_name" => Some(self.user_name.clone()),
            "location_input" => Some(self.location_input.clone()),
            "date_" => self.date.map(|d| d.to_string()),
            "type" => Some(self.record_type.to_string()),
            "start_date" => self.start_date.map(|d| d.to_string()),
            "end_date" => self.end_date.map(|d| d.to_string()),
            _ => None,
        }
    }

    pub fn matches(&self, filters: &RecordFilters) -> bool {
        filters
            .iter()
            .all(|(column, value)| self.column_value(column).as_deref() == Some(value))
    }
}

/// Insert payload for a new record; `id` is assigned by the store
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewWeatherRequest {
    pub user_name: String,
    pub location_input: String,
    #[serde(rename = "date_")]
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub record_type: RecordType,
    pub data: Map<String, Value>,
}

/// Partial update; omitted fields are not sent to the store
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WeatherRequestPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_input: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

impl WeatherRequestPatch {
    pub fn is_empty(&self) -> bool {
        self.location_input.is_none() && self.start_date.is_none() && self.end_date.is_none()
    }
}

/// Why a `filters` parameter was rejected
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum FilterError {
    #[error("filters must be a JSON object: {0}")]
    Malformed(String),

    #[error("cannot filter on unknown field '{0}'")]
    UnknownColumn(String),

    #[error("filter value for '{0}' must be a string, number or boolean")]
    UnsupportedValue(String),
}

/// Equality filters over record columns, all of which must match
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordFilters(BTreeMap<String, String>);

impl RecordFilters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a filter; the column must be one of [`FILTERABLE_COLUMNS`]
    pub fn eq(mut self, column: &str, value: impl Into<String>) -> Result<Self, FilterError> {
        if !FILTERABLE_COLUMNS.contains(&column) {
            return Err(FilterError::UnknownColumn(column.to_string()));
        }
        self.0.insert(column.to_string(), value.into());
        Ok(self)
    }

    /// Parse the JSON object passed as `?filters=`
    pub fn from_json(raw: &str) -> Result<Self, FilterError> {
        let value: Value =
            serde_json::from_str(raw).map_err(|e| FilterError::Malformed(e.to_string()))?;
        let Value::Object(object) = value else {
            return Err(FilterError::Malformed("expected an object".to_string()));
        };

        object.into_iter().try_fold(Self::new(), |filters, (column, value)| {
            let rendered = match value {
                Value::String(s) => s,
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                _ => return Err(FilterError::UnsupportedValue(column)),
            };
            filters.eq(&column, rendered)
        })
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
