//! Import requests and the jobs they produce.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::date_range::DateRange;
use super::metrics::Device;
use crate::error::ConnectorError;

/// Categorical breakdown axis for imported rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Page,
    Query,
    Country,
    Device,
}

impl Dimension {
    pub const ALL: [Dimension; 4] = [
        Dimension::Page,
        Dimension::Query,
        Dimension::Country,
        Dimension::Device,
    ];
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchType {
    #[default]
    Web,
    Image,
    Video,
}

/// Whether rows must be final or may still be revised upstream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataState {
    #[default]
    All,
    Final,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device: Option<Device>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_regex: Option<String>,
}

impl ImportFilters {
    pub fn is_empty(&self) -> bool {
        self.country.is_none() && self.device.is_none() && self.page_regex.is_none()
    }
}

/// Everything needed to ask the connector for an import.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportRequest {
    pub property: String,
    pub range: DateRange,
    pub dimensions: BTreeSet<Dimension>,
    pub search_type: SearchType,
    pub data_state: DataState,
    pub filters: Option<ImportFilters>,
    pub dry_run: bool,
}

impl ImportRequest {
    /// Request with default dimensions, web search and all data states.
    pub fn new(property: impl Into<String>, range: DateRange) -> Self {
        Self {
            property: property.into(),
            range,
            dimensions: Dimension::ALL.into_iter().collect(),
            search_type: SearchType::default(),
            data_state: DataState::default(),
            filters: None,
            dry_run: false,
        }
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_dimensions(mut self, dimensions: impl IntoIterator<Item = Dimension>) -> Self {
        self.dimensions = dimensions.into_iter().collect();
        self
    }

    pub fn with_search_type(mut self, search_type: SearchType) -> Self {
        self.search_type = search_type;
        self
    }

    pub fn with_data_state(mut self, data_state: DataState) -> Self {
        self.data_state = data_state;
        self
    }

    pub fn with_filters(mut self, filters: ImportFilters) -> Self {
        self.filters = (!filters.is_empty()).then_some(filters);
        self
    }

    pub fn validate(&self) -> Result<(), ConnectorError> {
        if self.property.trim().is_empty() {
            return Err(ConnectorError::validation("property must not be empty"));
        }
        if self.dimensions.is_empty() {
            return Err(ConnectorError::validation(
                "at least one dimension is required",
            ));
        }
        if let Some(country) = self.filters.as_ref().and_then(|f| f.country.as_deref())
            && !is_country_code(country)
        {
            return Err(ConnectorError::validation(format!(
                "country filter must be a 3-letter code, got '{country}'"
            )));
        }
        Ok(())
    }
}

/// ISO 3166-1 alpha-3 shape check, as the connector expects.
pub fn is_country_code(value: &str) -> bool {
    value.len() == 3 && value.chars().all(|c| c.is_ascii_alphabetic())
}

/// Raw answer of `POST /gsc/import`.
///
/// Dry runs carry an `estimation`; real imports carry upstream-defined
/// summary fields which are kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimation: Option<Value>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl ImportResponse {
    pub fn into_preview(self) -> ImportPreview {
        ImportPreview {
            status: self.status.unwrap_or_else(|| "dry_run_complete".to_string()),
            estimation: self.estimation.unwrap_or(Value::Null),
            message: self.message,
        }
    }

    /// Whole response as a JSON summary for a finished job.
    pub fn into_summary(self) -> Value {
        serde_json::to_value(&self).unwrap_or(Value::Null)
    }
}

/// Dry-run answer: an estimate of what an import would do.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportPreview {
    pub status: String,
    #[serde(default)]
    pub estimation: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    Pending,
    Running,
    Succeeded,
    Failed,
}

impl JobState {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobState::Succeeded | JobState::Failed)
    }
}

/// Error captured from a failed import.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobError {
    pub kind: String,
    /// Upstream error code, for `domain` failures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl From<&ConnectorError> for JobError {
    fn from(err: &ConnectorError) -> Self {
        let (code, message) = match err {
            ConnectorError::Domain { code, message, .. } => (Some(code.clone()), message.clone()),
            other => (None, other.to_string()),
        };
        Self {
            kind: err.kind().to_string(),
            code,
            message,
            status: err.status(),
        }
    }
}

/// Lifecycle record of one non-dry-run import.
///
/// `Pending → Running → {Succeeded, Failed}`; terminal states never change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportJob {
    pub id: Uuid,
    pub state: JobState,
    pub property: String,
    pub period: DateRange,
    pub started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_summary: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JobError>,
}

impl ImportJob {
    pub fn pending(request: &ImportRequest) -> Self {
        Self {
            id: Uuid::new_v4(),
            state: JobState::Pending,
            property: request.property.clone(),
            period: request.range,
            started_at: Utc::now(),
            completed_at: None,
            result_summary: None,
            error: None,
        }
    }

    /// Moves a pending job to `Running`. Returns false if it was not pending.
    pub fn mark_running(&mut self) -> bool {
        if self.state != JobState::Pending {
            return false;
        }
        self.state = JobState::Running;
        true
    }

    /// Records the outcome of the remote call. Ignored once terminal.
    pub fn complete(&mut self, outcome: Result<Value, ConnectorError>) -> bool {
        if self.state.is_terminal() {
            return false;
        }
        match outcome {
            Ok(summary) => {
                self.state = JobState::Succeeded;
                self.result_summary = Some(summary);
            }
            Err(err) => {
                self.state = JobState::Failed;
                self.error = Some(JobError::from(&err));
            }
        }
        self.completed_at = Some(Utc::now());
        true
    }
}
