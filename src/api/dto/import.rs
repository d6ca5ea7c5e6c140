//! DTOs for import endpoints.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::domain::entities::{
    DataState, DateRange, Dimension, ImportFilters, ImportJob, ImportRequest, SearchType,
    is_country_code,
};
use crate::error::ConnectorError;

/// `POST /gsc/import` body.
///
/// Only `site_url` and the two dates are required; the rest falls back to
/// the connector defaults.
#[derive(Debug, Deserialize, Validate)]
pub struct ImportBody {
    #[serde(alias = "property")]
    #[validate(length(min = 1, message = "site_url is required"))]
    pub site_url: String,

    pub start_date: String,
    pub end_date: String,

    #[serde(default)]
    pub dry_run: bool,

    #[serde(default)]
    pub dimensions: Option<Vec<Dimension>>,

    #[serde(default)]
    pub search_type: Option<SearchType>,

    #[serde(default)]
    pub data_state: Option<DataState>,

    #[serde(default)]
    #[validate(custom(function = "validate_filters"))]
    pub filters: Option<ImportFilters>,
}

fn validate_filters(filters: &ImportFilters) -> Result<(), ValidationError> {
    match filters.country.as_deref() {
        Some(country) if !is_country_code(country) => {
            Err(ValidationError::new("country").with_message("country must be 3 letters".into()))
        }
        _ => Ok(()),
    }
}

impl ImportBody {
    pub fn into_request(self) -> Result<ImportRequest, ConnectorError> {
        let range = DateRange::parse(&self.start_date, &self.end_date)?;

        let mut request = ImportRequest::new(self.site_url, range).dry_run(self.dry_run);
        if let Some(dimensions) = self.dimensions {
            request = request.with_dimensions(dimensions);
        }
        if let Some(search_type) = self.search_type {
            request = request.with_search_type(search_type);
        }
        if let Some(data_state) = self.data_state {
            request = request.with_data_state(data_state);
        }
        if let Some(filters) = self.filters {
            request = request.with_filters(filters);
        }

        request.validate()?;
        Ok(request)
    }
}

/// 202 answer for a launched import.
#[derive(Debug, Serialize)]
pub struct ImportAccepted {
    pub message: String,
    pub dry_run: bool,
    pub job: ImportJob,
}

#[derive(Debug, Serialize)]
pub struct JobListResponse {
    pub total: usize,
    pub jobs: Vec<ImportJob>,
}
