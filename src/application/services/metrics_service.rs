//! Per-URL metrics retrieval and site-level aggregation.

use std::sync::Arc;

use crate::domain::ConnectorGateway;
use crate::domain::aggregation::{self, Dashboard};
use crate::domain::entities::{
    DateRange, MAX_PAGE_SIZE, MetricsQuery, MetricsResult, OrderBy, PageMetric, SortOrder,
    UrlListQuery, UrlPage,
};
use crate::error::ConnectorError;

/// Reads page-level metrics through the gateway and aggregates them locally.
pub struct MetricsService {
    gateway: Arc<dyn ConnectorGateway>,
    dashboard_page_cap: u32,
}

impl MetricsService {
    /// `dashboard_page_cap` bounds how many page records a dashboard pulls.
    pub fn new(gateway: Arc<dyn ConnectorGateway>, dashboard_page_cap: u32) -> Self {
        Self {
            gateway,
            dashboard_page_cap,
        }
    }

    pub async fn url_metrics(&self, query: &MetricsQuery) -> Result<MetricsResult, ConnectorError> {
        self.gateway.url_metrics(query).await
    }

    /// One page of per-URL records for a site.
    pub async fn url_page(
        &self,
        site_url: &str,
        range: DateRange,
        limit: u32,
        offset: u32,
        order_by: OrderBy,
        order: SortOrder,
    ) -> Result<UrlPage, ConnectorError> {
        let query = UrlListQuery::new(site_url, range)
            .page(limit, offset)
            .ordered(order_by, order);
        self.gateway.url_list(&query).await
    }

    /// Walks the pagination until the connector reports no more records or
    /// `max_records` have been collected.
    ///
    /// Records come back in the connector's default order (clicks, descending).
    pub async fn collect_pages(
        &self,
        site_url: &str,
        range: DateRange,
        max_records: u32,
    ) -> Result<Vec<PageMetric>, ConnectorError> {
        let mut records = Vec::new();
        let mut offset = 0u32;

        while (records.len() as u32) < max_records {
            let remaining = max_records - records.len() as u32;
            let limit = remaining.min(MAX_PAGE_SIZE);

            let page = self
                .url_page(
                    site_url,
                    range,
                    limit,
                    offset,
                    OrderBy::default(),
                    SortOrder::default(),
                )
                .await?;

            let fetched = page.urls.len() as u32;
            records.extend(page.urls);

            if !page.pagination.has_more || fetched == 0 {
                break;
            }
            offset = offset.saturating_add(fetched);
        }

        records.truncate(max_records as usize);
        tracing::debug!(site_url, count = records.len(), "Collected page records");
        Ok(records)
    }

    /// Fetches up to `limit` records and ranks them locally by `metric`.
    pub async fn top_pages(
        &self,
        site_url: &str,
        range: DateRange,
        metric: OrderBy,
        limit: u32,
    ) -> Result<Vec<PageMetric>, ConnectorError> {
        let page = self
            .url_page(site_url, range, limit, 0, metric, SortOrder::Desc)
            .await?;
        Ok(aggregation::top_pages(&page.urls, metric, limit as usize))
    }

    /// Totals, top ten by clicks and every collected record for a site.
    pub async fn dashboard(
        &self,
        site_url: &str,
        range: DateRange,
    ) -> Result<Dashboard, ConnectorError> {
        let records = self
            .collect_pages(site_url, range, self.dashboard_page_cap)
            .await?;
        Ok(aggregation::dashboard(&records, range))
    }
}
