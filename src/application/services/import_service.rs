//! Background import orchestration.
//!
//! Real imports can run for minutes, so they are launched as detached tokio
//! tasks and tracked in an in-memory registry. Dry runs are answered inline
//! and leave no trace in the registry.
//!
//! The registry is bounded: once it holds more than the history limit, the
//! oldest finished jobs are evicted. Running jobs are never evicted.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{RwLock, watch};
use uuid::Uuid;

use crate::domain::ConnectorGateway;
use crate::domain::entities::{ImportJob, ImportPreview, ImportRequest, JobState};
use crate::error::ConnectorError;

/// Observer of one running or finished job.
#[derive(Debug, Clone)]
pub struct ImportHandle {
    id: Uuid,
    rx: watch::Receiver<ImportJob>,
}

impl ImportHandle {
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Latest known state of the job.
    pub fn snapshot(&self) -> ImportJob {
        self.rx.borrow().clone()
    }

    /// Resolves once the job reaches a terminal state.
    pub async fn finished(mut self) -> ImportJob {
        // Err only if the task was dropped mid-flight; the last value is still readable.
        let _ = self.rx.wait_for(|job| job.state.is_terminal()).await;
        self.rx.borrow().clone()
    }
}

/// Outcome of [`ImportService::start`].
#[derive(Debug)]
pub enum ImportStart {
    /// Dry run answered by the connector; no job was created.
    Preview(ImportPreview),
    /// Real import launched in the background.
    Started(ImportHandle),
}

/// Jobs kept in the registry when no limit is configured.
pub const DEFAULT_JOB_HISTORY: usize = 500;

type JobMap = HashMap<Uuid, watch::Receiver<ImportJob>>;
type JobRegistry = Arc<RwLock<JobMap>>;

/// Launches imports without blocking the caller and tracks their lifecycle.
///
/// Every non-dry-run call creates a new job, even for identical requests.
/// Failures are recorded on the job, never retried.
pub struct ImportService {
    gateway: Arc<dyn ConnectorGateway>,
    jobs: JobRegistry,
    history_limit: usize,
}

impl ImportService {
    pub fn new(gateway: Arc<dyn ConnectorGateway>) -> Self {
        Self {
            gateway,
            jobs: Arc::new(RwLock::new(HashMap::new())),
            history_limit: DEFAULT_JOB_HISTORY,
        }
    }

    /// Sets how many jobs the registry keeps before evicting finished ones.
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit.max(1);
        self
    }

    /// Starts an import.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectorError::Validation`] for a malformed request. For
    /// dry runs, any connector failure is returned as is. Real imports only
    /// fail here on validation; later failures land on the job.
    pub async fn start(&self, request: ImportRequest) -> Result<ImportStart, ConnectorError> {
        request.validate()?;

        if request.dry_run {
            let response = self.gateway.import(&request).await?;
            tracing::info!(property = %request.property, "Import dry run completed");
            return Ok(ImportStart::Preview(response.into_preview()));
        }

        let mut job = ImportJob::pending(&request);
        job.mark_running();
        let id = job.id;

        let (tx, rx) = watch::channel(job);
        {
            let mut jobs = self.jobs.write().await;
            jobs.insert(id, rx.clone());
            evict_finished(&mut jobs, self.history_limit);
        }
        metrics::counter!("gsc_import_jobs_started_total").increment(1);

        tracing::info!(
            job_id = %id,
            property = %request.property,
            start = %request.range.start(),
            end = %request.range.end(),
            "Import job started"
        );

        let gateway = Arc::clone(&self.gateway);
        tokio::spawn(async move {
            let outcome = gateway
                .import(&request)
                .await
                .map(|response| response.into_summary());

            match &outcome {
                Ok(_) => tracing::info!(job_id = %id, "Import job succeeded"),
                Err(e) => tracing::warn!(job_id = %id, kind = e.kind(), error = %e, "Import job failed"),
            }

            tx.send_modify(|job| {
                job.complete(outcome);
            });

            let label = match tx.borrow().state {
                JobState::Succeeded => "succeeded",
                _ => "failed",
            };
            metrics::counter!("gsc_import_jobs_finished_total", "outcome" => label).increment(1);
        });

        Ok(ImportStart::Started(ImportHandle { id, rx }))
    }

    /// Latest snapshot of a tracked job.
    pub async fn job(&self, id: Uuid) -> Option<ImportJob> {
        self.jobs.read().await.get(&id).map(|rx| rx.borrow().clone())
    }

    /// All tracked jobs, newest first.
    pub async fn jobs(&self) -> Vec<ImportJob> {
        let mut jobs: Vec<ImportJob> = self
            .jobs
            .read()
            .await
            .values()
            .map(|rx| rx.borrow().clone())
            .collect();
        jobs.sort_by(|a, b| b.started_at.cmp(&a.started_at).then(a.id.cmp(&b.id)));
        jobs
    }

    /// Waits for a tracked job to finish. `None` for an unknown id.
    pub async fn wait(&self, id: Uuid) -> Option<ImportJob> {
        let rx = self.jobs.read().await.get(&id).cloned()?;
        Some(ImportHandle { id, rx }.finished().await)
    }
}

/// Drops the oldest finished jobs until at most `limit` remain.
fn evict_finished(jobs: &mut JobMap, limit: usize) {
    if jobs.len() <= limit {
        return;
    }

    let mut finished: Vec<(DateTime<Utc>, Uuid)> = jobs
        .iter()
        .filter_map(|(id, rx)| {
            let job = rx.borrow();
            job.state
                .is_terminal()
                .then(|| (job.completed_at.unwrap_or(job.started_at), *id))
        })
        .collect();
    finished.sort();

    let excess = jobs.len() - limit;
    for (_, id) in finished.into_iter().take(excess) {
        jobs.remove(&id);
    }
    tracing::debug!(remaining = jobs.len(), "Evicted finished import jobs");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MockConnectorGateway;
    use crate::domain::entities::{DateRange, ImportResponse};
    use serde_json::json;

    fn request(dry_run: bool) -> ImportRequest {
        ImportRequest::new(
            "https://example.com/",
            DateRange::parse("2024-01-01", "2024-01-31").unwrap(),
        )
        .dry_run(dry_run)
    }

    fn success() -> ImportResponse {
        serde_json::from_value(json!({
            "status": "completed",
            "message": "Imported 120 rows",
            "rows_imported": 120
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_dry_run_returns_preview_without_job() {
        let mut mock = MockConnectorGateway::new();
        mock.expect_import().times(1).returning(|_| {
            Ok(serde_json::from_value(json!({
                "status": "dry_run_complete",
                "estimation": {"estimated_rows": 4200},
                "message": "Dry run completed"
            }))
            .unwrap())
        });

        let service = ImportService::new(Arc::new(mock));
        let start = service.start(request(true)).await.unwrap();

        match start {
            ImportStart::Preview(preview) => {
                assert_eq!(preview.status, "dry_run_complete");
                assert_eq!(preview.estimation["estimated_rows"], 4200);
            }
            ImportStart::Started(_) => panic!("dry run must not start a job"),
        }
        assert!(service.jobs().await.is_empty());
    }

    #[tokio::test]
    async fn test_dry_run_propagates_error() {
        let mut mock = MockConnectorGateway::new();
        mock.expect_import().returning(|_| {
            Err(ConnectorError::Domain {
                code: "property_not_found".into(),
                message: "No such property".into(),
                status: 404,
            })
        });

        let service = ImportService::new(Arc::new(mock));
        let err = service.start(request(true)).await.unwrap_err();
        assert_eq!(err.status(), Some(404));
        assert!(service.jobs().await.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_request_creates_no_job() {
        let mut mock = MockConnectorGateway::new();
        mock.expect_import().times(0);

        let service = ImportService::new(Arc::new(mock));
        let bad = ImportRequest::new("", DateRange::parse("2024-01-01", "2024-01-02").unwrap());

        assert!(matches!(
            service.start(bad).await,
            Err(ConnectorError::Validation(_))
        ));
        assert!(service.jobs().await.is_empty());
    }

    #[tokio::test]
    async fn test_real_import_creates_one_running_job() {
        let mut mock = MockConnectorGateway::new();
        mock.expect_import().times(1).returning(|_| Ok(success()));

        let service = ImportService::new(Arc::new(mock));
        let ImportStart::Started(handle) = service.start(request(false)).await.unwrap() else {
            panic!("expected a started job");
        };

        let snapshot = handle.snapshot();
        assert_eq!(snapshot.id, handle.id());
        assert_eq!(snapshot.property, "https://example.com/");
        assert_eq!(service.jobs().await.len(), 1);

        let done = handle.finished().await;
        assert_eq!(done.state, JobState::Succeeded);
        assert_eq!(done.result_summary.unwrap()["rows_imported"], 120);
        assert!(done.completed_at.is_some());
        assert!(done.error.is_none());
    }

    #[tokio::test]
    async fn test_failed_import_is_recorded() {
        let mut mock = MockConnectorGateway::new();
        mock.expect_import()
            .returning(|_| Err(ConnectorError::Connectivity("connection refused".into())));

        let service = ImportService::new(Arc::new(mock));
        let ImportStart::Started(handle) = service.start(request(false)).await.unwrap() else {
            panic!("expected a started job");
        };

        let done = service.wait(handle.id()).await.unwrap();
        assert_eq!(done.state, JobState::Failed);
        let error = done.error.unwrap();
        assert_eq!(error.kind, "connectivity");
        assert!(error.message.contains("connection refused"));
        assert!(done.result_summary.is_none());

        assert_eq!(service.job(handle.id()).await.unwrap().state, JobState::Failed);
    }

    #[tokio::test]
    async fn test_concurrent_identical_requests_get_distinct_jobs() {
        let mut mock = MockConnectorGateway::new();
        mock.expect_import().times(2).returning(|_| Ok(success()));

        let service = ImportService::new(Arc::new(mock));
        let (first, second) = tokio::join!(
            service.start(request(false)),
            service.start(request(false))
        );
        let (ImportStart::Started(first), ImportStart::Started(second)) =
            (first.unwrap(), second.unwrap())
        else {
            panic!("expected two started jobs");
        };

        assert_ne!(first.id(), second.id());
        assert_eq!(service.jobs().await.len(), 2);

        first.finished().await;
        second.finished().await;
        assert_eq!(service.jobs().await.len(), 2);
    }

    #[tokio::test]
    async fn test_oldest_finished_jobs_are_evicted() {
        let mut mock = MockConnectorGateway::new();
        mock.expect_import().times(3).returning(|_| Ok(success()));

        let service = ImportService::new(Arc::new(mock)).with_history_limit(2);
        let mut ids = Vec::new();
        for _ in 0..3 {
            let ImportStart::Started(handle) = service.start(request(false)).await.unwrap() else {
                panic!("expected a started job");
            };
            ids.push(handle.id());
            handle.finished().await;
        }

        let jobs = service.jobs().await;
        assert_eq!(jobs.len(), 2);
        assert!(service.job(ids[0]).await.is_none());
        assert!(service.job(ids[1]).await.is_some());
        assert!(service.job(ids[2]).await.is_some());
    }

    #[test]
    fn test_running_jobs_are_not_evicted() {
        let mut jobs = JobMap::new();
        for finished in [true, false, false] {
            let mut job = ImportJob::pending(&request(false));
            job.mark_running();
            if finished {
                job.complete(Ok(json!({})));
            }
            let id = job.id;
            let (_tx, rx) = watch::channel(job);
            jobs.insert(id, rx);
        }

        evict_finished(&mut jobs, 1);

        assert_eq!(jobs.len(), 2);
        assert!(jobs.values().all(|rx| !rx.borrow().state.is_terminal()));
    }

    #[tokio::test]
    async fn test_unknown_job() {
        let service = ImportService::new(Arc::new(MockConnectorGateway::new()));
        let id = Uuid::new_v4();
        assert!(service.job(id).await.is_none());
        assert!(service.wait(id).await.is_none());
    }
}
