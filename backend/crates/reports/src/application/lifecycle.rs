//! Report Lifecycle Use Cases
//!
//! Every state change of a report runs through here. Creation enqueues a
//! generation job; the worker in `worker.rs` is the only consumer, so no two
//! tasks ever drive the same report concurrently.

use chrono::Utc;
use kernel::id::{OwnerId, ReportId};
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::application::config::ReportConfig;
use crate::domain::entities::{Report, ReportDraft};
use crate::domain::repository::{ReportFilter, ReportRepository};
use crate::domain::value_objects::ReportStatus;
use crate::error::{ReportError, ReportResult};

/// Unit of work for the generation worker.
#[derive(Debug, Clone, Copy)]
pub struct GenerationJob {
    pub report_id: ReportId,
}

/// Lifecycle operations over a report repository
pub struct ReportLifecycle<R>
where
    R: ReportRepository,
{
    repo: Arc<R>,
    config: Arc<ReportConfig>,
    queue: mpsc::Sender<GenerationJob>,
}

impl<R> Clone for ReportLifecycle<R>
where
    R: ReportRepository,
{
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            config: self.config.clone(),
            queue: self.queue.clone(),
        }
    }
}

impl<R> ReportLifecycle<R>
where
    R: ReportRepository,
{
    /// Build the lifecycle and its job queue. The returned receiver belongs
    /// to the single generation worker.
    pub fn new(repo: Arc<R>, config: ReportConfig) -> (Self, mpsc::Receiver<GenerationJob>) {
        let (tx, rx) = mpsc::channel(config.generation_queue_depth.max(1));
        let lifecycle = Self {
            repo,
            config: Arc::new(config),
            queue: tx,
        };
        (lifecycle, rx)
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// Persist a new `Pending` report and enqueue its generation.
    ///
    /// A full or closed queue is not an error: the record stays `Pending`
    /// and generation simply never starts.
    pub async fn create(&self, owner: OwnerId, draft: ReportDraft) -> ReportResult<Report> {
        let report = Report::new(owner, draft, Utc::now());
        self.repo.create(&report).await?;

        let job = GenerationJob {
            report_id: report.id,
        };
        if let Err(e) = self.queue.try_send(job) {
            tracing::warn!(
                report_id = %report.id,
                error = %e,
                "generation queue unavailable, report stays pending"
            );
        } else {
            tracing::info!(report_id = %report.id, title = %report.title, "report created");
        }

        Ok(report)
    }

    /// Fetch by id without owner scoping (worker path).
    pub async fn find(&self, id: ReportId) -> ReportResult<Option<Report>> {
        self.repo.get(id).await
    }

    /// Fetch an owner's report or fail with `NotFound`.
    pub async fn get(&self, id: ReportId, owner: OwnerId) -> ReportResult<Report> {
        self.repo
            .get_for_owner(id, owner)
            .await?
            .ok_or(ReportError::NotFound)
    }

    pub async fn list(&self, owner: OwnerId, filter: &ReportFilter) -> ReportResult<Vec<Report>> {
        self.repo.list(owner, filter).await
    }

    pub async fn delete(&self, id: ReportId, owner: OwnerId) -> ReportResult<()> {
        if !self.repo.delete(id, owner).await? {
            return Err(ReportError::NotFound);
        }
        tracing::info!(report_id = %id, "report deleted");
        Ok(())
    }

    /// Move progress (clamped), optionally changing status; used for the
    /// pending→generating step.
    pub async fn advance_progress(
        &self,
        id: ReportId,
        progress: i16,
        status: Option<ReportStatus>,
    ) -> ReportResult<()> {
        let mut report = self.repo.get(id).await?.ok_or(ReportError::NotFound)?;
        report.update_progress(progress, status, Utc::now());
        self.repo.update(&report).await
    }

    /// Terminal success transition.
    pub async fn complete(
        &self,
        id: ReportId,
        file_url: String,
        file_size: Option<i64>,
    ) -> ReportResult<()> {
        let mut report = self.repo.get(id).await?.ok_or(ReportError::NotFound)?;
        report.mark_completed(file_url, file_size, self.config.retention_days, Utc::now());
        self.repo.update(&report).await?;
        tracing::info!(report_id = %id, "report completed");
        Ok(())
    }

    /// Terminal failure transition. Progress stays where it stopped.
    pub async fn fail(&self, id: ReportId, message: &str) -> ReportResult<()> {
        let mut report = self.repo.get(id).await?.ok_or(ReportError::NotFound)?;
        report.mark_failed(message.to_string(), Utc::now());
        self.repo.update(&report).await?;
        tracing::error!(report_id = %id, error = %message, "report generation failed");
        Ok(())
    }

    /// Whether the report is currently downloadable.
    pub async fn can_download(&self, id: ReportId) -> ReportResult<bool> {
        let report = self.repo.get(id).await?.ok_or(ReportError::NotFound)?;
        Ok(report.can_be_downloaded(Utc::now()))
    }

    /// Bump the download counter. Missing reports are a no-op; the
    /// downloadable check is the caller's job and is not repeated here.
    pub async fn record_download(&self, id: ReportId) -> ReportResult<()> {
        let Some(mut report) = self.repo.get(id).await? else {
            return Ok(());
        };
        report.increment_download_count(Utc::now());
        self.repo.update(&report).await
    }

    /// Stamp the next generation time for scheduled reports; no-op for
    /// everything else.
    pub async fn schedule_next(&self, id: ReportId) -> ReportResult<()> {
        let mut report = self.repo.get(id).await?.ok_or(ReportError::NotFound)?;
        let before = report.next_generation;
        report.schedule_next_generation(Utc::now());
        if report.next_generation != before {
            self.repo.update(&report).await?;
            tracing::info!(
                report_id = %id,
                next_generation = ?report.next_generation,
                "next generation scheduled"
            );
        }
        Ok(())
    }
}
