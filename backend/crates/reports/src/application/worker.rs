//! Generation Worker
//!
//! Single consumer of the generation job queue. Owning the receiver is what
//! guarantees one writer per report during the generating phase.

use tokio::sync::mpsc;

use crate::application::lifecycle::{GenerationJob, ReportLifecycle};
use crate::domain::entities::Report;
use crate::domain::repository::ReportRepository;
use crate::domain::value_objects::ReportStatus;
use crate::error::ReportError;

/// Output of a renderer run.
#[derive(Debug, Clone)]
pub struct RenderedReport {
    pub file_url: String,
    pub file_size: Option<i64>,
}

/// Turns a report record into a stored file. Rendering itself is out of
/// scope here; implementations live in the infrastructure layer.
#[trait_variant::make(ReportRenderer: Send)]
pub trait LocalReportRenderer {
    async fn render(
        &self,
        report: &Report,
    ) -> Result<RenderedReport, Box<dyn std::error::Error + Send + Sync>>;
}

/// Drives queued reports through generating to a terminal state
pub struct GenerationWorker<R, G>
where
    R: ReportRepository,
    G: ReportRenderer,
{
    lifecycle: ReportLifecycle<R>,
    renderer: G,
    queue: mpsc::Receiver<GenerationJob>,
}

impl<R, G> GenerationWorker<R, G>
where
    R: ReportRepository,
    G: ReportRenderer,
{
    pub fn new(
        lifecycle: ReportLifecycle<R>,
        renderer: G,
        queue: mpsc::Receiver<GenerationJob>,
    ) -> Self {
        Self {
            lifecycle,
            renderer,
            queue,
        }
    }

    /// Consume jobs until every sender is dropped.
    pub async fn run(mut self) {
        tracing::info!("generation worker started");
        while self.run_once().await {}
        tracing::info!("generation worker stopped");
    }

    /// Process one job. Returns false once the queue is closed.
    pub async fn run_once(&mut self) -> bool {
        match self.queue.recv().await {
            Some(job) => {
                self.process(job).await;
                true
            }
            None => false,
        }
    }

    /// Generation faults never escape: they become a `failed` report and a
    /// log line, and the worker moves on.
    async fn process(&self, job: GenerationJob) {
        let id = job.report_id;

        let report = match self.lifecycle.find(id).await {
            Ok(Some(report)) => report,
            Ok(None) => {
                // Deleted between creation and pickup
                tracing::warn!(report_id = %id, "queued report no longer exists, skipping");
                return;
            }
            Err(e) => {
                tracing::error!(report_id = %id, error = %e, "failed to load queued report");
                return;
            }
        };

        if let Err(e) = self
            .lifecycle
            .advance_progress(id, 10, Some(ReportStatus::Generating))
            .await
        {
            tracing::error!(report_id = %id, error = %e, "could not start generation");
            return;
        }

        match self.renderer.render(&report).await {
            Ok(rendered) => {
                if let Err(e) = self
                    .lifecycle
                    .complete(id, rendered.file_url, rendered.file_size)
                    .await
                {
                    tracing::error!(report_id = %id, error = %e, "could not mark report completed");
                    return;
                }
            }
            Err(e) => {
                match self.lifecycle.fail(id, &e.to_string()).await {
                    Ok(()) | Err(ReportError::NotFound) => {}
                    Err(store_err) => {
                        tracing::error!(
                            report_id = %id,
                            error = %store_err,
                            "could not mark report failed"
                        );
                    }
                }
                return;
            }
        }

        if report.is_scheduled
            && let Err(e) = self.lifecycle.schedule_next(id).await
        {
            tracing::error!(report_id = %id, error = %e, "could not schedule next generation");
        }
    }
}
