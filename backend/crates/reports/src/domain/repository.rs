//! Repository Traits
//!
//! Interfaces for report persistence. Implementations are in the
//! infrastructure layer.

use kernel::id::{OwnerId, ReportId};

use crate::domain::entities::Report;
use crate::domain::value_objects::{ReportStatus, ReportType};
use crate::error::ReportResult;

/// Filters for listing an owner's reports, newest first.
#[derive(Debug, Clone)]
pub struct ReportFilter {
    pub status: Option<ReportStatus>,
    pub report_type: Option<ReportType>,
    pub limit: i64,
    pub skip: i64,
}

impl Default for ReportFilter {
    fn default() -> Self {
        Self {
            status: None,
            report_type: None,
            limit: 50,
            skip: 0,
        }
    }
}

/// Report repository trait
#[trait_variant::make(ReportRepository: Send)]
pub trait LocalReportRepository {
    /// Persist a new report
    async fn create(&self, report: &Report) -> ReportResult<()>;

    /// Fetch by id, regardless of owner (worker path)
    async fn get(&self, id: ReportId) -> ReportResult<Option<Report>>;

    /// Fetch by id scoped to an owner (request path)
    async fn get_for_owner(&self, id: ReportId, owner: OwnerId) -> ReportResult<Option<Report>>;

    /// Write back the full record
    async fn update(&self, report: &Report) -> ReportResult<()>;

    /// Delete an owner's report; returns whether anything was removed
    async fn delete(&self, id: ReportId, owner: OwnerId) -> ReportResult<bool>;

    /// List an owner's reports, newest first, filtered and paginated
    async fn list(&self, owner: OwnerId, filter: &ReportFilter) -> ReportResult<Vec<Report>>;
}
