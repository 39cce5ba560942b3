//! In-Memory Repository Implementation
//!
//! HashMap behind an async RwLock. Used by tests and single-instance
//! deployments without a database.

use kernel::id::{OwnerId, ReportId};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::Report;
use crate::domain::repository::{ReportFilter, ReportRepository};
use crate::error::ReportResult;

#[derive(Clone, Default)]
pub struct InMemoryReportRepository {
    reports: Arc<RwLock<HashMap<Uuid, Report>>>,
}

impl InMemoryReportRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ReportRepository for InMemoryReportRepository {
    async fn create(&self, report: &Report) -> ReportResult<()> {
        self.reports
            .write()
            .await
            .insert(report.id.into_uuid(), report.clone());
        Ok(())
    }

    async fn get(&self, id: ReportId) -> ReportResult<Option<Report>> {
        Ok(self.reports.read().await.get(id.as_uuid()).cloned())
    }

    async fn get_for_owner(&self, id: ReportId, owner: OwnerId) -> ReportResult<Option<Report>> {
        Ok(self
            .reports
            .read()
            .await
            .get(id.as_uuid())
            .filter(|report| report.owner_id == owner)
            .cloned())
    }

    async fn update(&self, report: &Report) -> ReportResult<()> {
        self.reports
            .write()
            .await
            .insert(report.id.into_uuid(), report.clone());
        Ok(())
    }

    async fn delete(&self, id: ReportId, owner: OwnerId) -> ReportResult<bool> {
        let mut reports = self.reports.write().await;
        let matches = reports
            .get(id.as_uuid())
            .is_some_and(|report| report.owner_id == owner);
        if matches {
            reports.remove(id.as_uuid());
        }
        Ok(matches)
    }

    async fn list(&self, owner: OwnerId, filter: &ReportFilter) -> ReportResult<Vec<Report>> {
        let reports = self.reports.read().await;
        let mut matching: Vec<Report> = reports
            .values()
            .filter(|report| report.owner_id == owner)
            .filter(|report| filter.status.is_none_or(|s| report.status == s))
            .filter(|report| filter.report_type.is_none_or(|t| report.report_type == t))
            .cloned()
            .collect();

        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(matching
            .into_iter()
            .skip(filter.skip.max(0) as usize)
            .take(filter.limit.max(0) as usize)
            .collect())
    }
}
