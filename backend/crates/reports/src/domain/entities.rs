//! Domain Entities
//!
//! The report record and its state machine. All transitions take `now` as a
//! parameter so callers control the clock.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use kernel::id::{OwnerId, ReportId};

use crate::domain::value_objects::{ReportFormat, ReportFrequency, ReportStatus, ReportType};

/// Fields the caller supplies when requesting a report.
#[derive(Debug, Clone)]
pub struct ReportDraft {
    pub title: String,
    pub description: Option<String>,
    pub report_type: ReportType,
    pub page_ids: Vec<String>,
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
    pub format: ReportFormat,
    pub is_scheduled: bool,
    pub frequency: Option<ReportFrequency>,
}

/// Report entity - one persisted report record
///
/// Invariants:
/// - `Completed` implies `progress == 100` and `file_url` set
/// - `Failed` implies `error_message` set
/// - A record past `expires_at` is not downloadable regardless of status
#[derive(Debug, Clone)]
pub struct Report {
    pub id: ReportId,
    pub owner_id: OwnerId,
    pub title: String,
    pub description: Option<String>,
    pub report_type: ReportType,
    pub page_ids: Vec<String>,
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
    pub format: ReportFormat,
    pub is_scheduled: bool,
    pub frequency: Option<ReportFrequency>,
    pub next_generation: Option<DateTime<Utc>>,
    pub last_generated: Option<DateTime<Utc>>,
    pub status: ReportStatus,
    /// 0-100
    pub progress: i16,
    pub file_url: Option<String>,
    pub file_size: Option<i64>,
    pub download_count: i32,
    pub error_message: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Report {
    /// Fresh `Pending` record at progress 0.
    pub fn new(owner_id: OwnerId, draft: ReportDraft, now: DateTime<Utc>) -> Self {
        Self {
            id: ReportId::new(),
            owner_id,
            title: draft.title,
            description: draft.description,
            report_type: draft.report_type,
            page_ids: draft.page_ids,
            date_from: draft.date_from,
            date_to: draft.date_to,
            format: draft.format,
            is_scheduled: draft.is_scheduled,
            frequency: draft.frequency,
            next_generation: None,
            last_generated: None,
            status: ReportStatus::Pending,
            progress: 0,
            file_url: None,
            file_size: None,
            download_count: 0,
            error_message: None,
            expires_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set progress (clamped to 0-100) with an optional status change.
    ///
    /// Monotonicity is the caller's responsibility.
    pub fn update_progress(
        &mut self,
        progress: i16,
        status: Option<ReportStatus>,
        now: DateTime<Utc>,
    ) {
        self.progress = progress.clamp(0, 100);
        if let Some(status) = status {
            self.status = status;
        }
        self.updated_at = now;
    }

    /// Terminal success. Pins progress to 100 and stamps the expiry from
    /// `retention_days` (zero or negative means the report never expires).
    pub fn mark_completed(
        &mut self,
        file_url: String,
        file_size: Option<i64>,
        retention_days: i64,
        now: DateTime<Utc>,
    ) {
        self.status = ReportStatus::Completed;
        self.progress = 100;
        self.file_url = Some(file_url);
        self.file_size = file_size;
        self.last_generated = Some(now);
        self.updated_at = now;
        if retention_days > 0 {
            self.expires_at = Some(now + Duration::days(retention_days));
        }
    }

    /// Terminal failure. Progress stays where generation stopped.
    pub fn mark_failed(&mut self, error_message: String, now: DateTime<Utc>) {
        self.status = ReportStatus::Failed;
        self.error_message = Some(error_message);
        self.updated_at = now;
    }

    pub fn increment_download_count(&mut self, now: DateTime<Utc>) {
        self.download_count += 1;
        self.updated_at = now;
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires_at| now > expires_at)
    }

    /// Stored status, with expiry overlaid.
    pub fn effective_status(&self, now: DateTime<Utc>) -> ReportStatus {
        if self.is_expired(now) {
            ReportStatus::Expired
        } else {
            self.status
        }
    }

    pub fn can_be_downloaded(&self, now: DateTime<Utc>) -> bool {
        self.status == ReportStatus::Completed && self.file_url.is_some() && !self.is_expired(now)
    }

    /// Set `next_generation` from the frequency offset table.
    ///
    /// No-op for unscheduled reports and for `once` frequency.
    pub fn schedule_next_generation(&mut self, now: DateTime<Utc>) {
        if !self.is_scheduled {
            return;
        }
        let Some(offset_days) = self.frequency.and_then(|f| f.next_offset_days()) else {
            return;
        };
        self.next_generation = Some(now + Duration::days(offset_days));
        self.updated_at = now;
    }
}
