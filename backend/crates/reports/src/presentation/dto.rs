//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::{Report, ReportDraft};
use crate::domain::repository::ReportFilter;
use crate::domain::value_objects::{ReportFormat, ReportFrequency, ReportStatus, ReportType};

const MAX_PAGE_SIZE: i64 = 100;

/// Request for POST /api/reports
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReportRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub report_type: ReportType,
    pub page_ids: Vec<String>,
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
    #[serde(default = "default_format")]
    pub format: ReportFormat,
    #[serde(default)]
    pub is_scheduled: bool,
    #[serde(default)]
    pub frequency: Option<ReportFrequency>,
}

fn default_format() -> ReportFormat {
    ReportFormat::Pdf
}

impl From<CreateReportRequest> for ReportDraft {
    fn from(req: CreateReportRequest) -> Self {
        ReportDraft {
            title: req.title,
            description: req.description,
            report_type: req.report_type,
            page_ids: req.page_ids,
            date_from: req.date_from,
            date_to: req.date_to,
            format: req.format,
            is_scheduled: req.is_scheduled,
            frequency: req.frequency,
        }
    }
}

/// Query parameters for GET /api/reports
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListReportsQuery {
    #[serde(default)]
    pub status: Option<ReportStatus>,
    #[serde(default)]
    pub report_type: Option<ReportType>,
    #[serde(default)]
    pub limit: Option<i64>,
    #[serde(default)]
    pub skip: Option<i64>,
}

impl ListReportsQuery {
    pub fn into_filter(self) -> ReportFilter {
        let default = ReportFilter::default();
        ReportFilter {
            status: self.status,
            report_type: self.report_type,
            limit: self
                .limit
                .unwrap_or(default.limit)
                .clamp(0, MAX_PAGE_SIZE),
            skip: self.skip.unwrap_or(0).max(0),
        }
    }
}

/// One report in API responses
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportResponse {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub report_type: ReportType,
    pub page_ids: Vec<String>,
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
    pub format: ReportFormat,
    pub status: ReportStatus,
    pub progress: i16,
    pub file_url: Option<String>,
    pub file_size: Option<i64>,
    pub download_count: i32,
    pub error_message: Option<String>,
    pub is_scheduled: bool,
    pub frequency: Option<ReportFrequency>,
    pub next_generation: Option<DateTime<Utc>>,
    pub last_generated: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl ReportResponse {
    /// The reported status is the effective one: a terminal record past its
    /// expiry shows as `expired`.
    pub fn from_report(report: &Report, now: DateTime<Utc>) -> Self {
        Self {
            id: report.id.into_uuid(),
            title: report.title.clone(),
            description: report.description.clone(),
            report_type: report.report_type,
            page_ids: report.page_ids.clone(),
            date_from: report.date_from,
            date_to: report.date_to,
            format: report.format,
            status: report.effective_status(now),
            progress: report.progress,
            file_url: report.file_url.clone(),
            file_size: report.file_size,
            download_count: report.download_count,
            error_message: report.error_message.clone(),
            is_scheduled: report.is_scheduled,
            frequency: report.frequency,
            next_generation: report.next_generation,
            last_generated: report.last_generated,
            created_at: report.created_at,
            updated_at: report.updated_at,
            expires_at: report.expires_at,
        }
    }
}

/// Response for POST /api/reports/{id}/download
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadResponse {
    pub download_url: String,
    pub file_size: Option<i64>,
    pub format: ReportFormat,
}

/// Plain confirmation message
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_defaults() {
        let req: CreateReportRequest = serde_json::from_str(
            r#"{
                "title": "Growth Q1",
                "reportType": "growth_report",
                "pageIds": ["p1", "p2"],
                "dateFrom": "2025-01-01",
                "dateTo": "2025-03-31"
            }"#,
        )
        .unwrap();

        assert_eq!(req.format, ReportFormat::Pdf);
        assert!(!req.is_scheduled);
        assert!(req.frequency.is_none());
    }

    #[test]
    fn test_list_query_clamps_limit() {
        let query = ListReportsQuery {
            limit: Some(500),
            skip: Some(-3),
            ..ListReportsQuery::default()
        };
        let filter = query.into_filter();
        assert_eq!(filter.limit, 100);
        assert_eq!(filter.skip, 0);

        let filter = ListReportsQuery::default().into_filter();
        assert_eq!(filter.limit, 50);
        assert_eq!(filter.skip, 0);
    }

    #[test]
    fn test_response_serializes_camel_case() {
        use crate::domain::entities::{Report, ReportDraft};
        use kernel::id::OwnerId;

        let now = Utc::now();
        let report = Report::new(
            OwnerId::new(),
            ReportDraft {
                title: "t".to_string(),
                description: None,
                report_type: ReportType::PagePerformance,
                page_ids: vec![],
                date_from: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
                date_to: NaiveDate::from_ymd_opt(2025, 1, 2).unwrap(),
                format: ReportFormat::Json,
                is_scheduled: false,
                frequency: None,
            },
            now,
        );

        let json = serde_json::to_value(ReportResponse::from_report(&report, now)).unwrap();
        assert_eq!(json["reportType"], "page_performance");
        assert_eq!(json["downloadCount"], 0);
        assert_eq!(json["status"], "pending");
        assert!(json.get("report_type").is_none());
    }
}
