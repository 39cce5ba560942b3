//! HTTP Handlers

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use chrono::Utc;
use kernel::id::{Id, OwnerId, ReportId};
use uuid::Uuid;

use crate::application::lifecycle::ReportLifecycle;
use crate::domain::repository::ReportRepository;
use crate::error::{ReportError, ReportResult};
use crate::presentation::dto::{
    CreateReportRequest, DownloadResponse, ListReportsQuery, MessageResponse, ReportResponse,
};

/// Shared state for report handlers
pub struct ReportsAppState<R>
where
    R: ReportRepository + Send + Sync + 'static,
{
    pub lifecycle: ReportLifecycle<R>,
}

impl<R> Clone for ReportsAppState<R>
where
    R: ReportRepository + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            lifecycle: self.lifecycle.clone(),
        }
    }
}

/// Pull the caller identity from the `X-Owner-Id` header.
///
/// Stands in for real authentication, which lives outside this service;
/// the gateway is expected to set the header after verifying the caller.
fn extract_owner(headers: &HeaderMap) -> ReportResult<OwnerId> {
    headers
        .get("x-owner-id")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<Uuid>().ok())
        .map(Id::from_uuid)
        .ok_or(ReportError::Unauthorized)
}

/// GET /api/reports
pub async fn list_reports<R>(
    State(state): State<ReportsAppState<R>>,
    headers: HeaderMap,
    Query(query): Query<ListReportsQuery>,
) -> ReportResult<Json<Vec<ReportResponse>>>
where
    R: ReportRepository + Send + Sync + 'static,
{
    let owner = extract_owner(&headers)?;
    let filter = query.into_filter();
    let reports = state.lifecycle.list(owner, &filter).await?;

    let now = Utc::now();
    Ok(Json(
        reports
            .iter()
            .map(|report| ReportResponse::from_report(report, now))
            .collect(),
    ))
}

/// POST /api/reports
pub async fn create_report<R>(
    State(state): State<ReportsAppState<R>>,
    headers: HeaderMap,
    Json(req): Json<CreateReportRequest>,
) -> ReportResult<(StatusCode, Json<ReportResponse>)>
where
    R: ReportRepository + Send + Sync + 'static,
{
    let owner = extract_owner(&headers)?;

    if req.title.trim().is_empty() {
        return Err(ReportError::Validation("title must not be empty".into()));
    }
    if req.date_from > req.date_to {
        return Err(ReportError::Validation(
            "dateFrom must not be after dateTo".into(),
        ));
    }

    let report = state.lifecycle.create(owner, req.into()).await?;

    Ok((
        StatusCode::CREATED,
        Json(ReportResponse::from_report(&report, Utc::now())),
    ))
}

/// GET /api/reports/{id}
pub async fn get_report<R>(
    State(state): State<ReportsAppState<R>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> ReportResult<Json<ReportResponse>>
where
    R: ReportRepository + Send + Sync + 'static,
{
    let owner = extract_owner(&headers)?;
    let report = state.lifecycle.get(ReportId::from_uuid(id), owner).await?;

    Ok(Json(ReportResponse::from_report(&report, Utc::now())))
}

/// DELETE /api/reports/{id}
pub async fn delete_report<R>(
    State(state): State<ReportsAppState<R>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> ReportResult<Json<MessageResponse>>
where
    R: ReportRepository + Send + Sync + 'static,
{
    let owner = extract_owner(&headers)?;
    state.lifecycle.delete(ReportId::from_uuid(id), owner).await?;

    Ok(Json(MessageResponse {
        message: "Report successfully deleted".to_string(),
    }))
}

/// POST /api/reports/{id}/download
pub async fn download_report<R>(
    State(state): State<ReportsAppState<R>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> ReportResult<Json<DownloadResponse>>
where
    R: ReportRepository + Send + Sync + 'static,
{
    let owner = extract_owner(&headers)?;
    let id = ReportId::from_uuid(id);

    let report = state.lifecycle.get(id, owner).await?;
    if !report.can_be_downloaded(Utc::now()) {
        return Err(ReportError::NotDownloadable);
    }

    state.lifecycle.record_download(id).await?;

    // can_be_downloaded guarantees the URL exists
    let download_url = report.file_url.clone().unwrap_or_default();

    Ok(Json(DownloadResponse {
        download_url,
        file_size: report.file_size,
        format: report.format,
    }))
}
