//! PostgreSQL Repository Implementation

use chrono::Utc;
use kernel::id::{Id, OwnerId, ReportId};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entities::Report;
use crate::domain::repository::{ReportFilter, ReportRepository};
use crate::error::{ReportError, ReportResult};

const REPORT_COLUMNS: &str = r#"
    report_id, owner_id, title, description, report_type, page_ids,
    date_from, date_to, format, is_scheduled, frequency,
    next_generation, last_generated, status, progress,
    file_url, file_size, download_count, error_message,
    expires_at, created_at, updated_at
"#;

/// PostgreSQL-backed repository
#[derive(Clone)]
pub struct PgReportRepository {
    pool: PgPool,
}

impl PgReportRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Remove reports past their expiry.
    pub async fn cleanup_expired(&self) -> ReportResult<u64> {
        let deleted = sqlx::query("DELETE FROM reports WHERE expires_at IS NOT NULL AND expires_at < $1")
            .bind(Utc::now())
            .execute(&self.pool)
            .await?
            .rows_affected();

        if deleted > 0 {
            tracing::info!(reports = deleted, "cleaned up expired reports");
        }

        Ok(deleted)
    }
}

impl ReportRepository for PgReportRepository {
    async fn create(&self, report: &Report) -> ReportResult<()> {
        sqlx::query(
            r#"
            INSERT INTO reports (
                report_id, owner_id, title, description, report_type, page_ids,
                date_from, date_to, format, is_scheduled, frequency,
                next_generation, last_generated, status, progress,
                file_url, file_size, download_count, error_message,
                expires_at, created_at, updated_at
            ) VALUES (
                $1, $2, $3, $4, $5, $6,
                $7, $8, $9, $10, $11,
                $12, $13, $14, $15,
                $16, $17, $18, $19,
                $20, $21, $22
            )
            "#,
        )
        .bind(report.id.as_uuid())
        .bind(report.owner_id.as_uuid())
        .bind(&report.title)
        .bind(&report.description)
        .bind(report.report_type.as_str())
        .bind(&report.page_ids)
        .bind(report.date_from)
        .bind(report.date_to)
        .bind(report.format.as_str())
        .bind(report.is_scheduled)
        .bind(report.frequency.map(|f| f.as_str()))
        .bind(report.next_generation)
        .bind(report.last_generated)
        .bind(report.status.as_str())
        .bind(report.progress)
        .bind(&report.file_url)
        .bind(report.file_size)
        .bind(report.download_count)
        .bind(&report.error_message)
        .bind(report.expires_at)
        .bind(report.created_at)
        .bind(report.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get(&self, id: ReportId) -> ReportResult<Option<Report>> {
        let row = sqlx::query_as::<_, ReportRow>(&format!(
            "SELECT {REPORT_COLUMNS} FROM reports WHERE report_id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(ReportRow::into_report).transpose()
    }

    async fn get_for_owner(&self, id: ReportId, owner: OwnerId) -> ReportResult<Option<Report>> {
        let row = sqlx::query_as::<_, ReportRow>(&format!(
            "SELECT {REPORT_COLUMNS} FROM reports WHERE report_id = $1 AND owner_id = $2"
        ))
        .bind(id.as_uuid())
        .bind(owner.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(ReportRow::into_report).transpose()
    }

    async fn update(&self, report: &Report) -> ReportResult<()> {
        sqlx::query(
            r#"
            UPDATE reports SET
                title = $2,
                description = $3,
                is_scheduled = $4,
                frequency = $5,
                next_generation = $6,
                last_generated = $7,
                status = $8,
                progress = $9,
                file_url = $10,
                file_size = $11,
                download_count = $12,
                error_message = $13,
                expires_at = $14,
                updated_at = $15
            WHERE report_id = $1
            "#,
        )
        .bind(report.id.as_uuid())
        .bind(&report.title)
        .bind(&report.description)
        .bind(report.is_scheduled)
        .bind(report.frequency.map(|f| f.as_str()))
        .bind(report.next_generation)
        .bind(report.last_generated)
        .bind(report.status.as_str())
        .bind(report.progress)
        .bind(&report.file_url)
        .bind(report.file_size)
        .bind(report.download_count)
        .bind(&report.error_message)
        .bind(report.expires_at)
        .bind(report.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, id: ReportId, owner: OwnerId) -> ReportResult<bool> {
        let deleted = sqlx::query("DELETE FROM reports WHERE report_id = $1 AND owner_id = $2")
            .bind(id.as_uuid())
            .bind(owner.as_uuid())
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted > 0)
    }

    async fn list(&self, owner: OwnerId, filter: &ReportFilter) -> ReportResult<Vec<Report>> {
        let rows = sqlx::query_as::<_, ReportRow>(&format!(
            r#"
            SELECT {REPORT_COLUMNS} FROM reports
            WHERE owner_id = $1
              AND ($2::TEXT IS NULL OR status = $2)
              AND ($3::TEXT IS NULL OR report_type = $3)
            ORDER BY created_at DESC
            LIMIT $4 OFFSET $5
            "#
        ))
        .bind(owner.as_uuid())
        .bind(filter.status.map(|s| s.as_str()))
        .bind(filter.report_type.map(|t| t.as_str()))
        .bind(filter.limit)
        .bind(filter.skip)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(ReportRow::into_report).collect()
    }
}

// Internal row type for sqlx mapping
#[derive(sqlx::FromRow)]
struct ReportRow {
    report_id: Uuid,
    owner_id: Uuid,
    title: String,
    description: Option<String>,
    report_type: String,
    page_ids: Vec<String>,
    date_from: chrono::NaiveDate,
    date_to: chrono::NaiveDate,
    format: String,
    is_scheduled: bool,
    frequency: Option<String>,
    next_generation: Option<chrono::DateTime<Utc>>,
    last_generated: Option<chrono::DateTime<Utc>>,
    status: String,
    progress: i16,
    file_url: Option<String>,
    file_size: Option<i64>,
    download_count: i32,
    error_message: Option<String>,
    expires_at: Option<chrono::DateTime<Utc>>,
    created_at: chrono::DateTime<Utc>,
    updated_at: chrono::DateTime<Utc>,
}

impl ReportRow {
    fn into_report(self) -> ReportResult<Report> {
        Ok(Report {
            id: Id::from_uuid(self.report_id),
            owner_id: Id::from_uuid(self.owner_id),
            title: self.title,
            description: self.description,
            report_type: self.report_type.parse().map_err(ReportError::Internal)?,
            page_ids: self.page_ids,
            date_from: self.date_from,
            date_to: self.date_to,
            format: self.format.parse().map_err(ReportError::Internal)?,
            is_scheduled: self.is_scheduled,
            frequency: self
                .frequency
                .map(|f| f.parse().map_err(ReportError::Internal))
                .transpose()?,
            next_generation: self.next_generation,
            last_generated: self.last_generated,
            status: self.status.parse().map_err(ReportError::Internal)?,
            progress: self.progress,
            file_url: self.file_url,
            file_size: self.file_size,
            download_count: self.download_count,
            error_message: self.error_message,
            expires_at: self.expires_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
