//! Domain Value Objects
//!
//! Closed enums for report classification. Wire and database encodings are
//! the snake_case names.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Report generation status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Pending,
    Generating,
    Completed,
    Failed,
    /// Derived from `expires_at`, never written by a transition
    Expired,
}

impl ReportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Pending => "pending",
            ReportStatus::Generating => "generating",
            ReportStatus::Completed => "completed",
            ReportStatus::Failed => "failed",
            ReportStatus::Expired => "expired",
        }
    }
}

impl FromStr for ReportStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ReportStatus::Pending),
            "generating" => Ok(ReportStatus::Generating),
            "completed" => Ok(ReportStatus::Completed),
            "failed" => Ok(ReportStatus::Failed),
            "expired" => Ok(ReportStatus::Expired),
            other => Err(format!("unknown report status: {other}")),
        }
    }
}

/// What the report covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportType {
    PagePerformance,
    PostAnalysis,
    EngagementSummary,
    GrowthReport,
    CompetitiveAnalysis,
    Custom,
}

impl ReportType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportType::PagePerformance => "page_performance",
            ReportType::PostAnalysis => "post_analysis",
            ReportType::EngagementSummary => "engagement_summary",
            ReportType::GrowthReport => "growth_report",
            ReportType::CompetitiveAnalysis => "competitive_analysis",
            ReportType::Custom => "custom",
        }
    }
}

impl FromStr for ReportType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "page_performance" => Ok(ReportType::PagePerformance),
            "post_analysis" => Ok(ReportType::PostAnalysis),
            "engagement_summary" => Ok(ReportType::EngagementSummary),
            "growth_report" => Ok(ReportType::GrowthReport),
            "competitive_analysis" => Ok(ReportType::CompetitiveAnalysis),
            "custom" => Ok(ReportType::Custom),
            other => Err(format!("unknown report type: {other}")),
        }
    }
}

/// Output file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportFormat {
    Pdf,
    Csv,
    Excel,
    Json,
}

impl ReportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportFormat::Pdf => "pdf",
            ReportFormat::Csv => "csv",
            ReportFormat::Excel => "excel",
            ReportFormat::Json => "json",
        }
    }
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pdf" => Ok(ReportFormat::Pdf),
            "csv" => Ok(ReportFormat::Csv),
            "excel" => Ok(ReportFormat::Excel),
            "json" => Ok(ReportFormat::Json),
            other => Err(format!("unknown report format: {other}")),
        }
    }
}

/// Regeneration cadence for scheduled reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportFrequency {
    Once,
    Daily,
    Weekly,
    Monthly,
    Quarterly,
}

impl ReportFrequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportFrequency::Once => "once",
            ReportFrequency::Daily => "daily",
            ReportFrequency::Weekly => "weekly",
            ReportFrequency::Monthly => "monthly",
            ReportFrequency::Quarterly => "quarterly",
        }
    }

    /// Fixed day offset to the next generation, `None` for one-shot reports.
    ///
    /// Monthly and quarterly use 30/90 day approximations rather than
    /// calendar arithmetic.
    pub fn next_offset_days(&self) -> Option<i64> {
        match self {
            ReportFrequency::Once => None,
            ReportFrequency::Daily => Some(1),
            ReportFrequency::Weekly => Some(7),
            ReportFrequency::Monthly => Some(30),
            ReportFrequency::Quarterly => Some(90),
        }
    }
}

impl FromStr for ReportFrequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "once" => Ok(ReportFrequency::Once),
            "daily" => Ok(ReportFrequency::Daily),
            "weekly" => Ok(ReportFrequency::Weekly),
            "monthly" => Ok(ReportFrequency::Monthly),
            "quarterly" => Ok(ReportFrequency::Quarterly),
            other => Err(format!("unknown report frequency: {other}")),
        }
    }
}
