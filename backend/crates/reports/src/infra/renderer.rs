//! Stub Renderer
//!
//! Rendering real files is out of scope; this produces a deterministic
//! file URL and a fixed size so the lifecycle can complete end to end.

use crate::application::worker::{RenderedReport, ReportRenderer};
use crate::domain::entities::Report;

const STUB_FILE_SIZE: i64 = 100 * 1024;

#[derive(Debug, Clone)]
pub struct StaticRenderer {
    base_url: String,
}

impl Default for StaticRenderer {
    fn default() -> Self {
        Self::new("https://files.example.com/reports")
    }
}

impl StaticRenderer {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

impl ReportRenderer for StaticRenderer {
    async fn render(
        &self,
        report: &Report,
    ) -> Result<RenderedReport, Box<dyn std::error::Error + Send + Sync>> {
        let file_url = format!(
            "{}/{}.{}",
            self.base_url,
            report.id,
            report.format.as_str()
        );
        Ok(RenderedReport {
            file_url,
            file_size: Some(STUB_FILE_SIZE),
        })
    }
}
