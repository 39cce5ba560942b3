//! Application Configuration

/// Report lifecycle configuration
#[derive(Debug, Clone)]
pub struct ReportConfig {
    /// Days a completed report stays downloadable; zero or negative means
    /// reports never expire
    pub retention_days: i64,
    /// Capacity of the generation job queue
    pub generation_queue_depth: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            retention_days: 30,
            generation_queue_depth: 64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ReportConfig::default();
        assert_eq!(config.retention_days, 30);
        assert_eq!(config.generation_queue_depth, 64);
    }
}
