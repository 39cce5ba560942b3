//! Report Lifecycle Module
//!
//! Analytics report records and the state machine that drives them:
//! `pending → generating → {completed, failed}`, with expiry derived from
//! time rather than stored as a transition.
//!
//! Clean Architecture structure:
//! - `domain/` - report entity, value objects, repository traits
//! - `application/` - lifecycle operations, generation worker, config
//! - `infra/` - PostgreSQL and in-memory repositories, stub renderer
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Concurrency Model
//! - Report creation enqueues a `GenerationJob` on a bounded channel
//! - One worker consumes the channel, so at most one writer drives any
//!   report through the generating phase
//! - A full queue leaves the report `pending`; nothing retries it

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::ReportConfig;
pub use application::lifecycle::{GenerationJob, ReportLifecycle};
pub use application::worker::GenerationWorker;
pub use error::{ReportError, ReportResult};
pub use infra::postgres::PgReportRepository;
pub use infra::renderer::StaticRenderer;
pub use presentation::router::{reports_router, reports_router_generic};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};
