//! Reports Router

use axum::{
    Router,
    routing::{get, post},
};

use crate::application::lifecycle::ReportLifecycle;
use crate::domain::repository::ReportRepository;
use crate::infra::postgres::PgReportRepository;
use crate::presentation::handlers::{self, ReportsAppState};

/// Create the reports router with the PostgreSQL repository
pub fn reports_router(lifecycle: ReportLifecycle<PgReportRepository>) -> Router {
    reports_router_generic(lifecycle)
}

/// Create a generic reports router for any repository implementation
pub fn reports_router_generic<R>(lifecycle: ReportLifecycle<R>) -> Router
where
    R: ReportRepository + Send + Sync + 'static,
{
    let state = ReportsAppState { lifecycle };

    Router::new()
        .route(
            "/",
            get(handlers::list_reports::<R>).post(handlers::create_report::<R>),
        )
        .route(
            "/{id}",
            get(handlers::get_report::<R>).delete(handlers::delete_report::<R>),
        )
        .route("/{id}/download", post(handlers::download_report::<R>))
        .with_state(state)
}
