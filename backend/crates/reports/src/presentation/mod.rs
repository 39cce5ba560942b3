//! Presentation Layer
//!
//! HTTP handlers, DTOs, and router.

pub mod dto;
pub mod handlers;
pub mod router;

pub use handlers::ReportsAppState;
pub use router::{reports_router, reports_router_generic};
