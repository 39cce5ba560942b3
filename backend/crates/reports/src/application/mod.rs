//! Application Layer

pub mod config;
pub mod lifecycle;
pub mod worker;
