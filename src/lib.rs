// Public API exports (UI plus the service layer used by tests)
pub mod app;
pub mod config;
pub mod domain;
pub mod shared;
