// Custom Dioxus hooks
pub mod use_model_readiness;
pub mod use_test_history;
pub mod use_test_session;

use std::rc::Rc;

use dioxus::prelude::*;

use crate::shared::errors::AppError;
use crate::shared::services::{AppServices, FetchTransport};

pub use use_model_readiness::{ModelReadiness, use_model_readiness};
pub use use_test_history::{TestHistoryState, use_test_history};
pub use use_test_session::{TestSessionState, use_test_session};

/// App-wide service container, provided once at the root. Carries the
/// configuration error too, so the root can render a diagnostic screen
/// instead of a broken app.
#[derive(Clone)]
pub struct ServicesContext(pub Rc<Result<AppServices<FetchTransport>, AppError>>);

/// Shorthand used by pages below the router. The router is only mounted
/// when configuration resolved, so the unwrap here mirrors the usual
/// missing-context panic rather than a runtime condition.
pub fn use_services() -> AppServices<FetchTransport> {
    let ctx = use_context::<ServicesContext>();
    match ctx.0.as_ref() {
        Ok(services) => services.clone(),
        Err(err) => panic!("services context unavailable: {err}"),
    }
}
