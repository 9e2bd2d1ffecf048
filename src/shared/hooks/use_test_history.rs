//! History hook: mirrors the server-backed test list into signals and
//! exposes the derived chart data.

use chrono::Utc;
use dioxus::prelude::*;

use super::use_services;
use crate::domain::models::{MonthlyBucket, TestHistoryRecord};
use crate::shared::services::history::{average_confidence, detection_rate, monthly_buckets};

#[derive(Clone, Copy, PartialEq)]
pub struct TestHistoryState {
    pub records: Signal<Vec<TestHistoryRecord>>,
    pub loading: Signal<bool>,
    pub error: Signal<Option<String>>,
}

impl TestHistoryState {
    pub fn total(&self) -> usize {
        self.records.read().len()
    }

    pub fn detection_rate(&self) -> f64 {
        detection_rate(&self.records.read())
    }

    pub fn average_confidence(&self) -> f64 {
        average_confidence(&self.records.read())
    }

    pub fn buckets(&self) -> Vec<MonthlyBucket> {
        monthly_buckets(&self.records.read(), Utc::now())
    }
}

/// Fetches once on mount and re-exposes the cached list. Pages that write
/// new tests go through the service, which refreshes the shared cache;
/// calling `use_test_history` again picks the update up on next mount.
pub fn use_test_history() -> TestHistoryState {
    let services = use_services();
    let mut records = use_signal(Vec::new);
    let mut loading = use_signal(|| true);
    let mut error = use_signal(|| None::<String>);

    use_future(move || {
        let services = services.clone();
        async move {
            match services.history.refresh().await {
                Ok(()) => records.set(services.history.records()),
                Err(err) => error.set(Some(err.to_string())),
            }
            loading.set(false);
        }
    });

    TestHistoryState {
        records,
        loading,
        error,
    }
}
