//! Server-backed test history with client-side chart aggregation.
//!
//! The list is a read-through cache: every refresh re-fetches and replaces
//! it wholesale, so the server stays the single source of truth. Chart
//! buckets and rates are derived on demand and never stored.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde_json::json;

use crate::config::ApiEndpoints;
use crate::domain::models::{
    MonthlyBucket, TestHistoryRecord, TestResult, recommendations_for_stage,
};
use crate::shared::errors::{AppError, Result};
use crate::shared::services::transport::ApiTransport;
use crate::shared::storage::PersistedState;

pub struct TestHistory<H> {
    transport: Rc<H>,
    endpoints: Rc<ApiEndpoints>,
    storage: PersistedState,
    records: Rc<RefCell<Vec<TestHistoryRecord>>>,
    loaded: Rc<Cell<bool>>,
}

impl<H> Clone for TestHistory<H> {
    fn clone(&self) -> Self {
        Self {
            transport: Rc::clone(&self.transport),
            endpoints: Rc::clone(&self.endpoints),
            storage: self.storage.clone(),
            records: Rc::clone(&self.records),
            loaded: Rc::clone(&self.loaded),
        }
    }
}

impl<H: ApiTransport> TestHistory<H> {
    pub fn new(transport: Rc<H>, endpoints: Rc<ApiEndpoints>, storage: PersistedState) -> Self {
        Self {
            transport,
            endpoints,
            storage,
            records: Rc::new(RefCell::new(Vec::new())),
            loaded: Rc::new(Cell::new(false)),
        }
    }

    pub fn records(&self) -> Vec<TestHistoryRecord> {
        self.records.borrow().clone()
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.get()
    }

    /// Re-fetches the full list and replaces the cache. Without a stored
    /// token the list is simply empty; that is a valid signed-out state,
    /// not an error.
    pub async fn refresh(&self) -> Result<()> {
        let Some(token) = self.storage.token() else {
            self.records.borrow_mut().clear();
            self.loaded.set(true);
            return Ok(());
        };

        let body = self
            .transport
            .get_json(&self.endpoints.auth.get_tests, Some(&token))
            .await?;
        let tests: Vec<TestHistoryRecord> = body
            .get("tests")
            .cloned()
            .map(serde_json::from_value)
            .transpose()
            .map_err(|e| AppError::Malformed(e.to_string()))?
            .unwrap_or_default();

        *self.records.borrow_mut() = tests;
        self.loaded.set(true);
        Ok(())
    }

    /// Persists one analysis outcome server-side, then refreshes so the
    /// cached list carries the server-assigned id and ordering. Signed-out
    /// sessions skip persistence silently.
    pub async fn record(&self, result: &TestResult) -> Result<()> {
        let Some(token) = self.storage.token() else {
            return Ok(());
        };

        let payload = json!({
            "date": Utc::now().to_rfc3339(),
            "result": result.stage,
            "confidence": result.confidence,
            "status": "completed",
            "recommendations": recommendations_for_stage(&result.stage),
            "cloudinaryUrl": result.cloudinary_url,
        });
        self.transport
            .post_json(&self.endpoints.auth.add_test, &payload, Some(&token))
            .await?;
        self.refresh().await
    }
}

/// Six trailing calendar months ending at `now`, oldest first. Months with
/// no tests still appear so the chart keeps a fixed x-axis.
pub fn monthly_buckets(records: &[TestHistoryRecord], now: DateTime<Utc>) -> Vec<MonthlyBucket> {
    let month_index = |year: i32, month0: u32| year * 12 + month0 as i32;
    let newest = month_index(now.year(), now.month0());

    (newest - 5..=newest)
        .map(|index| {
            let year = index.div_euclid(12);
            let month0 = index.rem_euclid(12) as u32;
            // Constructed from a valid (year, month, 1) triple.
            let first_of_month = NaiveDate::from_ymd_opt(year, month0 + 1, 1)
                .unwrap_or_default();

            let in_month: Vec<_> = records
                .iter()
                .filter(|r| month_index(r.date.year(), r.date.month0()) == index)
                .collect();
            let total = in_month.len();
            let detected = in_month
                .iter()
                .filter(|r| !r.result.contains("No DR"))
                .count();
            let avg_confidence = if total == 0 {
                0.0
            } else {
                in_month.iter().map(|r| r.confidence).sum::<f64>() / total as f64
            };
            let detection_rate = if total == 0 {
                0.0
            } else {
                detected as f64 / total as f64 * 100.0
            };

            MonthlyBucket {
                month: first_of_month.format("%b %y").to_string(),
                total_tests: total,
                dr_detected: detected,
                no_dr_detected: total - detected,
                avg_confidence,
                detection_rate,
            }
        })
        .collect()
}

/// Share of records whose stage indicates retinopathy, as a percentage.
pub fn detection_rate(records: &[TestHistoryRecord]) -> f64 {
    if records.is_empty() {
        return 0.0;
    }
    let detected = records.iter().filter(|r| !r.result.contains("No DR")).count();
    detected as f64 / records.len() as f64 * 100.0
}

pub fn average_confidence(records: &[TestHistoryRecord]) -> f64 {
    if records.is_empty() {
        return 0.0;
    }
    records.iter().map(|r| r.confidence).sum::<f64>() / records.len() as f64
}
