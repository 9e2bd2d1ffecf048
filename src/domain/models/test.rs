use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Diagnosis returned by the inference service for one retinal image.
/// Immutable once attached to a candidate image or a history record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    /// Diagnosis label, e.g. "No DR", "Mild NPDR", "Moderate NPDR".
    pub stage: String,
    /// Model confidence, 0-100.
    pub confidence: f64,
    #[serde(default)]
    pub recommendations: Vec<String>,
    /// Remote-storage URL merged in after a successful upload.
    #[serde(default, rename = "cloudinaryUrl")]
    pub cloudinary_url: Option<String>,
    #[serde(default, rename = "cloudinaryPublicId")]
    pub cloudinary_public_id: Option<String>,
}

impl TestResult {
    /// Whether the stage indicates diabetic retinopathy was found.
    pub fn is_dr_positive(&self) -> bool {
        !self.stage.contains("No DR")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    Completed,
    Pending,
}

/// One completed test as stored server-side; the client holds a
/// read-through cache refreshed by full re-fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestHistoryRecord {
    #[serde(default, rename = "_id")]
    pub id: String,
    pub date: DateTime<Utc>,
    /// Stage string, mirrors `TestResult::stage`.
    pub result: String,
    pub confidence: f64,
    pub status: TestStatus,
    #[serde(default)]
    pub recommendations: Vec<String>,
    #[serde(default, rename = "cloudinaryUrl")]
    pub cloudinary_url: Option<String>,
}

/// A user-selected file awaiting or having undergone analysis during the
/// current page visit. Lives only in the test session's in-memory list;
/// insertion order is display order.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateImage {
    pub id: String,
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
    pub preview_data_url: String,
    pub result: Option<TestResult>,
    pub is_analyzing: bool,
    pub error: Option<String>,
    pub remote_url: Option<String>,
}

/// Gallery entry persisted after each successful analysis
/// (localStorage key `cloudinaryImages`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryEntry {
    pub cloudinary_url: String,
    pub public_id: String,
    pub uploaded_at: DateTime<Utc>,
    pub file_name: String,
    pub analysis_result: String,
}

/// Metadata for a generated PDF report (localStorage key `pdfReports`).
/// Reports are download-only; `local_only` records that nothing was uploaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMeta {
    pub file_name: String,
    pub generated_at: DateTime<Utc>,
    pub analysis_count: usize,
    pub local_only: bool,
}

/// Derived chart bucket for one calendar month. Never persisted; recomputed
/// from the history list on each render.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyBucket {
    /// Label in "Mon YY" form, e.g. "Aug 26".
    pub month: String,
    pub total_tests: usize,
    pub dr_detected: usize,
    pub no_dr_detected: usize,
    pub avg_confidence: f64,
    pub detection_rate: f64,
}
