use thiserror::Error;

/// Application error taxonomy.
///
/// Every variant carries owned strings so errors stay `Clone`; the warmup
/// future is shared between concurrent callers and each of them receives
/// its own copy of the outcome.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum AppError {
    /// Fatal at startup: one entry per missing environment variable.
    #[error("Missing API configuration: {}", .0.join(", "))]
    Config(Vec<&'static str>),

    #[error("Network error: {0}")]
    Transport(String),

    /// Remote service answered with a non-2xx status.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// Response body did not match the expected shape.
    #[error("Unexpected response: {0}")]
    Malformed(String),

    /// Object-storage provider rejected an upload; message passed through verbatim.
    #[error("Upload failed: {0}")]
    Upload(String),

    #[error("No analyzed images to export")]
    NothingToExport,

    #[error("Report generation failed: {0}")]
    Export(String),
}

pub type Result<T> = std::result::Result<T, AppError>;
