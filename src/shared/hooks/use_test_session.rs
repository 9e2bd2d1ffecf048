//! Test session hook: signal-backed wrapper over the session state machine
//! plus the file-picker glue.

use dioxus::html::FileData;
use dioxus::prelude::*;

use crate::domain::models::CandidateImage;
use crate::shared::services::session::{SessionHandle, TestSession};

impl SessionHandle for Signal<TestSession> {
    fn with<R>(&self, f: impl FnOnce(&mut TestSession) -> R) -> R {
        let mut signal = *self;
        let mut session = signal.write();
        f(&mut session)
    }
}

#[derive(Clone, Copy)]
pub struct TestSessionState {
    pub session: Signal<TestSession>,
}

impl TestSessionState {
    pub fn images(&self) -> Vec<CandidateImage> {
        self.session.read().images().to_vec()
    }

    pub fn is_empty(&self) -> bool {
        self.session.read().images().is_empty()
    }

    pub fn remove(&mut self, index: usize) {
        self.session.write().remove_image(index);
    }

    /// Reads every picked file into the session. The picker's accept
    /// filter already narrows to images; anything else slipping through
    /// is dropped by the session itself.
    pub async fn add_files(&mut self, files: Vec<FileData>) {
        for file in files {
            let name = file.name();
            match file.read_bytes().await {
                Ok(bytes) => {
                    let mime = match file.content_type() {
                        Some(mime) if !mime.is_empty() => mime,
                        _ => mime_from_name(&name).to_string(),
                    };
                    self.session.write().add_image(name, mime, bytes.to_vec());
                }
                Err(err) => {
                    tracing::warn!(%name, %err, "could not read picked file");
                }
            }
        }
    }
}

/// Fallback content type when the browser does not report one.
pub fn mime_from_name(name: &str) -> &'static str {
    let extension = name.rsplit('.').next().unwrap_or_default().to_ascii_lowercase();
    match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        _ => "application/octet-stream",
    }
}

pub fn use_test_session() -> TestSessionState {
    let session = use_signal(TestSession::new);
    TestSessionState { session }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_fallback_covers_common_formats() {
        assert_eq!(mime_from_name("scan.JPG"), "image/jpeg");
        assert_eq!(mime_from_name("fundus.png"), "image/png");
        assert_eq!(mime_from_name("report.pdf"), "application/octet-stream");
        assert_eq!(mime_from_name("no-extension"), "application/octet-stream");
    }
}
