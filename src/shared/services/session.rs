//! In-memory state machine for a screening session.
//!
//! Candidate images live only for the page visit: capture, preview,
//! analyze, show a result or an error. The sync `begin_analysis` guard is
//! what makes a double-clicked Analyze button idempotent; everything async
//! afterwards addresses the image by id so removal mid-flight is harmless.

use std::cell::RefCell;
use std::rc::Rc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::models::{CandidateImage, GalleryEntry, TestResult};
use crate::shared::errors::AppError;
use crate::shared::services::AppServices;
use crate::shared::services::transport::{ApiTransport, Part};

/// Snapshot handed to the analysis pipeline by `begin_analysis`. Owning
/// copies of name and bytes keeps the async work independent of the list.
#[derive(Debug, Clone)]
pub struct AnalysisTicket {
    pub id: String,
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Default)]
pub struct TestSession {
    images: Vec<CandidateImage>,
}

impl TestSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn images(&self) -> &[CandidateImage] {
        &self.images
    }

    /// Appends a candidate with an inline preview. Non-image files are
    /// dropped silently, matching the file input's accept filter.
    pub fn add_image(&mut self, file_name: String, mime_type: String, bytes: Vec<u8>) {
        if !mime_type.starts_with("image/") {
            tracing::debug!(%file_name, %mime_type, "skipping non-image file");
            return;
        }
        let preview_data_url = format!("data:{mime_type};base64,{}", BASE64.encode(&bytes));
        self.images.push(CandidateImage {
            id: Uuid::new_v4().to_string(),
            file_name,
            mime_type,
            bytes,
            preview_data_url,
            result: None,
            is_analyzing: false,
            error: None,
            remote_url: None,
        });
    }

    pub fn remove_image(&mut self, index: usize) {
        if index < self.images.len() {
            self.images.remove(index);
        }
    }

    /// Claims an image for analysis. Returns `None` when the index is out
    /// of range, the image is already in flight, or it already has a
    /// result; the caller must treat `None` as "nothing to do".
    pub fn begin_analysis(&mut self, index: usize) -> Option<AnalysisTicket> {
        let image = self.images.get_mut(index)?;
        if image.is_analyzing || image.result.is_some() {
            return None;
        }
        image.is_analyzing = true;
        image.error = None;
        Some(AnalysisTicket {
            id: image.id.clone(),
            file_name: image.file_name.clone(),
            mime_type: image.mime_type.clone(),
            bytes: image.bytes.clone(),
        })
    }

    /// Attaches a result by id. A miss means the image was removed while
    /// analysis ran; the outcome is discarded.
    pub fn complete_analysis(&mut self, id: &str, result: TestResult) {
        if let Some(image) = self.images.iter_mut().find(|i| i.id == id) {
            image.is_analyzing = false;
            image.remote_url = result.cloudinary_url.clone();
            image.result = Some(result);
        }
    }

    pub fn fail_analysis(&mut self, id: &str, message: String) {
        if let Some(image) = self.images.iter_mut().find(|i| i.id == id) {
            image.is_analyzing = false;
            image.error = Some(message);
        }
    }
}

/// Access seam over the session's interior mutability, so the pipeline
/// works against both a plain `Rc<RefCell<_>>` in tests and a reactive
/// signal in the UI.
pub trait SessionHandle: Clone + 'static {
    fn with<R>(&self, f: impl FnOnce(&mut TestSession) -> R) -> R;
}

impl SessionHandle for Rc<RefCell<TestSession>> {
    fn with<R>(&self, f: impl FnOnce(&mut TestSession) -> R) -> R {
        f(&mut self.borrow_mut())
    }
}

/// Full pipeline for one image: claim, upload to remote storage, submit to
/// the inference endpoint, attach the outcome, then persist the gallery
/// entry and the history record. Upload and analysis failures surface on
/// the image; a history write failure only logs, since the diagnosis
/// itself already succeeded.
pub async fn analyze_image<S, H>(session: &S, index: usize, services: &AppServices<H>)
where
    S: SessionHandle,
    H: ApiTransport,
{
    let Some(ticket) = session.with(|s| s.begin_analysis(index)) else {
        return;
    };

    let upload = match services
        .uploads
        .upload_image(
            ticket.bytes.clone(),
            &ticket.file_name,
            &ticket.mime_type,
            "scans",
        )
        .await
    {
        Ok(upload) => upload,
        Err(err) => {
            session.with(|s| s.fail_analysis(&ticket.id, err.to_string()));
            return;
        }
    };

    let body = match services
        .transport
        .post_multipart(
            &services.endpoints.analyze,
            vec![(
                "image",
                Part::Bytes {
                    data: ticket.bytes.clone(),
                    file_name: ticket.file_name.clone(),
                    mime_type: ticket.mime_type.clone(),
                },
            )],
        )
        .await
    {
        Ok(body) => body,
        Err(err) => {
            session.with(|s| s.fail_analysis(&ticket.id, err.to_string()));
            return;
        }
    };

    let mut result: TestResult = match serde_json::from_value(body) {
        Ok(result) => result,
        Err(err) => {
            let err = AppError::Malformed(err.to_string());
            session.with(|s| s.fail_analysis(&ticket.id, err.to_string()));
            return;
        }
    };
    result.cloudinary_url = Some(upload.secure_url.clone());
    result.cloudinary_public_id = Some(upload.public_id.clone());

    session.with(|s| s.complete_analysis(&ticket.id, result.clone()));

    services.storage.push_gallery_entry(GalleryEntry {
        cloudinary_url: upload.secure_url,
        public_id: upload.public_id,
        uploaded_at: Utc::now(),
        file_name: ticket.file_name,
        analysis_result: result.stage.clone(),
    });

    if let Err(err) = services.history.record(&result).await {
        tracing::warn!(%err, "analysis succeeded but history write failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::services::testing::test_services;
    use crate::shared::services::transport::testing::MockTransport;
    use futures::executor::block_on;
    use serde_json::json;

    const JPEG: &str = "image/jpeg";

    fn session_with_one_image() -> Rc<RefCell<TestSession>> {
        let session = Rc::new(RefCell::new(TestSession::new()));
        session
            .borrow_mut()
            .add_image("scan.jpg".into(), JPEG.into(), vec![0xff, 0xd8, 0xff]);
        session
    }

    #[test]
    fn non_image_files_are_rejected() {
        let mut session = TestSession::new();
        session.add_image("notes.txt".into(), "text/plain".into(), vec![1, 2]);
        session.add_image("scan.png".into(), "image/png".into(), vec![3, 4]);
        assert_eq!(session.images().len(), 1);
        assert_eq!(session.images()[0].file_name, "scan.png");
        assert!(session.images()[0]
            .preview_data_url
            .starts_with("data:image/png;base64,"));
    }

    #[test]
    fn begin_analysis_claims_at_most_once() {
        let mut session = TestSession::new();
        session.add_image("scan.jpg".into(), JPEG.into(), vec![1]);

        assert!(session.begin_analysis(0).is_some());
        assert!(session.begin_analysis(0).is_none(), "already in flight");
        assert!(session.begin_analysis(7).is_none(), "out of range");
    }

    #[test]
    fn completed_images_cannot_be_reanalyzed() {
        let mut session = TestSession::new();
        session.add_image("scan.jpg".into(), JPEG.into(), vec![1]);
        let ticket = session.begin_analysis(0).unwrap();
        session.complete_analysis(
            &ticket.id,
            TestResult {
                stage: "No DR".into(),
                confidence: 97.0,
                recommendations: Vec::new(),
                cloudinary_url: None,
                cloudinary_public_id: None,
            },
        );
        assert!(session.begin_analysis(0).is_none());
    }

    #[test]
    fn failure_clears_on_retry() {
        let mut session = TestSession::new();
        session.add_image("scan.jpg".into(), JPEG.into(), vec![1]);
        let ticket = session.begin_analysis(0).unwrap();
        session.fail_analysis(&ticket.id, "upstream down".into());
        assert_eq!(session.images()[0].error.as_deref(), Some("upstream down"));

        // A retry is allowed and wipes the stale error.
        let ticket = session.begin_analysis(0).unwrap();
        assert!(session.images()[0].error.is_none());
        session.fail_analysis(&ticket.id, "still down".into());
    }

    #[test]
    fn outcome_for_a_removed_image_is_discarded() {
        let mut session = TestSession::new();
        session.add_image("scan.jpg".into(), JPEG.into(), vec![1]);
        let ticket = session.begin_analysis(0).unwrap();
        session.remove_image(0);
        session.complete_analysis(
            &ticket.id,
            TestResult {
                stage: "No DR".into(),
                confidence: 97.0,
                recommendations: Vec::new(),
                cloudinary_url: None,
                cloudinary_public_id: None,
            },
        );
        assert!(session.images().is_empty());
    }

    #[test]
    fn pipeline_uploads_analyzes_and_persists() {
        let transport = Rc::new(MockTransport::new(|call| {
            if call.url.contains("cloudinary") {
                Ok(json!({"secure_url": "https://res.example/scan.jpg",
                          "public_id": "scans/1_scan_jpg"}))
            } else if call.url.ends_with("/analyze") {
                Ok(json!({"stage": "Mild NPDR", "confidence": 83.2}))
            } else if call.url.ends_with("/add-test") {
                Ok(json!({"ok": true}))
            } else {
                Ok(json!({"tests": []}))
            }
        }));
        let services = test_services(Rc::clone(&transport));
        services.storage.set_session(
            "tok",
            &crate::domain::models::User {
                id: "u1".into(),
                username: "pat".into(),
                email: "p@x.io".into(),
                age: None,
            },
        );
        let session = session_with_one_image();

        block_on(analyze_image(&session, 0, &services));

        let images = session.borrow();
        let image = &images.images()[0];
        assert!(!image.is_analyzing);
        assert!(image.error.is_none());
        let result = image.result.as_ref().unwrap();
        assert_eq!(result.stage, "Mild NPDR");
        assert_eq!(
            result.cloudinary_url.as_deref(),
            Some("https://res.example/scan.jpg")
        );

        let gallery = services.storage.gallery();
        assert_eq!(gallery.len(), 1);
        assert_eq!(gallery[0].analysis_result, "Mild NPDR");
        assert_eq!(transport.count("POST", "/add-test"), 1);
    }

    #[test]
    fn double_invocation_runs_the_pipeline_once() {
        let transport = Rc::new(MockTransport::new(|call| {
            if call.url.contains("cloudinary") {
                Ok(json!({"secure_url": "https://res.example/scan.jpg",
                          "public_id": "scans/1_scan_jpg"}))
            } else if call.url.ends_with("/analyze") {
                Ok(json!({"stage": "No DR", "confidence": 96.0}))
            } else {
                Ok(json!({"tests": []}))
            }
        }));
        let services = test_services(Rc::clone(&transport));
        let session = session_with_one_image();

        block_on(async {
            futures::join!(
                analyze_image(&session, 0, &services),
                analyze_image(&session, 0, &services),
            );
        });

        assert_eq!(transport.count("MULTIPART", "cloudinary"), 1);
        assert_eq!(transport.count("MULTIPART", "/analyze"), 1);
    }

    #[test]
    fn upload_failure_lands_on_the_image() {
        let transport = Rc::new(MockTransport::new(|call| {
            if call.url.contains("cloudinary") {
                Err(AppError::Api {
                    status: 401,
                    message: "Invalid Signature".into(),
                })
            } else {
                panic!("analysis must not run after a failed upload");
            }
        }));
        let services = test_services(transport);
        let session = session_with_one_image();

        block_on(analyze_image(&session, 0, &services));

        let images = session.borrow();
        let image = &images.images()[0];
        assert!(image.result.is_none());
        assert!(image.error.as_deref().unwrap().contains("Invalid Signature"));
        assert!(services.storage.gallery().is_empty());
    }

    #[test]
    fn history_write_failure_keeps_the_result() {
        let transport = Rc::new(MockTransport::new(|call| {
            if call.url.contains("cloudinary") {
                Ok(json!({"secure_url": "https://res.example/scan.jpg",
                          "public_id": "scans/1_scan_jpg"}))
            } else if call.url.ends_with("/analyze") {
                Ok(json!({"stage": "Severe NPDR", "confidence": 71.0}))
            } else {
                Err(AppError::Api {
                    status: 500,
                    message: "db down".into(),
                })
            }
        }));
        let services = test_services(transport);
        services.storage.set_session(
            "tok",
            &crate::domain::models::User {
                id: "u1".into(),
                username: "pat".into(),
                email: "p@x.io".into(),
                age: None,
            },
        );
        let session = session_with_one_image();

        block_on(analyze_image(&session, 0, &services));

        let images = session.borrow();
        let image = &images.images()[0];
        assert!(image.error.is_none(), "history failure must stay silent");
        assert_eq!(image.result.as_ref().unwrap().stage, "Severe NPDR");
        assert_eq!(services.storage.gallery().len(), 1);
    }
}
