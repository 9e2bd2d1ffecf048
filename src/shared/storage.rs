//! Persisted client state: a small typed facade over the browser's
//! localStorage. Durable across reloads, never synced across devices.
//!
//! Off-wasm the same API is backed by an in-memory map so services and
//! tests run natively without a browser.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::domain::models::{GalleryEntry, ReportMeta, Session, User};

const KEY_TOKEN: &str = "token";
const KEY_USER: &str = "user";
const KEY_GALLERY: &str = "cloudinaryImages";
const KEY_REPORTS: &str = "pdfReports";

#[derive(Clone, Default)]
pub struct PersistedState {
    #[cfg(not(target_arch = "wasm32"))]
    map: std::rc::Rc<std::cell::RefCell<std::collections::HashMap<String, String>>>,
}

impl PersistedState {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(target_arch = "wasm32")]
    fn get_raw(&self, key: &str) -> Option<String> {
        let storage = web_sys::window()?.local_storage().ok()??;
        storage.get_item(key).ok()?
    }

    #[cfg(target_arch = "wasm32")]
    fn set_raw(&self, key: &str, value: &str) {
        if let Some(Ok(Some(storage))) = web_sys::window().map(|w| w.local_storage()) {
            if storage.set_item(key, value).is_err() {
                tracing::warn!(key, "localStorage write failed");
            }
        }
    }

    #[cfg(target_arch = "wasm32")]
    fn remove_raw(&self, key: &str) {
        if let Some(Ok(Some(storage))) = web_sys::window().map(|w| w.local_storage()) {
            let _ = storage.remove_item(key);
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn get_raw(&self, key: &str) -> Option<String> {
        self.map.borrow().get(key).cloned()
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn set_raw(&self, key: &str, value: &str) {
        self.map.borrow_mut().insert(key.to_string(), value.to_string());
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn remove_raw(&self, key: &str) {
        self.map.borrow_mut().remove(key);
    }

    fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.get_raw(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key, error = %e, "discarding unreadable stored value");
                None
            }
        }
    }

    fn set_json<T: Serialize>(&self, key: &str, value: &T) {
        match serde_json::to_string(value) {
            Ok(raw) => self.set_raw(key, &raw),
            Err(e) => tracing::warn!(key, error = %e, "failed to serialize stored value"),
        }
    }

    // --- session ---

    pub fn token(&self) -> Option<String> {
        self.get_raw(KEY_TOKEN).filter(|t| !t.is_empty())
    }

    pub fn user(&self) -> Option<User> {
        self.get_json(KEY_USER)
    }

    /// The token is trusted without any expiry validation; absence of a
    /// token is the only thing that ends a session client-side.
    pub fn session(&self) -> Option<Session> {
        let token = self.token()?;
        let user = self.user()?;
        Some(Session { token, user })
    }

    pub fn set_session(&self, token: &str, user: &User) {
        self.set_raw(KEY_TOKEN, token);
        self.set_json(KEY_USER, user);
    }

    pub fn clear_session(&self) {
        self.remove_raw(KEY_TOKEN);
        self.remove_raw(KEY_USER);
    }

    // --- uploaded-scan gallery ---

    pub fn gallery(&self) -> Vec<GalleryEntry> {
        self.get_json(KEY_GALLERY).unwrap_or_default()
    }

    pub fn push_gallery_entry(&self, entry: GalleryEntry) {
        let mut entries = self.gallery();
        entries.push(entry);
        self.set_json(KEY_GALLERY, &entries);
    }

    // --- generated-report metadata ---

    pub fn reports(&self) -> Vec<ReportMeta> {
        self.get_json(KEY_REPORTS).unwrap_or_default()
    }

    pub fn push_report(&self, meta: ReportMeta) {
        let mut entries = self.reports();
        entries.push(meta);
        self.set_json(KEY_REPORTS, &entries);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user() -> User {
        User {
            id: "u1".into(),
            username: "a".into(),
            email: "a@b.com".into(),
            age: Some(54),
        }
    }

    #[test]
    fn session_round_trip() {
        let state = PersistedState::new();
        assert!(state.session().is_none());

        state.set_session("tok", &user());
        let session = state.session().unwrap();
        assert_eq!(session.token, "tok");
        assert_eq!(session.user.username, "a");

        state.clear_session();
        assert!(state.token().is_none());
        assert!(state.user().is_none());
    }

    #[test]
    fn gallery_appends_in_order() {
        let state = PersistedState::new();
        for name in ["left.jpg", "right.jpg"] {
            state.push_gallery_entry(GalleryEntry {
                cloudinary_url: format!("https://cdn.example/{name}"),
                public_id: format!("scans/{name}"),
                uploaded_at: Utc::now(),
                file_name: name.into(),
                analysis_result: "No DR".into(),
            });
        }
        let entries = state.gallery();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].file_name, "left.jpg");
        assert_eq!(entries[1].file_name, "right.jpg");
    }

    #[test]
    fn report_metadata_round_trip() {
        let state = PersistedState::new();
        state.push_report(ReportMeta {
            file_name: "Retinopathy_Report_2026-08-28.pdf".into(),
            generated_at: Utc::now(),
            analysis_count: 3,
            local_only: true,
        });
        let reports = state.reports();
        assert_eq!(reports.len(), 1);
        assert!(reports[0].local_only);
        assert_eq!(reports[0].analysis_count, 3);
    }

    #[test]
    fn unreadable_stored_json_is_discarded() {
        let state = PersistedState::new();
        state.set_raw(KEY_GALLERY, "not json");
        assert!(state.gallery().is_empty());
    }
}
