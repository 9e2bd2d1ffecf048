use serde::{Deserialize, Serialize};

/// Account profile returned by the auth service and cached in local storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: String,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub age: Option<u8>,
}

/// An authenticated session: opaque token plus the profile it belongs to.
/// Held only in persisted client state; no expiry check is performed.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub token: String,
    pub user: User,
}
