//! Token-based authentication against the account API.

use std::rc::Rc;

use serde_json::json;

use crate::config::ApiEndpoints;
use crate::domain::models::{Session, User};
use crate::shared::errors::{AppError, Result};
use crate::shared::services::transport::ApiTransport;
use crate::shared::storage::PersistedState;

pub struct AuthService<H> {
    transport: Rc<H>,
    endpoints: Rc<ApiEndpoints>,
    storage: PersistedState,
}

impl<H> Clone for AuthService<H> {
    fn clone(&self) -> Self {
        Self {
            transport: Rc::clone(&self.transport),
            endpoints: Rc::clone(&self.endpoints),
            storage: self.storage.clone(),
        }
    }
}

impl<H: ApiTransport> AuthService<H> {
    pub fn new(transport: Rc<H>, endpoints: Rc<ApiEndpoints>, storage: PersistedState) -> Self {
        Self {
            transport,
            endpoints,
            storage,
        }
    }

    pub fn current(&self) -> Option<Session> {
        self.storage.session()
    }

    pub fn is_signed_in(&self) -> bool {
        self.storage.token().is_some()
    }

    /// Exchanges credentials for a token and persists the session. The
    /// stored token is trusted until the server rejects it; there is no
    /// revalidation on startup.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session> {
        let body = self
            .transport
            .post_json(
                &self.endpoints.auth.login,
                &json!({"email": email, "password": password}),
                None,
            )
            .await?;

        let token = body
            .get("access_token")
            .and_then(|v| v.as_str())
            .ok_or_else(|| AppError::Malformed("login response missing access_token".into()))?
            .to_string();
        let user: User = body
            .get("user")
            .cloned()
            .map(serde_json::from_value)
            .transpose()
            .map_err(|e| AppError::Malformed(e.to_string()))?
            .ok_or_else(|| AppError::Malformed("login response missing user".into()))?;

        self.storage.set_session(&token, &user);
        Ok(Session { token, user })
    }

    /// Creates the account. Signup does not sign in; the caller routes to
    /// the login form afterwards.
    pub async fn signup(&self, username: &str, email: &str, password: &str, age: u8) -> Result<()> {
        self.transport
            .post_json(
                &self.endpoints.auth.signup,
                &json!({
                    "username": username,
                    "email": email,
                    "password": password,
                    "age": age,
                }),
                None,
            )
            .await?;
        Ok(())
    }

    pub fn logout(&self) {
        self.storage.clear_session();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::services::history::TestHistory;
    use crate::shared::services::transport::testing::MockTransport;
    use futures::executor::block_on;
    use serde_json::json;

    fn endpoints() -> Rc<ApiEndpoints> {
        Rc::new(ApiEndpoints {
            auth: crate::config::AuthEndpoints {
                login: "http://api/login".into(),
                signup: "http://api/signup".into(),
                get_tests: "http://api/get-tests".into(),
                add_test: "http://api/add-test".into(),
            },
            analyze: "http://api/analyze".into(),
            warmup: "http://api/api/warmup".into(),
            model_status: "http://api/api/model-status".into(),
            chatbot: "http://api/chat".into(),
        })
    }

    #[test]
    fn login_persists_the_session() {
        let transport = Rc::new(MockTransport::new(|call| {
            assert!(call.url.ends_with("/login"));
            assert_eq!(call.body.as_ref().unwrap()["email"], "p@x.io");
            Ok(json!({
                "access_token": "tok-1",
                "user": {"id": "u1", "username": "pat", "email": "p@x.io", "age": 52}
            }))
        }));
        let storage = PersistedState::default();
        let auth = AuthService::new(transport, endpoints(), storage.clone());

        let session = block_on(auth.login("p@x.io", "hunter22")).unwrap();
        assert_eq!(session.token, "tok-1");
        assert_eq!(storage.token().as_deref(), Some("tok-1"));
        assert_eq!(storage.user().unwrap().username, "pat");
    }

    #[test]
    fn stored_token_flows_into_authorized_requests() {
        let transport = Rc::new(MockTransport::new(|call| {
            if call.url.ends_with("/login") {
                Ok(json!({
                    "access_token": "tok-2",
                    "user": {"id": "u1", "username": "pat", "email": "p@x.io"}
                }))
            } else {
                assert_eq!(call.bearer.as_deref(), Some("tok-2"));
                Ok(json!({"tests": []}))
            }
        }));
        let storage = PersistedState::default();
        let auth = AuthService::new(Rc::clone(&transport), endpoints(), storage.clone());
        let history = TestHistory::new(Rc::clone(&transport), endpoints(), storage);

        block_on(auth.login("p@x.io", "hunter22")).unwrap();
        block_on(history.refresh()).unwrap();
        assert_eq!(transport.count("GET", "/get-tests"), 1);
    }

    #[test]
    fn rejected_login_stores_nothing() {
        let transport = Rc::new(MockTransport::new(|_| {
            Err(AppError::Api {
                status: 401,
                message: "Invalid credentials".into(),
            })
        }));
        let storage = PersistedState::default();
        let auth = AuthService::new(transport, endpoints(), storage.clone());

        let err = block_on(auth.login("p@x.io", "wrong")).unwrap_err();
        assert!(matches!(err, AppError::Api { status: 401, .. }));
        assert!(storage.token().is_none());
    }

    #[test]
    fn malformed_login_response_is_an_error() {
        let transport = Rc::new(MockTransport::new(|_| Ok(json!({"access_token": "t"}))));
        let auth = AuthService::new(transport, endpoints(), PersistedState::default());
        let err = block_on(auth.login("p@x.io", "pw")).unwrap_err();
        assert!(matches!(err, AppError::Malformed(_)));
    }

    #[test]
    fn logout_clears_the_session() {
        let storage = PersistedState::default();
        storage.set_session(
            "tok",
            &User {
                id: "u1".into(),
                username: "pat".into(),
                email: "p@x.io".into(),
                age: None,
            },
        );
        let transport = Rc::new(MockTransport::new(|_| panic!("no request expected")));
        let auth = AuthService::new(transport, endpoints(), storage.clone());

        auth.logout();
        assert!(storage.session().is_none());
        assert!(!auth.is_signed_in());
    }
}
