//! Service layer: one container wiring the transport, configuration and
//! persisted state into the clients the pages consume.

pub mod auth;
pub mod chatbot;
pub mod cloudinary;
pub mod history;
pub mod model_gate;
pub mod report;
pub mod session;
pub mod transport;

use std::rc::Rc;

use crate::config::{self, ApiEndpoints};
use crate::shared::errors::Result;
use crate::shared::storage::PersistedState;

pub use auth::AuthService;
pub use chatbot::ChatbotClient;
pub use cloudinary::CloudinaryClient;
pub use history::TestHistory;
pub use model_gate::ModelGate;
pub use session::{SessionHandle, TestSession, analyze_image};
pub use transport::{ApiTransport, FetchTransport, Part};

/// Everything the pages need, built once at app start and shared through
/// context. Generic over the transport so the whole layer runs under the
/// scripted mock in tests.
pub struct AppServices<H> {
    pub endpoints: Rc<ApiEndpoints>,
    pub transport: Rc<H>,
    pub storage: PersistedState,
    pub auth: AuthService<H>,
    pub history: TestHistory<H>,
    pub gate: ModelGate<H>,
    pub uploads: CloudinaryClient<H>,
    pub chatbot: ChatbotClient<H>,
}

impl<H> Clone for AppServices<H> {
    fn clone(&self) -> Self {
        Self {
            endpoints: Rc::clone(&self.endpoints),
            transport: Rc::clone(&self.transport),
            storage: self.storage.clone(),
            auth: self.auth.clone(),
            history: self.history.clone(),
            gate: self.gate.clone(),
            uploads: self.uploads.clone(),
            chatbot: self.chatbot.clone(),
        }
    }
}

impl<H: ApiTransport + 'static> AppServices<H> {
    /// Fails fast when any compile-time environment variable is absent, so
    /// a misconfigured build surfaces at startup instead of on first use.
    pub fn from_env(transport: H) -> Result<Self> {
        let (endpoints, cloudinary) = config::resolve_all()?;
        Ok(Self::assemble(
            Rc::new(transport),
            Rc::new(endpoints),
            &cloudinary,
            PersistedState::new(),
        ))
    }

    pub fn assemble(
        transport: Rc<H>,
        endpoints: Rc<ApiEndpoints>,
        cloudinary: &config::CloudinaryConfig,
        storage: PersistedState,
    ) -> Self {
        Self {
            auth: AuthService::new(Rc::clone(&transport), Rc::clone(&endpoints), storage.clone()),
            history: TestHistory::new(
                Rc::clone(&transport),
                Rc::clone(&endpoints),
                storage.clone(),
            ),
            gate: ModelGate::new(Rc::clone(&transport), Rc::clone(&endpoints)),
            uploads: CloudinaryClient::new(Rc::clone(&transport), cloudinary),
            chatbot: ChatbotClient::new(Rc::clone(&transport), Rc::clone(&endpoints)),
            endpoints,
            transport,
            storage,
        }
    }
}
