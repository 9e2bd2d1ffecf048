//! Q&A endpoint for the in-app assistant.

use std::rc::Rc;

use serde_json::json;

use crate::config::ApiEndpoints;
use crate::shared::errors::{AppError, Result};
use crate::shared::services::transport::ApiTransport;

pub struct ChatbotClient<H> {
    transport: Rc<H>,
    endpoints: Rc<ApiEndpoints>,
}

impl<H> Clone for ChatbotClient<H> {
    fn clone(&self) -> Self {
        Self {
            transport: Rc::clone(&self.transport),
            endpoints: Rc::clone(&self.endpoints),
        }
    }
}

impl<H: ApiTransport> ChatbotClient<H> {
    pub fn new(transport: Rc<H>, endpoints: Rc<ApiEndpoints>) -> Self {
        Self {
            transport,
            endpoints,
        }
    }

    pub async fn ask(&self, question: &str) -> Result<String> {
        let body = self
            .transport
            .post_json(&self.endpoints.chatbot, &json!({"question": question}), None)
            .await?;
        body.get("answer")
            .or_else(|| body.get("response"))
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .ok_or_else(|| AppError::Malformed("chatbot response missing answer".into()))
    }
}
