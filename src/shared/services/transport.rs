//! HTTP transport seam.
//!
//! Services talk to the remote collaborators through [`ApiTransport`] so the
//! orchestration logic compiles and tests natively; the browser build plugs
//! in [`FetchTransport`]. No call carries a timeout or abort contract, and
//! nothing is retried automatically.

use serde_json::Value;

use crate::shared::errors::{AppError, Result};

/// One field of a multipart request body.
#[derive(Debug, Clone, PartialEq)]
pub enum Part {
    Text(String),
    Bytes {
        data: Vec<u8>,
        file_name: String,
        mime_type: String,
    },
}

pub trait ApiTransport {
    async fn get_json(&self, url: &str, bearer: Option<&str>) -> Result<Value>;
    async fn post_json(&self, url: &str, body: &Value, bearer: Option<&str>) -> Result<Value>;
    async fn post_multipart(&self, url: &str, parts: Vec<(&'static str, Part)>) -> Result<Value>;
}

/// Browser transport over the fetch API (gloo-net). Off-wasm every call
/// fails with a transport error; native builds only exist for tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchTransport;

impl FetchTransport {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(target_arch = "wasm32")]
mod fetch {
    use gloo_net::http::{Request, RequestBuilder, Response};
    use serde_json::Value;
    use wasm_bindgen::JsValue;

    use super::Part;
    use crate::shared::errors::{AppError, Result};

    fn with_bearer(builder: RequestBuilder, bearer: Option<&str>) -> RequestBuilder {
        match bearer {
            Some(token) => builder.header("Authorization", &format!("Bearer {token}")),
            None => builder,
        }
    }

    async fn read_json(response: Response) -> Result<Value> {
        if !response.ok() {
            return Err(api_error(response).await);
        }
        response
            .json::<Value>()
            .await
            .map_err(|e| AppError::Malformed(e.to_string()))
    }

    /// Extracts the remote error message verbatim when the body carries one.
    async fn api_error(response: Response) -> AppError {
        let status = response.status();
        let message = match response.json::<Value>().await {
            Ok(body) => body
                .pointer("/error/message")
                .or_else(|| body.get("message"))
                .or_else(|| body.get("error"))
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| format!("API call failed: {status}")),
            Err(_) => format!("API call failed: {status}"),
        };
        AppError::Api { status, message }
    }

    pub async fn get_json(url: &str, bearer: Option<&str>) -> Result<Value> {
        let response = with_bearer(Request::get(url), bearer)
            .send()
            .await
            .map_err(|e| AppError::Transport(e.to_string()))?;
        read_json(response).await
    }

    pub async fn post_json(url: &str, body: &Value, bearer: Option<&str>) -> Result<Value> {
        let response = with_bearer(Request::post(url), bearer)
            .json(body)
            .map_err(|e| AppError::Transport(e.to_string()))?
            .send()
            .await
            .map_err(|e| AppError::Transport(e.to_string()))?;
        read_json(response).await
    }

    pub async fn post_multipart(url: &str, parts: Vec<(&'static str, Part)>) -> Result<Value> {
        let form = web_sys::FormData::new()
            .map_err(|_| AppError::Transport("failed to create form data".into()))?;

        for (name, part) in parts {
            match part {
                Part::Text(value) => {
                    form.append_with_str(name, &value)
                        .map_err(|_| AppError::Transport("failed to append form field".into()))?;
                }
                Part::Bytes {
                    data,
                    file_name,
                    mime_type,
                } => {
                    let array = js_sys::Uint8Array::from(data.as_slice());
                    let sequence = js_sys::Array::of1(&array);
                    let options = web_sys::BlobPropertyBag::new();
                    options.set_type(&mime_type);
                    let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(
                        &sequence, &options,
                    )
                    .map_err(|_| AppError::Transport("failed to build upload blob".into()))?;
                    form.append_with_blob_and_filename(name, &blob, &file_name)
                        .map_err(|_| AppError::Transport("failed to append upload blob".into()))?;
                }
            }
        }

        // The browser sets the multipart Content-Type (with boundary) itself.
        let response = Request::post(url)
            .body(JsValue::from(form))
            .map_err(|e| AppError::Transport(e.to_string()))?
            .send()
            .await
            .map_err(|e| AppError::Transport(e.to_string()))?;
        read_json(response).await
    }
}

impl ApiTransport for FetchTransport {
    async fn get_json(&self, url: &str, bearer: Option<&str>) -> Result<Value> {
        #[cfg(target_arch = "wasm32")]
        {
            fetch::get_json(url, bearer).await
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = (url, bearer);
            Err(AppError::Transport(
                "network requests require the browser runtime".into(),
            ))
        }
    }

    async fn post_json(&self, url: &str, body: &Value, bearer: Option<&str>) -> Result<Value> {
        #[cfg(target_arch = "wasm32")]
        {
            fetch::post_json(url, body, bearer).await
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = (url, body, bearer);
            Err(AppError::Transport(
                "network requests require the browser runtime".into(),
            ))
        }
    }

    async fn post_multipart(&self, url: &str, parts: Vec<(&'static str, Part)>) -> Result<Value> {
        #[cfg(target_arch = "wasm32")]
        {
            fetch::post_multipart(url, parts).await
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = (url, parts);
            Err(AppError::Transport(
                "network requests require the browser runtime".into(),
            ))
        }
    }
}
