//! Readiness gate for the remote inference model.
//!
//! The model host sleeps between sessions and takes tens of seconds to load
//! weights. The gate tracks cold/warming/ready, deduplicates concurrent
//! warmup requests into a single in-flight future, and lets callers block
//! analysis until the model answers ready.

use std::cell::RefCell;
use std::rc::Rc;

use futures::FutureExt;
use futures::future::{LocalBoxFuture, Shared};

use crate::config::ApiEndpoints;
use crate::shared::errors::{AppError, Result};
use crate::shared::services::transport::ApiTransport;

type WarmupFuture = Shared<LocalBoxFuture<'static, Result<()>>>;

#[derive(Default)]
struct GateState {
    ready: bool,
    warming: bool,
    in_flight: Option<WarmupFuture>,
    polling: bool,
}

/// Exclusive claim on the status-poll loop. One holder drives the network
/// probe; other watchers just read `is_ready`. The slot is handed back when
/// the holder is dropped.
pub struct PollSlot {
    state: Rc<RefCell<GateState>>,
    active: bool,
}

impl PollSlot {
    pub fn is_active(&self) -> bool {
        self.active
    }
}

impl Drop for PollSlot {
    fn drop(&mut self) {
        if self.active {
            self.state.borrow_mut().polling = false;
        }
    }
}

pub struct ModelGate<H> {
    transport: Rc<H>,
    endpoints: Rc<ApiEndpoints>,
    state: Rc<RefCell<GateState>>,
}

impl<H> Clone for ModelGate<H> {
    fn clone(&self) -> Self {
        Self {
            transport: Rc::clone(&self.transport),
            endpoints: Rc::clone(&self.endpoints),
            state: Rc::clone(&self.state),
        }
    }
}

impl<H: ApiTransport + 'static> ModelGate<H> {
    pub fn new(transport: Rc<H>, endpoints: Rc<ApiEndpoints>) -> Self {
        Self {
            transport,
            endpoints,
            state: Rc::new(RefCell::new(GateState::default())),
        }
    }

    pub fn is_ready(&self) -> bool {
        self.state.borrow().ready
    }

    pub fn is_warming(&self) -> bool {
        self.state.borrow().warming
    }

    /// Claims the status-poll slot. The returned slot is inactive when
    /// another holder is already polling.
    pub fn claim_poll(&self) -> PollSlot {
        let mut state = self.state.borrow_mut();
        let active = !state.polling;
        state.polling = true;
        PollSlot {
            state: Rc::clone(&self.state),
            active,
        }
    }

    /// Polls the status endpoint. Transport failures are treated as
    /// "not ready yet" rather than surfaced; the poll loop retries anyway.
    pub async fn check_status(&self) -> bool {
        let loaded = match self
            .transport
            .get_json(&self.endpoints.model_status, None)
            .await
        {
            Ok(body) => body
                .get("model_loaded")
                .and_then(|v| v.as_bool())
                .unwrap_or(false),
            Err(err) => {
                tracing::debug!(%err, "model status probe failed");
                false
            }
        };
        if loaded {
            let mut state = self.state.borrow_mut();
            state.ready = true;
            state.warming = false;
        }
        loaded
    }

    /// Requests a warmup, coalescing with any warmup already in flight.
    /// Every caller observes the same outcome.
    pub fn warmup(&self) -> WarmupFuture {
        {
            let state = self.state.borrow();
            if state.ready {
                return futures::future::ready(Ok(())).boxed_local().shared();
            }
            if let Some(in_flight) = &state.in_flight {
                return in_flight.clone();
            }
        }

        let transport = Rc::clone(&self.transport);
        let endpoints = Rc::clone(&self.endpoints);
        let state = Rc::clone(&self.state);
        let fut: WarmupFuture = async move {
            // The host may have finished loading on its own since the last
            // probe; a status hit skips the heavier warmup call.
            if let Ok(body) = transport.get_json(&endpoints.model_status, None).await
                && body
                    .get("model_loaded")
                    .and_then(|v| v.as_bool())
                    .unwrap_or(false)
            {
                let mut s = state.borrow_mut();
                s.ready = true;
                s.warming = false;
                s.in_flight = None;
                return Ok(());
            }

            let outcome = transport
                .post_json(&endpoints.warmup, &serde_json::json!({}), None)
                .await;
            let mut s = state.borrow_mut();
            s.in_flight = None;
            match outcome {
                Ok(_) => {
                    s.ready = true;
                    s.warming = false;
                    Ok(())
                }
                Err(err) => {
                    s.ready = false;
                    s.warming = false;
                    tracing::warn!(%err, "model warmup failed");
                    Err(err)
                }
            }
        }
        .boxed_local()
        .shared();

        let mut s = self.state.borrow_mut();
        s.warming = true;
        s.in_flight = Some(fut.clone());
        fut
    }

    /// Warms up if needed and reports whether the model ended up ready.
    pub async fn ensure_ready(&self) -> bool {
        if self.is_ready() {
            return true;
        }
        self.warmup().await.is_ok()
    }
}
