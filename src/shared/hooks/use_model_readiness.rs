//! Model readiness hook: kicks a warmup on mount and polls status in
//! parallel until the inference host reports ready.

use dioxus::prelude::*;

use super::use_services;

#[derive(Clone, Copy, PartialEq)]
pub struct ModelReadiness {
    pub ready: Signal<bool>,
    pub warming: Signal<bool>,
}

impl ModelReadiness {
    pub fn is_ready(&self) -> bool {
        (self.ready)()
    }

    pub fn is_warming(&self) -> bool {
        (self.warming)()
    }
}

/// Polling cadence while the model loads.
#[cfg(target_arch = "wasm32")]
const POLL_INTERVAL_MS: u32 = 2_000;

pub fn use_model_readiness() -> ModelReadiness {
    let services = use_services();
    let mut ready = use_signal(|| false);
    let mut warming = use_signal(|| false);

    use_future(move || {
        let services = services.clone();
        async move {
            if services.gate.is_ready() {
                ready.set(true);
                return;
            }
            warming.set(true);

            #[cfg(target_arch = "wasm32")]
            {
                use futures::FutureExt;
                use futures::future::{Either, select};

                let gate = services.gate.clone();
                // The status poll runs alongside the warmup request, so a
                // warmup that stalls host-side cannot wedge the gate. Only
                // the slot holder hits the network; extra hook instances
                // just watch the shared state.
                let slot = gate.claim_poll();
                let warmup = Box::pin(gate.warmup().map(|_| ()));
                let poll = Box::pin({
                    let gate = gate.clone();
                    async move {
                        loop {
                            gloo_timers::future::TimeoutFuture::new(POLL_INTERVAL_MS).await;
                            if gate.is_ready()
                                || (slot.is_active() && gate.check_status().await)
                            {
                                break;
                            }
                        }
                    }
                });
                if let Either::Left((_, poll)) = select(warmup, poll).await
                    && !gate.is_ready()
                {
                    // Warmup failed; keep probing until the host comes up.
                    poll.await;
                }
            }
            #[cfg(not(target_arch = "wasm32"))]
            {
                services.gate.ensure_ready().await;
            }

            ready.set(services.gate.is_ready());
            warming.set(false);
        }
    });

    ModelReadiness { ready, warming }
}
