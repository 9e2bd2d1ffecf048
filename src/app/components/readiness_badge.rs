//! Small status pill reflecting the inference model's warmup state.

use dioxus::prelude::*;

use crate::shared::hooks::use_model_readiness;

#[component]
pub fn ReadinessBadge() -> Element {
    let readiness = use_model_readiness();

    let (class, label) = if readiness.is_ready() {
        ("c-badge c-badge--ready", "● Model ready")
    } else if readiness.is_warming() {
        ("c-badge c-badge--warming", "● Model warming up…")
    } else {
        ("c-badge c-badge--cold", "● Model offline")
    };

    rsx! {
        span { class: "{class}", title: "Analysis availability", "{label}" }
    }
}
