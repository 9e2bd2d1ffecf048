//! Card for one candidate image: preview, analysis state and actions.

use dioxus::prelude::*;

use crate::domain::models::{CandidateImage, REFERRAL_NOTICE};

#[component]
pub fn TestCard(
    image: CandidateImage,
    index: usize,
    model_ready: bool,
    on_analyze: EventHandler<usize>,
    on_remove: EventHandler<usize>,
) -> Element {
    let analyzable = model_ready && !image.is_analyzing && image.result.is_none();

    rsx! {
        article { class: "c-test-card",
            img {
                class: "c-test-card__preview",
                src: "{image.preview_data_url}",
                alt: "Preview of {image.file_name}",
            }
            div { class: "c-test-card__body",
                h4 { "{image.file_name}" }

                if let Some(result) = &image.result {
                    div {
                        class: if result.is_dr_positive() {
                            "c-test-card__result c-test-card__result--positive"
                        } else {
                            "c-test-card__result c-test-card__result--negative"
                        },
                        strong { "{result.stage}" }
                        span { " · {result.confidence:.1}% confidence" }
                    }
                    ul { class: "c-test-card__recommendations",
                        for recommendation in &result.recommendations {
                            li { "{recommendation}" }
                        }
                    }
                    if result.is_dr_positive() {
                        p { class: "c-test-card__notice", "{REFERRAL_NOTICE}" }
                    }
                } else if image.is_analyzing {
                    div { class: "c-test-card__progress", "⏳ Analyzing…" }
                } else if let Some(message) = &image.error {
                    div { class: "c-test-card__error", "{message}" }
                }

                div { class: "c-test-card__actions",
                    if image.result.is_none() {
                        button {
                            class: "c-button c-button--primary",
                            disabled: !analyzable,
                            onclick: move |_| on_analyze.call(index),
                            if image.is_analyzing { "Analyzing…" }
                            else if image.error.is_some() { "Retry analysis" }
                            else { "Analyze" }
                        }
                    }
                    button {
                        class: "c-button c-button--ghost",
                        disabled: image.is_analyzing,
                        onclick: move |_| on_remove.call(index),
                        "Remove"
                    }
                }
            }
        }
    }
}
