//! Screening test page: pick images, run analyses, export the report.

use chrono::Utc;
use dioxus::prelude::*;

use crate::app::components::TestCard;
use crate::domain::models::ReportMeta;
use crate::shared::hooks::{use_model_readiness, use_services, use_test_session};
use crate::shared::services::report::{build_report, download_pdf};
use crate::shared::services::session::analyze_image;

#[component]
pub fn TestPage() -> Element {
    let services = use_services();
    let readiness = use_model_readiness();
    let mut state = use_test_session();
    let mut export_feedback = use_signal(|| None::<String>);

    let on_files = move |evt: Event<FormData>| {
        let files = evt.files();
        spawn(async move {
            state.add_files(files).await;
        });
    };

    let on_analyze = use_callback({
        let services = services.clone();
        move |index: usize| {
            let services = services.clone();
            spawn(async move {
                analyze_image(&state.session, index, &services).await;
            });
        }
    });

    let on_remove = use_callback(move |index: usize| {
        state.remove(index);
    });

    let on_export = {
        let services = services.clone();
        move |_| {
            let images = state.images();
            let patient = services.storage.user();
            let generated_at = Utc::now();
            match build_report(&images, patient.as_ref(), generated_at) {
                Ok(report) => {
                    if let Err(err) = download_pdf(&report.bytes, &report.file_name) {
                        export_feedback.set(Some(err.to_string()));
                        return;
                    }
                    services.storage.push_report(ReportMeta {
                        file_name: report.file_name.clone(),
                        generated_at,
                        analysis_count: report.analysis_count,
                        local_only: true,
                    });
                    export_feedback.set(Some(format!("Saved {}", report.file_name)));
                }
                Err(err) => export_feedback.set(Some(err.to_string())),
            }
        }
    };

    let images = state.images();
    let analyzed = images.iter().filter(|i| i.result.is_some()).count();

    rsx! {
        div { class: "c-test-page",
            header { class: "c-test-page__header",
                h1 { "New screening test" }
                p { "Add one or more retinal photographs, then analyze each image." }
            }

            if !readiness.is_ready() {
                div { class: "c-test-page__warming",
                    if readiness.is_warming() {
                        "⏳ The analysis model is warming up. You can add images already; analysis unlocks in a moment."
                    } else {
                        "The analysis model is currently unavailable."
                    }
                }
            }

            label { class: "c-test-page__picker",
                "📷 Add retinal images"
                input {
                    r#type: "file",
                    accept: "image/*",
                    multiple: true,
                    onchange: on_files,
                }
            }

            if images.is_empty() {
                p { class: "c-test-page__empty", "No images in this session yet." }
            } else {
                div { class: "c-test-page__grid",
                    for (index, image) in images.iter().enumerate() {
                        TestCard {
                            key: "{image.id}",
                            image: image.clone(),
                            index,
                            model_ready: readiness.is_ready(),
                            on_analyze,
                            on_remove,
                        }
                    }
                }

                div { class: "c-test-page__export",
                    button {
                        class: "c-button c-button--primary",
                        disabled: analyzed == 0,
                        onclick: on_export,
                        "📄 Export PDF report ({analyzed} analyzed)"
                    }
                    if let Some(message) = export_feedback() {
                        span { class: "c-test-page__export-status", "{message}" }
                    }
                }
            }
        }
    }
}
