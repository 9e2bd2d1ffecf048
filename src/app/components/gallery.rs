//! Grid of previously uploaded scans, read from persisted state.

use dioxus::prelude::*;

use crate::shared::hooks::use_services;

#[component]
pub fn Gallery() -> Element {
    let services = use_services();
    let entries = services.storage.gallery();

    if entries.is_empty() {
        return rsx! {
            p { class: "c-gallery__empty", "No uploaded scans yet. Run a test to build your gallery." }
        };
    }

    rsx! {
        div { class: "c-gallery",
            for entry in entries.into_iter().rev() {
                figure { class: "c-gallery__item", key: "{entry.public_id}",
                    img {
                        src: "{entry.cloudinary_url}",
                        alt: "Retinal scan {entry.file_name}",
                        loading: "lazy",
                    }
                    figcaption {
                        span { class: "c-gallery__result", "{entry.analysis_result}" }
                        span { class: "c-gallery__date",
                            {entry.uploaded_at.format("%Y-%m-%d").to_string()}
                        }
                    }
                }
            }
        }
    }
}
