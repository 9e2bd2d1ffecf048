//! Public landing page.

use dioxus::prelude::*;

use crate::app::pages::Route;
use crate::shared::hooks::use_services;

#[component]
pub fn Landing() -> Element {
    let services = use_services();
    let signed_in = services.auth.is_signed_in();

    rsx! {
        div { class: "c-landing",
            nav { class: "c-landing__nav",
                span { class: "c-landing__logo", "👁️ RetinoAI" }
                div { class: "c-landing__nav-actions",
                    if signed_in {
                        Link { to: Route::Overview {}, class: "c-button c-button--primary", "Dashboard" }
                    } else {
                        Link { to: Route::Login {}, class: "c-button c-button--ghost", "Sign in" }
                        Link { to: Route::Signup {}, class: "c-button c-button--primary", "Get started" }
                    }
                }
            }

            section { class: "c-landing__hero",
                h1 { "Early detection of diabetic retinopathy" }
                p {
                    "Upload a retinal photograph and get an AI-assisted screening result "
                    "in seconds, with guidance on what to do next."
                }
                Link {
                    to: if signed_in { Route::TestPage {} } else { Route::Signup {} },
                    class: "c-button c-button--primary c-button--lg",
                    "Start a screening test"
                }
            }

            section { class: "c-landing__features",
                div { class: "c-feature-card",
                    h3 { "📷 Simple capture" }
                    p { "Works with fundus camera exports and smartphone adapter photos." }
                }
                div { class: "c-feature-card",
                    h3 { "📊 Track progress" }
                    p { "Monthly trends and detection rates across all of your past tests." }
                }
                div { class: "c-feature-card",
                    h3 { "📄 Shareable reports" }
                    p { "Export a PDF summary to bring to your ophthalmologist." }
                }
            }

            footer { class: "c-landing__footer",
                "RetinoAI is a screening aid, not a diagnostic device. Always consult an eye-care professional."
            }
        }
    }
}
