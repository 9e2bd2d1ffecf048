//! Route table and application root.

use std::rc::Rc;

use dioxus::document;
use dioxus::prelude::*;

use crate::app::layouts::DashboardLayout;
use crate::app::pages::dashboard::{Information, Metrics, Overview, TestPage};
use crate::app::pages::landing::Landing;
use crate::app::pages::login::Login;
use crate::app::pages::signup::Signup;
use crate::shared::errors::AppError;
use crate::shared::hooks::ServicesContext;
use crate::shared::services::{AppServices, FetchTransport};

#[derive(Clone, Routable, Debug, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Shell)]
        #[route("/")]
        Landing {},
        #[route("/login")]
        Login {},
        #[route("/signup")]
        Signup {},

        #[layout(DashboardLayout)]
            #[route("/dashboard")]
            Overview {},
            #[route("/dashboard/test")]
            TestPage {},
            #[route("/dashboard/metrics")]
            Metrics {},
            #[route("/dashboard/information")]
            Information {},
        #[end_layout]

        // Unknown paths land back on the public landing page.
        #[route("/:..segments")]
        NotFound { segments: Vec<String> },
}

#[component]
pub fn App() -> Element {
    // Configuration is resolved exactly once; every page below the router
    // can then assume a working service container.
    let services = use_context_provider(|| {
        ServicesContext(Rc::new(AppServices::from_env(FetchTransport::new())))
    });

    use_effect(|| {
        tracing::info!("RetinoAI client initialized");
    });

    match services.0.as_ref() {
        Ok(_) => rsx! {
            Router::<Route> {}
        },
        Err(err) => rsx! {
            ConfigurationError { error: err.clone() }
        },
    }
}

/// Full-screen diagnostic shown instead of the app when compile-time
/// configuration is incomplete. Lists every missing variable at once.
#[component]
fn ConfigurationError(error: AppError) -> Element {
    let missing: Vec<String> = match &error {
        AppError::Config(names) => names.iter().map(|n| n.to_string()).collect(),
        other => vec![other.to_string()],
    };

    rsx! {
        div { class: "c-config-error",
            h1 { "⚠️ Configuration incomplete" }
            p { "The application cannot start because required build-time settings are missing:" }
            ul {
                for name in missing {
                    li { code { "{name}" } }
                }
            }
            p { "Set the variables and rebuild." }
        }
    }
}

#[component]
fn Shell() -> Element {
    const BUNDLE_CSS: Asset = asset!("/assets/dist/bundle.css");

    rsx! {
        document::Link {
            rel: "stylesheet",
            href: BUNDLE_CSS
        },
        div { class: "c-shell",
            Outlet::<Route> {}
        }
    }
}

#[component]
pub fn NotFound(segments: Vec<String>) -> Element {
    let nav = use_navigator();
    use_effect(move || {
        nav.replace(Route::Landing {});
    });
    let _ = segments;
    rsx! {
        div { class: "c-shell__redirect" }
    }
}
