//! Authenticated shell: sidebar navigation around the dashboard pages.
//! Redirects to the login form when no session token is stored.

use dioxus::prelude::*;

use crate::app::components::ReadinessBadge;
use crate::app::pages::Route;
use crate::shared::hooks::use_services;

#[component]
pub fn DashboardLayout() -> Element {
    let services = use_services();
    let nav = use_navigator();

    let signed_in = services.auth.is_signed_in();
    use_effect(move || {
        if !signed_in {
            nav.replace(Route::Login {});
        }
    });
    if !signed_in {
        return rsx! {
            div { class: "c-shell__redirect" }
        };
    }

    let username = services
        .auth
        .current()
        .map(|s| s.user.username)
        .unwrap_or_default();

    let logout = {
        let services = services.clone();
        move |_| {
            services.auth.logout();
            nav.replace(Route::Landing {});
        }
    };

    rsx! {
        div { class: "c-dashboard",
            aside { class: "c-dashboard__sidebar",
                Link { to: Route::Landing {}, class: "c-dashboard__logo", "👁️ RetinoAI" }

                nav { class: "c-dashboard__nav",
                    Link { to: Route::Overview {}, class: "c-dashboard__nav-link", "🏠 Overview" }
                    Link { to: Route::TestPage {}, class: "c-dashboard__nav-link", "🔬 New test" }
                    Link { to: Route::Metrics {}, class: "c-dashboard__nav-link", "📊 Metrics" }
                    Link { to: Route::Information {}, class: "c-dashboard__nav-link", "📚 Information" }
                }

                div { class: "c-dashboard__sidebar-footer",
                    ReadinessBadge {}
                    span { class: "c-dashboard__user", "{username}" }
                    button { class: "c-button c-button--ghost", onclick: logout, "Sign out" }
                }
            }

            main { class: "c-dashboard__main",
                Outlet::<Route> {}
            }
        }
    }
}
