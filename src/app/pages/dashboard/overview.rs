//! Dashboard home: headline stats, recent tests and the scan gallery.

use dioxus::prelude::*;

use crate::app::components::Gallery;
use crate::app::pages::Route;
use crate::shared::hooks::{use_services, use_test_history};

#[component]
pub fn Overview() -> Element {
    let services = use_services();
    let history = use_test_history();

    let username = services
        .auth
        .current()
        .map(|s| s.user.username)
        .unwrap_or_else(|| "there".to_string());

    let records = history.records.read();
    let recent: Vec<_> = records.iter().rev().take(5).cloned().collect();
    drop(records);

    rsx! {
        div { class: "c-overview",
            header { class: "c-overview__header",
                h1 { "Hello, {username} 👋" }
                Link { to: Route::TestPage {}, class: "c-button c-button--primary", "Start a new test" }
            }

            if let Some(message) = (history.error)() {
                div { class: "c-overview__error", "Could not load your history: {message}" }
            }

            section { class: "c-overview__stats",
                div { class: "c-stat-card",
                    span { class: "c-stat-card__value", "{history.total()}" }
                    span { class: "c-stat-card__label", "Tests taken" }
                }
                div { class: "c-stat-card",
                    span { class: "c-stat-card__value", {format!("{:.0}%", history.detection_rate())} }
                    span { class: "c-stat-card__label", "Detection rate" }
                }
                div { class: "c-stat-card",
                    span { class: "c-stat-card__value", {format!("{:.1}%", history.average_confidence())} }
                    span { class: "c-stat-card__label", "Average confidence" }
                }
            }

            section { class: "c-overview__recent",
                h2 { "Recent tests" }
                if (history.loading)() {
                    p { "Loading…" }
                } else if recent.is_empty() {
                    p { "No tests recorded yet." }
                } else {
                    ul { class: "c-recent-list",
                        for record in recent {
                            li { class: "c-recent-list__item", key: "{record.id}",
                                span { class: "c-recent-list__date",
                                    {record.date.format("%Y-%m-%d").to_string()}
                                }
                                span {
                                    class: if record.result.contains("No DR") {
                                        "c-recent-list__result c-recent-list__result--clear"
                                    } else {
                                        "c-recent-list__result c-recent-list__result--detected"
                                    },
                                    "{record.result}"
                                }
                                span { class: "c-recent-list__confidence",
                                    {format!("{:.1}%", record.confidence)}
                                }
                            }
                        }
                    }
                }
            }

            section { class: "c-overview__gallery",
                h2 { "Scan gallery" }
                Gallery {}
            }
        }
    }
}
