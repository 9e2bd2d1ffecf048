//! Metrics page: six-month trend chart and aggregate rates.

use dioxus::prelude::*;

use crate::shared::hooks::use_test_history;

#[component]
pub fn Metrics() -> Element {
    let history = use_test_history();

    let buckets = history.buckets();
    let max_tests = buckets.iter().map(|b| b.total_tests).max().unwrap_or(0);

    rsx! {
        div { class: "c-metrics",
            h1 { "Your screening metrics" }

            if (history.loading)() {
                p { "Loading…" }
            } else if history.total() == 0 {
                p { class: "c-metrics__empty",
                    "No data yet. Completed tests appear here with monthly trends."
                }
            } else {
                section { class: "c-metrics__summary",
                    div { class: "c-stat-card",
                        span { class: "c-stat-card__value", "{history.total()}" }
                        span { class: "c-stat-card__label", "Total tests" }
                    }
                    div { class: "c-stat-card",
                        span { class: "c-stat-card__value",
                            {format!("{:.0}%", history.detection_rate())}
                        }
                        span { class: "c-stat-card__label", "DR detection rate" }
                    }
                    div { class: "c-stat-card",
                        span { class: "c-stat-card__value",
                            {format!("{:.1}%", history.average_confidence())}
                        }
                        span { class: "c-stat-card__label", "Average confidence" }
                    }
                }

                section { class: "c-metrics__chart",
                    h2 { "Last six months" }
                    div { class: "c-chart",
                        for bucket in &buckets {
                            div { class: "c-chart__column", key: "{bucket.month}",
                                div { class: "c-chart__bars",
                                    div {
                                        class: "c-chart__bar c-chart__bar--detected",
                                        style: format!("height: {}%;", bar_height(bucket.dr_detected, max_tests)),
                                        title: "{bucket.dr_detected} with DR",
                                    }
                                    div {
                                        class: "c-chart__bar c-chart__bar--clear",
                                        style: format!("height: {}%;", bar_height(bucket.no_dr_detected, max_tests)),
                                        title: "{bucket.no_dr_detected} without DR",
                                    }
                                }
                                span { class: "c-chart__label", "{bucket.month}" }
                                span { class: "c-chart__count", "{bucket.total_tests}" }
                            }
                        }
                    }
                }

                section { class: "c-metrics__table",
                    h2 { "Monthly breakdown" }
                    table {
                        thead {
                            tr {
                                th { "Month" }
                                th { "Tests" }
                                th { "DR detected" }
                                th { "Detection rate" }
                                th { "Avg confidence" }
                            }
                        }
                        tbody {
                            for bucket in &buckets {
                                tr { key: "{bucket.month}",
                                    td { "{bucket.month}" }
                                    td { "{bucket.total_tests}" }
                                    td { "{bucket.dr_detected}" }
                                    td { {format!("{:.0}%", bucket.detection_rate)} }
                                    td {
                                        {if bucket.total_tests == 0 {
                                            "–".to_string()
                                        } else {
                                            format!("{:.1}%", bucket.avg_confidence)
                                        }}
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn bar_height(count: usize, max: usize) -> f64 {
    if max == 0 {
        0.0
    } else {
        count as f64 / max as f64 * 100.0
    }
}
