//! Educational content about diabetic retinopathy, with the assistant
//! widget for follow-up questions.

use dioxus::prelude::*;

use crate::app::components::Chatbot;

#[component]
pub fn Information() -> Element {
    rsx! {
        div { class: "c-information",
            h1 { "Understanding diabetic retinopathy" }

            section { class: "c-information__section",
                h2 { "What is it?" }
                p {
                    "Diabetic retinopathy is a complication of diabetes in which high "
                    "blood sugar damages the small blood vessels of the retina. It often "
                    "has no symptoms in its early stages, which is why regular screening "
                    "matters."
                }
            }

            section { class: "c-information__section",
                h2 { "Stages" }
                ul {
                    li { strong { "No DR: " } "no visible damage. Keep up annual screening." }
                    li { strong { "Mild NPDR: " } "small areas of balloon-like swelling in the retina's blood vessels." }
                    li { strong { "Moderate NPDR: " } "some blood vessels that nourish the retina become blocked." }
                    li { strong { "Severe NPDR: " } "many more vessels are blocked, starving retinal areas of blood supply." }
                    li { strong { "Proliferative DR: " } "new fragile vessels grow and can leak, the most advanced stage." }
                }
            }

            section { class: "c-information__section",
                h2 { "Reducing your risk" }
                ul {
                    li { "Keep blood glucose, blood pressure and cholesterol under control." }
                    li { "Attend an eye screening at least once a year." }
                    li { "Do not smoke, and stay physically active." }
                    li { "Report any sudden change in vision to a professional immediately." }
                }
            }

            Chatbot {}
        }
    }
}
