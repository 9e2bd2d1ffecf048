//! Q&A widget backed by the chatbot endpoint.

use dioxus::prelude::*;

use crate::shared::hooks::use_services;

#[derive(Clone, PartialEq)]
struct Exchange {
    question: String,
    answer: Option<String>,
}

#[component]
pub fn Chatbot() -> Element {
    let services = use_services();

    let mut input = use_signal(String::new);
    let mut exchanges = use_signal(Vec::<Exchange>::new);
    let mut busy = use_signal(|| false);

    let submit = move |evt: Event<FormData>| {
        evt.prevent_default();
        let question = input().trim().to_string();
        if question.is_empty() || busy() {
            return;
        }
        input.set(String::new());
        busy.set(true);
        exchanges.write().push(Exchange {
            question: question.clone(),
            answer: None,
        });

        let services = services.clone();
        spawn(async move {
            let answer = match services.chatbot.ask(&question).await {
                Ok(answer) => answer,
                Err(err) => format!("Sorry, the assistant is unavailable right now. ({err})"),
            };
            if let Some(last) = exchanges.write().last_mut() {
                last.answer = Some(answer);
            }
            busy.set(false);
        });
    };

    rsx! {
        div { class: "c-chatbot",
            h3 { "💬 Ask about retinopathy" }
            div { class: "c-chatbot__log",
                if exchanges.read().is_empty() {
                    p { class: "c-chatbot__hint",
                        "Ask anything about diabetic retinopathy, screening or eye health."
                    }
                }
                for exchange in exchanges() {
                    div { class: "c-chatbot__question", "{exchange.question}" }
                    if let Some(answer) = &exchange.answer {
                        div { class: "c-chatbot__answer", "{answer}" }
                    } else {
                        div { class: "c-chatbot__answer c-chatbot__answer--pending", "…" }
                    }
                }
            }
            form { class: "c-chatbot__form", onsubmit: submit,
                input {
                    value: "{input}",
                    placeholder: "Type a question",
                    oninput: move |evt| input.set(evt.value()),
                }
                button {
                    r#type: "submit",
                    class: "c-button c-button--primary",
                    disabled: busy(),
                    "Send"
                }
            }
        }
    }
}
