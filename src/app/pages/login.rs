//! Sign-in form.

use dioxus::prelude::*;

use crate::app::pages::Route;
use crate::shared::hooks::use_services;
use crate::shared::validate;

#[component]
pub fn Login() -> Element {
    let services = use_services();
    let nav = use_navigator();

    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut error = use_signal(|| None::<String>);
    let mut submitting = use_signal(|| false);

    let submit = move |evt: Event<FormData>| {
        evt.prevent_default();
        if submitting() {
            return;
        }

        let field_error = validate::validate_email(&email())
            .or_else(|| validate::validate_password(&password()));
        if let Some(message) = field_error {
            error.set(Some(message.to_string()));
            return;
        }

        submitting.set(true);
        error.set(None);
        let services = services.clone();
        spawn(async move {
            match services.auth.login(&email(), &password()).await {
                Ok(_) => {
                    nav.replace(Route::Overview {});
                }
                Err(err) => {
                    error.set(Some(err.to_string()));
                    submitting.set(false);
                }
            }
        });
    };

    rsx! {
        div { class: "c-auth",
            form { class: "c-auth__card", onsubmit: submit,
                h1 { "Welcome back" }

                if let Some(message) = error() {
                    div { class: "c-auth__error", "{message}" }
                }

                label { class: "c-auth__field",
                    span { "Email" }
                    input {
                        r#type: "email",
                        value: "{email}",
                        autocomplete: "email",
                        oninput: move |evt| email.set(evt.value()),
                    }
                }
                label { class: "c-auth__field",
                    span { "Password" }
                    input {
                        r#type: "password",
                        value: "{password}",
                        autocomplete: "current-password",
                        oninput: move |evt| password.set(evt.value()),
                    }
                }

                button {
                    r#type: "submit",
                    class: "c-button c-button--primary",
                    disabled: submitting(),
                    if submitting() { "Signing in…" } else { "Sign in" }
                }

                p { class: "c-auth__switch",
                    "No account yet? "
                    Link { to: Route::Signup {}, "Create one" }
                }
            }
        }
    }
}
