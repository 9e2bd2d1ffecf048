//! Account creation form. Signup routes to the login page on success
//! rather than signing the user in directly.

use dioxus::prelude::*;

use crate::app::pages::Route;
use crate::shared::hooks::use_services;
use crate::shared::validate;

#[component]
pub fn Signup() -> Element {
    let services = use_services();
    let nav = use_navigator();

    let mut username = use_signal(String::new);
    let mut email = use_signal(String::new);
    let mut age = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut confirm = use_signal(String::new);
    let mut error = use_signal(|| None::<String>);
    let mut submitting = use_signal(|| false);

    let submit = move |evt: Event<FormData>| {
        evt.prevent_default();
        if submitting() {
            return;
        }

        let field_error = validate::validate_username(&username())
            .or_else(|| validate::validate_email(&email()))
            .or_else(|| validate::validate_age(&age()))
            .or_else(|| validate::validate_password(&password()))
            .or_else(|| validate::validate_password_confirmation(&password(), &confirm()));
        if let Some(message) = field_error {
            error.set(Some(message.to_string()));
            return;
        }
        // Validated above.
        let Ok(age_value) = age().parse::<u8>() else {
            return;
        };

        submitting.set(true);
        error.set(None);
        let services = services.clone();
        spawn(async move {
            match services
                .auth
                .signup(&username(), &email(), &password(), age_value)
                .await
            {
                Ok(()) => {
                    nav.replace(Route::Login {});
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
                h1 { "Create your account" }

                if let Some(message) = error() {
                    div { class: "c-auth__error", "{message}" }
                }

                label { class: "c-auth__field",
                    span { "Username" }
                    input {
                        value: "{username}",
                        autocomplete: "username",
                        oninput: move |evt| username.set(evt.value()),
                    }
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
                    span { "Age" }
                    input {
                        r#type: "number",
                        min: "1",
                        max: "119",
                        value: "{age}",
                        oninput: move |evt| age.set(evt.value()),
                    }
                }
                label { class: "c-auth__field",
                    span { "Password" }
                    input {
                        r#type: "password",
                        value: "{password}",
                        autocomplete: "new-password",
                        oninput: move |evt| password.set(evt.value()),
                    }
                }
                label { class: "c-auth__field",
                    span { "Confirm password" }
                    input {
                        r#type: "password",
                        value: "{confirm}",
                        autocomplete: "new-password",
                        oninput: move |evt| confirm.set(evt.value()),
                    }
                }

                button {
                    r#type: "submit",
                    class: "c-button c-button--primary",
                    disabled: submitting(),
                    if submitting() { "Creating…" } else { "Sign up" }
                }

                p { class: "c-auth__switch",
                    "Already registered? "
                    Link { to: Route::Login {}, "Sign in" }
                }
            }
        }
    }
}
