//! RetinoAI web client entry point.
//!
//! The application is browser-only; the native binary exists so the crate
//! builds and its test suite runs on the host toolchain.

#[cfg(target_arch = "wasm32")]
fn main() {
    use retinoai_web::app::App;

    dioxus::logger::initialize_default();
    tracing::info!("Starting RetinoAI web client...");
    dioxus::launch(App);
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    eprintln!("retinoai-web targets the browser; build with the wasm32 target (dx serve).");
}
