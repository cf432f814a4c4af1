//! Chat Desk Front End
//!
//! Browser client for the chat application, built with Leptos (WASM).
//!
//! # Features
//!
//! - Guarded routing: sign-in and admin checks on every navigation
//! - Session kept in `localStorage`
//! - Markdown rendering with highlighted code blocks
//!
//! # Architecture
//!
//! Client-side rendered (CSR) Leptos application compiled to WebAssembly.
//! Site settings are fetched once before the app mounts; everything else
//! is requested from the chat API as pages need it.

use chatdesk::settings::SettingsStore;
use leptos::*;

mod api;
mod app;
mod components;
mod head;
mod logging;
mod pages;
mod state;

fn main() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();
    logging::init(tracing::Level::INFO);

    spawn_local(async {
        let mut settings = SettingsStore::new();
        settings.begin_fetch();
        settings.apply(api::fetch_frontend_settings().await);

        if let Some(title) = settings.document_title() {
            head::set_title(title);
        }

        mount_to_body(move || view! { <app::App settings=settings /> });
    });
}
