//! # client
//!
//! Leptos + WASM frontend for the Wheelhouse rental marketplace.
//!
//! This crate binds the framework-agnostic `wheelhouse-session` core to the
//! browser: `localStorage`, `document.cookie`, `storage` events, the
//! location bar and the identity server over HTTP. It also renders the
//! public pages and the role-gated dashboards.

pub mod app;
pub mod components;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

/// WASM entry point: install logging and hydrate the server-rendered body.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Debug).is_err() {
        web_sys::console::warn_1(&"console logger already installed".into());
    }
    leptos::mount::hydrate_body(app::App);
}
