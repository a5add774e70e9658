//! Smart Waste Tracker page behaviors for the browser
//!
//! Compiles to WebAssembly and is loaded by the server-rendered pages next
//! to Chart.js. On start it waits for the DOM, reads the optional
//! `<script type="application/toml" id="page-behavior-config">` block and
//! attaches every behavior from the `wastetrack` crate to the live page.

use std::cell::RefCell;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use wastetrack::{Config, PageBehavior};

pub mod bridge;
pub mod chartjs;
pub mod dom;
pub mod telemetry;
pub mod timers;

pub use chartjs::ChartJsHost;
pub use dom::{WebDocument, WebElement};
pub use timers::BrowserScheduler;

/// Element id of the embedded configuration block
pub const CONFIG_ELEMENT_ID: &str = "page-behavior-config";

thread_local! {
    static PAGE: RefCell<Option<PageBehavior<WebDocument, BrowserScheduler>>> = const { RefCell::new(None) };
}

/// Read the embedded configuration, falling back to defaults
pub fn load_page_config(document: &web_sys::Document) -> Config {
    let text = document
        .get_element_by_id(CONFIG_ELEMENT_ID)
        .and_then(|el| el.text_content());
    Config::from_toml_or_default(text.as_deref())
}

/// Attach all behaviors to the page now
pub fn boot(document: WebDocument, config: &Config) {
    match PageBehavior::init(document, BrowserScheduler::new(), &ChartJsHost, config) {
        Ok(page) => {
            PAGE.with(|slot| *slot.borrow_mut() = Some(page));
        }
        Err(e) => {
            tracing::error!("Page behaviors not started: {}", e);
        }
    }
}

#[wasm_bindgen(start)]
pub fn start() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();

    let Some(document) = WebDocument::current() else {
        return;
    };

    let config = load_page_config(document.raw());
    telemetry::init(&config.logging);
    bridge::install_global();

    if document.raw().ready_state() != web_sys::DocumentReadyState::Loading {
        boot(document, &config);
        return;
    }

    let target = document.clone();
    let on_ready = Closure::once(move || boot(target, &config));
    if let Err(e) = document
        .raw()
        .add_event_listener_with_callback("DOMContentLoaded", on_ready.as_ref().unchecked_ref())
    {
        tracing::error!("Failed to wait for DOMContentLoaded: {:?}", e);
    }
    on_ready.forget();
}
