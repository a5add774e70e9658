//! `window.showNotification(message, type)`
//!
//! Lets inline page scripts request a toast. The call only dispatches the
//! `showNotification` custom event; the notification center listening on
//! the document does the rest.

use wasm_bindgen::prelude::*;
use web_sys::{CustomEvent, CustomEventInit};

use wastetrack::notify::REQUEST_EVENT;

/// Dispatch a notification request on the document
pub fn request_notification(message: &str, severity: Option<&str>) -> Result<(), JsValue> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let detail = js_sys::Object::new();
    js_sys::Reflect::set(&detail, &"message".into(), &message.into())?;
    js_sys::Reflect::set(
        &detail,
        &"type".into(),
        &severity.map(JsValue::from_str).unwrap_or(JsValue::NULL),
    )?;

    let init = CustomEventInit::new();
    init.set_detail(&detail);
    let event = CustomEvent::new_with_event_init_dict(REQUEST_EVENT, &init)?;
    document.dispatch_event(&event)?;
    Ok(())
}

/// Expose `showNotification` on `window`
pub fn install_global() {
    let Some(window) = web_sys::window() else {
        return;
    };

    let callback = Closure::wrap(Box::new(move |message: JsValue, severity: JsValue| {
        let message = message.as_string().unwrap_or_default();
        let severity = severity.as_string();
        if let Err(e) = request_notification(&message, severity.as_deref()) {
            tracing::warn!("showNotification failed: {:?}", e);
        }
    }) as Box<dyn FnMut(JsValue, JsValue)>);

    if let Err(e) = js_sys::Reflect::set(&window, &"showNotification".into(), callback.as_ref()) {
        tracing::warn!("Failed to expose window.showNotification: {:?}", e);
    }
    callback.forget();
}
