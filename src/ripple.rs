//! Button ripple effect
//!
//! A click on a button spawns a translucent circle centred on the pointer
//! that grows and fades out, then removes itself.

use crate::config::TimingConfig;
use crate::dom::{Document, Element, PointerPosition, Rect, Subscription};
use crate::timer::Scheduler;

/// Element id of the injected ripple stylesheet
pub const STYLE_ID: &str = "ripple-style";

/// Keyframes plus the clipping rule that keeps ripples inside buttons
pub fn ripple_stylesheet(button_selector: &str) -> String {
    format!(
        "@keyframes ripple {{ to {{ transform: scale(4); opacity: 0; }} }}\n\
         {} {{ position: relative; overflow: hidden; }}",
        button_selector
    )
}

/// Size and offset of a ripple inside its button
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RippleGeometry {
    pub size: f64,
    pub left: f64,
    pub top: f64,
}

impl RippleGeometry {
    /// Circle as large as the button's longer side, centred on the click
    pub fn compute(button: Rect, click: PointerPosition) -> Self {
        let size = button.width.max(button.height);
        Self {
            size,
            left: click.client_x - button.left - size / 2.0,
            top: click.client_y - button.top - size / 2.0,
        }
    }

    fn css(&self, duration_ms: u32) -> String {
        format!(
            "position: absolute; width: {size}px; height: {size}px; left: {left}px; top: {top}px; \
             background: rgba(255, 255, 255, 0.3); border-radius: 50%; transform: scale(0); \
             animation: ripple {duration_ms}ms linear; pointer-events: none;",
            size = self.size,
            left = self.left,
            top = self.top,
        )
    }
}

fn inject_stylesheet<D: Document>(document: &D, button_selector: &str) {
    if document.element_by_id(STYLE_ID).is_some() {
        return;
    }
    let Some(head) = document.head() else {
        tracing::warn!("No document head, ripple stylesheet not injected");
        return;
    };

    let injected = document.create_element("style").and_then(|style| {
        style.set_id(STYLE_ID);
        style.set_text(&ripple_stylesheet(button_selector));
        head.append_child(&style)
    });
    if let Err(e) = injected {
        tracing::warn!("Failed to inject ripple stylesheet: {}", e);
    }
}

fn spawn_ripple<D: Document, S: Scheduler>(
    document: &D,
    scheduler: &S,
    button: &D::Element,
    click: PointerPosition,
    duration_ms: u32,
) {
    let geometry = RippleGeometry::compute(button.bounding_rect(), click);

    let ripple = match document.create_element("span") {
        Ok(ripple) => ripple,
        Err(e) => {
            tracing::debug!("Ripple skipped: {}", e);
            return;
        }
    };
    ripple.set_css_text(&geometry.css(duration_ms));
    if let Err(e) = button.append_child(&ripple) {
        tracing::debug!("Ripple skipped: {}", e);
        return;
    }

    scheduler.schedule(duration_ms, move || ripple.remove());
}

/// Inject the ripple stylesheet and attach ripples to every button.
///
/// Returns the number of buttons wired.
pub fn install_ripples<D: Document, S: Scheduler>(
    document: &D,
    scheduler: &S,
    button_selector: &str,
    timing: &TimingConfig,
) -> usize {
    let buttons = document.query_all(button_selector);

    for button in &buttons {
        let ripple_document = document.clone();
        let scheduler = scheduler.clone();
        let target = button.clone();
        let duration_ms = timing.ripple_ms;

        document.on_click(button, move |click| {
            spawn_ripple(&ripple_document, &scheduler, &target, click, duration_ms);
        })
        .forget();
    }

    inject_stylesheet(document, button_selector);
    buttons.len()
}
