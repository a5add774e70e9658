//! Toast notifications
//!
//! A [`NotificationCenter`] owns the fixed container that toasts stack in.
//! It is created once at startup and cloned into every behavior that needs
//! to tell the user something.
//!
//! Each toast walks `Created -> Visible -> Dismissing -> Removed`:
//!
//! - created: appended to the container, transparent and off-screen
//! - visible: slides in shortly after creation
//! - dismissing: on close click or when its lifetime runs out
//! - removed: detached once the exit transition is over, if still attached

use serde::{Deserialize, Deserializer, Serialize};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use crate::config::TimingConfig;
use crate::dom::{Document, Element, Subscription};
use crate::error::{BehaviorError, BehaviorResult};
use crate::timer::{Scheduler, TaskHandle};

/// Element id of the toast container
pub const CONTAINER_ID: &str = "notification-container";

/// Custom event that requests a toast from decoupled code
pub const REQUEST_EVENT: &str = "showNotification";

const CONTAINER_STYLE: &str = "position: fixed; top: 20px; right: 20px; z-index: 10000; max-width: 300px;";

const CLOSE_BUTTON_STYLE: &str =
    "background: none; border: none; color: inherit; font-size: 1.2rem; cursor: pointer;";

/// Notification severity, drives the `alert-*` styling class
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

impl Severity {
    /// Parse a severity label; unknown labels fall back to `Info`
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "info" => Severity::Info,
            "success" => Severity::Success,
            "warning" => Severity::Warning,
            "error" => Severity::Error,
            other => {
                tracing::debug!("Unknown notification severity {:?}, using info", other);
                Severity::Info
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Success => "success",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }

    /// Styling class applied to the toast element
    pub fn css_class(&self) -> String {
        format!("alert alert-{}", self.as_str())
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Severity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = Option::<String>::deserialize(deserializer)?;
        Ok(label.as_deref().map(Severity::from_label).unwrap_or_default())
    }
}

/// Payload of the `showNotification` custom event
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NotificationRequest {
    pub message: String,
    #[serde(rename = "type", default)]
    pub severity: Severity,
}

impl NotificationRequest {
    pub fn from_json(detail: &str) -> BehaviorResult<Self> {
        Ok(serde_json::from_str(detail)?)
    }
}

/// Lifecycle phase of one toast
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Created,
    Visible,
    Dismissing,
    Removed,
}

/// Identifies a toast for the lifetime of its [`NotificationCenter`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NotificationId(pub u64);

struct Toast<E, L> {
    id: NotificationId,
    element: E,
    phase: Cell<Phase>,
    auto_dismiss: Cell<Option<TaskHandle>>,
    close_listener: Cell<Option<L>>,
}

struct CenterInner<D: Document, S: Scheduler> {
    document: D,
    scheduler: S,
    container: D::Element,
    timing: TimingConfig,
    toasts: RefCell<Vec<Rc<Toast<D::Element, D::Listener>>>>,
    next_id: Cell<u64>,
}

/// Owner of the toast container and every live toast
pub struct NotificationCenter<D: Document, S: Scheduler> {
    inner: Rc<CenterInner<D, S>>,
}

impl<D: Document, S: Scheduler> Clone for NotificationCenter<D, S> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<D: Document, S: Scheduler> NotificationCenter<D, S> {
    /// Create the container and attach it to the document body
    pub fn install(document: D, scheduler: S, timing: TimingConfig) -> BehaviorResult<Self> {
        let body = document.body().ok_or(BehaviorError::MissingBody)?;

        let container = document.create_element("div")?;
        container.set_id(CONTAINER_ID);
        container.set_css_text(CONTAINER_STYLE);
        body.append_child(&container)?;

        tracing::debug!("Notification container attached");

        Ok(Self {
            inner: Rc::new(CenterInner {
                document,
                scheduler,
                container,
                timing,
                toasts: RefCell::new(Vec::new()),
                next_id: Cell::new(0),
            }),
        })
    }

    /// The element toasts are appended to
    pub fn container(&self) -> &D::Element {
        &self.inner.container
    }

    /// Show a toast. Never fails: DOM errors are logged and the toast is
    /// dropped.
    pub fn show(&self, message: &str, severity: Severity) -> NotificationId {
        let id = NotificationId(self.inner.next_id.get());
        self.inner.next_id.set(id.0 + 1);

        let (element, close_listener) = match self.build_element(id, message, severity) {
            Ok(built) => built,
            Err(e) => {
                tracing::warn!("Failed to build notification: {}", e);
                return id;
            }
        };

        let toast = Rc::new(Toast {
            id,
            element,
            phase: Cell::new(Phase::Created),
            auto_dismiss: Cell::new(None),
            close_listener: Cell::new(Some(close_listener)),
        });
        self.inner.toasts.borrow_mut().push(Rc::clone(&toast));

        tracing::debug!(id = id.0, %severity, "Notification shown");

        let weak = Rc::downgrade(&toast);
        self.inner
            .scheduler
            .schedule(self.inner.timing.toast_enter_delay_ms, move || {
                let Some(toast) = weak.upgrade() else {
                    return;
                };
                if toast.phase.get() == Phase::Created {
                    toast.element.set_style("opacity", "1");
                    toast.element.set_style("transform", "translateX(0)");
                    toast.phase.set(Phase::Visible);
                }
            });

        let center = Rc::downgrade(&self.inner);
        let handle = self
            .inner
            .scheduler
            .schedule(self.inner.timing.toast_lifetime_ms, move || {
                if let Some(inner) = center.upgrade() {
                    NotificationCenter { inner }.begin_dismiss(id, false);
                }
            });
        toast.auto_dismiss.set(Some(handle));

        id
    }

    /// Start the exit transition of a toast. Returns false if the toast is
    /// unknown or already on its way out.
    pub fn dismiss(&self, id: NotificationId) -> bool {
        self.begin_dismiss(id, true)
    }

    /// Current phase; `None` once the toast has been removed
    pub fn phase(&self, id: NotificationId) -> Option<Phase> {
        self.find(id).map(|t| t.phase.get())
    }

    /// Number of toasts not yet removed
    pub fn active(&self) -> usize {
        self.inner.toasts.borrow().len()
    }

    /// Route `showNotification` custom events to [`NotificationCenter::show`]
    pub fn listen_for_requests(&self) {
        let center = self.clone();
        self.inner.document.on_custom(REQUEST_EVENT, move |detail| {
            let Some(detail) = detail else {
                tracing::warn!("{} event without detail", REQUEST_EVENT);
                return;
            };
            match NotificationRequest::from_json(&detail) {
                Ok(request) => {
                    center.show(&request.message, request.severity);
                }
                Err(e) => tracing::warn!("Ignoring malformed {} event: {}", REQUEST_EVENT, e),
            }
        })
        .forget();
    }

    fn find(&self, id: NotificationId) -> Option<Rc<Toast<D::Element, D::Listener>>> {
        self.inner
            .toasts
            .borrow()
            .iter()
            .find(|t| t.id == id)
            .cloned()
    }

    fn build_element(
        &self,
        id: NotificationId,
        message: &str,
        severity: Severity,
    ) -> BehaviorResult<(D::Element, D::Listener)> {
        let document = &self.inner.document;
        let transition = self.inner.timing.toast_exit_ms;

        let toast = document.create_element("div")?;
        toast.set_class_name(&severity.css_class());
        toast.set_css_text(&format!(
            "margin-bottom: 10px; opacity: 0; transform: translateX(100%); transition: all {}ms ease;",
            transition
        ));

        let row = document.create_element("div")?;
        row.set_css_text("display: flex; align-items: center; justify-content: space-between;");

        let text = document.create_element("span")?;
        text.set_text(message);

        let close = document.create_element("button")?;
        close.set_css_text(CLOSE_BUTTON_STYLE);
        close.set_text("×");

        let center = Rc::downgrade(&self.inner);
        let close_listener = document.on_click(&close, move |_| {
            if let Some(inner) = center.upgrade() {
                NotificationCenter { inner }.dismiss(id);
            }
        });

        row.append_child(&text)?;
        row.append_child(&close)?;
        toast.append_child(&row)?;
        self.inner.container.append_child(&toast)?;

        Ok((toast, close_listener))
    }

    fn begin_dismiss(&self, id: NotificationId, by_user: bool) -> bool {
        let Some(toast) = self.find(id) else {
            return false;
        };
        if matches!(toast.phase.get(), Phase::Dismissing | Phase::Removed) {
            return false;
        }

        if by_user {
            if let Some(handle) = toast.auto_dismiss.take() {
                self.inner.scheduler.cancel(handle);
            }
        }

        toast.phase.set(Phase::Dismissing);
        toast.element.set_style("opacity", "0");
        toast.element.set_style("transform", "translateX(100%)");

        tracing::debug!(id = id.0, by_user, "Notification dismissing");

        let center = Rc::downgrade(&self.inner);
        self.inner
            .scheduler
            .schedule(self.inner.timing.toast_exit_ms, move || {
                if let Some(inner) = center.upgrade() {
                    NotificationCenter { inner }.finish_removal(id);
                }
            });

        true
    }

    fn finish_removal(&self, id: NotificationId) {
        let Some(toast) = self.find(id) else {
            return;
        };
        if toast.element.is_connected() {
            toast.element.remove();
        }
        toast.phase.set(Phase::Removed);
        toast.close_listener.set(None);
        self.inner.toasts.borrow_mut().retain(|t| t.id != id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::PointerPosition;
    use crate::headless::{HeadlessDocument, HeadlessElement};
    use crate::timer::ManualScheduler;

    fn setup() -> (HeadlessDocument, ManualScheduler, NotificationCenter<HeadlessDocument, ManualScheduler>) {
        let doc = HeadlessDocument::new();
        let scheduler = ManualScheduler::new();
        let center = NotificationCenter::install(doc.clone(), scheduler.clone(), TimingConfig::default()).unwrap();
        (doc, scheduler, center)
    }

    fn close_button(toast: &HeadlessElement) -> HeadlessElement {
        toast.query_all("button").remove(0)
    }

    #[test]
    fn test_severity_labels() {
        assert_eq!(Severity::from_label("warning"), Severity::Warning);
        assert_eq!(Severity::from_label(" Error "), Severity::Error);
        assert_eq!(Severity::from_label("danger"), Severity::Info);
        assert_eq!(Severity::default().css_class(), "alert alert-info");
        assert_eq!(Severity::Success.to_string(), "success");
    }

    #[test]
    fn test_request_payload() {
        let request = NotificationRequest::from_json(r#"{"message": "Saved", "type": "success"}"#).unwrap();
        assert_eq!(request.message, "Saved");
        assert_eq!(request.severity, Severity::Success);

        let request = NotificationRequest::from_json(r#"{"message": "Hi", "type": null}"#).unwrap();
        assert_eq!(request.severity, Severity::Info);

        let request = NotificationRequest::from_json(r#"{"message": "Hi"}"#).unwrap();
        assert_eq!(request.severity, Severity::Info);

        assert!(NotificationRequest::from_json(r#"{"type": "error"}"#).is_err());
    }

    #[test]
    fn test_container_is_attached_once() {
        let (doc, _scheduler, center) = setup();

        let container = doc.element_by_id(CONTAINER_ID).unwrap();
        assert_eq!(&container, center.container());
        assert_eq!(container.style("position").as_deref(), Some("fixed"));
        assert_eq!(container.style("z-index").as_deref(), Some("10000"));
    }

    #[test]
    fn test_show_warning_lifecycle() {
        let (_doc, scheduler, center) = setup();

        let id = center.show("x", Severity::Warning);
        let toasts = center.container().children();
        assert_eq!(toasts.len(), 1);
        let toast = &toasts[0];
        assert_eq!(toast.class_name(), "alert alert-warning");
        assert_eq!(toast.query_all("span")[0].text_content(), "x");
        assert_eq!(toast.style("opacity").as_deref(), Some("0"));
        assert_eq!(center.phase(id), Some(Phase::Created));

        scheduler.advance(10);
        assert_eq!(center.phase(id), Some(Phase::Visible));
        assert_eq!(toast.style("opacity").as_deref(), Some("1"));
        assert_eq!(toast.style("transform").as_deref(), Some("translateX(0)"));

        scheduler.advance(4990);
        assert_eq!(center.phase(id), Some(Phase::Dismissing));
        assert_eq!(toast.style("opacity").as_deref(), Some("0"));
        assert!(toast.is_connected());

        scheduler.advance(300);
        assert!(!toast.is_connected());
        assert_eq!(center.phase(id), None);
        assert_eq!(center.active(), 0);
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_close_click_removes_within_exit_time() {
        let (doc, scheduler, center) = setup();

        let id = center.show("Saved", Severity::Success);
        let toast = center.container().children().remove(0);
        scheduler.advance(100);

        doc.click(&close_button(&toast), PointerPosition::default());
        assert_eq!(center.phase(id), Some(Phase::Dismissing));

        scheduler.advance(300);
        assert!(!toast.is_connected());

        // The auto-dismiss task was cancelled; running the clock on is harmless
        scheduler.advance(10_000);
        assert_eq!(center.active(), 0);
    }

    #[test]
    fn test_double_dismiss_is_idempotent() {
        let (doc, scheduler, center) = setup();

        let id = center.show("Twice", Severity::Info);
        let toast = center.container().children().remove(0);

        assert!(center.dismiss(id));
        assert!(!center.dismiss(id));
        doc.click(&close_button(&toast), PointerPosition::default());

        scheduler.advance(6000);
        assert!(!toast.is_connected());
        assert!(!center.dismiss(id));
    }

    #[test]
    fn test_detached_toast_still_finishes() {
        let (_doc, scheduler, center) = setup();

        let id = center.show("Gone early", Severity::Error);
        let toast = center.container().children().remove(0);
        toast.remove();

        scheduler.advance(5300);
        assert_eq!(center.phase(id), None);
    }

    #[test]
    fn test_toasts_stack_in_insertion_order() {
        let (_doc, scheduler, center) = setup();

        center.show("first", Severity::Info);
        scheduler.advance(1000);
        center.show("second", Severity::Error);
        center.show("second", Severity::Error);

        let texts: Vec<String> = center
            .container()
            .children()
            .iter()
            .map(|t| t.text_content())
            .collect();
        assert_eq!(texts.len(), 3);
        assert!(texts[0].starts_with("first"));
        assert!(texts[1].starts_with("second"));
        assert_eq!(center.active(), 3);

        // Lifecycles are independent
        scheduler.advance(4300);
        assert_eq!(center.active(), 2);
    }

    #[test]
    fn test_message_is_plain_text() {
        let (_doc, _scheduler, center) = setup();

        center.show("<b>bold</b>", Severity::Info);
        let toast = center.container().children().remove(0);
        assert_eq!(toast.query_all("b").len(), 0);
        assert!(toast.text_content().starts_with("<b>bold</b>"));
    }

    #[test]
    fn test_removed_toasts_release_close_listeners() {
        let (doc, scheduler, center) = setup();

        for i in 0..100 {
            center.show(&format!("toast {}", i), Severity::Info);
        }
        assert_eq!(doc.listener_count(), 100);

        let first = center.container().children().remove(0);
        doc.click(&close_button(&first), PointerPosition::default());
        scheduler.advance(300);
        assert_eq!(doc.listener_count(), 99);

        scheduler.run_until_idle();
        assert_eq!(center.active(), 0);
        assert_eq!(doc.listener_count(), 0);
    }

    #[test]
    fn test_custom_event_alias() {
        let (doc, _scheduler, center) = setup();
        center.listen_for_requests();

        doc.dispatch_custom(REQUEST_EVENT, Some(r#"{"message": "From elsewhere", "type": "error"}"#));
        doc.dispatch_custom(REQUEST_EVENT, Some("not json"));
        doc.dispatch_custom(REQUEST_EVENT, None);

        let toasts = center.container().children();
        assert_eq!(toasts.len(), 1);
        assert!(toasts[0].has_class("alert-error"));
    }
}
