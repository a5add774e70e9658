//! Document abstraction
//!
//! The page behaviors only talk to the page through these two traits. The
//! browser binding lives in `wastetrack-ui`; [`crate::headless`] provides an
//! in-memory implementation for tests.

use crate::error::BehaviorResult;

/// Axis-aligned box in client (viewport) coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }
}

/// Pointer location of a click, in client coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerPosition {
    pub client_x: f64,
    pub client_y: f64,
}

impl PointerPosition {
    pub fn new(client_x: f64, client_y: f64) -> Self {
        Self { client_x, client_y }
    }
}

/// What a submit handler decided
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Let the native submission go ahead
    Proceed,
    /// Cancel the submission
    Prevent,
}

/// A handle to one page element
///
/// Handles are cheap to clone and compare by identity.
pub trait Element: Clone + 'static {
    fn set_id(&self, id: &str);

    fn set_class_name(&self, class_name: &str);

    /// Replace the element's content with plain text
    fn set_text(&self, text: &str);

    /// Concatenated text of the element and its descendants
    fn text_content(&self) -> String;

    /// Current value of a form control, empty for other elements
    fn value(&self) -> String;

    /// Set one inline style property; an empty value clears it
    fn set_style(&self, property: &str, value: &str);

    /// Read one inline style property, `None` when unset
    fn style(&self, property: &str) -> Option<String>;

    /// Replace the whole inline style declaration
    fn set_css_text(&self, css: &str);

    fn append_child(&self, child: &Self) -> BehaviorResult<()>;

    /// Detach the element from its parent
    fn remove(&self);

    /// Whether the element is attached to the document
    fn is_connected(&self) -> bool;

    fn bounding_rect(&self) -> Rect;

    /// Descendants matching `selector`, in document order
    fn query_all(&self, selector: &str) -> Vec<Self>;
}

/// A registered event listener
///
/// Dropping the handle detaches the listener.
pub trait Subscription: 'static {
    /// Keep the listener attached for the lifetime of the page
    fn forget(self);
}

/// The page: element lookup, creation and event subscription
pub trait Document: Clone + 'static {
    type Element: Element;

    type Listener: Subscription;

    fn element_by_id(&self, id: &str) -> Option<Self::Element>;

    fn query_all(&self, selector: &str) -> Vec<Self::Element>;

    fn create_element(&self, tag: &str) -> BehaviorResult<Self::Element>;

    fn body(&self) -> Option<Self::Element>;

    fn head(&self) -> Option<Self::Element>;

    /// Intercept submit events of `form`
    #[must_use = "dropping the listener detaches it"]
    fn on_submit(&self, form: &Self::Element, handler: impl FnMut() -> SubmitOutcome + 'static) -> Self::Listener;

    /// Observe input events of `target`; the handler receives its current value
    #[must_use = "dropping the listener detaches it"]
    fn on_input(&self, target: &Self::Element, handler: impl FnMut(String) + 'static) -> Self::Listener;

    #[must_use = "dropping the listener detaches it"]
    fn on_click(&self, target: &Self::Element, handler: impl FnMut(PointerPosition) + 'static) -> Self::Listener;

    /// Observe a document-level custom event; the handler receives the
    /// event detail serialized as JSON, if any
    #[must_use = "dropping the listener detaches it"]
    fn on_custom(&self, event: &str, handler: impl FnMut(Option<String>) + 'static) -> Self::Listener;
}
