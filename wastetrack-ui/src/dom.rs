//! Browser Document
//!
//! `web-sys` implementation of the page abstraction.

use gloo_events::{EventListener, EventListenerOptions};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CustomEvent, HtmlElement, HtmlInputElement, HtmlTextAreaElement, MouseEvent, NodeList};

use wastetrack::{
    BehaviorError, BehaviorResult, Document, Element, PointerPosition, Rect, SubmitOutcome, Subscription,
};

fn dom_error(context: &str, err: JsValue) -> BehaviorError {
    BehaviorError::Dom(format!("{}: {:?}", context, err))
}

fn collect_elements(list: NodeList) -> Vec<WebElement> {
    (0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|node| node.dyn_into::<web_sys::Element>().ok())
        .map(WebElement::new)
        .collect()
}

impl Subscription for EventListener {
    fn forget(self) {
        EventListener::forget(self);
    }
}

/// A live DOM element
#[derive(Clone, Debug, PartialEq)]
pub struct WebElement {
    element: web_sys::Element,
}

impl WebElement {
    pub fn new(element: web_sys::Element) -> Self {
        Self { element }
    }

    pub fn raw(&self) -> &web_sys::Element {
        &self.element
    }

    fn style_declaration(&self) -> Option<web_sys::CssStyleDeclaration> {
        self.element.dyn_ref::<HtmlElement>().map(|el| el.style())
    }
}

impl Element for WebElement {
    fn set_id(&self, id: &str) {
        self.element.set_id(id);
    }

    fn set_class_name(&self, class_name: &str) {
        self.element.set_class_name(class_name);
    }

    fn set_text(&self, text: &str) {
        self.element.set_text_content(Some(text));
    }

    fn text_content(&self) -> String {
        self.element.text_content().unwrap_or_default()
    }

    fn value(&self) -> String {
        if let Some(input) = self.element.dyn_ref::<HtmlInputElement>() {
            return input.value();
        }
        if let Some(area) = self.element.dyn_ref::<HtmlTextAreaElement>() {
            return area.value();
        }
        String::new()
    }

    fn set_style(&self, property: &str, value: &str) {
        if let Some(style) = self.style_declaration() {
            let _ = style.set_property(property, value);
        }
    }

    fn style(&self, property: &str) -> Option<String> {
        self.style_declaration()
            .and_then(|style| style.get_property_value(property).ok())
            .filter(|value| !value.is_empty())
    }

    fn set_css_text(&self, css: &str) {
        if let Some(style) = self.style_declaration() {
            style.set_css_text(css);
        }
    }

    fn append_child(&self, child: &Self) -> BehaviorResult<()> {
        self.element
            .append_child(&child.element)
            .map(|_| ())
            .map_err(|e| dom_error("appendChild", e))
    }

    fn remove(&self) {
        self.element.remove();
    }

    fn is_connected(&self) -> bool {
        self.element.is_connected()
    }

    fn bounding_rect(&self) -> Rect {
        let rect = self.element.get_bounding_client_rect();
        Rect::new(rect.left(), rect.top(), rect.width(), rect.height())
    }

    fn query_all(&self, selector: &str) -> Vec<Self> {
        match self.element.query_selector_all(selector) {
            Ok(list) => collect_elements(list),
            Err(e) => {
                tracing::warn!("Invalid selector {:?}: {:?}", selector, e);
                Vec::new()
            }
        }
    }
}

/// The browser document
#[derive(Clone)]
pub struct WebDocument {
    document: web_sys::Document,
}

impl WebDocument {
    pub fn new(document: web_sys::Document) -> Self {
        Self { document }
    }

    /// The window's document, if running in a browser page
    pub fn current() -> Option<Self> {
        web_sys::window().and_then(|w| w.document()).map(Self::new)
    }

    pub fn raw(&self) -> &web_sys::Document {
        &self.document
    }
}

impl Document for WebDocument {
    type Element = WebElement;
    type Listener = EventListener;

    fn element_by_id(&self, id: &str) -> Option<WebElement> {
        self.document.get_element_by_id(id).map(WebElement::new)
    }

    fn query_all(&self, selector: &str) -> Vec<WebElement> {
        match self.document.query_selector_all(selector) {
            Ok(list) => collect_elements(list),
            Err(e) => {
                tracing::warn!("Invalid selector {:?}: {:?}", selector, e);
                Vec::new()
            }
        }
    }

    fn create_element(&self, tag: &str) -> BehaviorResult<WebElement> {
        self.document
            .create_element(tag)
            .map(WebElement::new)
            .map_err(|e| dom_error("createElement", e))
    }

    fn body(&self) -> Option<WebElement> {
        self.document.body().map(|body| WebElement::new(body.into()))
    }

    fn head(&self) -> Option<WebElement> {
        self.document.head().map(|head| WebElement::new(head.into()))
    }

    fn on_submit(&self, form: &WebElement, mut handler: impl FnMut() -> SubmitOutcome + 'static) -> EventListener {
        // Listeners are passive by default, which would ignore preventDefault
        EventListener::new_with_options(
            &form.element,
            "submit",
            EventListenerOptions::enable_prevent_default(),
            move |event| {
                if handler() == SubmitOutcome::Prevent {
                    event.prevent_default();
                }
            },
        )
    }

    fn on_input(&self, target: &WebElement, mut handler: impl FnMut(String) + 'static) -> EventListener {
        let input = target.clone();
        EventListener::new(&target.element, "input", move |_| handler(input.value()))
    }

    fn on_click(&self, target: &WebElement, mut handler: impl FnMut(PointerPosition) + 'static) -> EventListener {
        EventListener::new(&target.element, "click", move |event| {
            let position = event
                .dyn_ref::<MouseEvent>()
                .map(|e| PointerPosition::new(f64::from(e.client_x()), f64::from(e.client_y())))
                .unwrap_or_default();
            handler(position);
        })
    }

    fn on_custom(&self, event: &str, mut handler: impl FnMut(Option<String>) + 'static) -> EventListener {
        EventListener::new(&self.document, event.to_string(), move |event| {
            let detail = event
                .dyn_ref::<CustomEvent>()
                .map(|e| e.detail())
                .filter(|detail| !detail.is_undefined() && !detail.is_null())
                .and_then(|detail| js_sys::JSON::stringify(&detail).ok())
                .and_then(|json| json.as_string());
            handler(detail);
        })
    }
}
