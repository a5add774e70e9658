//! Headless document
//!
//! An in-memory element tree implementing [`Document`] so the page
//! behaviors run natively. It understands the selector subset the behaviors
//! use: descendant combinators over `tag`, `.class`, `#id` and `[attr]`.
//! Events are fired explicitly with [`HeadlessDocument::submit`],
//! [`HeadlessDocument::type_into`], [`HeadlessDocument::click`] and
//! [`HeadlessDocument::dispatch_custom`].

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::dom::{Document, Element, PointerPosition, Rect, SubmitOutcome, Subscription};
use crate::error::BehaviorResult;

static NEXT_NODE_KEY: AtomicU64 = AtomicU64::new(1);

#[derive(Default)]
struct NodeData {
    key: u64,
    tag: String,
    id: Option<String>,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
    value: String,
    text: String,
    styles: BTreeMap<String, String>,
    children: Vec<HeadlessElement>,
    parent: Weak<RefCell<NodeData>>,
    bounds: Rect,
    is_root: bool,
}

/// Element of a [`HeadlessDocument`]
#[derive(Clone)]
pub struct HeadlessElement(Rc<RefCell<NodeData>>);

impl PartialEq for HeadlessElement {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for HeadlessElement {}

impl std::fmt::Debug for HeadlessElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let node = self.0.borrow();
        write!(f, "<{}", node.tag)?;
        if let Some(id) = &node.id {
            write!(f, " id={:?}", id)?;
        }
        if !node.classes.is_empty() {
            write!(f, " class={:?}", node.classes.join(" "))?;
        }
        write!(f, ">")
    }
}

impl HeadlessElement {
    fn new(tag: &str) -> Self {
        Self(Rc::new(RefCell::new(NodeData {
            key: NEXT_NODE_KEY.fetch_add(1, Ordering::Relaxed),
            tag: tag.to_ascii_lowercase(),
            ..NodeData::default()
        })))
    }

    /// Unique for the life of the process, never reused
    fn key(&self) -> u64 {
        self.0.borrow().key
    }

    pub fn id(&self) -> Option<String> {
        self.0.borrow().id.clone()
    }

    pub fn class_name(&self) -> String {
        self.0.borrow().classes.join(" ")
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.0.borrow().classes.iter().any(|c| c == class)
    }

    pub fn set_value(&self, value: &str) {
        self.0.borrow_mut().value = value.to_string();
    }

    pub fn set_bounds(&self, bounds: Rect) {
        self.0.borrow_mut().bounds = bounds;
    }

    pub fn children(&self) -> Vec<HeadlessElement> {
        self.0.borrow().children.clone()
    }

    fn parent(&self) -> Option<HeadlessElement> {
        self.0.borrow().parent.upgrade().map(HeadlessElement)
    }

    /// Builder-style child creation for assembling fixtures
    pub fn child(&self, tag: &str) -> HeadlessElement {
        let child = HeadlessElement::new(tag);
        self.attach(&child);
        child
    }

    pub fn with_id(self, id: &str) -> Self {
        self.set_id(id);
        self
    }

    pub fn with_class(self, class_name: &str) -> Self {
        self.set_class_name(class_name);
        self
    }

    pub fn with_attribute(self, name: &str, value: &str) -> Self {
        self.0
            .borrow_mut()
            .attributes
            .insert(name.to_ascii_lowercase(), value.to_string());
        self
    }

    pub fn with_text(self, text: &str) -> Self {
        self.set_text(text);
        self
    }

    fn attach(&self, child: &HeadlessElement) {
        child.remove();
        child.0.borrow_mut().parent = Rc::downgrade(&self.0);
        self.0.borrow_mut().children.push(child.clone());
    }

    fn collect_descendants(&self, out: &mut Vec<HeadlessElement>) {
        for child in self.0.borrow().children.iter() {
            out.push(child.clone());
            child.collect_descendants(out);
        }
    }

    fn matches_compound(&self, compound: &Compound) -> bool {
        let node = self.0.borrow();
        if let Some(tag) = &compound.tag {
            if &node.tag != tag {
                return false;
            }
        }
        if let Some(id) = &compound.id {
            if node.id.as_ref() != Some(id) {
                return false;
            }
        }
        compound
            .classes
            .iter()
            .all(|c| node.classes.iter().any(|own| own == c))
            && compound
                .attributes
                .iter()
                .all(|a| node.attributes.contains_key(a))
    }

    fn matches(&self, selector: &Selector) -> bool {
        let Some((last, ancestors)) = selector.parts.split_last() else {
            return false;
        };
        if !self.matches_compound(last) {
            return false;
        }

        let mut remaining = ancestors.len();
        let mut current = self.parent();
        while remaining > 0 {
            let Some(element) = current else {
                return false;
            };
            if element.matches_compound(&ancestors[remaining - 1]) {
                remaining -= 1;
            }
            current = element.parent();
        }
        true
    }
}

impl Element for HeadlessElement {
    fn set_id(&self, id: &str) {
        self.0.borrow_mut().id = Some(id.to_string());
    }

    fn set_class_name(&self, class_name: &str) {
        self.0.borrow_mut().classes = class_name.split_whitespace().map(String::from).collect();
    }

    fn set_text(&self, text: &str) {
        let mut node = self.0.borrow_mut();
        for child in node.children.drain(..) {
            child.0.borrow_mut().parent = Weak::new();
        }
        node.text = text.to_string();
    }

    fn text_content(&self) -> String {
        let node = self.0.borrow();
        let mut text = node.text.clone();
        for child in &node.children {
            text.push_str(&child.text_content());
        }
        text
    }

    fn value(&self) -> String {
        self.0.borrow().value.clone()
    }

    fn set_style(&self, property: &str, value: &str) {
        let mut node = self.0.borrow_mut();
        if value.is_empty() {
            node.styles.remove(property);
        } else {
            node.styles.insert(property.to_string(), value.to_string());
        }
    }

    fn style(&self, property: &str) -> Option<String> {
        self.0.borrow().styles.get(property).cloned()
    }

    fn set_css_text(&self, css: &str) {
        let styles = css
            .split(';')
            .filter_map(|decl| {
                let (property, value) = decl.split_once(':')?;
                let property = property.trim();
                let value = value.trim();
                (!property.is_empty() && !value.is_empty())
                    .then(|| (property.to_string(), value.to_string()))
            })
            .collect();
        self.0.borrow_mut().styles = styles;
    }

    fn append_child(&self, child: &Self) -> BehaviorResult<()> {
        self.attach(child);
        Ok(())
    }

    fn remove(&self) {
        let Some(parent) = self.parent() else {
            return;
        };
        parent.0.borrow_mut().children.retain(|c| c != self);
        self.0.borrow_mut().parent = Weak::new();
    }

    fn is_connected(&self) -> bool {
        let mut current = Some(self.clone());
        while let Some(element) = current {
            if element.0.borrow().is_root {
                return true;
            }
            current = element.parent();
        }
        false
    }

    fn bounding_rect(&self) -> Rect {
        self.0.borrow().bounds
    }

    fn query_all(&self, selector: &str) -> Vec<Self> {
        let Some(selector) = Selector::parse(selector) else {
            tracing::debug!("Unsupported selector: {}", selector);
            return Vec::new();
        };
        let mut descendants = Vec::new();
        self.collect_descendants(&mut descendants);
        descendants.retain(|e| e.matches(&selector));
        descendants
    }
}

/// One compound selector, e.g. `input.big[required]`
#[derive(Debug, Default, PartialEq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attributes: Vec<String>,
}

/// Compound selectors joined by descendant combinators
#[derive(Debug, PartialEq)]
struct Selector {
    parts: Vec<Compound>,
}

impl Selector {
    fn parse(input: &str) -> Option<Self> {
        let parts = input
            .split_whitespace()
            .map(Compound::parse)
            .collect::<Option<Vec<_>>>()?;
        (!parts.is_empty()).then_some(Self { parts })
    }
}

impl Compound {
    fn parse(input: &str) -> Option<Self> {
        let mut compound = Compound::default();
        let mut rest = input;

        let tag_end = rest.find(['.', '#', '[']).unwrap_or(rest.len());
        if tag_end > 0 {
            let tag = &rest[..tag_end];
            if !tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
                return None;
            }
            compound.tag = Some(tag.to_ascii_lowercase());
        }
        rest = &rest[tag_end..];

        while let Some(marker) = rest.chars().next() {
            rest = &rest[1..];
            match marker {
                '.' | '#' => {
                    let end = rest.find(['.', '#', '[']).unwrap_or(rest.len());
                    let name = &rest[..end];
                    if name.is_empty() {
                        return None;
                    }
                    if marker == '.' {
                        compound.classes.push(name.to_string());
                    } else {
                        compound.id = Some(name.to_string());
                    }
                    rest = &rest[end..];
                }
                '[' => {
                    let end = rest.find(']')?;
                    let name = rest[..end].trim();
                    if name.is_empty() || name.contains('=') {
                        return None;
                    }
                    compound.attributes.push(name.to_ascii_lowercase());
                    rest = &rest[end + 1..];
                }
                _ => return None,
            }
        }

        Some(compound)
    }
}

#[derive(Clone)]
enum Handler {
    Submit(Rc<RefCell<dyn FnMut() -> SubmitOutcome>>),
    Input(Rc<RefCell<dyn FnMut(String)>>),
    Click(Rc<RefCell<dyn FnMut(PointerPosition)>>),
    Custom(Rc<RefCell<dyn FnMut(Option<String>)>>),
}

struct Registration {
    /// Element key, `None` for document-level listeners
    node: Option<u64>,
    event: String,
    handler: Handler,
}

/// Live listeners in registration order
#[derive(Default)]
struct Registry {
    next_id: u64,
    entries: BTreeMap<u64, Registration>,
}

/// Listener handle of a [`HeadlessDocument`]; dropping it unregisters
pub struct HeadlessListener {
    registry: Option<Weak<RefCell<Registry>>>,
    id: u64,
}

impl Subscription for HeadlessListener {
    fn forget(mut self) {
        self.registry = None;
    }
}

impl Drop for HeadlessListener {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.take().and_then(|r| r.upgrade()) {
            // Release the handler outside the borrow; it may own other listeners
            let removed = registry.borrow_mut().entries.remove(&self.id);
            drop(removed);
        }
    }
}

struct DocumentInner {
    root: HeadlessElement,
    head: HeadlessElement,
    body: HeadlessElement,
    registry: Rc<RefCell<Registry>>,
}

/// In-memory [`Document`] with `<html><head/><body/></html>`
#[derive(Clone)]
pub struct HeadlessDocument {
    inner: Rc<DocumentInner>,
}

impl Default for HeadlessDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessDocument {
    pub fn new() -> Self {
        let root = HeadlessElement::new("html");
        root.0.borrow_mut().is_root = true;
        let head = root.child("head");
        let body = root.child("body");

        Self {
            inner: Rc::new(DocumentInner {
                root,
                head,
                body,
                registry: Rc::new(RefCell::new(Registry::default())),
            }),
        }
    }

    /// Document body, always present
    pub fn body_element(&self) -> HeadlessElement {
        self.inner.body.clone()
    }

    /// Document head, always present
    pub fn head_element(&self) -> HeadlessElement {
        self.inner.head.clone()
    }

    /// Number of listeners still registered
    pub fn listener_count(&self) -> usize {
        self.inner.registry.borrow().entries.len()
    }

    /// Fire a submit event; `Prevent` if any handler cancelled it
    pub fn submit(&self, form: &HeadlessElement) -> SubmitOutcome {
        let mut outcome = SubmitOutcome::Proceed;
        for handler in self.handlers(Some(form.key()), "submit") {
            if let Handler::Submit(handler) = handler {
                if (&mut *handler.borrow_mut())() == SubmitOutcome::Prevent {
                    outcome = SubmitOutcome::Prevent;
                }
            }
        }
        outcome
    }

    /// Set the value of `input` and fire an input event
    pub fn type_into(&self, input: &HeadlessElement, value: &str) {
        input.set_value(value);
        for handler in self.handlers(Some(input.key()), "input") {
            if let Handler::Input(handler) = handler {
                (&mut *handler.borrow_mut())(value.to_string());
            }
        }
    }

    /// Fire a click on `target` and on each ancestor, innermost first
    pub fn click(&self, target: &HeadlessElement, position: PointerPosition) {
        let mut current = Some(target.clone());
        while let Some(element) = current {
            for handler in self.handlers(Some(element.key()), "click") {
                if let Handler::Click(handler) = handler {
                    (&mut *handler.borrow_mut())(position);
                }
            }
            current = element.parent();
        }
    }

    /// Dispatch a document-level custom event with an optional JSON detail
    pub fn dispatch_custom(&self, event: &str, detail: Option<&str>) {
        for handler in self.handlers(None, event) {
            if let Handler::Custom(handler) = handler {
                (&mut *handler.borrow_mut())(detail.map(String::from));
            }
        }
    }

    /// Snapshot of matching handlers, so handlers may (un)register freely
    fn handlers(&self, node: Option<u64>, event: &str) -> Vec<Handler> {
        self.inner
            .registry
            .borrow()
            .entries
            .values()
            .filter(|r| r.node == node && r.event == event)
            .map(|r| r.handler.clone())
            .collect()
    }

    fn register(&self, node: Option<u64>, event: &str, handler: Handler) -> HeadlessListener {
        let mut registry = self.inner.registry.borrow_mut();
        let id = registry.next_id;
        registry.next_id += 1;
        registry.entries.insert(
            id,
            Registration {
                node,
                event: event.to_string(),
                handler,
            },
        );

        HeadlessListener {
            registry: Some(Rc::downgrade(&self.inner.registry)),
            id,
        }
    }
}

impl Document for HeadlessDocument {
    type Element = HeadlessElement;
    type Listener = HeadlessListener;

    fn element_by_id(&self, id: &str) -> Option<HeadlessElement> {
        let mut all = Vec::new();
        self.inner.root.collect_descendants(&mut all);
        all.into_iter().find(|e| e.id().as_deref() == Some(id))
    }

    fn query_all(&self, selector: &str) -> Vec<HeadlessElement> {
        self.inner.root.query_all(selector)
    }

    fn create_element(&self, tag: &str) -> BehaviorResult<HeadlessElement> {
        Ok(HeadlessElement::new(tag))
    }

    fn body(&self) -> Option<HeadlessElement> {
        Some(self.inner.body.clone())
    }

    fn head(&self) -> Option<HeadlessElement> {
        Some(self.inner.head.clone())
    }

    fn on_submit(&self, form: &HeadlessElement, handler: impl FnMut() -> SubmitOutcome + 'static) -> HeadlessListener {
        self.register(Some(form.key()), "submit", Handler::Submit(Rc::new(RefCell::new(handler))))
    }

    fn on_input(&self, target: &HeadlessElement, handler: impl FnMut(String) + 'static) -> HeadlessListener {
        self.register(Some(target.key()), "input", Handler::Input(Rc::new(RefCell::new(handler))))
    }

    fn on_click(&self, target: &HeadlessElement, handler: impl FnMut(PointerPosition) + 'static) -> HeadlessListener {
        self.register(Some(target.key()), "click", Handler::Click(Rc::new(RefCell::new(handler))))
    }

    fn on_custom(&self, event: &str, handler: impl FnMut(Option<String>) + 'static) -> HeadlessListener {
        self.register(None, event, Handler::Custom(Rc::new(RefCell::new(handler))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_fixture(doc: &HeadlessDocument) -> HeadlessElement {
        let table = doc.body_element().child("table").with_id("items");
        table.child("thead").child("tr").child("th").with_text("Name");
        let tbody = table.child("tbody");
        tbody.child("tr").child("td").with_text("Bread");
        tbody.child("tr").with_class("row expired").child("td").with_text("Milk");
        table
    }

    #[test]
    fn test_selector_parse() {
        let selector = Selector::parse("tbody tr").unwrap();
        assert_eq!(selector.parts.len(), 2);

        let compound = Compound::parse("input.big[required]").unwrap();
        assert_eq!(compound.tag.as_deref(), Some("input"));
        assert_eq!(compound.classes, vec!["big"]);
        assert_eq!(compound.attributes, vec!["required"]);

        assert!(Selector::parse("").is_none());
        assert!(Compound::parse("input[type=text]").is_none());
        assert!(Compound::parse("div > p").is_some());
        assert!(Selector::parse("div > p").is_none());
    }

    #[test]
    fn test_descendant_query() {
        let doc = HeadlessDocument::new();
        table_fixture(&doc);

        assert_eq!(doc.query_all("tbody tr").len(), 2);
        assert_eq!(doc.query_all("tr").len(), 3);
        assert_eq!(doc.query_all("table#items .expired").len(), 1);
        assert_eq!(doc.query_all("thead td").len(), 0);
    }

    #[test]
    fn test_element_query_is_scoped() {
        let doc = HeadlessDocument::new();
        let first = doc.body_element().child("form");
        first.child("input").with_attribute("required", "");
        let second = doc.body_element().child("form");
        second.child("input").with_attribute("required", "");
        second.child("input");

        assert_eq!(first.query_all("input[required]").len(), 1);
        assert_eq!(second.query_all("input").len(), 2);
        assert_eq!(doc.query_all("input[required]").len(), 2);
    }

    #[test]
    fn test_text_content_and_lookup() {
        let doc = HeadlessDocument::new();
        let table = table_fixture(&doc);

        assert_eq!(table.text_content(), "NameBreadMilk");
        assert_eq!(doc.element_by_id("items"), Some(table));
        assert!(doc.element_by_id("missing").is_none());
    }

    #[test]
    fn test_connection_and_removal() {
        let doc = HeadlessDocument::new();
        let detached = doc.create_element("div").unwrap();
        assert!(!detached.is_connected());

        doc.body_element().append_child(&detached).unwrap();
        assert!(detached.is_connected());

        detached.remove();
        assert!(!detached.is_connected());
        assert!(doc.body_element().children().is_empty());

        // Removing twice is harmless
        detached.remove();
    }

    #[test]
    fn test_styles() {
        let doc = HeadlessDocument::new();
        let el = doc.create_element("div").unwrap();

        el.set_css_text("opacity: 0; transform: translateX(100%);\n margin-bottom: 10px;");
        assert_eq!(el.style("opacity").as_deref(), Some("0"));
        assert_eq!(el.style("transform").as_deref(), Some("translateX(100%)"));

        el.set_style("opacity", "1");
        assert_eq!(el.style("opacity").as_deref(), Some("1"));

        el.set_style("opacity", "");
        assert!(el.style("opacity").is_none());
    }

    #[test]
    fn test_click_bubbles_to_ancestors() {
        let doc = HeadlessDocument::new();
        let button = doc.body_element().child("button");
        let icon = button.child("span");

        let hits = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&hits);
        let _listener = doc.on_click(&button, move |pos| log.borrow_mut().push(pos.client_x));

        doc.click(&icon, PointerPosition::new(4.0, 2.0));
        doc.click(&button, PointerPosition::new(7.0, 2.0));
        assert_eq!(*hits.borrow(), vec![4.0, 7.0]);
    }

    #[test]
    fn test_handlers_may_register_listeners() {
        let doc = HeadlessDocument::new();
        let button = doc.body_element().child("button");

        let inner_doc = doc.clone();
        let target = button.clone();
        let _listener = doc.on_click(&button, move |_| {
            inner_doc.on_click(&target, |_| {}).forget();
        });

        doc.click(&button, PointerPosition::default());
        doc.click(&button, PointerPosition::default());
        assert_eq!(doc.listener_count(), 3);
    }

    #[test]
    fn test_dropping_listener_unregisters() {
        let doc = HeadlessDocument::new();
        let form = doc.body_element().child("form");

        let listener = doc.on_submit(&form, || SubmitOutcome::Prevent);
        assert_eq!(doc.submit(&form), SubmitOutcome::Prevent);

        drop(listener);
        assert_eq!(doc.listener_count(), 0);
        assert_eq!(doc.submit(&form), SubmitOutcome::Proceed);

        doc.on_submit(&form, || SubmitOutcome::Prevent).forget();
        assert_eq!(doc.submit(&form), SubmitOutcome::Prevent);
    }

    #[test]
    fn test_new_elements_start_without_listeners() {
        let doc = HeadlessDocument::new();
        let hits = Rc::new(RefCell::new(0));

        for _ in 0..50 {
            let button = doc.body_element().child("button");
            let counter = Rc::clone(&hits);
            doc.on_click(&button, move |_| *counter.borrow_mut() += 1).forget();
            button.remove();
        }

        for _ in 0..500 {
            let button = doc.body_element().child("button");
            doc.click(&button, PointerPosition::default());
            button.remove();
        }
        assert_eq!(*hits.borrow(), 0);
    }
}
