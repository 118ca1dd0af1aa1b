// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory document host backed by the `scraper` HTML tree.
//!
//! ## Feature
//!
//! Enable with `scraper_adapter`.
//!
//! ## Notes
//!
//! [`ScraperDocument`] is a cheap, clonable handle onto a parsed HTML document.
//! It supplies everything [`Host`] asks for:
//!
//! - CSS parsing and matching come from `scraper::Selector`.
//! - Elements are `ego_tree` node ids, stable across mutations.
//! - Listeners live in a per-document registry and are invoked by
//!   [`ScraperDocument::dispatch`] in capture → target → bubble order,
//!   honoring [`ListenerOptions`] and the stop/prevent flags on [`DomEvent`].
//!
//! The document can be changed after delegations are installed with
//! [`ScraperDocument::append_html`] and [`ScraperDocument::detach`].
//!
//! ## Example
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use understory_delegation::adapters::scraper_host::{DomEvent, ScraperDocument};
//! use understory_delegation::config::DelegationOptions;
//!
//! let doc = ScraperDocument::parse(
//!     r#"<div id="menu"><ul><li id="a"><span id="label">A</span></li></ul></div>"#,
//! );
//! let menu = doc.query_selector("#menu").unwrap().unwrap();
//! let item = doc.query_selector("#a").unwrap().unwrap();
//! let label = doc.query_selector("#label").unwrap().unwrap();
//!
//! let hits = Rc::new(RefCell::new(Vec::new()));
//! let sink = hits.clone();
//! let subscription = understory_delegation::create(
//!     &doc,
//!     DelegationOptions::<ScraperDocument>::new("click", "li")
//!         .with_root_element(menu)
//!         .with_listener(move |evt| sink.borrow_mut().push(*evt.delegator())),
//! )
//! .unwrap();
//!
//! doc.dispatch(&DomEvent::new("click", label));
//! assert_eq!(*hits.borrow(), vec![item]);
//!
//! subscription.remove();
//! doc.dispatch(&DomEvent::new("click", label));
//! assert_eq!(hits.borrow().len(), 1);
//! ```

use alloc::rc::Rc;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};

use ego_tree::{NodeId, NodeMut, NodeRef};
use scraper::{ElementRef, Html, Node, Selector};

use crate::propagation::{path_to_root, propagation_steps};
use crate::types::{Host, NativeEvent, NativeHandler, ParentLookup, Phase, SelectorError};

bitflags::bitflags! {
    /// Registration options, the counterpart of DOM `AddEventListenerOptions`.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ListenerOptions: u8 {
        /// Invoke during the capture phase instead of the bubble phase.
        const CAPTURE = 0b0000_0001;
        /// Remove the registration before its first invocation.
        const ONCE    = 0b0000_0010;
        /// The handler cannot prevent the default action.
        const PASSIVE = 0b0000_0100;
    }
}

/// Identifier of a native listener registered on a [`ScraperDocument`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ListenerId(u64);

/// An event dispatched through a [`ScraperDocument`].
///
/// Dispatch state (phase, current target, stop and prevent flags) is kept in
/// cells so handlers can update it through a shared reference.
#[derive(Debug)]
pub struct DomEvent {
    event_type: String,
    target: NodeId,
    bubbles: bool,
    detail: Option<String>,
    phase: Cell<Option<Phase>>,
    current_target: Cell<Option<NodeId>>,
    propagation_stopped: Cell<bool>,
    immediate_propagation_stopped: Cell<bool>,
    default_prevented: Cell<bool>,
    in_passive_listener: Cell<bool>,
}

impl DomEvent {
    /// A bubbling event of type `event_type` targeting `target`.
    pub fn new(event_type: impl Into<String>, target: NodeId) -> Self {
        Self {
            event_type: event_type.into(),
            target,
            bubbles: true,
            detail: None,
            phase: Cell::new(None),
            current_target: Cell::new(None),
            propagation_stopped: Cell::new(false),
            immediate_propagation_stopped: Cell::new(false),
            default_prevented: Cell::new(false),
            in_passive_listener: Cell::new(false),
        }
    }

    /// A non-bubbling event, such as `focus`. Only capture and target listeners see it.
    pub fn non_bubbling(event_type: impl Into<String>, target: NodeId) -> Self {
        Self {
            bubbles: false,
            ..Self::new(event_type, target)
        }
    }

    /// Attach a free-form payload, like `CustomEvent.detail`.
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// The event type.
    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    /// The originating element.
    pub fn target(&self) -> NodeId {
        self.target
    }

    /// Whether the event bubbles.
    pub fn bubbles(&self) -> bool {
        self.bubbles
    }

    /// The payload given to [`DomEvent::with_detail`].
    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }

    /// Phase currently being dispatched, `None` outside dispatch.
    pub fn phase(&self) -> Option<Phase> {
        self.phase.get()
    }

    /// Element whose listeners are currently running, `None` outside dispatch.
    pub fn current_target(&self) -> Option<NodeId> {
        self.current_target.get()
    }

    /// Stop after the listeners of the current element.
    pub fn stop_propagation(&self) {
        self.propagation_stopped.set(true);
    }

    /// Stop right after the current listener.
    pub fn stop_immediate_propagation(&self) {
        self.propagation_stopped.set(true);
        self.immediate_propagation_stopped.set(true);
    }

    /// Cancel the default action. Ignored inside passive listeners.
    pub fn prevent_default(&self) {
        if !self.in_passive_listener.get() {
            self.default_prevented.set(true);
        }
    }

    /// Whether [`DomEvent::prevent_default`] took effect.
    pub fn default_prevented(&self) -> bool {
        self.default_prevented.get()
    }
}

impl NativeEvent<NodeId> for DomEvent {
    fn event_type(&self) -> &str {
        &self.event_type
    }

    fn target(&self) -> Option<NodeId> {
        Some(self.target)
    }
}

struct Registration {
    id: ListenerId,
    target: NodeId,
    event_type: String,
    options: ListenerOptions,
    handler: NativeHandler<ScraperDocument>,
}

impl Registration {
    fn runs_in(&self, phase: Phase) -> bool {
        match phase {
            Phase::Capture => self.options.contains(ListenerOptions::CAPTURE),
            Phase::Target => true,
            Phase::Bubble => !self.options.contains(ListenerOptions::CAPTURE),
        }
    }
}

struct Inner {
    html: RefCell<Html>,
    listeners: RefCell<Vec<Registration>>,
    next_listener: Cell<u64>,
}

/// A parsed HTML document acting as a delegation [`Host`].
#[derive(Clone)]
pub struct ScraperDocument {
    inner: Rc<Inner>,
}

impl core::fmt::Debug for ScraperDocument {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ScraperDocument")
            .field("listeners", &self.listener_count())
            .finish_non_exhaustive()
    }
}

impl ScraperDocument {
    /// Parse a full HTML document. Missing `html`, `head` and `body` elements
    /// are synthesized by the parser.
    pub fn parse(markup: &str) -> Self {
        Self::from_html(Html::parse_document(markup))
    }

    /// Wrap an already parsed document.
    pub fn from_html(html: Html) -> Self {
        Self {
            inner: Rc::new(Inner {
                html: RefCell::new(html),
                listeners: RefCell::new(Vec::new()),
                next_listener: Cell::new(0),
            }),
        }
    }

    /// The `<html>` element.
    pub fn root_element(&self) -> NodeId {
        self.inner.html.borrow().root_element().id()
    }

    /// The `<body>` element, if the document has one.
    pub fn body(&self) -> Option<NodeId> {
        let html = self.inner.html.borrow();
        html.root_element()
            .children()
            .filter_map(ElementRef::wrap)
            .find(|e| e.value().name() == "body")
            .map(|e| e.id())
    }

    /// First attached element matching `selector`, after validating it.
    pub fn query_selector(&self, selector: &str) -> Result<Option<NodeId>, SelectorError> {
        let selector = parse_css(selector)?;
        Ok(self.query_first(&selector))
    }

    /// Local tag name of an element.
    pub fn name_of(&self, node: NodeId) -> Option<String> {
        let html = self.inner.html.borrow();
        html.tree
            .get(node)
            .and_then(ElementRef::wrap)
            .map(|e| e.value().name().to_string())
    }

    /// Attribute value of an element.
    pub fn attr_of(&self, node: NodeId, attr: &str) -> Option<String> {
        let html = self.inner.html.borrow();
        html.tree
            .get(node)
            .and_then(ElementRef::wrap)
            .and_then(|e| e.value().attr(attr).map(ToString::to_string))
    }

    /// Parse `markup` as a fragment and append its nodes to `parent`.
    ///
    /// Returns the ids of the appended top-level elements. Unknown `parent`
    /// ids append nothing.
    pub fn append_html(&self, parent: NodeId, markup: &str) -> Vec<NodeId> {
        let fragment = Html::parse_fragment(markup);
        let mut html = self.inner.html.borrow_mut();
        let Some(mut parent_node) = html.tree.get_mut(parent) else {
            return Vec::new();
        };
        let mut appended = Vec::new();
        for child in fragment.root_element().children() {
            let mut node = parent_node.append(child.value().clone());
            copy_children(child, &mut node);
            if child.value().is_element() {
                appended.push(node.id());
            }
        }
        appended
    }

    /// Detach `node` (and its subtree) from its parent.
    ///
    /// The subtree stays addressable and its own listeners remain registered,
    /// but events on it no longer propagate to former ancestors.
    pub fn detach(&self, node: NodeId) {
        if let Some(mut n) = self.inner.html.borrow_mut().tree.get_mut(node) {
            n.detach();
        }
    }

    /// Number of registered native listeners, across all elements.
    pub fn listener_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }

    /// Dispatch `event` from its target.
    ///
    /// Listeners run synchronously in capture → target → bubble order. A
    /// listener removed during dispatch is skipped if not yet reached; a
    /// listener added during dispatch first runs for the next event. Returns
    /// `false` when a listener prevented the default action.
    pub fn dispatch(&self, event: &DomEvent) -> bool {
        let path = path_to_root(event.target, self);
        for (phase, node) in propagation_steps(&path, event.bubbles) {
            if event.propagation_stopped.get() {
                break;
            }
            let batch = self.listeners_for(node, &event.event_type, phase);
            if batch.is_empty() {
                continue;
            }
            tracing::trace!(
                event_type = %event.event_type,
                ?phase,
                ?node,
                listeners = batch.len(),
                "dispatch step"
            );
            event.phase.set(Some(phase));
            event.current_target.set(Some(node));
            for (id, options, handler) in batch {
                if !self.is_registered(id) {
                    continue;
                }
                if options.contains(ListenerOptions::ONCE) {
                    self.remove_listener(id);
                }
                event
                    .in_passive_listener
                    .set(options.contains(ListenerOptions::PASSIVE));
                handler(self, event);
                event.in_passive_listener.set(false);
                if event.immediate_propagation_stopped.get() {
                    break;
                }
            }
        }
        event.phase.set(None);
        event.current_target.set(None);
        !event.default_prevented.get()
    }

    fn listeners_for(
        &self,
        node: NodeId,
        event_type: &str,
        phase: Phase,
    ) -> Vec<(ListenerId, ListenerOptions, NativeHandler<Self>)> {
        self.inner
            .listeners
            .borrow()
            .iter()
            .filter(|r| r.target == node && r.event_type == event_type && r.runs_in(phase))
            .map(|r| (r.id, r.options, Rc::clone(&r.handler)))
            .collect()
    }

    fn is_registered(&self, id: ListenerId) -> bool {
        self.inner.listeners.borrow().iter().any(|r| r.id == id)
    }

    fn remove_listener(&self, id: ListenerId) {
        self.inner.listeners.borrow_mut().retain(|r| r.id != id);
    }
}

impl ParentLookup<NodeId> for ScraperDocument {
    fn parent_of(&self, node: &NodeId) -> Option<NodeId> {
        self.parent_element(node)
    }
}

impl Host for ScraperDocument {
    type Element = NodeId;
    type Event = DomEvent;
    type Selector = Selector;
    type ListenerOptions = ListenerOptions;
    type ListenerId = ListenerId;

    fn default_root(&self) -> Option<NodeId> {
        self.body()
    }

    fn parse_selector(&self, selector: &str) -> Result<Selector, SelectorError> {
        parse_css(selector)
    }

    fn matches(&self, element: &NodeId, selector: &Selector) -> bool {
        let html = self.inner.html.borrow();
        html.tree
            .get(*element)
            .and_then(ElementRef::wrap)
            .is_some_and(|e| selector.matches(&e))
    }

    fn query_first(&self, selector: &Selector) -> Option<NodeId> {
        // Tree order, not node allocation order: appended nodes may precede older ones.
        let html = self.inner.html.borrow();
        html.root_element()
            .descendants()
            .filter_map(ElementRef::wrap)
            .find(|e| selector.matches(e))
            .map(|e| e.id())
    }

    fn parent_element(&self, element: &NodeId) -> Option<NodeId> {
        let html = self.inner.html.borrow();
        html.tree
            .get(*element)?
            .parent()
            .and_then(ElementRef::wrap)
            .map(|e| e.id())
    }

    fn add_event_listener(
        &self,
        target: &NodeId,
        event_type: &str,
        handler: NativeHandler<Self>,
        options: Option<&ListenerOptions>,
    ) -> ListenerId {
        let id = ListenerId(self.inner.next_listener.get());
        self.inner.next_listener.set(id.0 + 1);
        self.inner.listeners.borrow_mut().push(Registration {
            id,
            target: *target,
            event_type: event_type.to_string(),
            options: options.copied().unwrap_or_default(),
            handler,
        });
        id
    }

    fn remove_event_listener(&self, id: ListenerId) {
        self.remove_listener(id);
    }
}

fn parse_css(selector: &str) -> Result<Selector, SelectorError> {
    Selector::parse(selector).map_err(|e| SelectorError::new(e.to_string()))
}

fn copy_children(source: NodeRef<'_, Node>, dest: &mut NodeMut<'_, Node>) {
    for child in source.children() {
        let mut node = dest.append(child.value().clone());
        copy_children(child, &mut node);
    }
}
