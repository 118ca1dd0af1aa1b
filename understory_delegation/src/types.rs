// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core types for delegation: phases, host capabilities, and lookups.
//!
//! ## Overview
//!
//! The delegation core never touches a document directly. Everything it needs
//! from the hosting environment (selector parsing and matching, single-element
//! queries, parent traversal, listener registration) is expressed by the
//! [`Host`] trait. The [`config`](crate::config) and [`runtime`](crate::runtime)
//! modules are written purely against these capabilities.

use alloc::rc::Rc;
use alloc::string::String;

/// Phases of event propagation.
///
/// The delegation core itself only observes whatever phase the host delivers
/// to its root listener. Hosts that emulate DOM dispatch use this to order
/// listener invocation, see [`propagation_steps`](crate::propagation::propagation_steps).
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Phase {
    /// Root-to-target traversal.
    Capture,
    /// Target node.
    Target,
    /// Target-to-root traversal.
    Bubble,
}

/// Look up the parent of a node.
///
/// [`find_delegator`](crate::runtime::find_delegator) walks the bubble path with this,
/// and [`path_to_root`](crate::propagation::path_to_root) uses it to reconstruct a
/// root→target path.
pub trait ParentLookup<K> {
    /// Returns the parent of `node`, or `None` if `node` is a root.
    fn parent_of(&self, node: &K) -> Option<K>;
}

/// Adapts a [`Host`] into a [`ParentLookup`] over its elements.
#[derive(Copy, Clone, Debug)]
pub struct HostParents<'a, H>(pub &'a H);

impl<H: Host> ParentLookup<H::Element> for HostParents<'_, H> {
    #[inline]
    fn parent_of(&self, node: &H::Element) -> Option<H::Element> {
        self.0.parent_element(node)
    }
}

/// A selector string the host refused to parse.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("{reason}")]
pub struct SelectorError {
    reason: String,
}

impl SelectorError {
    /// Create an error carrying the host's explanation.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    /// The host's explanation of why parsing failed.
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

/// The parts of a native event the delegation runtime reads.
///
/// Everything else on the event is passed through untouched to the listener
/// via [`DelegationEvent`](crate::event::DelegationEvent).
pub trait NativeEvent<K> {
    /// Event type name, e.g. `"click"` or a custom name.
    fn event_type(&self) -> &str;
    /// Innermost originating element, if the event has one.
    fn target(&self) -> Option<K>;
}

/// A native handler as registered with the host.
///
/// Hosts call it with a reference to themselves so the handler can run
/// selector matching and parent traversal without keeping its own handle to
/// the document.
pub type NativeHandler<H> = Rc<dyn Fn(&H, &<H as Host>::Event)>;

/// Capabilities consumed from the hosting document environment.
///
/// Implementations are expected to be cheap handles onto a document. All calls
/// happen on a single thread, on the host's event-delivery timeline, and a
/// host must tolerate re-entrant calls from within a handler it is invoking
/// (for example a listener removing its own subscription).
pub trait Host: Sized + 'static {
    /// Element reference.
    type Element: Clone + PartialEq + core::fmt::Debug + 'static;
    /// Native event type delivered to handlers.
    type Event: NativeEvent<Self::Element> + 'static;
    /// Parsed selector, as produced by [`Host::parse_selector`].
    type Selector: core::fmt::Debug + 'static;
    /// Options forwarded verbatim to [`Host::add_event_listener`].
    type ListenerOptions: Clone + core::fmt::Debug + 'static;
    /// Token identifying a registered native listener.
    type ListenerId: core::fmt::Debug + 'static;

    /// The element used as root when none is configured (the document body).
    fn default_root(&self) -> Option<Self::Element>;

    /// Parse `selector` without consulting document state.
    fn parse_selector(&self, selector: &str) -> Result<Self::Selector, SelectorError>;

    /// Whether `element` matches `selector`.
    fn matches(&self, element: &Self::Element, selector: &Self::Selector) -> bool;

    /// First element in document order matching `selector`.
    fn query_first(&self, selector: &Self::Selector) -> Option<Self::Element>;

    /// Parent element of `element`, or `None` at the top of the element tree
    /// or for a detached subtree root.
    fn parent_element(&self, element: &Self::Element) -> Option<Self::Element>;

    /// Register `handler` on `target` for events named `event_type`.
    fn add_event_listener(
        &self,
        target: &Self::Element,
        event_type: &str,
        handler: NativeHandler<Self>,
        options: Option<&Self::ListenerOptions>,
    ) -> Self::ListenerId;

    /// Remove a registration. Unknown or already removed ids are ignored.
    fn remove_event_listener(&self, id: Self::ListenerId);
}
