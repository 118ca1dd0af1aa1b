// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Option validation and normalization.
//!
//! ## Overview
//!
//! [`DelegationOptions`] is the caller-facing option set. It is turned into an
//! immutable [`DelegationConfig`] by [`DelegationConfig::from_options`], which
//! validates every option up front:
//!
//! - `listener` must be present.
//! - `event_type` must be non-empty; any other string is accepted so custom
//!   event types can be delegated.
//! - `selector` must parse with the host's selector engine. This is checked
//!   eagerly so a malformed selector fails here rather than on the first event.
//! - `root` is resolved to an element: used as-is, queried by selector (first
//!   match wins), or taken from [`Host::default_root`] when omitted.
//!
//! Resolving a selector root is the only interaction with document state.
//! Nothing is registered with the host here; that is the job of
//! [`Subscription::create`](crate::runtime::Subscription::create).

use alloc::rc::Rc;
use alloc::string::String;

use crate::error::ConfigurationError;
use crate::event::{DelegationEvent, Listener};
use crate::types::Host;

/// Where the delegation listener is attached.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum RootTarget<E> {
    /// The host's default root (the document body).
    #[default]
    Default,
    /// A specific element.
    Element(E),
    /// The first element matching a selector.
    Selector(String),
}

/// Whether the root itself may be reported as the delegator.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum RootMatching {
    /// The bubble path includes the root; a root matching the selector is a delegator.
    #[default]
    Inclusive,
    /// The walk stops below the root.
    Exclusive,
}

/// Caller-supplied delegation options.
///
/// Build with [`DelegationOptions::new`] and the `with_*` methods, or fill the
/// public fields directly.
pub struct DelegationOptions<H: Host> {
    /// Element receiving the native listener.
    pub root: RootTarget<H::Element>,
    /// Selector the delegating elements must match, e.g. `"li"` or `".item"`.
    pub selector: String,
    /// Event name, e.g. `"click"`.
    pub event_type: String,
    /// Callback invoked for each delegated event.
    pub listener: Option<Listener<H>>,
    /// Passed through to [`Host::add_event_listener`] untouched.
    pub listener_options: Option<H::ListenerOptions>,
    /// Whether the root may act as delegator.
    pub root_matching: RootMatching,
}

impl<H: Host> DelegationOptions<H> {
    /// Options for `event_type` events on elements matching `selector`, rooted
    /// at the default root and with no listener yet.
    pub fn new(event_type: impl Into<String>, selector: impl Into<String>) -> Self {
        Self {
            root: RootTarget::Default,
            selector: selector.into(),
            event_type: event_type.into(),
            listener: None,
            listener_options: None,
            root_matching: RootMatching::default(),
        }
    }

    /// Set the root.
    pub fn with_root(mut self, root: RootTarget<H::Element>) -> Self {
        self.root = root;
        self
    }

    /// Root the delegation at `element`.
    pub fn with_root_element(self, element: H::Element) -> Self {
        self.with_root(RootTarget::Element(element))
    }

    /// Root the delegation at the first element matching `selector`.
    pub fn with_root_selector(self, selector: impl Into<String>) -> Self {
        self.with_root(RootTarget::Selector(selector.into()))
    }

    /// Set the listener.
    pub fn with_listener(self, listener: impl Fn(&DelegationEvent<'_, H>) + 'static) -> Self {
        self.with_shared_listener(Rc::new(listener))
    }

    /// Set a listener that may be shared with other subscriptions.
    pub fn with_shared_listener(mut self, listener: Listener<H>) -> Self {
        self.listener = Some(listener);
        self
    }

    /// Set the options forwarded to the host registration.
    pub fn with_listener_options(mut self, options: H::ListenerOptions) -> Self {
        self.listener_options = Some(options);
        self
    }

    /// Set the root boundary behavior.
    pub fn with_root_matching(mut self, root_matching: RootMatching) -> Self {
        self.root_matching = root_matching;
        self
    }
}

impl<H: Host> core::fmt::Debug for DelegationOptions<H> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DelegationOptions")
            .field("root", &self.root)
            .field("selector", &self.selector)
            .field("event_type", &self.event_type)
            .field("has_listener", &self.listener.is_some())
            .field("listener_options", &self.listener_options)
            .field("root_matching", &self.root_matching)
            .finish()
    }
}

/// Validated, immutable delegation configuration.
pub struct DelegationConfig<H: Host> {
    pub(crate) root: H::Element,
    pub(crate) selector: String,
    pub(crate) compiled: H::Selector,
    pub(crate) event_type: String,
    pub(crate) listener: Listener<H>,
    pub(crate) listener_options: Option<H::ListenerOptions>,
    pub(crate) root_matching: RootMatching,
}

impl<H: Host> DelegationConfig<H> {
    /// Validate `options` against `host` and resolve the root element.
    pub fn from_options(
        host: &H,
        options: DelegationOptions<H>,
    ) -> Result<Self, ConfigurationError> {
        let DelegationOptions {
            root,
            selector,
            event_type,
            listener,
            listener_options,
            root_matching,
        } = options;

        let listener = listener.ok_or(ConfigurationError::MissingListener)?;
        if event_type.is_empty() {
            return Err(ConfigurationError::EmptyEventType);
        }
        if selector.is_empty() {
            return Err(ConfigurationError::EmptySelector);
        }
        let compiled = match host.parse_selector(&selector) {
            Ok(compiled) => compiled,
            Err(source) => {
                tracing::debug!(%selector, %source, "rejecting delegator selector");
                return Err(ConfigurationError::InvalidSelector { selector, source });
            }
        };
        let root = resolve_root(host, root)?;

        Ok(Self {
            root,
            selector,
            compiled,
            event_type,
            listener,
            listener_options,
            root_matching,
        })
    }

    /// The resolved root element.
    pub fn root(&self) -> &H::Element {
        &self.root
    }

    /// The delegator selector, verbatim.
    pub fn selector(&self) -> &str {
        &self.selector
    }

    /// The delegator selector as parsed by the host.
    pub fn compiled_selector(&self) -> &H::Selector {
        &self.compiled
    }

    /// The event type.
    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    /// The listener.
    pub fn listener(&self) -> &Listener<H> {
        &self.listener
    }

    /// The pass-through registration options.
    pub fn listener_options(&self) -> Option<&H::ListenerOptions> {
        self.listener_options.as_ref()
    }

    /// The root boundary behavior.
    pub fn root_matching(&self) -> RootMatching {
        self.root_matching
    }
}

impl<H: Host> core::fmt::Debug for DelegationConfig<H> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DelegationConfig")
            .field("root", &self.root)
            .field("selector", &self.selector)
            .field("event_type", &self.event_type)
            .field("listener_options", &self.listener_options)
            .field("root_matching", &self.root_matching)
            .finish_non_exhaustive()
    }
}

fn resolve_root<H: Host>(
    host: &H,
    root: RootTarget<H::Element>,
) -> Result<H::Element, ConfigurationError> {
    match root {
        RootTarget::Element(element) => Ok(element),
        RootTarget::Default => host.default_root().ok_or(ConfigurationError::NoDefaultRoot),
        RootTarget::Selector(selector) => {
            let compiled = match host.parse_selector(&selector) {
                Ok(compiled) => compiled,
                Err(source) => {
                    tracing::debug!(%selector, %source, "rejecting root selector");
                    return Err(ConfigurationError::InvalidRootSelector { selector, source });
                }
            };
            host.query_first(&compiled)
                .ok_or(ConfigurationError::RootNotFound { selector })
        }
    }
}
