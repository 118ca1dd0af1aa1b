// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Delegation runtime.
//!
//! ## Overview
//!
//! [`Subscription::create`] registers exactly one native listener on the
//! configured root. Each event reaching it is matched against the delegator
//! selector by walking the bubble path; on a match the user listener runs with
//! the matched element as [`delegator`](crate::event::DelegationEvent::delegator).
//!
//! ## Matching
//!
//! - The walk starts at the event target (inclusive) and follows parent links.
//! - The closest matching element wins; outer matches are never reported.
//! - The walk must reach the root. If it runs off the top of the tree first the
//!   event escaped the delegation scope and is ignored, even if a match was seen.
//! - Whether the root itself may match is governed by [`RootMatching`].
//! - No match is the common case and is silently ignored.
//!
//! ## Lifecycle
//!
//! A subscription is [`Active`](SubscriptionState::Active) until
//! [`Subscription::remove`], then [`Removed`](SubscriptionState::Removed) for good.
//! Dropping a subscription does not remove the registration.

use alloc::rc::Rc;
use alloc::string::String;
use core::cell::Cell;

use crate::config::{DelegationConfig, DelegationOptions, RootMatching};
use crate::error::ConfigurationError;
use crate::event::{DelegationEvent, Listener};
use crate::types::{Host, HostParents, NativeEvent, NativeHandler, ParentLookup};

/// Validate `options` and install a delegation on `host`.
///
/// On error nothing has been registered.
pub fn create<H: Host + Clone>(
    host: &H,
    options: DelegationOptions<H>,
) -> Result<Subscription<H>, ConfigurationError> {
    let config = DelegationConfig::from_options(host, options)?;
    Ok(Subscription::create(host, config))
}

/// Find the delegator for an event targeting `target`.
///
/// Walks from `target` towards `root` and returns the closest node for which
/// `is_delegator` holds. Returns `None` when nothing matches before the root,
/// or when the walk never reaches `root`.
pub fn find_delegator<K: Clone + PartialEq>(
    parents: &impl ParentLookup<K>,
    target: K,
    root: &K,
    root_matching: RootMatching,
    mut is_delegator: impl FnMut(&K) -> bool,
) -> Option<K> {
    let mut found = None;
    let mut cur = target;
    loop {
        if cur == *root {
            if found.is_none() && root_matching == RootMatching::Inclusive && is_delegator(&cur) {
                found = Some(cur);
            }
            return found;
        }
        if found.is_none() && is_delegator(&cur) {
            found = Some(cur.clone());
        }
        cur = parents.parent_of(&cur)?;
    }
}

/// Subscription state.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SubscriptionState {
    /// The native listener is registered and events may reach the listener.
    Active,
    /// Terminal; no further invocations.
    Removed,
}

/// Handle for one installed delegation.
pub struct Subscription<H: Host> {
    host: H,
    root: H::Element,
    event_type: String,
    selector: String,
    state: Rc<Cell<SubscriptionState>>,
    registration: Cell<Option<H::ListenerId>>,
}

impl<H: Host + Clone> Subscription<H> {
    /// Register the native listener described by `config` on `host`.
    pub fn create(host: &H, config: DelegationConfig<H>) -> Self {
        let DelegationConfig {
            root,
            selector,
            compiled,
            event_type,
            listener,
            listener_options,
            root_matching,
        } = config;

        let state = Rc::new(Cell::new(SubscriptionState::Active));
        let handler = delegating_handler(
            root.clone(),
            compiled,
            root_matching,
            listener,
            Rc::clone(&state),
        );
        let registration =
            host.add_event_listener(&root, &event_type, handler, listener_options.as_ref());
        tracing::debug!(%event_type, %selector, root = ?root, "delegation installed");

        Self {
            host: host.clone(),
            root,
            event_type,
            selector,
            state,
            registration: Cell::new(Some(registration)),
        }
    }
}

impl<H: Host> Subscription<H> {
    /// The element holding the native listener.
    pub fn current_target(&self) -> &H::Element {
        &self.root
    }

    /// The delegated event type.
    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    /// The delegator selector.
    pub fn selector(&self) -> &str {
        &self.selector
    }

    /// Current state.
    pub fn state(&self) -> SubscriptionState {
        self.state.get()
    }

    /// Whether the subscription can still invoke its listener.
    pub fn is_active(&self) -> bool {
        self.state() == SubscriptionState::Active
    }

    /// Detach the native listener.
    ///
    /// Idempotent. An invocation already in progress is not interrupted, but no
    /// event delivered afterwards reaches the listener. Safe to call after the
    /// host dropped the registration on its own (root removed, one-shot
    /// listener already fired).
    pub fn remove(&self) {
        if self.state.replace(SubscriptionState::Removed) == SubscriptionState::Removed {
            return;
        }
        if let Some(id) = self.registration.take() {
            self.host.remove_event_listener(id);
        }
        tracing::debug!(event_type = %self.event_type, selector = %self.selector, "delegation removed");
    }
}

impl<H: Host> core::fmt::Debug for Subscription<H> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Subscription")
            .field("root", &self.root)
            .field("event_type", &self.event_type)
            .field("selector", &self.selector)
            .field("state", &self.state.get())
            .finish_non_exhaustive()
    }
}

fn delegating_handler<H: Host>(
    root: H::Element,
    selector: H::Selector,
    root_matching: RootMatching,
    listener: Listener<H>,
    state: Rc<Cell<SubscriptionState>>,
) -> NativeHandler<H> {
    Rc::new(move |host: &H, event: &H::Event| {
        if state.get() != SubscriptionState::Active {
            return;
        }
        let Some(target) = event.target() else {
            tracing::trace!(event_type = event.event_type(), "event has no target");
            return;
        };
        let delegator = find_delegator(&HostParents(host), target, &root, root_matching, |n| {
            host.matches(n, &selector)
        });
        match delegator {
            Some(delegator) => {
                tracing::trace!(event_type = event.event_type(), delegator = ?delegator, "delegating");
                listener(&DelegationEvent::new(event, delegator));
            }
            None => {
                tracing::trace!(event_type = event.event_type(), "no delegator on bubble path");
            }
        }
    })
}
