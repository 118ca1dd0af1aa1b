// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The value handed to delegation listeners.
//!
//! ## Call context
//!
//! Listeners receive a single [`DelegationEvent`]. It dereferences to the host's
//! native event, so every field and method of the original event stays
//! available, and adds [`DelegationEvent::delegator`]: the closest element on
//! the bubble path that matched the delegator selector.
//!
//! By convention the delegator is the listener's receiving context, the element
//! the listener is "about". Nothing enforces this; it is simply the element a
//! per-item listener would have been attached to without delegation.

use alloc::rc::Rc;
use core::ops::Deref;

use crate::types::Host;

/// A delegation listener.
///
/// Listeners are `Fn` rather than `FnMut` so that a listener may synchronously
/// dispatch further events that reach itself. Keep mutable state in a `Cell`
/// or `RefCell`.
pub type Listener<H> = Rc<dyn Fn(&DelegationEvent<'_, H>)>;

/// A native event together with the element it was delegated to.
pub struct DelegationEvent<'a, H: Host> {
    event: &'a H::Event,
    delegator: H::Element,
}

impl<'a, H: Host> DelegationEvent<'a, H> {
    /// Pair a native event with its delegator.
    pub fn new(event: &'a H::Event, delegator: H::Element) -> Self {
        Self { event, delegator }
    }

    /// The matched element, closest to the event target.
    pub fn delegator(&self) -> &H::Element {
        &self.delegator
    }

    /// The untouched native event.
    pub fn native(&self) -> &'a H::Event {
        self.event
    }
}

impl<H: Host> Deref for DelegationEvent<'_, H> {
    type Target = H::Event;

    fn deref(&self) -> &Self::Target {
        self.event
    }
}

impl<H: Host> core::fmt::Debug for DelegationEvent<'_, H> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        use crate::types::NativeEvent;
        f.debug_struct("DelegationEvent")
            .field("event_type", &self.event.event_type())
            .field("delegator", &self.delegator)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_host::{MockEvent, MockHost, node};
    use crate::types::NativeEvent;

    #[test]
    fn derefs_to_native_event() {
        let native = MockEvent::new("click", node("span"));
        let evt: DelegationEvent<'_, MockHost> = DelegationEvent::new(&native, node("li"));
        assert_eq!(evt.event_type(), "click");
        assert_eq!(evt.target(), Some(node("span")));
        assert_eq!(*evt.delegator(), node("li"));
        assert!(core::ptr::eq(evt.native(), &native));
    }
}
