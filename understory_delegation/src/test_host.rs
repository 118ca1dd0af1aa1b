// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A tiny fixed-document host for unit tests.
//!
//! Selectors are either a tag name (`li`) or `#label`; anything else fails to
//! parse. The document is:
//!
//! ```text
//! html
//! └─ body
//!    ├─ div#container
//!    │  └─ ul#list
//!    │     └─ li#li
//!    │        ├─ span#span
//!    │        └─ li#inner-li
//!    │           └─ em#em
//!    └─ p#aside
//! li#detached (no parent)
//! ```

use alloc::rc::Rc;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};

use crate::types::{Host, NativeEvent, NativeHandler, SelectorError};

const DOCUMENT: &[(u32, &str, &str, Option<u32>)] = &[
    (1, "html", "html", None),
    (2, "body", "body", Some(1)),
    (3, "container", "div", Some(2)),
    (4, "list", "ul", Some(3)),
    (5, "li", "li", Some(4)),
    (6, "span", "span", Some(5)),
    (7, "inner-li", "li", Some(5)),
    (8, "em", "em", Some(7)),
    (9, "aside", "p", Some(2)),
    (10, "detached", "li", None),
];

/// Node id for a label in the fixed document.
pub(crate) fn node(label: &str) -> u32 {
    DOCUMENT
        .iter()
        .find(|(_, l, _, _)| *l == label)
        .map(|(id, ..)| *id)
        .unwrap_or_else(|| panic!("no node labelled {label}"))
}

#[derive(Debug)]
pub(crate) struct MockEvent {
    kind: String,
    target: Option<u32>,
}

impl MockEvent {
    pub(crate) fn new(kind: &str, target: u32) -> Self {
        Self {
            kind: kind.to_string(),
            target: Some(target),
        }
    }

    pub(crate) fn untargeted(kind: &str) -> Self {
        Self {
            kind: kind.to_string(),
            target: None,
        }
    }
}

impl NativeEvent<u32> for MockEvent {
    fn event_type(&self) -> &str {
        &self.kind
    }

    fn target(&self) -> Option<u32> {
        self.target
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum MockSelector {
    Tag(String),
    Label(String),
}

struct Registration {
    id: u32,
    target: u32,
    kind: String,
    options: Option<u32>,
    handler: NativeHandler<MockHost>,
}

#[derive(Default)]
struct Inner {
    no_body: bool,
    next_id: Cell<u32>,
    listeners: RefCell<Vec<Registration>>,
}

#[derive(Clone, Default)]
pub(crate) struct MockHost {
    inner: Rc<Inner>,
}

impl core::fmt::Debug for MockHost {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MockHost")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

impl MockHost {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn without_body() -> Self {
        Self {
            inner: Rc::new(Inner {
                no_body: true,
                ..Default::default()
            }),
        }
    }

    pub(crate) fn listener_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }

    pub(crate) fn options_of_last(&self) -> Option<u32> {
        self.inner.listeners.borrow().last().and_then(|r| r.options)
    }

    /// Bubble `event` from its target: every node on the path, inner to outer.
    pub(crate) fn fire(&self, event: &MockEvent) {
        let mut cur = event.target;
        while let Some(node) = cur {
            let batch: Vec<NativeHandler<Self>> = self
                .inner
                .listeners
                .borrow()
                .iter()
                .filter(|r| r.target == node && r.kind == event.kind)
                .map(|r| r.handler.clone())
                .collect();
            for handler in batch {
                handler(self, event);
            }
            cur = self.parent_element(&node);
        }
    }

    /// Deliver `event` straight to listeners on `node`, regardless of the target.
    pub(crate) fn fire_at(&self, node: u32, event: &MockEvent) {
        let batch: Vec<NativeHandler<Self>> = self
            .inner
            .listeners
            .borrow()
            .iter()
            .filter(|r| r.target == node && r.kind == event.kind)
            .map(|r| r.handler.clone())
            .collect();
        for handler in batch {
            handler(self, event);
        }
    }
}

impl Host for MockHost {
    type Element = u32;
    type Event = MockEvent;
    type Selector = MockSelector;
    type ListenerOptions = u32;
    type ListenerId = u32;

    fn default_root(&self) -> Option<u32> {
        (!self.inner.no_body).then(|| node("body"))
    }

    fn parse_selector(&self, selector: &str) -> Result<MockSelector, SelectorError> {
        let (label, name) = match selector.strip_prefix('#') {
            Some(rest) => (true, rest),
            None => (false, selector),
        };
        if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(SelectorError::new("unexpected token"));
        }
        Ok(if label {
            MockSelector::Label(name.to_string())
        } else {
            MockSelector::Tag(name.to_string())
        })
    }

    fn matches(&self, element: &u32, selector: &MockSelector) -> bool {
        DOCUMENT
            .iter()
            .find(|(id, ..)| id == element)
            .is_some_and(|(_, label, tag, _)| match selector {
                MockSelector::Tag(t) => t == tag,
                MockSelector::Label(l) => l == label,
            })
    }

    fn query_first(&self, selector: &MockSelector) -> Option<u32> {
        DOCUMENT
            .iter()
            .map(|(id, ..)| *id)
            .find(|id| self.matches(id, selector))
    }

    fn parent_element(&self, element: &u32) -> Option<u32> {
        DOCUMENT
            .iter()
            .find(|(id, ..)| id == element)
            .and_then(|(.., parent)| *parent)
    }

    fn add_event_listener(
        &self,
        target: &u32,
        event_type: &str,
        handler: NativeHandler<Self>,
        options: Option<&u32>,
    ) -> u32 {
        let id = self.inner.next_id.get() + 1;
        self.inner.next_id.set(id);
        self.inner.listeners.borrow_mut().push(Registration {
            id,
            target: *target,
            kind: event_type.to_string(),
            options: options.copied(),
            handler,
        });
        id
    }

    fn remove_event_listener(&self, id: u32) {
        self.inner.listeners.borrow_mut().retain(|r| r.id != id);
    }
}
