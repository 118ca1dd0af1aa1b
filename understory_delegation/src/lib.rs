// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_delegation --heading-base-level=0

//! Understory Delegation: selector-based event delegation for DOM-like trees.
//!
//! ## Overview
//!
//! Instead of attaching one listener per item, attach a single listener to an
//! ancestor (the *root*) and let it decide, per event, which descendant the
//! event is really about. The listener runs only when the event target, or one
//! of its ancestors below the root, matches a CSS selector. Items added or
//! removed after installation are covered without re-registering anything.
//!
//! This crate does not implement a document. Selector parsing and matching,
//! single-element queries, parent traversal and listener registration are
//! consumed through the [`Host`](crate::types::Host) trait.
//!
//! ## Workflow
//!
//! 1) Describe the delegation with [`DelegationOptions`](crate::config::DelegationOptions):
//!    event type, delegator selector, listener, and optionally a root and
//!    host listener options.
//! 2) Validate: [`DelegationConfig::from_options`](crate::config::DelegationConfig::from_options)
//!    checks the listener and event type, parses the selector eagerly, and
//!    resolves the root (element, first selector match, or the host's default
//!    root). Failures are [`ConfigurationError`](crate::error::ConfigurationError)s
//!    and leave nothing registered.
//! 3) Install: [`Subscription::create`](crate::runtime::Subscription::create)
//!    registers exactly one native listener on the root.
//!    [`create`](crate::runtime::create) does steps 2 and 3 at once.
//! 4) Dispatch: for each event the runtime walks from the target towards the
//!    root and invokes the listener with the closest match as
//!    [`delegator`](crate::event::DelegationEvent::delegator).
//! 5) Tear down: [`Subscription::remove`](crate::runtime::Subscription::remove)
//!    is idempotent and final.
//!
//! ## Matching rules
//!
//! - Closest match wins: with nested `li` items the innermost one is reported.
//! - By default the root itself may match; see
//!   [`RootMatching`](crate::config::RootMatching) to exclude it.
//! - Events whose target is not below the root are ignored.
//! - Events that match nothing are ignored silently; that is the common case.
//!
//! ## Hosts
//!
//! - Implement [`Host`](crate::types::Host) for your document bindings.
//! - Enable `scraper_adapter` for [`ScraperDocument`](crate::adapters), an
//!   in-memory HTML document with real CSS selectors and DOM-style dispatch,
//!   useful for tests and headless tooling.
//!
//! ## Host sketch
//!
//! The snippet below shows how generic code installs a delegation against any host.
//!
//! ```no_run
//! use understory_delegation::config::DelegationOptions;
//! use understory_delegation::error::ConfigurationError;
//! use understory_delegation::runtime::{Subscription, create};
//! use understory_delegation::types::Host;
//!
//! /// Log every click on a list item below `root`.
//! fn watch_items<H: Host + Clone>(
//!     host: &H,
//!     root: H::Element,
//! ) -> Result<Subscription<H>, ConfigurationError> {
//!     create(
//!         host,
//!         DelegationOptions::<H>::new("click", "li")
//!             .with_root_element(root)
//!             .with_listener(|evt| tracing::info!(item = ?evt.delegator(), "item clicked")),
//!     )
//! }
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod adapters;
pub mod config;
pub mod error;
pub mod event;
pub mod propagation;
pub mod runtime;
pub mod types;

#[cfg(test)]
mod test_host;

pub use config::{DelegationConfig, DelegationOptions, RootMatching, RootTarget};
pub use error::ConfigurationError;
pub use event::{DelegationEvent, Listener};
pub use runtime::{Subscription, SubscriptionState, create};
pub use types::Host;
