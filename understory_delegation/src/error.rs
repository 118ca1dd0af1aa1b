// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Configuration errors.

use alloc::string::String;

use crate::types::SelectorError;

/// Invalid delegation options.
///
/// Returned synchronously by [`DelegationConfig::from_options`](crate::config::DelegationConfig::from_options)
/// and [`create`](crate::runtime::create). When one of these is returned no
/// native listener has been registered.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum ConfigurationError {
    /// No listener was supplied.
    #[error("a listener is required")]
    MissingListener,
    /// The event type was empty.
    #[error("event type must not be empty")]
    EmptyEventType,
    /// The delegator selector was empty.
    #[error("delegator selector must not be empty")]
    EmptySelector,
    /// The delegator selector failed to parse.
    #[error("invalid delegator selector `{selector}`")]
    InvalidSelector {
        /// The rejected selector.
        selector: String,
        /// Parse failure reported by the host.
        #[source]
        source: SelectorError,
    },
    /// The root selector failed to parse.
    #[error("invalid root selector `{selector}`")]
    InvalidRootSelector {
        /// The rejected selector.
        selector: String,
        /// Parse failure reported by the host.
        #[source]
        source: SelectorError,
    },
    /// The root selector parsed but matched no element.
    #[error("root selector `{selector}` matched no element")]
    RootNotFound {
        /// The selector that found nothing.
        selector: String,
    },
    /// No root was configured and the host has no default root.
    #[error("no root given and the document has no default root")]
    NoDefaultRoot,
}
