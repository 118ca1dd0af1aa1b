// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host adapters.
//!
//! Enabled via feature flags to keep the core small and `no_std` by default.

#[cfg(feature = "scraper_adapter")]
pub mod scraper_host;
