// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Delegation basics.
//!
//! One listener on a menu handles clicks for every item. Clicking the label
//! inside an item reports the item; clicking outside any item reports nothing.
//! Set `RUST_LOG=understory_delegation=trace` to watch the matching.
//!
//! Run:
//! - `cargo run -p understory_demos --example delegation_basics`

use tracing_subscriber::EnvFilter;
use understory_delegation::adapters::scraper_host::{DomEvent, ScraperDocument};
use understory_delegation::{DelegationOptions, create};

const MENU: &str = r#"
    <nav id="menu">
      <h2 id="title">Menu</h2>
      <ul>
        <li data-action="open"><span id="open">Open…</span></li>
        <li data-action="save"><span id="save">Save</span></li>
        <li data-action="quit"><span id="quit">Quit</span></li>
      </ul>
    </nav>
"#;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let doc = ScraperDocument::parse(MENU);
    let actions = doc.clone();
    let subscription = create(
        &doc,
        DelegationOptions::<ScraperDocument>::new("click", "li[data-action]")
            .with_root_selector("#menu")
            .with_listener(move |evt| {
                let action = actions.attr_of(*evt.delegator(), "data-action");
                println!("  -> action {action:?}");
            }),
    )
    .expect("menu delegation");

    for label in ["#open", "#save", "#title", "#quit"] {
        let Ok(Some(target)) = doc.query_selector(label) else {
            continue;
        };
        println!("click {label}");
        doc.dispatch(&DomEvent::new("click", target));
    }

    subscription.remove();
    println!("removed; native listeners left: {}", doc.listener_count());
}
