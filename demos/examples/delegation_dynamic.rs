// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Delegation over a changing document.
//!
//! Rows appended after the delegation is installed are handled without
//! re-registering anything, and detached rows stop reporting. The second part
//! shows how configuration errors surface before anything is registered.
//!
//! Run:
//! - `cargo run -p understory_demos --example delegation_dynamic`

use understory_delegation::adapters::scraper_host::{DomEvent, ScraperDocument};
use understory_delegation::{DelegationOptions, RootMatching, create};

fn main() {
    let doc = ScraperDocument::parse(r#"<section id="rows"></section>"#);
    let Ok(Some(rows)) = doc.query_selector("#rows") else {
        println!("no #rows in document");
        return;
    };

    let names = doc.clone();
    let subscription = create(
        &doc,
        DelegationOptions::<ScraperDocument>::new("dblclick", "div.row")
            .with_root_element(rows)
            .with_root_matching(RootMatching::Exclusive)
            .with_listener(move |evt| {
                let id = names.attr_of(*evt.delegator(), "id");
                println!("  -> edit row {id:?}");
            }),
    )
    .expect("row delegation");

    let mut added = Vec::new();
    for n in 1..=3 {
        let markup = format!(r#"<div class="row" id="row-{n}"><b>Row {n}</b></div>"#);
        added.extend(doc.append_html(rows, &markup));
    }
    println!("appended {} rows", added.len());

    for row in &added {
        doc.dispatch(&DomEvent::new("dblclick", *row));
    }

    if let Some(first) = added.first() {
        doc.detach(*first);
        println!("detached first row; double-clicking it again");
        doc.dispatch(&DomEvent::new("dblclick", *first));
    }

    subscription.remove();

    println!("configuration errors:");
    for (selector, root) in [("div.row", "<<"), ("<<", "#rows"), ("div.row", "#nowhere")] {
        let result = create(
            &doc,
            DelegationOptions::<ScraperDocument>::new("dblclick", selector)
                .with_root_selector(root)
                .with_listener(|_| {}),
        );
        match result {
            Ok(_) => println!("  selector {selector:?} root {root:?}: installed"),
            Err(err) => println!("  selector {selector:?} root {root:?}: {err}"),
        }
    }
    println!("native listeners left: {}", doc.listener_count());
}
