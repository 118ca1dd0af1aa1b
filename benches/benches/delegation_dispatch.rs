// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::cell::Cell;
use std::rc::Rc;

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use understory_delegation::adapters::scraper_host::{DomEvent, ScraperDocument};
use understory_delegation::config::RootMatching;
use understory_delegation::propagation::path_to_root;
use understory_delegation::runtime::find_delegator;
use understory_delegation::types::{Host, HostParents};
use understory_delegation::{DelegationOptions, create};

/// A list of `items` rows, each wrapping its label in `depth` nested spans.
fn gen_list(items: usize, depth: usize) -> String {
    let mut out = String::from(r#"<ul id="list">"#);
    for i in 0..items {
        out.push_str(&format!(r#"<li class="row" id="row-{i}">"#));
        for _ in 0..depth {
            out.push_str("<span>");
        }
        out.push_str(&format!(r#"<b id="label-{i}">{i}</b>"#));
        for _ in 0..depth {
            out.push_str("</span>");
        }
        out.push_str("</li>");
    }
    out.push_str("</ul>");
    out
}

fn bench_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("delegation_dispatch");
    for &depth in &[1_usize, 8, 32] {
        let doc = ScraperDocument::parse(&gen_list(64, depth));
        let Ok(Some(list)) = doc.query_selector("#list") else {
            continue;
        };
        let Ok(Some(label)) = doc.query_selector("#label-32") else {
            continue;
        };
        let hits = Rc::new(Cell::new(0_u64));
        let sink = Rc::clone(&hits);
        let _sub = create(
            &doc,
            DelegationOptions::<ScraperDocument>::new("click", "li.row")
                .with_root_element(list)
                .with_listener(move |_| sink.set(sink.get() + 1)),
        )
        .expect("valid delegation");
        group.throughput(Throughput::Elements(1));

        group.bench_function(format!("dispatch_depth{depth}"), |b| {
            b.iter(|| black_box(doc.dispatch(&DomEvent::new("click", label))));
        });

        let Ok(selector) = doc.parse_selector("li.row") else {
            continue;
        };
        group.bench_function(format!("find_delegator_depth{depth}"), |b| {
            b.iter(|| {
                black_box(find_delegator(
                    &HostParents(&doc),
                    label,
                    &list,
                    RootMatching::Inclusive,
                    |n| doc.matches(n, &selector),
                ))
            });
        });

        group.bench_function(format!("path_to_root_depth{depth}"), |b| {
            b.iter(|| black_box(path_to_root(label, &doc).len()));
        });
    }
    group.finish();
}

fn bench_install(c: &mut Criterion) {
    let mut group = c.benchmark_group("delegation_install");
    let doc = ScraperDocument::parse(&gen_list(256, 2));
    group.bench_function("create_remove_root_selector", |b| {
        b.iter_batched(
            || DelegationOptions::<ScraperDocument>::new("click", "li.row").with_listener(|_| {}),
            |options| {
                if let Ok(sub) = create(&doc, options.with_root_selector("#list")) {
                    sub.remove();
                }
            },
            BatchSize::SmallInput,
        );
    });
    group.finish();
}

criterion_group!(benches, bench_dispatch, bench_install);
criterion_main!(benches);
