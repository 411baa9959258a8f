// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Store basics: shared slots, subscriptions, and sub-store composition.
//!
//! Builds the layers by hand that `understory_menu` normally assembles:
//! a merged store, a composite sub-store and a hovercard sub-store bound to
//! it, and a subscription observing one key.
//!
//! Run:
//! - `cargo run -p understory_state_demos --example store_basics`

use understory_composite::{CompositeOptions, create_composite_store};
use understory_hovercard::{HovercardOptions, create_hovercard_store};
use understory_store::{Value, create_store, merge_store, state};

fn main() {
    // An externally owned store, say from a surrounding widget.
    let external = create_store(state! { "orientation" => "horizontal", "open" => false }, &[]);
    let merged = merge_store(&[Some(&external)]);

    // Both sub-stores bind into the merged store; overlapping keys become
    // shared slots, and each resolves its own defaults against it.
    let composite = create_composite_store(CompositeOptions {
        store: Some(merged.clone()),
        items: Some(vec!["one".into(), "two".into()]),
        ..CompositeOptions::default()
    });
    let hovercard = create_hovercard_store(HovercardOptions {
        store: Some(merged.clone()),
        timeout: Some(150),
        ..HovercardOptions::default()
    });

    // The composite inherited the external orientation.
    println!("orientation: {}", composite.orientation().as_str());

    // Watch the shared "open" slot from the external store's side.
    let _sub = external.subscribe(Some(&["open"]), |next, prev| {
        println!(
            "external open: {:?} -> {:?}",
            prev.get("open").and_then(Value::as_bool),
            next.get("open").and_then(Value::as_bool),
        );
    });

    // Opening through the hovercard surfaces everywhere, synchronously.
    hovercard.show();
    println!("merged open: {:?}", merged.get("open").and_then(|v| v.as_bool()));

    // Idempotent writes stay silent: this second show changes nothing and
    // notifies nobody.
    hovercard.show();

    composite.move_to(Some("two"));
    println!("active: {:?}, moves: {}", composite.active_id(), composite.moves());
}
