// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Nested menus: shared values, placement sync, and the hide-all cascade.
//!
//! This example wires up a small "File > Export" menu chain and drives it the
//! way a host event loop would:
//! - the submenu inherits and shares the parent's checked-item values,
//! - the submenu's placement follows the parent's orientation,
//! - escaping from the deepest submenu closes the whole chain.
//!
//! Run:
//! - `cargo run -p understory_state_demos --example nested_menus`

use understory_menu::{MenuOptions, Navigation, Orientation, create_menu_store};

fn main() {
    let file = create_menu_store(MenuOptions {
        items: Some(vec!["new".into(), "open".into(), "export".into()]),
        ..MenuOptions::default()
    })
    .expect("consistent configuration");

    let export = create_menu_store(MenuOptions {
        parent: Some(file.clone()),
        items: Some(vec!["png".into(), "svg".into()]),
        ..MenuOptions::default()
    })
    .expect("consistent configuration");

    // The parent menu is vertical (the default), so the submenu opens to the
    // side; flipping the parent moves it below.
    println!("submenu placement: {}", export.placement().as_str());
    file.set_orientation(Orientation::Horizontal);
    println!("after parent flip: {}", export.placement().as_str());
    file.set_orientation(Orientation::Vertical);

    // Arrow through the parent's items.
    file.show();
    file.move_to(file.navigate(Navigation::Down).as_deref());
    file.move_to(file.navigate(Navigation::Down).as_deref());
    println!("active item: {:?}", file.active_id());

    // Checked-item values are one logical slot along the chain.
    export.show();
    export.set_value("format", "png");
    println!("parent sees: {:?}", file.value("format"));

    // Escape from the submenu: the whole chain closes, child first, and no
    // stale selection is left for the next open.
    export.hide_all();
    println!(
        "open: file={} export={}, active item: {:?}",
        file.open(),
        export.open(),
        file.active_id()
    );
}
