// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Menu bar hover timing: instant top-level menus, dwell-delayed submenus.
//!
//! Drives the clock-free dwell scheduler by hand: the host owns timestamps
//! and calls `tick` when its timer fires. Re-entering a surface before its
//! hide deadline keeps it up.
//!
//! Run:
//! - `cargo run -p understory_state_demos --example menu_bar_hover`

use understory_menu::{MenuBarOptions, MenuOptions, create_menu_bar_store, create_menu_store};

fn main() {
    let bar = create_menu_bar_store(MenuBarOptions {
        items: Some(vec!["file".into(), "edit".into(), "view".into()]),
        ..MenuBarOptions::default()
    });

    let file = create_menu_store(MenuOptions {
        menubar: Some(bar.clone()),
        ..MenuOptions::default()
    })
    .expect("consistent configuration");

    let recent = create_menu_store(MenuOptions {
        menubar: Some(bar.clone()),
        parent: Some(file.clone()),
        hide_timeout: Some(300),
        ..MenuOptions::default()
    })
    .expect("consistent configuration");

    // Top-level menu-bar items open instantly on hover; nested submenus
    // dwell first.
    println!("file dwell: {}ms, recent dwell: {}ms", file.timeout(), recent.timeout());

    bar.move_to(Some("file"));
    file.schedule_show(1000);
    println!("file open at t=1000: {}", file.open());

    // Hovering the "recent" item arms the submenu; it opens once the dwell
    // elapses.
    recent.schedule_show(1100);
    recent.tick(1200);
    println!("recent open at t=1200: {}", recent.open());
    recent.tick(1250);
    println!("recent open at t=1250: {}", recent.open());

    // The pointer drifts off the submenu, then returns before the hide
    // deadline: the pending hide is cancelled.
    recent.schedule_hide(2000);
    recent.schedule_show(2100);
    recent.tick(5000);
    println!("recent open after re-entry: {}", recent.open());

    // Leaving for good closes the chain from the submenu upward.
    recent.hide_all();
    println!("open: file={} recent={}", file.open(), recent.open());
}
