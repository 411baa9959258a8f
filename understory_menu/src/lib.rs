// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Menu: composed menu and menu-bar stores.
//!
//! A menu is the suite's showcase composition: a roving-focus composite
//! (`understory_composite`), a hover-timed floating surface
//! (`understory_hovercard`), and the menu's own fields (the checked-item
//! values map, the initial-focus policy) fused into one unified store over
//! `understory_store`.
//!
//! - [`create_menu_store`] merges the caller's store, the parent menu's
//!   `values` slice, and a combobox sibling's state (minus surface-owned
//!   positioning elements) into one store; rejects contradictory explicit
//!   configuration; resolves every field three-tier; and installs the two
//!   standing rules (closing clears the active item, parent orientation
//!   drives submenu placement).
//! - [`create_menu_bar_store`] builds the horizontal, wrapping container
//!   for top-level menus. A menu whose logical parent is a bar opens
//!   instantly on hover; nested submenus get a dwell delay.
//! - [`MenuStore::hide_all`] closes an entire open submenu chain from any
//!   depth, child first, following weak parent links until the root.
//!
//! ```rust
//! use understory_menu::{MenuOptions, create_menu_store};
//! use understory_store::state;
//!
//! let file = create_menu_store(MenuOptions {
//!     items: Some(vec!["new".into(), "open".into(), "export".into()]),
//!     ..MenuOptions::default()
//! })
//! .unwrap();
//!
//! let export = create_menu_store(MenuOptions {
//!     parent: Some(file.clone()),
//!     ..MenuOptions::default()
//! })
//! .unwrap();
//!
//! // Vertical parent: the submenu opens to the side.
//! assert_eq!(export.placement().as_str(), "right-start");
//!
//! // Checked-item values are one slot along the chain.
//! export.set_value("format", "png");
//! assert_eq!(file.values(), state! { "format" => "png" });
//!
//! // Escape from anywhere closes the whole chain.
//! file.show();
//! export.show();
//! export.hide_all();
//! assert!(!file.open() && !export.open());
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod menu;
mod menu_bar;
mod values;

pub use menu::{INITIAL_FOCUS, InitialFocus, MenuOptions, MenuStore, VALUES, create_menu_store};
pub use menu_bar::{MenuBarOptions, MenuBarStore, WeakMenuBarStore, create_menu_bar_store};
pub use values::{RESERVED_VALUE_NAMES, Values};

// The sub-store surfaces a menu exposes are part of this crate's API.
pub use understory_composite::{Navigation, Orientation};
pub use understory_hovercard::{ElementSlot, Placement};
pub use understory_store::{SetAction, State, Store, StoreError, Subscription, Value};
