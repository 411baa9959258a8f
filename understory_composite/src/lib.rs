// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Composite: roving active-item state for list- and tree-like widgets.
//!
//! A composite widget (toolbar, menu, listbox, grid row) keeps one logical
//! focus that roves over an ordered set of items. This crate models that
//! concern as a reusable sub-store over `understory_store`:
//!
//! - the item order, the active item id, the orientation, and the wrap
//!   policy all live in one observable [`CompositeStore`];
//! - navigation ([`CompositeStore::next`], [`CompositeStore::previous`],
//!   [`CompositeStore::navigate`]) is pure with respect to state, and
//!   directional intents are gated by [`Orientation`];
//! - the factory binds into an existing store so a larger widget (a menu, a
//!   menu bar) shares these slots instead of copying them.
//!
//! ```rust
//! use understory_composite::{CompositeOptions, Orientation, create_composite_store};
//!
//! let toolbar = create_composite_store(CompositeOptions {
//!     items: Some(vec!["bold".into(), "italic".into()]),
//!     orientation: Some(Orientation::Horizontal),
//!     ..CompositeOptions::default()
//! });
//!
//! toolbar.move_to(Some("bold"));
//! assert_eq!(toolbar.next().as_deref(), Some("italic"));
//! assert_eq!(toolbar.moves(), 1);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod composite;
mod types;

pub use composite::{
    ACTIVE_ID, CompositeOptions, CompositeStore, FOCUS_LOOP, ITEMS, MOVES, ORIENTATION,
    create_composite_store,
};
pub use types::{Navigation, Orientation};
