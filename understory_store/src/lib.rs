// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Store: observable keyed state containers for composable widgets.
//!
//! This crate is the state backbone shared by the widget sub-store crates
//! (`understory_composite`, `understory_hovercard`) and the domain stores
//! built on top of them. It models widget state as small, independent,
//! *mergeable* stores:
//!
//! - [`Store`]: an ordered `key => value` mapping with snapshot reads,
//!   selective per-key subscriptions, and writes that no-op (and notify
//!   nobody) when the resolved value equals the current one.
//! - [`create_store`]: builds a store bound to source stores, so overlapping
//!   keys become one shared slot rather than drifting copies.
//! - [`merge_store`], [`pick`], [`omit`]: structural union and projection of
//!   stores with documented precedence.
//! - [`ensure_no_conflicting_props`]: fail-fast rejection of explicit
//!   configuration that contradicts inherited state.
//! - [`sync`]: standing rules ("on change of these keys, run this effect"),
//!   installed once and alive until their [`Subscription`] is dropped.
//! - [`defaulted`]: the three-tier (explicit / inherited / fallback) default
//!   resolution used by every factory in the suite.
//!
//! ## Minimal example
//!
//! Two stores sharing one slot through a merge:
//!
//! ```rust
//! use understory_store::{create_store, merge_store, state};
//!
//! let input = create_store(state! { "values" => state! { } }, &[]);
//! let surface = merge_store(&[Some(&input)]);
//!
//! // Writes through either handle settle everywhere, synchronously.
//! surface.set("values", state! { "watching" => true });
//! assert_eq!(input.get("values"), surface.get("values"));
//!
//! // A write that changes nothing notifies nobody.
//! let notified = std::rc::Rc::new(core::cell::Cell::new(0));
//! let counter = notified.clone();
//! let _sub = surface.subscribe(Some(&["values"]), move |_, _| counter.set(counter.get() + 1));
//! surface.set("values", state! { "watching" => true });
//! assert_eq!(notified.get(), 0);
//! ```
//!
//! Scheduling is single-threaded and cooperative: all mutation and listener
//! dispatch happens synchronously inside the triggering call, and rules run
//! in registration order. There is no locking; shared slots stay consistent
//! because redundant writes short-circuit before notifying.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod merge;
mod store;
mod util;
mod value;

pub use merge::{StoreError, ensure_no_conflicting_props, merge_store, omit, pick};
pub use store::{SetAction, Store, Subscription, WeakStore, create_store, sync};
pub use util::{defaulted, defined};
pub use value::{State, Value};
