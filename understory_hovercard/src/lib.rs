// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Hovercard: state for hover-triggered floating surfaces.
//!
//! A hovercard is a surface that floats next to an anchor and opens or
//! closes after the pointer has dwelled for a configured delay. This crate
//! models that concern as a reusable sub-store over `understory_store`:
//!
//! - [`HovercardStore`] holds the reactive state: `open`, `mounted` (kept
//!   equal to `open` by a standing rule), [`Placement`], the two dwell
//!   delays, and the five surface-owned element slots ([`ElementSlot`]).
//! - The dwell scheduler is deterministic and clock-free: hosts pass
//!   millisecond timestamps to [`HovercardStore::schedule_show`] /
//!   [`HovercardStore::schedule_hide`] and drive [`HovercardStore::tick`];
//!   a real change to `open`, from any handle sharing the slot, disarms
//!   the pending flip, so re-entering the anchor before the hide delay
//!   expires keeps the surface up.
//! - [`ELEMENT_KEYS`] names the slots a surface must own for itself; domain
//!   stores exclude them when inheriting a sibling's state.
//!
//! ```rust
//! use understory_hovercard::{HovercardOptions, create_hovercard_store};
//!
//! let card = create_hovercard_store(HovercardOptions {
//!     timeout: Some(150),
//!     hide_timeout: Some(300),
//!     ..HovercardOptions::default()
//! });
//!
//! card.schedule_show(0);
//! card.tick(150);
//! assert!(card.open());
//!
//! // Pointer leaves, then returns before the hide dwell elapses.
//! card.schedule_hide(1000);
//! card.schedule_show(1100);
//! card.tick(5000);
//! assert!(card.open());
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod hovercard;
mod types;

pub use hovercard::{
    HIDE_TIMEOUT, HovercardOptions, HovercardStore, MOUNTED, OPEN, PLACEMENT, TIMEOUT,
    create_hovercard_store,
};
pub use types::{ELEMENT_KEYS, ElementSlot, Placement};
