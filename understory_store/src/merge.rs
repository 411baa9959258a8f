// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Structural merging of stores.
//!
//! ## Overview
//!
//! Composed widgets read from several state sources at once: an externally
//! supplied store, a slice of a parent's state, a sibling's state minus a few
//! surface-owned slots. [`merge_store`] collapses those sources into one
//! canonical store with documented precedence (later sources win), and
//! [`pick`]/[`omit`] build the slices. Precedence only applies to *distinct*
//! configuration; [`ensure_no_conflicting_props`] rejects the case where a
//! caller supplies an explicit value that contradicts one already present in
//! an inherited store; that is a wiring mistake, not an override.

use alloc::string::String;
use alloc::vec::Vec;

use smallvec::SmallVec;

use crate::store::{Store, create_store};
use crate::value::State;

/// Error raised while composing stores.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum StoreError {
    /// An explicitly supplied option contradicts a value inherited through a
    /// merged store for the same key. Raised before any sub-store is built.
    #[error("conflicting values for inherited state keys: {keys:?}")]
    ConflictingProps {
        /// The offending keys.
        keys: Vec<String>,
    },
}

/// Merge any number of optional stores into one.
///
/// The result owns the union of the inputs' keys; for keys defined by more
/// than one input, later inputs win. Every input stays bound to the result,
/// so each surviving slot is shared, not copied:
///
/// ```rust
/// use understory_store::{create_store, merge_store, state};
///
/// let sibling = create_store(state! { "values" => state! { } }, &[]);
/// let merged = merge_store(&[None, Some(&sibling)]);
///
/// merged.set("values", state! { "sort" => "desc" });
/// assert_eq!(sibling.get("values"), merged.get("values"));
/// ```
pub fn merge_store(parts: &[Option<&Store>]) -> Store {
    let sources: SmallVec<[Store; 3]> = parts.iter().filter_map(|part| part.cloned()).collect();
    let mut initial = State::new();
    for source in &sources {
        initial.extend(source.get_state());
    }
    create_store(initial, &sources)
}

/// Project a store onto a subset of its keys.
///
/// The projection is two-way bound to the origin for exactly those keys.
/// Absent stores project to `None`, so call sites can thread optional
/// relatives straight through.
pub fn pick(store: Option<&Store>, keys: &[&str]) -> Option<Store> {
    let store = store?;
    let projected: State = store
        .get_state()
        .into_iter()
        .filter(|(key, _)| keys.contains(&key.as_str()))
        .collect();
    Some(create_store(projected, &[store.clone()]))
}

/// Project a store onto the complement of a key set.
///
/// Used to inherit a sibling's state while leaving out slots every surface
/// must own for itself.
pub fn omit(store: Option<&Store>, keys: &[&str]) -> Option<Store> {
    let store = store?;
    let projected: State = store
        .get_state()
        .into_iter()
        .filter(|(key, _)| !keys.contains(&key.as_str()))
        .collect();
    Some(create_store(projected, &[store.clone()]))
}

/// Reject explicit configuration that contradicts inherited state.
///
/// `props` holds only the options the caller actually supplied. For each of
/// them, if the inherited store defines the same key with a *different*
/// value, construction must fail before any dependent state is committed.
/// Equal values pass: restating inherited configuration is fine. `Null` on
/// either side counts as undefined.
pub fn ensure_no_conflicting_props(props: &State, store: Option<&Store>) -> Result<(), StoreError> {
    let Some(store) = store else { return Ok(()) };
    let keys: Vec<String> = props
        .iter()
        .filter(|(key, explicit)| {
            if explicit.is_null() {
                return false;
            }
            match store.get(key) {
                Some(inherited) => !inherited.is_null() && inherited != **explicit,
                None => false,
            }
        })
        .map(|(key, _)| key.clone())
        .collect();
    if keys.is_empty() {
        Ok(())
    } else {
        Err(StoreError::ConflictingProps { keys })
    }
}
