// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Default-resolution helpers shared by the sub-store factories.

use crate::value::Value;

/// Three-tier default resolution: explicit beats inherited beats fallback.
///
/// Every configurable field in the suite derives its initial value this way,
/// so explicit configuration can never be shadowed by inherited state or the
/// other way around. Longer chains (for example an extra caller-supplied
/// default tier) compose with [`Option::or`] before the final
/// [`Option::unwrap_or`]:
///
/// ```rust
/// use understory_store::defaulted;
///
/// assert_eq!(defaulted(Some(0), Some(150), 500), 0);
/// assert_eq!(defaulted(None, Some(150), 500), 150);
/// assert_eq!(defaulted(None::<u64>, None, 500), 500);
/// ```
pub fn defaulted<T>(explicit: Option<T>, inherited: Option<T>, fallback: T) -> T {
    explicit.or(inherited).unwrap_or(fallback)
}

/// Treat [`Value::Null`] as undefined when reading inherited state.
///
/// A merged store keeps cleared slots in the map to preserve shape, so a
/// `Null` read must not be mistaken for an inherited value during default
/// resolution.
pub fn defined(value: Option<Value>) -> Option<Value> {
    value.filter(|value| !value.is_null())
}
