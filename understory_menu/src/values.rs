// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The values map backing checked and radio-selected menu items.

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};

use understory_store::{SetAction, Value};

/// Named values for checkbox- and radio-style menu items.
///
/// A plain ordered mapping: names are arbitrary strings, entries are
/// strings, booleans, numbers, or sequences of strings/numbers. The map
/// never contains [`Value::Null`]; cleared entries are stored as `false`
/// so shape stays stable for equality checks and serialization.
pub type Values = BTreeMap<String, Value>;

/// Names rejected by single-value mutation unless overridden.
///
/// These block injection of keys that collide with object-model internals in
/// embedding runtimes. The list is configurable per store because which
/// identifiers are dangerous depends on where the state ends up.
pub const RESERVED_VALUE_NAMES: [&str; 2] = ["__proto__", "constructor"];

/// Resolve a single-value update against the current values map.
///
/// Returns a value equal to `values` when nothing changes (missing map, or
/// the resolved entry equals the previous one), so the store's idempotent
/// write check leaves the slot untouched. A resolved `Null` is stored as
/// `false`.
pub(crate) fn updated_values(values: &Value, name: &str, action: SetAction) -> Value {
    let Some(map) = values.as_map() else {
        return values.clone();
    };
    let prev = map.get(name).cloned().unwrap_or(Value::Null);
    let next = action.resolve(&prev);
    if next == prev {
        return values.clone();
    }
    let mut map = map.clone();
    map.insert(
        name.to_string(),
        if next.is_null() { Value::Bool(false) } else { next },
    );
    Value::Map(map)
}
