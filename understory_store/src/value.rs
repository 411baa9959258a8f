// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The plain value model shared by all stores.
//!
//! A store's state is an ordered mapping from string keys to [`Value`]s. The
//! model is deliberately closed: values are plain data with no functions and
//! no cycles, so any state snapshot can be compared for equality, cloned, and
//! (with the `serde` feature) serialized as-is.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

/// Ordered state mapping from stable string keys to plain values.
///
/// `BTreeMap` keeps iteration deterministic, which in turn keeps merge
/// precedence and listener observations reproducible across runs.
pub type State = BTreeMap<String, Value>;

/// A plain, serializable state value.
///
/// Heterogeneous state slots (booleans, counters, identifiers, enum-like
/// strings, item lists, nested maps) all share this one representation so
/// stores with different shapes can be merged structurally. Enum-like fields
/// are stored in their canonical string form; the owning crates provide typed
/// views over them.
///
/// Equality is total: floats compare bitwise, so every value equals itself
/// and the stores' redundant-write short-circuit terminates even for NaN.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    /// Absent/cleared slot. Kept in the map so state shape stays fixed.
    #[default]
    Null,
    /// Boolean flag.
    Bool(bool),
    /// Signed integer (counters, millisecond timeouts).
    Int(i64),
    /// Floating-point number.
    Float(f64),
    /// String (identifiers, enum-like fields).
    Str(String),
    /// Ordered sequence of values.
    List(Vec<Value>),
    /// Nested ordered mapping (for example a values map).
    Map(BTreeMap<String, Value>),
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a.to_bits() == b.to_bits(),
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Map(a), Self::Map(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Value {
    /// Whether this is [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// The boolean payload, if any.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The integer payload, if any.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// The integer payload as an unsigned quantity (milliseconds, counters).
    ///
    /// Returns `None` for non-integers and for negative integers.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::Int(i) => u64::try_from(*i).ok(),
            _ => None,
        }
    }

    /// The float payload, if any.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// The string payload, if any.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// The list payload, if any.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// The map payload, if any.
    pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int(value.into())
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Self::Int(value.into())
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Self::Int(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Str(String::from(value))
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Self::List(value)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(value: BTreeMap<String, Value>) -> Self {
        Self::Map(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => v.into(),
            None => Self::Null,
        }
    }
}

/// Build a [`State`] mapping from `key => value` pairs.
///
/// Values go through [`Value::from`], so plain literals work directly:
///
/// ```rust
/// use understory_store::{Value, state};
///
/// let state = state! {
///     "open" => false,
///     "active_id" => Value::Null,
///     "timeout" => 150,
/// };
/// assert_eq!(state.get("timeout"), Some(&Value::Int(150)));
/// ```
#[macro_export]
macro_rules! state {
    () => { $crate::State::new() };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut state = $crate::State::new();
        $(state.insert(::core::convert::Into::into($key), $crate::Value::from($value));)+
        state
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn state_macro_converts_literals() {
        let state = state! {
            "open" => true,
            "moves" => 3,
            "placement" => "bottom-start",
            "items" => vec![Value::from("a"), Value::from("b")],
        };
        assert_eq!(state.get("open"), Some(&Value::Bool(true)));
        assert_eq!(state.get("moves"), Some(&Value::Int(3)));
        assert_eq!(
            state.get("placement").and_then(Value::as_str),
            Some("bottom-start")
        );
        assert_eq!(
            state.get("items").and_then(Value::as_list).map(<[Value]>::len),
            Some(2)
        );
    }

    #[test]
    fn option_conversion_maps_none_to_null() {
        let none: Option<&str> = None;
        assert_eq!(Value::from(none), Value::Null);
        assert_eq!(Value::from(Some("id")), Value::from("id"));
    }

    #[test]
    fn negative_int_is_not_u64() {
        assert_eq!(Value::Int(-1).as_u64(), None);
        assert_eq!(Value::Int(150).as_u64(), Some(150));
    }

    #[test]
    fn float_equality_is_reflexive() {
        assert_eq!(Value::Float(f64::NAN), Value::Float(f64::NAN));
        assert_eq!(Value::Float(1.5), Value::Float(1.5));
        assert_ne!(Value::Float(0.0), Value::Float(-0.0));
    }
}
