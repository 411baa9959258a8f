// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The observable store handle.
//!
//! ## Overview
//!
//! A [`Store`] owns one [`State`] mapping and notifies listeners when a slot
//! actually changes. Writes go through a single resolution point
//! ([`SetAction`]), so the idempotent-write rule (a write that resolves to
//! the current value notifies nobody) holds for plain values and updater
//! closures alike.
//!
//! ## Binding
//!
//! A store created with source stores shares slots with them instead of
//! copying: a write to a shared key is forwarded to every source that owns
//! the key before it is applied locally, and a write landing on a source is
//! echoed back through a standing per-key subscription. Echoes terminate
//! because an already-applied value short-circuits. All of this is
//! synchronous; by the time a write returns, every bound store agrees on the
//! slot and every interested listener has run exactly once.
//!
//! ## Ordering
//!
//! Listeners run in registration order. A listener added while a
//! notification is in flight first runs on the next change.

use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::rc::{Rc, Weak};
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};
use core::fmt;

use smallvec::SmallVec;

use crate::value::{State, Value};

/// A write target: either a direct value or a transform of the previous one.
///
/// Resolution happens at exactly one point inside [`Store::set_state`], which
/// is what makes the no-op check uniform across every setter built on top.
pub enum SetAction {
    /// Store this value.
    Value(Value),
    /// Derive the next value from the previous one.
    Update(Box<dyn FnOnce(&Value) -> Value>),
}

impl SetAction {
    /// Wrap a direct value.
    pub fn value(value: impl Into<Value>) -> Self {
        Self::Value(value.into())
    }

    /// Wrap an updater closure receiving the previous value.
    pub fn update(f: impl FnOnce(&Value) -> Value + 'static) -> Self {
        Self::Update(Box::new(f))
    }

    /// Resolve against the previous value.
    pub fn resolve(self, prev: &Value) -> Value {
        match self {
            Self::Value(value) => value,
            Self::Update(f) => f(prev),
        }
    }
}

impl fmt::Debug for SetAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Self::Update(_) => f.write_str("Update(..)"),
        }
    }
}

type ListenerFn = dyn Fn(&State, &State);

struct Listener {
    /// Keys this listener cares about; `None` means every key.
    keys: Option<SmallVec<[String; 4]>>,
    f: Rc<ListenerFn>,
}

struct StoreInner {
    state: RefCell<State>,
    /// Keyed by ascending registration id, so iteration is dispatch order.
    listeners: RefCell<BTreeMap<u64, Listener>>,
    next_listener: Cell<u64>,
    /// Stores this one is bound to. Fixed at construction.
    sources: SmallVec<[Store; 3]>,
    /// Standing per-key subscriptions on the sources, held for the store's
    /// lifetime so source writes keep echoing back.
    bindings: RefCell<Vec<Subscription>>,
}

/// Observable keyed state container.
///
/// Cheap to clone; clones are handles onto the same state. Single-threaded:
/// all mutation and listener dispatch happens synchronously on the calling
/// thread.
///
/// ```rust
/// use understory_store::{create_store, state};
///
/// let store = create_store(state! { "open" => false }, &[]);
/// store.set("open", true);
/// assert_eq!(store.get("open").and_then(|v| v.as_bool()), Some(true));
/// ```
#[derive(Clone)]
pub struct Store {
    inner: Rc<StoreInner>,
}

/// A weak, non-owning handle to a [`Store`].
///
/// Standing rules that write back into the store they observe (directly or
/// through a bound relative) must capture one of these; a strong capture
/// inside a listener would keep the store alive from its own registry.
#[derive(Clone)]
pub struct WeakStore {
    inner: Weak<StoreInner>,
}

impl WeakStore {
    /// Upgrade back to a strong handle if the store is still alive.
    pub fn upgrade(&self) -> Option<Store> {
        self.inner.upgrade().map(|inner| Store { inner })
    }
}

impl fmt::Debug for WeakStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakStore").finish_non_exhaustive()
    }
}

/// Registration handle for a listener. Dropping it detaches the listener.
pub struct Subscription {
    store: Weak<StoreInner>,
    id: u64,
}

impl Subscription {
    /// Detach the listener now. Equivalent to dropping the handle.
    pub fn cancel(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.store.upgrade() {
            inner.listeners.borrow_mut().remove(&self.id);
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

/// Create a store from an initial state, bound to zero or more sources.
///
/// The store's key set is exactly `initial_state`'s. For every key a source
/// also owns, the source's current value wins (left to right, later sources
/// taking precedence), and the slot stays shared from then on: writes on
/// either side are visible on both.
///
/// ```rust
/// use understory_store::{create_store, state};
///
/// let base = create_store(state! { "values" => state! { } }, &[]);
/// let combined = create_store(state! { "values" => state! { }, "open" => false }, &[base.clone()]);
///
/// combined.set("values", state! { "sort" => "asc" });
/// assert_eq!(base.get("values"), combined.get("values"));
/// ```
pub fn create_store(initial_state: State, sources: &[Store]) -> Store {
    let mut state = initial_state;
    for source in sources {
        for (key, value) in source.get_state() {
            if state.contains_key(&key) {
                state.insert(key, value);
            }
        }
    }
    let store = Store {
        inner: Rc::new(StoreInner {
            state: RefCell::new(state),
            listeners: RefCell::new(BTreeMap::new()),
            next_listener: Cell::new(0),
            sources: sources.iter().cloned().collect(),
            bindings: RefCell::new(Vec::new()),
        }),
    };
    store.bind_sources();
    store
}

impl Store {
    /// Snapshot of the current state. Reading never triggers side effects.
    pub fn get_state(&self) -> State {
        self.inner.state.borrow().clone()
    }

    /// The current value of one key, if the store owns it.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.inner.state.borrow().get(key).cloned()
    }

    /// Whether this store owns `key`.
    pub fn has(&self, key: &str) -> bool {
        self.inner.state.borrow().contains_key(key)
    }

    /// A weak handle for use inside standing rules.
    pub fn downgrade(&self) -> WeakStore {
        WeakStore {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Write a direct value. See [`Store::set_state`].
    pub fn set(&self, key: &str, value: impl Into<Value>) {
        self.set_state(key, SetAction::value(value));
    }

    /// Write through an updater closure. See [`Store::set_state`].
    pub fn update(&self, key: &str, f: impl FnOnce(&Value) -> Value + 'static) {
        self.set_state(key, SetAction::update(f));
    }

    /// Resolve `action` against the previous value and store the result.
    ///
    /// No-ops without notification when the store does not own `key` (state
    /// shape is fixed at construction) or when the resolved value equals the
    /// current one. Otherwise the write is forwarded to every bound source
    /// owning the key, applied locally, and interested listeners run with
    /// `(next, prev)` snapshots before this call returns.
    pub fn set_state(&self, key: &str, action: SetAction) {
        let prev = {
            let state = self.inner.state.borrow();
            match state.get(key) {
                Some(value) => value.clone(),
                None => return,
            }
        };
        let next = action.resolve(&prev);
        if next == prev {
            return;
        }
        // Settle shared slots first so listeners on any bound store observe
        // a consistent world.
        for source in &self.inner.sources {
            if source.has(key) {
                source.set_state(key, SetAction::Value(next.clone()));
            }
        }
        // A source echo may have already applied this value here; if so, the
        // echo also notified and there is nothing left to do.
        let prev_state = {
            let mut state = self.inner.state.borrow_mut();
            if state.get(key) == Some(&next) {
                return;
            }
            let prev_state = state.clone();
            state.insert(key.to_string(), next);
            prev_state
        };
        let next_state = self.get_state();
        self.notify(key, &next_state, &prev_state);
    }

    /// Register a listener for the given keys (`None` = all keys).
    ///
    /// The listener runs synchronously after every real change to a matching
    /// key, receiving `(next, prev)` state snapshots. It stays registered
    /// until the returned [`Subscription`] is dropped.
    pub fn subscribe<F>(&self, keys: Option<&[&str]>, f: F) -> Subscription
    where
        F: Fn(&State, &State) + 'static,
    {
        let id = self.inner.next_listener.get();
        self.inner.next_listener.set(id + 1);
        let listener = Listener {
            keys: keys.map(|keys| keys.iter().map(|k| (*k).to_string()).collect()),
            f: Rc::new(f),
        };
        self.inner.listeners.borrow_mut().insert(id, listener);
        Subscription {
            store: Rc::downgrade(&self.inner),
            id,
        }
    }

    fn notify(&self, key: &str, next: &State, prev: &State) {
        // Collect first: listeners may subscribe, unsubscribe, or write back
        // into this store while they run.
        let interested: Vec<Rc<ListenerFn>> = self
            .inner
            .listeners
            .borrow()
            .values()
            .filter(|listener| {
                listener
                    .keys
                    .as_ref()
                    .is_none_or(|keys| keys.iter().any(|k| k == key))
            })
            .map(|listener| Rc::clone(&listener.f))
            .collect();
        for f in interested {
            f(next, prev);
        }
    }

    fn bind_sources(&self) {
        let keys: Vec<String> = self.inner.state.borrow().keys().cloned().collect();
        let mut bindings = Vec::new();
        for source in &self.inner.sources {
            for key in &keys {
                if !source.has(key) {
                    continue;
                }
                // Weak capture: the binding must not let a source keep this
                // store alive through its listener registry.
                let weak = Rc::downgrade(&self.inner);
                let key_owned = key.clone();
                let sub = source.subscribe(Some(&[key.as_str()]), move |next, _prev| {
                    let Some(inner) = weak.upgrade() else { return };
                    if let Some(value) = next.get(&key_owned) {
                        let store = Store { inner };
                        store.set_state(&key_owned, SetAction::Value(value.clone()));
                    }
                });
                bindings.push(sub);
            }
        }
        *self.inner.bindings.borrow_mut() = bindings;
    }
}

impl PartialEq for Store {
    /// Handle identity: two handles are equal when they refer to the same
    /// underlying store.
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Store {}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("state", &*self.inner.state.borrow())
            .finish_non_exhaustive()
    }
}

/// Install a standing rule: run `effect` now and on every change to `keys`.
///
/// The immediate run receives the current state as both `next` and `prev`,
/// so rules that only react to transitions stay quiet at install time while
/// rules that derive a value settle it right away. Returns `None` when
/// `store` is absent (absent relatives are tolerated everywhere), otherwise
/// the rule lives until the returned [`Subscription`] is dropped.
pub fn sync<F>(store: Option<&Store>, keys: &[&str], effect: F) -> Option<Subscription>
where
    F: Fn(&State, &State) + 'static,
{
    let store = store?;
    let state = store.get_state();
    effect(&state, &state);
    Some(store.subscribe(Some(keys), effect))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state;
    use alloc::vec;

    fn counting_store(initial: State) -> (Store, Rc<Cell<u32>>, Subscription) {
        let store = create_store(initial, &[]);
        let count = Rc::new(Cell::new(0));
        let count_in = Rc::clone(&count);
        let sub = store.subscribe(None, move |_, _| count_in.set(count_in.get() + 1));
        (store, count, sub)
    }

    #[test]
    fn set_notifies_on_real_change_only() {
        let (store, count, _sub) = counting_store(state! { "open" => false });

        store.set("open", true);
        assert_eq!(count.get(), 1);

        // Same value again: no notification.
        store.set("open", true);
        assert_eq!(count.get(), 1);

        // Updater resolving to the current value: no notification.
        store.update("open", |prev| prev.clone());
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let (store, count, _sub) = counting_store(state! { "open" => false });
        store.set("missing", true);
        assert_eq!(count.get(), 0);
        assert_eq!(store.get("missing"), None);
    }

    #[test]
    fn updater_receives_previous_value() {
        let store = create_store(state! { "moves" => 2 }, &[]);
        store.update("moves", |prev| {
            Value::Int(prev.as_int().unwrap_or(0) + 1)
        });
        assert_eq!(store.get("moves"), Some(Value::Int(3)));
    }

    #[test]
    fn key_filter_limits_notifications() {
        let store = create_store(state! { "a" => 0, "b" => 0 }, &[]);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_in = Rc::clone(&seen);
        let _sub = store.subscribe(Some(&["a"]), move |next, _| {
            seen_in.borrow_mut().push(next.get("a").cloned());
        });

        store.set("b", 1);
        assert!(seen.borrow().is_empty());

        store.set("a", 1);
        assert_eq!(*seen.borrow(), vec![Some(Value::Int(1))]);
    }

    #[test]
    fn listeners_run_in_registration_order() {
        let store = create_store(state! { "a" => 0 }, &[]);
        let order = Rc::new(RefCell::new(Vec::new()));
        let o1 = Rc::clone(&order);
        let o2 = Rc::clone(&order);
        let _s1 = store.subscribe(None, move |_, _| o1.borrow_mut().push(1));
        let _s2 = store.subscribe(None, move |_, _| o2.borrow_mut().push(2));
        store.set("a", 1);
        assert_eq!(*order.borrow(), vec![1, 2]);
    }

    #[test]
    fn listener_receives_prev_and_next() {
        let store = create_store(state! { "a" => 0 }, &[]);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_in = Rc::clone(&seen);
        let _sub = store.subscribe(Some(&["a"]), move |next, prev| {
            seen_in
                .borrow_mut()
                .push((prev.get("a").cloned(), next.get("a").cloned()));
        });
        store.set("a", 5);
        assert_eq!(
            *seen.borrow(),
            vec![(Some(Value::Int(0)), Some(Value::Int(5)))]
        );
    }

    #[test]
    fn dropping_subscription_detaches_listener() {
        let (store, count, sub) = counting_store(state! { "open" => false });
        store.set("open", true);
        assert_eq!(count.get(), 1);
        drop(sub);
        store.set("open", false);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn source_values_win_during_construction() {
        let source = create_store(state! { "open" => true }, &[]);
        let store = create_store(state! { "open" => false, "extra" => 1 }, &[source]);
        assert_eq!(store.get("open"), Some(Value::Bool(true)));
        // Keys the initial state does not declare stay out.
        assert_eq!(store.get_state().len(), 2);
    }

    #[test]
    fn later_sources_take_precedence() {
        let a = create_store(state! { "open" => false }, &[]);
        let b = create_store(state! { "open" => true }, &[]);
        let store = create_store(state! { "open" => false }, &[a, b]);
        assert_eq!(store.get("open"), Some(Value::Bool(true)));
    }

    #[test]
    fn shared_slot_is_visible_from_both_sides() {
        let source = create_store(state! { "open" => false }, &[]);
        let store = create_store(state! { "open" => false }, &[source.clone()]);

        store.set("open", true);
        assert_eq!(source.get("open"), Some(Value::Bool(true)));

        source.set("open", false);
        assert_eq!(store.get("open"), Some(Value::Bool(false)));
    }

    #[test]
    fn bound_write_notifies_each_listener_once() {
        let source = create_store(state! { "open" => false }, &[]);
        let store = create_store(state! { "open" => false }, &[source.clone()]);

        let store_count = Rc::new(Cell::new(0));
        let source_count = Rc::new(Cell::new(0));
        let sc = Rc::clone(&store_count);
        let oc = Rc::clone(&source_count);
        let _s1 = store.subscribe(Some(&["open"]), move |_, _| sc.set(sc.get() + 1));
        let _s2 = source.subscribe(Some(&["open"]), move |_, _| oc.set(oc.get() + 1));

        store.set("open", true);
        assert_eq!(store_count.get(), 1);
        assert_eq!(source_count.get(), 1);

        source.set("open", false);
        assert_eq!(store_count.get(), 2);
        assert_eq!(source_count.get(), 2);
    }

    #[test]
    fn listener_may_write_back_without_looping() {
        let store = create_store(state! { "mounted" => true, "active_id" => "x" }, &[]);
        let weak = store.downgrade();
        let _rule = store.subscribe(Some(&["mounted"]), move |next, _| {
            if next.get("mounted").and_then(Value::as_bool) == Some(false)
                && let Some(store) = weak.upgrade()
            {
                store.set("active_id", Value::Null);
            }
        });
        store.set("mounted", false);
        assert_eq!(store.get("active_id"), Some(Value::Null));
    }

    #[test]
    fn sync_runs_effect_immediately() {
        let store = create_store(state! { "orientation" => "vertical" }, &[]);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_in = Rc::clone(&seen);
        let _rule = sync(Some(&store), &["orientation"], move |next, _| {
            seen_in
                .borrow_mut()
                .push(next.get("orientation").and_then(Value::as_str).map(String::from));
        });
        assert_eq!(seen.borrow().len(), 1);
        store.set("orientation", "horizontal");
        assert_eq!(seen.borrow().len(), 2);
        assert_eq!(seen.borrow()[1].as_deref(), Some("horizontal"));
    }

    #[test]
    fn sync_tolerates_absent_store() {
        assert!(sync(None, &["orientation"], |_, _| {}).is_none());
    }

    #[test]
    fn nan_writes_settle_across_a_binding() {
        let source = create_store(state! { "ratio" => 1.0 }, &[]);
        let bound = create_store(state! { "ratio" => 1.0 }, &[source.clone()]);
        let count = Rc::new(Cell::new(0));
        let count_in = Rc::clone(&count);
        let _sub = bound.subscribe(Some(&["ratio"]), move |_, _| count_in.set(count_in.get() + 1));

        bound.set("ratio", f64::NAN);
        assert_eq!(source.get("ratio"), bound.get("ratio"));
        assert_eq!(count.get(), 1);

        // Bitwise-equal float: the write short-circuits.
        bound.set("ratio", f64::NAN);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn chained_binding_propagates_transitively() {
        // root <- middle <- leaf: a leaf write settles everywhere.
        let root = create_store(state! { "value" => 0 }, &[]);
        let middle = create_store(state! { "value" => 0 }, &[root.clone()]);
        let leaf = create_store(state! { "value" => 0 }, &[middle]);

        leaf.set("value", 7);
        assert_eq!(root.get("value"), Some(Value::Int(7)));

        root.set("value", 9);
        assert_eq!(leaf.get("value"), Some(Value::Int(9)));
    }
}
