// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The composite sub-store: roving active-item state bound to a store.

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use understory_store::{State, Store, Value, create_store, defaulted, defined};

use crate::types::{Navigation, Orientation};

/// State key: ordered list of item ids.
pub const ITEMS: &str = "items";
/// State key: id of the active (roving-focus) item, or null.
pub const ACTIVE_ID: &str = "active_id";
/// State key: layout orientation, canonical string form.
pub const ORIENTATION: &str = "orientation";
/// State key: whether navigation wraps at the ends of the item order.
pub const FOCUS_LOOP: &str = "focus_loop";
/// State key: count of programmatic moves. A move is an event, so the
/// counter bumps even when the active item does not change.
pub const MOVES: &str = "moves";

/// Configuration for [`create_composite_store`].
///
/// Each field resolves three-tier: the explicit value here, then the value
/// already present on the bound `store`, then the hard-coded fallback.
#[derive(Debug, Default)]
pub struct CompositeOptions {
    /// Store to bind into. Shared keys become shared slots.
    pub store: Option<Store>,
    /// Explicit item order.
    pub items: Option<Vec<String>>,
    /// Explicit active item (`Some(None)` explicitly clears it).
    pub active_id: Option<Option<String>>,
    /// Active item to fall back to when neither an explicit nor an inherited
    /// one is present.
    pub default_active_id: Option<String>,
    /// Explicit orientation. Falls back to [`Orientation::Both`].
    pub orientation: Option<Orientation>,
    /// Explicit wrap policy. Falls back to `false`.
    pub focus_loop: Option<bool>,
}

/// Roving active-item sub-store.
///
/// Tracks an ordered list of item ids and which one currently holds the
/// roving focus, plus the orientation and wrap policy that shape keyboard
/// navigation. The linear traversal matches the suite's focus conventions:
/// with no active item, forward navigation starts at the first item and
/// backward navigation at the last; wrapping applies only when `focus_loop`
/// is set.
///
/// ```rust
/// use understory_composite::{CompositeOptions, Navigation, create_composite_store};
///
/// let composite = create_composite_store(CompositeOptions {
///     items: Some(vec!["cut".into(), "copy".into(), "paste".into()]),
///     focus_loop: Some(true),
///     ..CompositeOptions::default()
/// });
///
/// assert_eq!(composite.navigate(Navigation::Next).as_deref(), Some("cut"));
/// composite.move_to(Some("paste"));
/// // Wraps past the end.
/// assert_eq!(composite.next().as_deref(), Some("cut"));
/// ```
#[derive(Clone, Debug)]
pub struct CompositeStore {
    store: Store,
}

/// Build a composite sub-store, optionally bound to an existing store.
///
/// Binding lets the bound store's current values seed every shared slot;
/// explicitly supplied options are then written through the slot, so an
/// explicit option wins on both sides of the binding.
pub fn create_composite_store(options: CompositeOptions) -> CompositeStore {
    let CompositeOptions {
        store: bound,
        items,
        active_id,
        default_active_id,
        orientation,
        focus_loop,
    } = options;

    let sync_state = bound.as_ref().map(Store::get_state).unwrap_or_default();

    let resolved_orientation = defaulted(
        orientation,
        defined(sync_state.get(ORIENTATION).cloned())
            .as_ref()
            .and_then(Orientation::from_value),
        Orientation::Both,
    );
    let resolved_focus_loop = defaulted(
        focus_loop,
        defined(sync_state.get(FOCUS_LOOP).cloned()).and_then(|v| v.as_bool()),
        false,
    );
    let explicit_items = items.is_some();
    let items = items
        .or_else(|| defined(sync_state.get(ITEMS).cloned()).map(|v| items_from_value(&v)))
        .unwrap_or_default();
    // Null is a real inherited value for the active item (explicitly no
    // active item), so presence, not definedness, decides this tier.
    let explicit_active_id = active_id.is_some();
    let active_id = active_id
        .or_else(|| {
            sync_state
                .get(ACTIVE_ID)
                .map(|v| v.as_str().map(String::from))
        })
        .or_else(|| default_active_id.map(Some))
        .unwrap_or(None);

    let mut initial = State::new();
    initial.insert(ITEMS.to_string(), items_value(&items));
    initial.insert(ACTIVE_ID.to_string(), Value::from(active_id.clone()));
    initial.insert(ORIENTATION.to_string(), Value::from(resolved_orientation));
    initial.insert(FOCUS_LOOP.to_string(), Value::from(resolved_focus_loop));
    initial.insert(MOVES.to_string(), Value::Int(0));

    let sources: Vec<Store> = bound.into_iter().collect();
    let store = create_store(initial, &sources);
    // Construction let the bound store win on shared slots; explicit options
    // overrule it, through the slot, so both sides agree.
    if explicit_items {
        store.set(ITEMS, items_value(&items));
    }
    if explicit_active_id {
        store.set(ACTIVE_ID, Value::from(active_id));
    }
    if orientation.is_some() {
        store.set(ORIENTATION, Value::from(resolved_orientation));
    }
    if focus_loop.is_some() {
        store.set(FOCUS_LOOP, Value::from(resolved_focus_loop));
    }
    CompositeStore { store }
}

#[derive(Copy, Clone)]
enum Step {
    Forward,
    Backward,
}

impl CompositeStore {
    /// The underlying store (for subscriptions or merging).
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Snapshot of the composite state.
    pub fn get_state(&self) -> State {
        self.store.get_state()
    }

    /// Current item order.
    pub fn items(&self) -> Vec<String> {
        self.store
            .get(ITEMS)
            .map(|v| items_from_value(&v))
            .unwrap_or_default()
    }

    /// Id of the active item, if any.
    pub fn active_id(&self) -> Option<String> {
        self.store
            .get(ACTIVE_ID)
            .and_then(|v| v.as_str().map(String::from))
    }

    /// Current orientation.
    pub fn orientation(&self) -> Orientation {
        self.store
            .get(ORIENTATION)
            .as_ref()
            .and_then(Orientation::from_value)
            .unwrap_or(Orientation::Both)
    }

    /// Whether navigation wraps at the ends.
    pub fn focus_loop(&self) -> bool {
        self.store
            .get(FOCUS_LOOP)
            .and_then(|v| v.as_bool())
            .unwrap_or(false)
    }

    /// Number of programmatic moves so far.
    pub fn moves(&self) -> u64 {
        self.store
            .get(MOVES)
            .and_then(|v| v.as_u64())
            .unwrap_or(0)
    }

    /// Replace the item order.
    pub fn set_items(&self, items: Vec<String>) {
        self.store.set(ITEMS, items_value(&items));
    }

    /// Append an item id if not already present.
    pub fn register_item(&self, id: &str) {
        let id = id.to_string();
        self.store.update(ITEMS, move |prev| {
            let mut items = items_from_value(prev);
            if items.iter().any(|item| *item == id) {
                return prev.clone();
            }
            items.push(id);
            items_value(&items)
        });
    }

    /// Remove an item id from the order. The active item is left untouched;
    /// hosts decide where focus lands after a removal.
    pub fn unregister_item(&self, id: &str) {
        let id = id.to_string();
        self.store.update(ITEMS, move |prev| {
            let mut items = items_from_value(prev);
            match items.iter().position(|item| *item == id) {
                Some(index) => {
                    items.remove(index);
                    items_value(&items)
                }
                None => prev.clone(),
            }
        });
    }

    /// Set the active item directly.
    pub fn set_active_id(&self, id: Option<&str>) {
        self.store.set(ACTIVE_ID, Value::from(id.map(String::from)));
    }

    /// Set the orientation.
    pub fn set_orientation(&self, orientation: Orientation) {
        self.store.set(ORIENTATION, Value::from(orientation));
    }

    /// Move the roving focus to `id` and record the move.
    ///
    /// The move counter bumps even when `id` is already active: a move is an
    /// interaction event, and hosts observe it through the counter slot.
    pub fn move_to(&self, id: Option<&str>) {
        self.set_active_id(id);
        self.store
            .update(MOVES, |prev| Value::Int(prev.as_int().unwrap_or(0) + 1));
    }

    /// First item in order.
    pub fn first(&self) -> Option<String> {
        self.items().first().cloned()
    }

    /// Last item in order.
    pub fn last(&self) -> Option<String> {
        self.items().last().cloned()
    }

    /// Item after the active one (or the first, with no active item).
    pub fn next(&self) -> Option<String> {
        self.step(Step::Forward)
    }

    /// Item before the active one (or the last, with no active item).
    pub fn previous(&self) -> Option<String> {
        self.step(Step::Backward)
    }

    /// Resolve a navigation intent against the current orientation.
    ///
    /// Directional intents on an orientation that does not follow them yield
    /// `None` so the host can give the intent another meaning.
    pub fn navigate(&self, navigation: Navigation) -> Option<String> {
        let orientation = self.orientation();
        match navigation {
            Navigation::Next => self.next(),
            Navigation::Prev => self.previous(),
            Navigation::First => self.first(),
            Navigation::Last => self.last(),
            Navigation::Down if orientation.follows_vertical() => self.next(),
            Navigation::Up if orientation.follows_vertical() => self.previous(),
            Navigation::Right if orientation.follows_horizontal() => self.next(),
            Navigation::Left if orientation.follows_horizontal() => self.previous(),
            Navigation::Up | Navigation::Down | Navigation::Left | Navigation::Right => None,
        }
    }

    fn step(&self, step: Step) -> Option<String> {
        let items = self.items();
        if items.is_empty() {
            return None;
        }
        let wrap = self.focus_loop();
        let origin = self.active_id();
        let position = origin
            .as_ref()
            .and_then(|id| items.iter().position(|item| item == id));
        match step {
            Step::Forward => match position {
                Some(pos) if pos + 1 < items.len() => Some(items[pos + 1].clone()),
                Some(_) if wrap => items.first().cloned(),
                Some(_) => None,
                None => items.first().cloned(),
            },
            Step::Backward => match position {
                Some(pos) if pos > 0 => Some(items[pos - 1].clone()),
                Some(_) if wrap => items.last().cloned(),
                Some(_) => None,
                None => items.last().cloned(),
            },
        }
    }
}

fn items_value(items: &[String]) -> Value {
    Value::List(items.iter().map(|item| Value::from(item.as_str())).collect())
}

fn items_from_value(value: &Value) -> Vec<String> {
    value
        .as_list()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.as_str().map(String::from))
                .collect()
        })
        .unwrap_or_default()
}
