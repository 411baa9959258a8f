// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The hovercard sub-store: open/placement/timing state for floating surfaces.

use alloc::rc::Rc;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::cell::Cell;
use core::fmt;

use understory_store::{
    State, Store, Subscription, Value, create_store, defaulted, defined, sync,
};

use crate::types::{ElementSlot, Placement};

/// State key: whether the surface is open.
pub const OPEN: &str = "open";
/// State key: whether the surface is mounted. Mirrors `open`.
pub const MOUNTED: &str = "mounted";
/// State key: placement relative to the anchor, canonical string form.
pub const PLACEMENT: &str = "placement";
/// State key: show-dwell delay in milliseconds.
pub const TIMEOUT: &str = "timeout";
/// State key: hide-dwell delay in milliseconds, or null to reuse `timeout`.
pub const HIDE_TIMEOUT: &str = "hide_timeout";

/// Configuration for [`create_hovercard_store`].
///
/// Each field resolves three-tier against the bound `store`; `open` has a
/// fourth caller-default tier (`default_open`) before the hard-coded closed
/// fallback.
#[derive(Debug, Default)]
pub struct HovercardOptions {
    /// Store to bind into. Shared keys become shared slots.
    pub store: Option<Store>,
    /// Explicit open state.
    pub open: Option<bool>,
    /// Open state to fall back to when neither an explicit nor an inherited
    /// one is present.
    pub default_open: Option<bool>,
    /// Explicit placement. Falls back to [`Placement::Bottom`].
    pub placement: Option<Placement>,
    /// Explicit show-dwell delay in milliseconds. Falls back to 500.
    pub timeout: Option<u64>,
    /// Explicit hide-dwell delay in milliseconds. When absent everywhere,
    /// hiding reuses the show-dwell delay.
    pub hide_timeout: Option<u64>,
}

/// A pending open-flip armed by the dwell scheduler.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct Pending {
    open: bool,
    deadline: u64,
}

/// Floating hover-surface sub-store.
///
/// Holds the surface's reactive state (open/mounted/placement/timeouts and
/// the five surface-owned element slots) plus the dwell scheduler. The
/// scheduler owns no clock: hosts pass millisecond timestamps into
/// [`HovercardStore::schedule_show`], [`HovercardStore::schedule_hide`], and
/// [`HovercardStore::tick`], and cancel simply by letting state change
/// first: any real change to `open` disarms the pending flip.
///
/// ```rust
/// use understory_hovercard::{HovercardOptions, create_hovercard_store};
///
/// let card = create_hovercard_store(HovercardOptions {
///     timeout: Some(150),
///     hide_timeout: Some(0),
///     ..HovercardOptions::default()
/// });
///
/// // Pointer enters the anchor at t=1000; the surface opens after the dwell.
/// card.schedule_show(1000);
/// assert!(!card.open());
/// card.tick(1150);
/// assert!(card.open());
/// assert!(card.mounted());
///
/// // Zero hide delay hides immediately.
/// card.schedule_hide(2000);
/// assert!(!card.open());
/// ```
#[derive(Clone)]
pub struct HovercardStore {
    store: Store,
    pending: Rc<Cell<Option<Pending>>>,
    _rules: Rc<Vec<Subscription>>,
}

impl fmt::Debug for HovercardStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HovercardStore")
            .field("state", &self.store.get_state())
            .field("pending", &self.pending.get())
            .finish_non_exhaustive()
    }
}

/// Build a hovercard sub-store, optionally bound to an existing store.
///
/// Binding lets the bound store's current values seed every shared slot;
/// explicitly supplied options are then written through the slot, so an
/// explicit option wins on both sides of the binding.
pub fn create_hovercard_store(options: HovercardOptions) -> HovercardStore {
    let HovercardOptions {
        store: bound,
        open,
        default_open,
        placement,
        timeout,
        hide_timeout,
    } = options;

    let sync_state = bound.as_ref().map(Store::get_state).unwrap_or_default();
    let inherited = |key: &str| defined(sync_state.get(key).cloned());

    let resolved_open = open
        .or_else(|| inherited(OPEN).and_then(|v| v.as_bool()))
        .or(default_open)
        .unwrap_or(false);
    let resolved_placement = defaulted(
        placement,
        inherited(PLACEMENT).as_ref().and_then(Placement::from_value),
        Placement::Bottom,
    );
    let resolved_timeout = defaulted(timeout, inherited(TIMEOUT).and_then(|v| v.as_u64()), 500);
    let resolved_hide_timeout = hide_timeout
        .map(Value::from)
        .or_else(|| inherited(HIDE_TIMEOUT))
        .unwrap_or(Value::Null);

    let mut initial = State::new();
    initial.insert(OPEN.to_string(), Value::from(resolved_open));
    initial.insert(MOUNTED.to_string(), Value::from(resolved_open));
    initial.insert(PLACEMENT.to_string(), Value::from(resolved_placement));
    initial.insert(TIMEOUT.to_string(), Value::from(resolved_timeout));
    initial.insert(HIDE_TIMEOUT.to_string(), resolved_hide_timeout.clone());
    for slot in ElementSlot::all() {
        let element = sync_state.get(slot.key()).cloned().unwrap_or(Value::Null);
        initial.insert(slot.key().to_string(), element);
    }

    let sources: Vec<Store> = bound.into_iter().collect();
    let store = create_store(initial, &sources);
    // Construction let the bound store win on shared slots; explicit options
    // overrule it, through the slot, so both sides agree.
    if open.is_some() {
        store.set(OPEN, resolved_open);
    }
    if placement.is_some() {
        store.set(PLACEMENT, Value::from(resolved_placement));
    }
    if timeout.is_some() {
        store.set(TIMEOUT, resolved_timeout);
    }
    if hide_timeout.is_some() {
        store.set(HIDE_TIMEOUT, resolved_hide_timeout);
    }
    let pending = Rc::new(Cell::new(None));

    // Standing rule: `mounted` mirrors `open`, and a real change to `open`
    // supersedes whatever flip the scheduler had armed. Weak capture so the
    // rule cannot keep its own store alive.
    let mut rules = Vec::new();
    let weak = store.downgrade();
    let pending_rule = Rc::clone(&pending);
    rules.extend(sync(Some(&store), &[OPEN], move |next, prev| {
        if next.get(OPEN) != prev.get(OPEN) {
            pending_rule.set(None);
        }
        let open = next.get(OPEN).and_then(Value::as_bool).unwrap_or(false);
        if let Some(store) = weak.upgrade() {
            store.set(MOUNTED, open);
        }
    }));

    HovercardStore {
        store,
        pending,
        _rules: Rc::new(rules),
    }
}

impl HovercardStore {
    /// The underlying store (for subscriptions or merging).
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Snapshot of the hovercard state.
    pub fn get_state(&self) -> State {
        self.store.get_state()
    }

    /// Whether the surface is open.
    pub fn open(&self) -> bool {
        self.store
            .get(OPEN)
            .and_then(|v| v.as_bool())
            .unwrap_or(false)
    }

    /// Whether the surface is mounted.
    pub fn mounted(&self) -> bool {
        self.store
            .get(MOUNTED)
            .and_then(|v| v.as_bool())
            .unwrap_or(false)
    }

    /// Current placement.
    pub fn placement(&self) -> Placement {
        self.store
            .get(PLACEMENT)
            .as_ref()
            .and_then(Placement::from_value)
            .unwrap_or(Placement::Bottom)
    }

    /// Show-dwell delay in milliseconds.
    pub fn timeout(&self) -> u64 {
        self.store
            .get(TIMEOUT)
            .and_then(|v| v.as_u64())
            .unwrap_or(0)
    }

    /// Hide-dwell delay in milliseconds, if configured.
    pub fn hide_timeout(&self) -> Option<u64> {
        self.store.get(HIDE_TIMEOUT).and_then(|v| v.as_u64())
    }

    /// The element id in a surface-owned slot, if any.
    pub fn element(&self, slot: ElementSlot) -> Option<String> {
        self.store
            .get(slot.key())
            .and_then(|v| v.as_str().map(String::from))
    }

    /// Set or clear a surface-owned element slot.
    pub fn set_element(&self, slot: ElementSlot, id: Option<&str>) {
        self.store
            .set(slot.key(), Value::from(id.map(String::from)));
    }

    /// Open the surface now.
    pub fn show(&self) {
        self.set_open(true);
    }

    /// Close the surface now.
    pub fn hide(&self) {
        self.set_open(false);
    }

    /// Flip the surface now.
    pub fn toggle(&self) {
        self.pending.set(None);
        self.store
            .update(OPEN, |prev| Value::from(!prev.as_bool().unwrap_or(false)));
    }

    /// Set the open state now, superseding any pending flip.
    pub fn set_open(&self, open: bool) {
        self.pending.set(None);
        self.store.set(OPEN, open);
    }

    /// Set the placement.
    pub fn set_placement(&self, placement: Placement) {
        self.store.set(PLACEMENT, Value::from(placement));
    }

    /// Arm an open-flip after the show dwell, from timestamp `now` (ms).
    ///
    /// With the surface already open this only disarms a pending hide (the
    /// re-enter-cancels-hide rule). A zero dwell opens immediately.
    pub fn schedule_show(&self, now: u64) {
        if self.open() {
            self.pending.set(None);
            return;
        }
        let timeout = self.timeout();
        if timeout == 0 {
            self.set_open(true);
            return;
        }
        self.pending.set(Some(Pending {
            open: true,
            deadline: now.saturating_add(timeout),
        }));
    }

    /// Arm a close-flip after the hide dwell, from timestamp `now` (ms).
    ///
    /// Falls back to the show dwell when no hide dwell is configured. With
    /// the surface already closed this only disarms a pending show. A zero
    /// dwell hides immediately.
    pub fn schedule_hide(&self, now: u64) {
        if !self.open() {
            self.pending.set(None);
            return;
        }
        let timeout = self.hide_timeout().unwrap_or_else(|| self.timeout());
        if timeout == 0 {
            self.set_open(false);
            return;
        }
        self.pending.set(Some(Pending {
            open: false,
            deadline: now.saturating_add(timeout),
        }));
    }

    /// Apply the pending flip if its deadline has passed.
    pub fn tick(&self, now: u64) {
        if let Some(pending) = self.pending.get()
            && now >= pending.deadline
        {
            self.pending.set(None);
            self.store.set(OPEN, pending.open);
        }
    }

    /// Deadline of the pending flip, if one is armed. Hosts use this to arm
    /// a real timer for the next [`HovercardStore::tick`].
    pub fn pending_deadline(&self) -> Option<u64> {
        self.pending.get().map(|pending| pending.deadline)
    }

    /// Disarm the pending flip.
    pub fn cancel_pending(&self) {
        self.pending.set(None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use understory_store::state;

    #[test]
    fn defaults_without_store_or_options() {
        let card = create_hovercard_store(HovercardOptions::default());
        assert!(!card.open());
        assert!(!card.mounted());
        assert_eq!(card.placement(), Placement::Bottom);
        assert_eq!(card.timeout(), 500);
        assert_eq!(card.hide_timeout(), None);
        assert_eq!(card.element(ElementSlot::Anchor), None);
    }

    #[test]
    fn open_resolution_order() {
        // Explicit beats inherited beats caller default, and the explicit
        // value is written through the shared slot.
        let bound = create_store(state! { "open" => false }, &[]);
        let card = create_hovercard_store(HovercardOptions {
            store: Some(bound.clone()),
            open: Some(true),
            default_open: Some(false),
            ..HovercardOptions::default()
        });
        assert!(card.open());
        assert_eq!(bound.get("open"), Some(Value::Bool(true)));

        let bound = create_store(state! { "open" => true }, &[]);
        let card = create_hovercard_store(HovercardOptions {
            store: Some(bound),
            default_open: Some(false),
            ..HovercardOptions::default()
        });
        assert!(card.open());

        let card = create_hovercard_store(HovercardOptions {
            default_open: Some(true),
            ..HovercardOptions::default()
        });
        assert!(card.open());
    }

    #[test]
    fn mounted_mirrors_open() {
        let card = create_hovercard_store(HovercardOptions::default());
        card.show();
        assert!(card.mounted());
        card.hide();
        assert!(!card.mounted());
    }

    #[test]
    fn mounted_mirrors_open_written_through_a_bound_store() {
        let bound = create_store(state! { "open" => false }, &[]);
        let card = create_hovercard_store(HovercardOptions {
            store: Some(bound.clone()),
            ..HovercardOptions::default()
        });
        bound.set("open", true);
        assert!(card.mounted());
    }

    #[test]
    fn dwell_show_applies_only_after_the_deadline() {
        let card = create_hovercard_store(HovercardOptions {
            timeout: Some(150),
            ..HovercardOptions::default()
        });
        card.schedule_show(1000);
        assert_eq!(card.pending_deadline(), Some(1150));

        card.tick(1100);
        assert!(!card.open());

        card.tick(1150);
        assert!(card.open());
        assert_eq!(card.pending_deadline(), None);
    }

    #[test]
    fn zero_dwell_applies_immediately() {
        let card = create_hovercard_store(HovercardOptions {
            timeout: Some(0),
            ..HovercardOptions::default()
        });
        card.schedule_show(1000);
        assert!(card.open());
        assert_eq!(card.pending_deadline(), None);
    }

    #[test]
    fn reentering_cancels_a_pending_hide() {
        let card = create_hovercard_store(HovercardOptions {
            timeout: Some(150),
            hide_timeout: Some(300),
            ..HovercardOptions::default()
        });
        card.show();
        card.schedule_hide(1000);
        assert_eq!(card.pending_deadline(), Some(1300));

        // Pointer re-enters before the hide deadline.
        card.schedule_show(1100);
        assert_eq!(card.pending_deadline(), None);

        card.tick(2000);
        assert!(card.open());
    }

    #[test]
    fn direct_open_change_disarms_the_pending_flip() {
        let card = create_hovercard_store(HovercardOptions {
            timeout: Some(150),
            ..HovercardOptions::default()
        });
        card.schedule_show(1000);
        card.hide();
        // hide() on a closed surface is a no-op write, but it still disarms.
        assert_eq!(card.pending_deadline(), None);
        card.tick(2000);
        assert!(!card.open());
    }

    #[test]
    fn open_change_through_a_bound_store_disarms_the_pending_flip() {
        let bound = create_store(state! { "open" => false }, &[]);
        let card = create_hovercard_store(HovercardOptions {
            store: Some(bound.clone()),
            timeout: Some(150),
            ..HovercardOptions::default()
        });
        card.schedule_show(1000);
        bound.set("open", true);
        assert_eq!(card.pending_deadline(), None);
        assert!(card.open());
    }

    #[test]
    fn hide_dwell_falls_back_to_the_show_dwell() {
        let card = create_hovercard_store(HovercardOptions {
            timeout: Some(200),
            ..HovercardOptions::default()
        });
        card.show();
        card.schedule_hide(1000);
        assert_eq!(card.pending_deadline(), Some(1200));
    }

    #[test]
    fn scheduling_in_the_current_direction_is_idempotent() {
        let card = create_hovercard_store(HovercardOptions {
            timeout: Some(150),
            ..HovercardOptions::default()
        });
        // Already closed: scheduling a hide arms nothing.
        card.schedule_hide(1000);
        assert_eq!(card.pending_deadline(), None);

        card.show();
        // Already open: scheduling a show arms nothing.
        card.schedule_show(2000);
        assert_eq!(card.pending_deadline(), None);
        assert!(card.open());
    }

    #[test]
    fn toggle_flips_and_disarms() {
        let card = create_hovercard_store(HovercardOptions {
            timeout: Some(150),
            ..HovercardOptions::default()
        });
        card.schedule_show(1000);
        card.toggle();
        assert!(card.open());
        assert_eq!(card.pending_deadline(), None);
        card.toggle();
        assert!(!card.open());
    }

    #[test]
    fn element_slots_are_settable_and_clearable() {
        let card = create_hovercard_store(HovercardOptions::default());
        card.set_element(ElementSlot::Anchor, Some("anchor-1"));
        assert_eq!(card.element(ElementSlot::Anchor).as_deref(), Some("anchor-1"));
        card.set_element(ElementSlot::Anchor, None);
        assert_eq!(card.element(ElementSlot::Anchor), None);
    }
}
