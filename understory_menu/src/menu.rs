// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The composed menu store.
//!
//! ## Construction
//!
//! A menu store is assembled from three state sources: the caller's own
//! store, the `values` slice of a parent menu (so checked items agree along
//! a submenu chain), and a combobox sibling's state minus the positioning
//! elements every surface owns for itself. The merged result seeds a
//! composite sub-store (roving focus) and a hovercard sub-store (floating
//! surface), whose states are flattened together with the menu's own fields
//! into one unified store bound to all three.
//!
//! Contradictory wiring (an explicit option that disagrees with a value
//! already inherited through the merge) is rejected before any sub-store
//! is built.
//!
//! ## Standing rules
//!
//! Two rules are installed at construction and live as long as the store:
//! when `mounted` transitions to false the active item is cleared, and when
//! the parent's `orientation` changes the menu's `placement` is recomputed
//! (vertical parents push submenus to the side, everything else below).

use alloc::rc::{Rc, Weak};
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;

use understory_composite::{
    ACTIVE_ID, CompositeOptions, CompositeStore, FOCUS_LOOP, ITEMS, Navigation, ORIENTATION,
    Orientation, create_composite_store,
};
use understory_hovercard::{
    ELEMENT_KEYS, ElementSlot, HIDE_TIMEOUT, HovercardOptions, HovercardStore, MOUNTED, OPEN,
    PLACEMENT, Placement, TIMEOUT, create_hovercard_store,
};
use understory_store::{
    SetAction, State, Store, StoreError, Subscription, Value, create_store, defaulted, defined,
    ensure_no_conflicting_props, merge_store, omit, pick, sync,
};

use crate::menu_bar::{MenuBarStore, WeakMenuBarStore};
use crate::values::{RESERVED_VALUE_NAMES, Values, updated_values};

/// State key: which part of the menu receives focus when it opens.
pub const INITIAL_FOCUS: &str = "initial_focus";
/// State key: the values map for checkbox- and radio-style items.
pub const VALUES: &str = "values";

/// Where focus lands when the menu opens.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum InitialFocus {
    /// Focus the menu container itself.
    Container,
    /// Focus the first item.
    First,
    /// Focus the last item.
    Last,
}

impl InitialFocus {
    /// Canonical string form used in state.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Container => "container",
            Self::First => "first",
            Self::Last => "last",
        }
    }

    /// Parse the canonical string form.
    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "container" => Some(Self::Container),
            "first" => Some(Self::First),
            "last" => Some(Self::Last),
            _ => None,
        }
    }

    /// Read an initial-focus policy out of a state value.
    pub fn from_value(value: &Value) -> Option<Self> {
        value.as_str().and_then(Self::from_str)
    }
}

impl From<InitialFocus> for Value {
    fn from(focus: InitialFocus) -> Self {
        Self::from(focus.as_str())
    }
}

/// Configuration for [`create_menu_store`].
///
/// Sharable fields resolve three-tier (explicit here, inherited through the
/// merged store, hard-coded fallback); supplying an explicit value that
/// contradicts inherited state is a construction error.
#[derive(Debug, Default)]
pub struct MenuOptions {
    /// Externally supplied store to merge in.
    pub store: Option<Store>,
    /// Combobox-style sibling whose state this menu shares, minus the
    /// surface-owned element slots.
    pub combobox: Option<Store>,
    /// Parent menu for nesting. Only its `values` slice is inherited.
    pub parent: Option<MenuStore>,
    /// Menu bar this menu is rendered in. A menu whose logical parent is a
    /// bar (no intermediate parent menu) opens instantly on hover.
    pub menubar: Option<MenuBarStore>,
    /// Explicit values map.
    pub values: Option<Values>,
    /// Values map to fall back to when nothing is inherited.
    pub default_values: Option<Values>,
    /// Explicit open state.
    pub open: Option<bool>,
    /// Open state to fall back to.
    pub default_open: Option<bool>,
    /// Explicit active item (`Some(None)` explicitly clears it).
    pub active_id: Option<Option<String>>,
    /// Active item to fall back to.
    pub default_active_id: Option<String>,
    /// Explicit item order.
    pub items: Option<Vec<String>>,
    /// Explicit wrap policy for item navigation.
    pub focus_loop: Option<bool>,
    /// Explicit orientation. Falls back to [`Orientation::Vertical`].
    pub orientation: Option<Orientation>,
    /// Explicit placement. Falls back to [`Placement::BottomStart`].
    pub placement: Option<Placement>,
    /// Explicit show-dwell delay in milliseconds. Falls back to 0 for
    /// top-level menu-bar items and 150 for everything else.
    pub timeout: Option<u64>,
    /// Explicit hide-dwell delay in milliseconds. Falls back to 0.
    pub hide_timeout: Option<u64>,
    /// Names [`MenuStore::set_value`] refuses to touch. Falls back to
    /// [`RESERVED_VALUE_NAMES`].
    pub reserved_value_names: Option<Vec<String>>,
}

struct MenuInner {
    store: Store,
    composite: CompositeStore,
    hovercard: HovercardStore,
    combobox: Option<Store>,
    parent: Weak<MenuInner>,
    menubar: WeakMenuBarStore,
    reserved_value_names: Vec<String>,
    _rules: Vec<Subscription>,
}

/// Composed menu store.
///
/// Exposes the union of the composite surface (items, roving focus,
/// navigation), the hovercard surface (open/placement/dwell scheduling), the
/// unified reactive store, and the menu's own operations: the values map,
/// the initial-focus policy, and the [`MenuStore::hide_all`] cascade.
///
/// Handles are cheap to clone. Parent and menu bar back-references are weak:
/// a menu never owns its relatives' lifetimes and tolerates their absence.
#[derive(Clone)]
pub struct MenuStore {
    inner: Rc<MenuInner>,
}

impl fmt::Debug for MenuStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MenuStore")
            .field("state", &self.get_state())
            .finish_non_exhaustive()
    }
}

/// Build a menu store.
///
/// Fails with [`StoreError::ConflictingProps`] when an explicit option
/// contradicts state inherited through the merge, before any sub-store is
/// built.
///
/// ```rust
/// use understory_menu::{MenuOptions, create_menu_store};
///
/// let menu = create_menu_store(MenuOptions {
///     items: Some(vec!["undo".into(), "redo".into()]),
///     ..MenuOptions::default()
/// })
/// .unwrap();
///
/// menu.show();
/// menu.move_to(Some("undo"));
/// menu.hide();
/// // Closing never leaves a stale roving selection behind.
/// assert_eq!(menu.active_id(), None);
/// ```
pub fn create_menu_store(options: MenuOptions) -> Result<MenuStore, StoreError> {
    let MenuOptions {
        store,
        combobox,
        parent,
        menubar,
        values,
        default_values,
        open,
        default_open,
        active_id,
        default_active_id,
        items,
        focus_loop,
        orientation,
        placement,
        timeout,
        hide_timeout,
        reserved_value_names,
    } = options;

    let parent_is_menubar = menubar.is_some() && parent.is_none();

    // A nested menu inherits only its parent's values; a combobox sibling
    // shares everything except the positioning elements each surface owns.
    let parent_values = pick(parent.as_ref().map(MenuStore::store), &[VALUES]);
    let combobox_state = omit(combobox.as_ref(), &ELEMENT_KEYS);
    let merged = merge_store(&[
        store.as_ref(),
        parent_values.as_ref(),
        combobox_state.as_ref(),
    ]);

    let mut props = State::new();
    if let Some(values) = &values {
        props.insert(VALUES.to_string(), Value::Map(values.clone()));
    }
    if let Some(open) = open {
        props.insert(OPEN.to_string(), Value::from(open));
    }
    if let Some(active_id) = &active_id {
        props.insert(ACTIVE_ID.to_string(), Value::from(active_id.clone()));
    }
    if let Some(items) = &items {
        props.insert(
            ITEMS.to_string(),
            Value::List(items.iter().map(|item| Value::from(item.as_str())).collect()),
        );
    }
    if let Some(focus_loop) = focus_loop {
        props.insert(FOCUS_LOOP.to_string(), Value::from(focus_loop));
    }
    if let Some(orientation) = orientation {
        props.insert(ORIENTATION.to_string(), Value::from(orientation));
    }
    if let Some(placement) = placement {
        props.insert(PLACEMENT.to_string(), Value::from(placement));
    }
    if let Some(timeout) = timeout {
        props.insert(TIMEOUT.to_string(), Value::from(timeout));
    }
    if let Some(hide_timeout) = hide_timeout {
        props.insert(HIDE_TIMEOUT.to_string(), Value::from(hide_timeout));
    }
    ensure_no_conflicting_props(&props, Some(&merged))?;

    let sync_state = merged.get_state();
    let inherited = |key: &str| defined(sync_state.get(key).cloned());

    let composite = create_composite_store(CompositeOptions {
        store: Some(merged.clone()),
        items,
        active_id,
        default_active_id,
        orientation: Some(defaulted(
            orientation,
            inherited(ORIENTATION)
                .as_ref()
                .and_then(Orientation::from_value),
            Orientation::Vertical,
        )),
        focus_loop,
    });

    let hovercard = create_hovercard_store(HovercardOptions {
        store: Some(merged.clone()),
        open,
        default_open,
        placement: Some(defaulted(
            placement,
            inherited(PLACEMENT).as_ref().and_then(Placement::from_value),
            Placement::BottomStart,
        )),
        // A top-level menu-bar item opens instantly on hover; nested
        // submenus get a dwell delay.
        timeout: Some(defaulted(
            timeout,
            inherited(TIMEOUT).and_then(|v| v.as_u64()),
            if parent_is_menubar { 0 } else { 150 },
        )),
        hide_timeout: Some(defaulted(
            hide_timeout,
            inherited(HIDE_TIMEOUT).and_then(|v| v.as_u64()),
            0,
        )),
    });

    let mut initial = composite.get_state();
    initial.extend(hovercard.get_state());
    let initial_focus = inherited(INITIAL_FOCUS)
        .as_ref()
        .and_then(InitialFocus::from_value)
        .unwrap_or(InitialFocus::Container);
    initial.insert(INITIAL_FOCUS.to_string(), Value::from(initial_focus));
    let explicit_values = values.is_some();
    let menu_values = values
        .or_else(|| inherited(VALUES).and_then(|v| v.as_map().cloned()))
        .or(default_values)
        .unwrap_or_default();
    initial.insert(VALUES.to_string(), Value::Map(menu_values.clone()));

    let unified = create_store(
        initial,
        &[
            composite.store().clone(),
            hovercard.store().clone(),
            merged,
        ],
    );
    if explicit_values {
        unified.set(VALUES, Value::Map(menu_values));
    }

    let mut rules = Vec::new();
    {
        // Closing must not leave a stale roving selection for the next open.
        // Weak capture: a rule must not keep its own store alive.
        let weak = unified.downgrade();
        rules.extend(sync(Some(&unified), &[MOUNTED], move |next, prev| {
            let mounted = next.get(MOUNTED).and_then(Value::as_bool).unwrap_or(false);
            let was_mounted = prev.get(MOUNTED).and_then(Value::as_bool).unwrap_or(false);
            if mounted || !was_mounted {
                return;
            }
            if let Some(store) = weak.upgrade() {
                store.set(ACTIVE_ID, Value::Null);
            }
        }));
    }
    if let Some(parent) = &parent {
        // A submenu of a vertical parent opens to the side, otherwise below.
        let weak = unified.downgrade();
        rules.extend(sync(
            Some(parent.store()),
            &[ORIENTATION],
            move |next, _prev| {
                let Some(store) = weak.upgrade() else { return };
                let placement = match next.get(ORIENTATION).and_then(Orientation::from_value) {
                    Some(Orientation::Vertical) => Placement::RightStart,
                    _ => Placement::BottomStart,
                };
                store.set(PLACEMENT, Value::from(placement));
            },
        ));
    }

    Ok(MenuStore {
        inner: Rc::new(MenuInner {
            store: unified,
            composite,
            hovercard,
            combobox,
            parent: parent
                .map(|parent| Rc::downgrade(&parent.inner))
                .unwrap_or_default(),
            menubar: menubar
                .map(|menubar| menubar.downgrade())
                .unwrap_or_default(),
            reserved_value_names: reserved_value_names.unwrap_or_else(|| {
                RESERVED_VALUE_NAMES.iter().map(ToString::to_string).collect()
            }),
            _rules: rules,
        }),
    })
}

impl MenuStore {
    /// The unified store backing this menu.
    pub fn store(&self) -> &Store {
        &self.inner.store
    }

    /// The composite (roving focus) surface.
    pub fn composite(&self) -> &CompositeStore {
        &self.inner.composite
    }

    /// The hovercard (floating surface) surface.
    pub fn hovercard(&self) -> &HovercardStore {
        &self.inner.hovercard
    }

    /// Snapshot of the unified state.
    pub fn get_state(&self) -> State {
        self.inner.store.get_state()
    }

    /// Register a listener on the unified store. See [`Store::subscribe`].
    pub fn subscribe<F>(&self, keys: Option<&[&str]>, f: F) -> Subscription
    where
        F: Fn(&State, &State) + 'static,
    {
        self.inner.store.subscribe(keys, f)
    }

    /// The combobox sibling, if any.
    pub fn combobox(&self) -> Option<&Store> {
        self.inner.combobox.as_ref()
    }

    /// The parent menu, if it is still alive.
    pub fn parent(&self) -> Option<MenuStore> {
        self.inner.parent.upgrade().map(|inner| MenuStore { inner })
    }

    /// The menu bar, if it is still alive.
    pub fn menubar(&self) -> Option<MenuBarStore> {
        self.inner.menubar.upgrade()
    }

    /// Hide this menu and every parent menu above it.
    ///
    /// Cascades child-first: this menu's surface closes, then the parent's,
    /// up to the root. Dead or absent parents end the cascade.
    pub fn hide_all(&self) {
        self.inner.hovercard.hide();
        if let Some(parent) = self.parent() {
            parent.hide_all();
        }
    }

    // --- composite surface ---------------------------------------------

    /// Current item order.
    pub fn items(&self) -> Vec<String> {
        self.inner.composite.items()
    }

    /// Id of the active item, if any.
    pub fn active_id(&self) -> Option<String> {
        self.inner.composite.active_id()
    }

    /// Current orientation.
    pub fn orientation(&self) -> Orientation {
        self.inner.composite.orientation()
    }

    /// Number of programmatic moves so far.
    pub fn moves(&self) -> u64 {
        self.inner.composite.moves()
    }

    /// Replace the item order.
    pub fn set_items(&self, items: Vec<String>) {
        self.inner.composite.set_items(items);
    }

    /// Append an item id if not already present.
    pub fn register_item(&self, id: &str) {
        self.inner.composite.register_item(id);
    }

    /// Remove an item id from the order.
    pub fn unregister_item(&self, id: &str) {
        self.inner.composite.unregister_item(id);
    }

    /// Set the active item directly.
    pub fn set_active_id(&self, id: Option<&str>) {
        self.inner.composite.set_active_id(id);
    }

    /// Set the orientation.
    pub fn set_orientation(&self, orientation: Orientation) {
        self.inner.composite.set_orientation(orientation);
    }

    /// Move the roving focus to `id` and record the move.
    pub fn move_to(&self, id: Option<&str>) {
        self.inner.composite.move_to(id);
    }

    /// First item in order.
    pub fn first(&self) -> Option<String> {
        self.inner.composite.first()
    }

    /// Last item in order.
    pub fn last(&self) -> Option<String> {
        self.inner.composite.last()
    }

    /// Item after the active one.
    pub fn next(&self) -> Option<String> {
        self.inner.composite.next()
    }

    /// Item before the active one.
    pub fn previous(&self) -> Option<String> {
        self.inner.composite.previous()
    }

    /// Resolve a navigation intent against the menu's orientation.
    pub fn navigate(&self, navigation: Navigation) -> Option<String> {
        self.inner.composite.navigate(navigation)
    }

    // --- hovercard surface ---------------------------------------------

    /// Whether the menu surface is open.
    pub fn open(&self) -> bool {
        self.inner.hovercard.open()
    }

    /// Whether the menu surface is mounted.
    pub fn mounted(&self) -> bool {
        self.inner.hovercard.mounted()
    }

    /// Current placement.
    pub fn placement(&self) -> Placement {
        self.inner.hovercard.placement()
    }

    /// Show-dwell delay in milliseconds.
    pub fn timeout(&self) -> u64 {
        self.inner.hovercard.timeout()
    }

    /// Hide-dwell delay in milliseconds, if configured.
    pub fn hide_timeout(&self) -> Option<u64> {
        self.inner.hovercard.hide_timeout()
    }

    /// Open the menu now.
    pub fn show(&self) {
        self.inner.hovercard.show();
    }

    /// Close the menu now.
    pub fn hide(&self) {
        self.inner.hovercard.hide();
    }

    /// Flip the menu now.
    pub fn toggle(&self) {
        self.inner.hovercard.toggle();
    }

    /// Set the open state now.
    pub fn set_open(&self, open: bool) {
        self.inner.hovercard.set_open(open);
    }

    /// Set the placement.
    pub fn set_placement(&self, placement: Placement) {
        self.inner.hovercard.set_placement(placement);
    }

    /// Arm an open-flip after the show dwell. See
    /// [`HovercardStore::schedule_show`].
    pub fn schedule_show(&self, now: u64) {
        self.inner.hovercard.schedule_show(now);
    }

    /// Arm a close-flip after the hide dwell. See
    /// [`HovercardStore::schedule_hide`].
    pub fn schedule_hide(&self, now: u64) {
        self.inner.hovercard.schedule_hide(now);
    }

    /// Apply the pending flip if its deadline has passed.
    pub fn tick(&self, now: u64) {
        self.inner.hovercard.tick(now);
    }

    /// The element id in a surface-owned slot, if any.
    pub fn element(&self, slot: ElementSlot) -> Option<String> {
        self.inner.hovercard.element(slot)
    }

    /// Set or clear a surface-owned element slot.
    pub fn set_element(&self, slot: ElementSlot, id: Option<&str>) {
        self.inner.hovercard.set_element(slot, id);
    }

    // --- menu surface ---------------------------------------------------

    /// Where focus lands when the menu opens.
    pub fn initial_focus(&self) -> InitialFocus {
        self.inner
            .store
            .get(INITIAL_FOCUS)
            .as_ref()
            .and_then(InitialFocus::from_value)
            .unwrap_or(InitialFocus::Container)
    }

    /// Set the initial-focus policy.
    pub fn set_initial_focus(&self, focus: InitialFocus) {
        self.inner.store.set(INITIAL_FOCUS, Value::from(focus));
    }

    /// Snapshot of the values map.
    pub fn values(&self) -> Values {
        self.inner
            .store
            .get(VALUES)
            .and_then(|v| v.as_map().cloned())
            .unwrap_or_default()
    }

    /// One entry of the values map, if present.
    pub fn value(&self, name: &str) -> Option<Value> {
        self.values().get(name).cloned()
    }

    /// Replace the whole values map.
    pub fn set_values(&self, values: Values) {
        self.inner.store.set(VALUES, Value::Map(values));
    }

    /// Derive the next values map from the previous one.
    pub fn update_values(&self, f: impl FnOnce(&Values) -> Values + 'static) {
        self.inner.store.update(VALUES, move |prev| {
            let values = prev.as_map().cloned().unwrap_or_default();
            Value::Map(f(&values))
        });
    }

    /// Set one named value.
    ///
    /// Reserved names are silently ignored rather than raised as errors.
    /// Writing the value an entry already holds leaves the map untouched; a
    /// [`Value::Null`] result is stored as `false` so the map never carries
    /// a nothing-value.
    pub fn set_value(&self, name: &str, value: impl Into<Value>) {
        self.apply_value(name, SetAction::value(value));
    }

    /// Derive one named value from its previous value (missing entries
    /// resolve from [`Value::Null`]). Same guards as [`MenuStore::set_value`].
    pub fn update_value(&self, name: &str, f: impl FnOnce(&Value) -> Value + 'static) {
        self.apply_value(name, SetAction::update(f));
    }

    fn apply_value(&self, name: &str, action: SetAction) {
        if self
            .inner
            .reserved_value_names
            .iter()
            .any(|reserved| reserved == name)
        {
            return;
        }
        let name = name.to_string();
        self.inner
            .store
            .update(VALUES, move |values| updated_values(values, &name, action));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu_bar::{MenuBarOptions, create_menu_bar_store};
    use alloc::vec;
    use core::cell::{Cell, RefCell};
    use understory_store::state;

    fn plain_menu() -> MenuStore {
        create_menu_store(MenuOptions::default()).unwrap()
    }

    fn child_of(parent: &MenuStore) -> MenuStore {
        create_menu_store(MenuOptions {
            parent: Some(parent.clone()),
            ..MenuOptions::default()
        })
        .unwrap()
    }

    #[test]
    fn standalone_defaults() {
        let menu = plain_menu();
        assert_eq!(menu.orientation(), Orientation::Vertical);
        assert_eq!(menu.placement(), Placement::BottomStart);
        assert_eq!(menu.timeout(), 150);
        assert_eq!(menu.hide_timeout(), Some(0));
        assert_eq!(menu.initial_focus(), InitialFocus::Container);
        assert!(menu.values().is_empty());
        assert!(!menu.open());
        assert_eq!(menu.active_id(), None);
    }

    #[test]
    fn menu_bar_items_open_instantly_but_submenus_dwell() {
        let bar = create_menu_bar_store(MenuBarOptions::default());
        let top_level = create_menu_store(MenuOptions {
            menubar: Some(bar.clone()),
            ..MenuOptions::default()
        })
        .unwrap();
        assert_eq!(top_level.timeout(), 0);

        let nested = create_menu_store(MenuOptions {
            menubar: Some(bar),
            parent: Some(top_level.clone()),
            ..MenuOptions::default()
        })
        .unwrap();
        assert_eq!(nested.timeout(), 150);
    }

    #[test]
    fn explicit_timeout_beats_the_menubar_rule() {
        let bar = create_menu_bar_store(MenuBarOptions::default());
        let menu = create_menu_store(MenuOptions {
            menubar: Some(bar),
            timeout: Some(75),
            ..MenuOptions::default()
        })
        .unwrap();
        assert_eq!(menu.timeout(), 75);
    }

    #[test]
    fn conflicting_values_against_an_inherited_store_fail_fast() {
        let parent = create_menu_store(MenuOptions {
            default_values: Some(state! { "a" => 1 }),
            ..MenuOptions::default()
        })
        .unwrap();

        let err = create_menu_store(MenuOptions {
            parent: Some(parent.clone()),
            values: Some(state! { "a" => 2 }),
            ..MenuOptions::default()
        })
        .unwrap_err();
        assert!(matches!(err, StoreError::ConflictingProps { keys } if keys == ["values"]));

        // Restating the inherited value is fine.
        let child = create_menu_store(MenuOptions {
            parent: Some(parent),
            values: Some(state! { "a" => 1 }),
            ..MenuOptions::default()
        });
        assert!(child.is_ok());
    }

    #[test]
    fn nested_menu_inherits_and_shares_its_parents_values() {
        let parent = create_menu_store(MenuOptions {
            default_values: Some(state! { "watching" => true }),
            ..MenuOptions::default()
        })
        .unwrap();
        let child = child_of(&parent);

        // Inherited at construction.
        assert_eq!(child.value("watching"), Some(Value::Bool(true)));

        // One logical slot from then on, in both directions.
        child.set_value("watching", false);
        assert_eq!(parent.value("watching"), Some(Value::Bool(false)));

        parent.set_value("sort", "asc");
        assert_eq!(child.value("sort"), Some(Value::from("asc")));
    }

    #[test]
    fn combobox_state_is_shared_except_positioning_elements() {
        // A plain store standing in for a combobox sibling.
        let combobox = create_store(
            state! {
                "values" => state! { },
                "open" => false,
                "anchor_element" => "combobox-anchor",
            },
            &[],
        );
        let menu = create_menu_store(MenuOptions {
            combobox: Some(combobox.clone()),
            ..MenuOptions::default()
        })
        .unwrap();

        // Logical state is one slot.
        menu.set_value("filter", "recent");
        assert_eq!(
            combobox.get("values"),
            Some(Value::Map(state! { "filter" => "recent" }))
        );
        menu.show();
        assert_eq!(combobox.get("open"), Some(Value::Bool(true)));

        // Each surface owns its own positioning elements.
        assert_eq!(menu.element(ElementSlot::Anchor), None);
        menu.set_element(ElementSlot::Anchor, Some("menu-anchor"));
        assert_eq!(
            combobox.get("anchor_element"),
            Some(Value::from("combobox-anchor"))
        );
    }

    #[test]
    fn submenu_placement_follows_parent_orientation() {
        let parent = plain_menu();
        let child = child_of(&parent);

        // Vertical parent (the default): submenus open to the side.
        assert_eq!(child.placement(), Placement::RightStart);

        parent.set_orientation(Orientation::Horizontal);
        assert_eq!(child.placement(), Placement::BottomStart);

        parent.set_orientation(Orientation::Vertical);
        assert_eq!(child.placement(), Placement::RightStart);
    }

    #[test]
    fn unmounting_clears_the_active_item() {
        let menu = create_menu_store(MenuOptions {
            items: Some(vec!["item-1".into(), "item-2".into(), "item-3".into()]),
            ..MenuOptions::default()
        })
        .unwrap();
        menu.show();
        menu.move_to(Some("item-3"));
        assert_eq!(menu.active_id().as_deref(), Some("item-3"));

        menu.hide();
        assert_eq!(menu.active_id(), None);
    }

    #[test]
    fn default_active_id_survives_construction() {
        // The store starts unmounted; only a real mounted->unmounted
        // transition clears the selection.
        let menu = create_menu_store(MenuOptions {
            default_active_id: Some("item-1".into()),
            ..MenuOptions::default()
        })
        .unwrap();
        assert_eq!(menu.active_id().as_deref(), Some("item-1"));
    }

    #[test]
    fn hide_all_cascades_child_first_to_the_root() {
        let a = plain_menu();
        let b = child_of(&a);
        let c = child_of(&b);
        for menu in [&a, &b, &c] {
            menu.show();
        }

        let order = Rc::new(RefCell::new(Vec::new()));
        let mut subs = Vec::new();
        for (label, menu) in [("a", &a), ("b", &b), ("c", &c)] {
            let order = Rc::clone(&order);
            subs.push(menu.subscribe(Some(&[OPEN]), move |next, _| {
                if next.get(OPEN).and_then(Value::as_bool) == Some(false) {
                    order.borrow_mut().push(label);
                }
            }));
        }

        c.hide_all();
        assert_eq!(*order.borrow(), vec!["c", "b", "a"]);
        assert!(!a.open() && !b.open() && !c.open());
    }

    #[test]
    fn hide_all_tolerates_a_dead_parent() {
        let parent = plain_menu();
        let child = child_of(&parent);
        child.show();

        drop(parent);
        assert!(child.parent().is_none());

        // Cascade simply ends where the chain does.
        child.hide_all();
        assert!(!child.open());
    }

    #[test]
    fn menubar_back_reference_is_weak() {
        let bar = create_menu_bar_store(MenuBarOptions::default());
        let menu = create_menu_store(MenuOptions {
            menubar: Some(bar.clone()),
            ..MenuOptions::default()
        })
        .unwrap();
        assert!(menu.menubar().is_some());
        drop(bar);
        assert!(menu.menubar().is_none());
    }

    #[test]
    fn reserved_names_are_silently_ignored() {
        let menu = plain_menu();
        menu.set_value("__proto__", "x");
        menu.set_value("constructor", "x");
        menu.update_value("__proto__", |_| Value::from("x"));
        assert!(menu.values().is_empty());
    }

    #[test]
    fn reserved_names_are_configurable() {
        let menu = create_menu_store(MenuOptions {
            reserved_value_names: Some(vec!["forbidden".into()]),
            ..MenuOptions::default()
        })
        .unwrap();
        menu.set_value("forbidden", 1);
        assert!(menu.values().is_empty());

        // The configured list replaces the default one.
        menu.set_value("__proto__", 1);
        assert_eq!(menu.value("__proto__"), Some(Value::Int(1)));
    }

    #[test]
    fn set_value_is_idempotent() {
        let menu = plain_menu();
        let notified = Rc::new(Cell::new(0u32));
        let counter = Rc::clone(&notified);
        let _sub = menu.subscribe(Some(&[VALUES]), move |_, _| counter.set(counter.get() + 1));

        menu.set_value("watching", true);
        assert_eq!(notified.get(), 1);
        menu.set_value("watching", true);
        assert_eq!(notified.get(), 1);
        menu.update_value("watching", |prev| prev.clone());
        assert_eq!(notified.get(), 1);
    }

    #[test]
    fn cleared_values_are_stored_as_false() {
        let menu = plain_menu();
        menu.set_value("sort", "asc");
        menu.update_value("sort", |_| Value::Null);
        assert_eq!(menu.value("sort"), Some(Value::Bool(false)));
    }

    #[test]
    fn set_values_and_update_values_replace_the_map() {
        let menu = plain_menu();
        menu.set_values(state! { "a" => 1 });
        assert_eq!(menu.values(), state! { "a" => 1 });

        menu.update_values(|prev| {
            let mut next = prev.clone();
            next.insert("b".to_string(), Value::Int(2));
            next
        });
        assert_eq!(menu.values(), state! { "a" => 1, "b" => 2 });
    }

    #[test]
    fn initial_focus_is_inherited_and_settable() {
        let external = create_store(state! { "initial_focus" => "first" }, &[]);
        let menu = create_menu_store(MenuOptions {
            store: Some(external),
            ..MenuOptions::default()
        })
        .unwrap();
        assert_eq!(menu.initial_focus(), InitialFocus::First);

        menu.set_initial_focus(InitialFocus::Last);
        assert_eq!(menu.initial_focus(), InitialFocus::Last);
    }

    #[test]
    fn unified_writes_are_visible_through_every_sub_store() {
        let menu = create_menu_store(MenuOptions {
            items: Some(vec!["a".into(), "b".into()]),
            ..MenuOptions::default()
        })
        .unwrap();

        // Through the unified store, read from the composite.
        menu.store().set(ACTIVE_ID, "b");
        assert_eq!(menu.composite().active_id().as_deref(), Some("b"));

        // Through the hovercard, read from the unified store.
        menu.hovercard().show();
        assert_eq!(
            menu.store().get(OPEN).and_then(|v| v.as_bool()),
            Some(true)
        );
    }

    #[test]
    fn dwell_scheduling_reaches_the_unified_state() {
        let menu = plain_menu();
        menu.schedule_show(1000);
        menu.tick(1150);
        assert!(menu.open());
        assert!(menu.mounted());

        // hide_timeout defaults to 0 for menus: leaving hides immediately.
        menu.schedule_hide(2000);
        assert!(!menu.open());
        assert_eq!(menu.active_id(), None);
    }

    #[test]
    fn explicit_orientation_matching_inherited_state_is_accepted() {
        let external = create_store(state! { "orientation" => "horizontal" }, &[]);
        let menu = create_menu_store(MenuOptions {
            store: Some(external),
            orientation: Some(Orientation::Horizontal),
            ..MenuOptions::default()
        })
        .unwrap();
        assert_eq!(menu.orientation(), Orientation::Horizontal);

        let external = create_store(state! { "orientation" => "horizontal" }, &[]);
        let err = create_menu_store(MenuOptions {
            store: Some(external),
            orientation: Some(Orientation::Vertical),
            ..MenuOptions::default()
        })
        .unwrap_err();
        assert!(matches!(err, StoreError::ConflictingProps { keys } if keys == ["orientation"]));
    }
}
