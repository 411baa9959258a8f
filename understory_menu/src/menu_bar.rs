// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The menu bar container store.

use alloc::rc::{Rc, Weak};
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use understory_composite::{
    CompositeOptions, CompositeStore, FOCUS_LOOP, Navigation, ORIENTATION, Orientation,
    create_composite_store,
};
use understory_store::{State, Store, defaulted, defined};

/// Configuration for [`create_menu_bar_store`].
#[derive(Debug, Default)]
pub struct MenuBarOptions {
    /// Store to bind into. Shared keys become shared slots.
    pub store: Option<Store>,
    /// Explicit item order (the bar's top-level menu buttons).
    pub items: Option<Vec<String>>,
    /// Explicit active item (`Some(None)` explicitly clears it).
    pub active_id: Option<Option<String>>,
    /// Active item to fall back to.
    pub default_active_id: Option<String>,
    /// Explicit orientation. Falls back to [`Orientation::Horizontal`].
    pub orientation: Option<Orientation>,
    /// Explicit wrap policy. Falls back to `true`: arrowing past the last
    /// top-level item wraps to the first.
    pub focus_loop: Option<bool>,
}

pub(crate) struct MenuBarInner {
    composite: CompositeStore,
}

/// Container store for a row of top-level menus.
///
/// A menu bar is a composite of menu buttons: horizontal by default, wrapping
/// at the ends. Menus rendered inside it hold a weak back-reference, and a
/// top-level item of a bar opens instantly on hover (see the menu factory's
/// dwell defaults).
#[derive(Clone)]
pub struct MenuBarStore {
    pub(crate) inner: Rc<MenuBarInner>,
}

/// A weak, non-owning handle to a [`MenuBarStore`].
#[derive(Clone, Default)]
pub struct WeakMenuBarStore {
    inner: Weak<MenuBarInner>,
}

impl WeakMenuBarStore {
    /// Upgrade back to a strong handle if the bar is still alive.
    pub fn upgrade(&self) -> Option<MenuBarStore> {
        self.inner.upgrade().map(|inner| MenuBarStore { inner })
    }
}

impl fmt::Debug for WeakMenuBarStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakMenuBarStore").finish_non_exhaustive()
    }
}

impl fmt::Debug for MenuBarStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MenuBarStore")
            .field("state", &self.get_state())
            .finish_non_exhaustive()
    }
}

/// Build a menu bar store.
pub fn create_menu_bar_store(options: MenuBarOptions) -> MenuBarStore {
    let sync_state = options
        .store
        .as_ref()
        .map(Store::get_state)
        .unwrap_or_default();
    let composite = create_composite_store(CompositeOptions {
        store: options.store,
        items: options.items,
        active_id: options.active_id,
        default_active_id: options.default_active_id,
        orientation: Some(defaulted(
            options.orientation,
            defined(sync_state.get(ORIENTATION).cloned())
                .as_ref()
                .and_then(Orientation::from_value),
            Orientation::Horizontal,
        )),
        focus_loop: Some(defaulted(
            options.focus_loop,
            defined(sync_state.get(FOCUS_LOOP).cloned()).and_then(|v| v.as_bool()),
            true,
        )),
    });
    MenuBarStore {
        inner: Rc::new(MenuBarInner { composite }),
    }
}

impl MenuBarStore {
    /// The underlying store (for subscriptions or merging).
    pub fn store(&self) -> &Store {
        self.inner.composite.store()
    }

    /// The composite surface backing the bar.
    pub fn composite(&self) -> &CompositeStore {
        &self.inner.composite
    }

    /// Snapshot of the bar's state.
    pub fn get_state(&self) -> State {
        self.inner.composite.get_state()
    }

    /// A weak handle for back-references from menus.
    pub fn downgrade(&self) -> WeakMenuBarStore {
        WeakMenuBarStore {
            inner: Rc::downgrade(&self.inner),
        }
    }

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

    /// Set the orientation. Menus nested under the bar recompute their
    /// placement when their direct parent's orientation changes.
    pub fn set_orientation(&self, orientation: Orientation) {
        self.inner.composite.set_orientation(orientation);
    }

    /// Set the active item directly.
    pub fn set_active_id(&self, id: Option<&str>) {
        self.inner.composite.set_active_id(id);
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

    /// Resolve a navigation intent against the bar's orientation.
    pub fn navigate(&self, navigation: Navigation) -> Option<String> {
        self.inner.composite.navigate(navigation)
    }

    /// Append an item id if not already present.
    pub fn register_item(&self, id: &str) {
        self.inner.composite.register_item(id);
    }

    /// Remove an item id from the order.
    pub fn unregister_item(&self, id: &str) {
        self.inner.composite.unregister_item(id);
    }
}
