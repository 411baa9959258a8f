// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for hovercard state: placements and surface-owned element slots.

use understory_store::Value;

/// Where a floating surface attaches relative to its anchor.
///
/// Stored in state in its canonical kebab-case string form (for example
/// `"bottom-start"`).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Placement {
    /// Centered above the anchor.
    Top,
    /// Above, aligned to the start edge.
    TopStart,
    /// Above, aligned to the end edge.
    TopEnd,
    /// Centered to the right of the anchor.
    Right,
    /// To the right, aligned to the start edge.
    RightStart,
    /// To the right, aligned to the end edge.
    RightEnd,
    /// Centered below the anchor.
    Bottom,
    /// Below, aligned to the start edge.
    BottomStart,
    /// Below, aligned to the end edge.
    BottomEnd,
    /// Centered to the left of the anchor.
    Left,
    /// To the left, aligned to the start edge.
    LeftStart,
    /// To the left, aligned to the end edge.
    LeftEnd,
}

impl Placement {
    /// Canonical string form used in state.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::TopStart => "top-start",
            Self::TopEnd => "top-end",
            Self::Right => "right",
            Self::RightStart => "right-start",
            Self::RightEnd => "right-end",
            Self::Bottom => "bottom",
            Self::BottomStart => "bottom-start",
            Self::BottomEnd => "bottom-end",
            Self::Left => "left",
            Self::LeftStart => "left-start",
            Self::LeftEnd => "left-end",
        }
    }

    /// Parse the canonical string form.
    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "top" => Some(Self::Top),
            "top-start" => Some(Self::TopStart),
            "top-end" => Some(Self::TopEnd),
            "right" => Some(Self::Right),
            "right-start" => Some(Self::RightStart),
            "right-end" => Some(Self::RightEnd),
            "bottom" => Some(Self::Bottom),
            "bottom-start" => Some(Self::BottomStart),
            "bottom-end" => Some(Self::BottomEnd),
            "left" => Some(Self::Left),
            "left-start" => Some(Self::LeftStart),
            "left-end" => Some(Self::LeftEnd),
            _ => None,
        }
    }

    /// Read a placement out of a state value.
    pub fn from_value(value: &Value) -> Option<Self> {
        value.as_str().and_then(Self::from_str)
    }
}

impl From<Placement> for Value {
    fn from(placement: Placement) -> Self {
        Self::from(placement.as_str())
    }
}

/// Positioning element slots a floating surface must own for itself.
///
/// When a surface inherits a sibling's state (for example a menu sharing a
/// combobox's state), these slots are excluded from the merge: two surfaces
/// can share logical state but never positioning elements.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ElementSlot {
    /// The element the surface is positioned against.
    Anchor,
    /// The floating surface element itself.
    Popover,
    /// The arrow/caret element.
    Arrow,
    /// The content element inside the surface.
    Content,
    /// The element that toggled the surface.
    Disclosure,
}

impl ElementSlot {
    /// State key for this slot.
    pub fn key(self) -> &'static str {
        match self {
            Self::Anchor => "anchor_element",
            Self::Popover => "popover_element",
            Self::Arrow => "arrow_element",
            Self::Content => "content_element",
            Self::Disclosure => "disclosure_element",
        }
    }

    /// All slots, in state-key order.
    pub fn all() -> [Self; 5] {
        [
            Self::Anchor,
            Self::Popover,
            Self::Arrow,
            Self::Content,
            Self::Disclosure,
        ]
    }
}

/// State keys of every surface-owned element slot, for use with `omit` when
/// inheriting a sibling store.
pub const ELEMENT_KEYS: [&str; 5] = [
    "anchor_element",
    "popover_element",
    "arrow_element",
    "content_element",
    "disclosure_element",
];
