// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for composite state: orientation and navigation intents.

use understory_store::Value;

/// Layout direction of a composite widget's items.
///
/// Stored in state in its canonical string form (`"horizontal"`,
/// `"vertical"`, `"both"`). Orientation gates which directional
/// [`Navigation`] intents move the active item, and parent stores consult it
/// to place child surfaces.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// Items flow left to right; horizontal intents navigate.
    Horizontal,
    /// Items flow top to bottom; vertical intents navigate.
    Vertical,
    /// Items form a plane; all directional intents navigate.
    Both,
}

impl Orientation {
    /// Canonical string form used in state.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Horizontal => "horizontal",
            Self::Vertical => "vertical",
            Self::Both => "both",
        }
    }

    /// Parse the canonical string form.
    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "horizontal" => Some(Self::Horizontal),
            "vertical" => Some(Self::Vertical),
            "both" => Some(Self::Both),
            _ => None,
        }
    }

    /// Read an orientation out of a state value.
    pub fn from_value(value: &Value) -> Option<Self> {
        value.as_str().and_then(Self::from_str)
    }

    /// Whether vertical intents (`Up`/`Down`) navigate this orientation.
    pub fn follows_vertical(self) -> bool {
        matches!(self, Self::Vertical | Self::Both)
    }

    /// Whether horizontal intents (`Left`/`Right`) navigate this orientation.
    pub fn follows_horizontal(self) -> bool {
        matches!(self, Self::Horizontal | Self::Both)
    }
}

impl From<Orientation> for Value {
    fn from(orientation: Orientation) -> Self {
        Self::from(orientation.as_str())
    }
}

/// Direction of active-item navigation.
///
/// `Next`/`Prev` always traverse the item order (Tab-style movement);
/// directional intents are interpreted against the widget's [`Orientation`]
/// and yield nothing when the orientation does not follow them, so a host
/// can let the intent fall through (for example, `Right` on a vertical
/// menu opening a submenu instead of moving).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Navigation {
    /// The next item in order.
    Next,
    /// The previous item in order.
    Prev,
    /// The first item.
    First,
    /// The last item.
    Last,
    /// The item above.
    Up,
    /// The item below.
    Down,
    /// The item to the left.
    Left,
    /// The item to the right.
    Right,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orientation_round_trips_through_state_form() {
        for orientation in [Orientation::Horizontal, Orientation::Vertical, Orientation::Both] {
            assert_eq!(Orientation::from_str(orientation.as_str()), Some(orientation));
            assert_eq!(
                Orientation::from_value(&Value::from(orientation)),
                Some(orientation)
            );
        }
        assert_eq!(Orientation::from_str("diagonal"), None);
    }

    #[test]
    fn both_follows_every_axis() {
        assert!(Orientation::Both.follows_vertical());
        assert!(Orientation::Both.follows_horizontal());
        assert!(Orientation::Vertical.follows_vertical());
        assert!(!Orientation::Vertical.follows_horizontal());
        assert!(!Orientation::Horizontal.follows_vertical());
        assert!(Orientation::Horizontal.follows_horizontal());
    }
}
