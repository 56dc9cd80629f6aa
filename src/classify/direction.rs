// Direction - the closed output label set
//
// The full set covers the four cardinals, their diagonal pairs, the two
// opposed pairs, and center. Scorers trained on restricted label sets use
// the fixed subset tables below; table order is part of the contract with
// the scorer's class indices.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Movement direction derived from one stomp
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Center,
    Left,
    Right,
    Up,
    Down,
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
    UpDown,
    LeftRight,
}

/// Two-class table: pure lateral discrimination
pub const LABELS_LATERAL: [Direction; 2] = [Direction::Left, Direction::Right];

/// Five-class table: center plus the cardinals
pub const LABELS_CARDINAL: [Direction; 5] = [
    Direction::Center,
    Direction::Left,
    Direction::Right,
    Direction::Up,
    Direction::Down,
];

/// Full eleven-class table
pub const LABELS_FULL: [Direction; 11] = [
    Direction::Center,
    Direction::Left,
    Direction::Right,
    Direction::Up,
    Direction::Down,
    Direction::UpLeft,
    Direction::UpRight,
    Direction::DownLeft,
    Direction::DownRight,
    Direction::UpDown,
    Direction::LeftRight,
];

impl Direction {
    /// Canonical lowercase label, matching the serde representation
    pub fn as_label(&self) -> &'static str {
        match self {
            Direction::Center => "center",
            Direction::Left => "left",
            Direction::Right => "right",
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::UpLeft => "upleft",
            Direction::UpRight => "upright",
            Direction::DownLeft => "downleft",
            Direction::DownRight => "downright",
            Direction::UpDown => "updown",
            Direction::LeftRight => "leftright",
        }
    }

    /// Parse a label from an external source; None for unknown labels
    ///
    /// Unknown labels are a no-op at the actuator boundary, never an error.
    pub fn from_label(label: &str) -> Option<Self> {
        LABELS_FULL
            .iter()
            .copied()
            .find(|d| d.as_label() == label.to_ascii_lowercase())
    }

    /// The individual key presses this direction maps to
    pub fn keys(&self) -> &'static [&'static str] {
        match self {
            Direction::Center => &[],
            Direction::Left => &["left"],
            Direction::Right => &["right"],
            Direction::Up => &["up"],
            Direction::Down => &["down"],
            Direction::UpLeft => &["up", "left"],
            Direction::UpRight => &["up", "right"],
            Direction::DownLeft => &["down", "left"],
            Direction::DownRight => &["down", "right"],
            Direction::UpDown => &["up", "down"],
            Direction::LeftRight => &["left", "right"],
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_roundtrip_for_all_directions() {
        for direction in LABELS_FULL {
            assert_eq!(Direction::from_label(direction.as_label()), Some(direction));
        }
    }

    #[test]
    fn test_unknown_label_is_none() {
        assert_eq!(Direction::from_label("sideways"), None);
        assert_eq!(Direction::from_label(""), None);
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(Direction::from_label("UpLeft"), Some(Direction::UpLeft));
    }

    #[test]
    fn test_serde_uses_lowercase_labels() {
        let json = serde_json::to_string(&Direction::DownRight).unwrap();
        assert_eq!(json, "\"downright\"");
        let parsed: Direction = serde_json::from_str("\"updown\"").unwrap();
        assert_eq!(parsed, Direction::UpDown);
    }

    #[test]
    fn test_combined_directions_press_two_keys() {
        assert_eq!(Direction::UpLeft.keys(), &["up", "left"]);
        assert_eq!(Direction::Center.keys(), &[] as &[&str]);
        assert_eq!(Direction::Right.keys(), &["right"]);
    }
}
