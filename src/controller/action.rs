use serde::{Deserialize, Serialize};
use std::fmt;

/// Logical UI action produced by the dispatcher.
///
/// The set is closed: four directions, confirm (`A`), cancel (`B`) and the two
/// shoulder buttons. Ordering follows declaration order and is used to keep
/// per-tick fire order deterministic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Up,
    Down,
    Left,
    Right,
    A,
    B,
    Lb,
    Rb,
}

impl Action {
    pub const ALL: [Action; 8] = [
        Action::Up,
        Action::Down,
        Action::Left,
        Action::Right,
        Action::A,
        Action::B,
        Action::Lb,
        Action::Rb,
    ];

    /// Directions can also be driven by the analog stick
    pub fn is_direction(self) -> bool {
        matches!(self, Action::Up | Action::Down | Action::Left | Action::Right)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Up => write!(f, "up"),
            Action::Down => write!(f, "down"),
            Action::Left => write!(f, "left"),
            Action::Right => write!(f, "right"),
            Action::A => write!(f, "a"),
            Action::B => write!(f, "b"),
            Action::Lb => write!(f, "lb"),
            Action::Rb => write!(f, "rb"),
        }
    }
}
