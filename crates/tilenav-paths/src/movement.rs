use std::fmt;
use std::str::FromStr;

use crate::error::PathError;

/// One of the nine tile-to-tile moves, including standing still.
///
/// Deltas use y growing up: [`Up`](Self::Up) is `(0, 1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MovementTile {
    Up,
    Down,
    Left,
    Right,
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
    #[default]
    None,
}

impl MovementTile {
    /// Every movement, in declaration order.
    pub const ALL: [MovementTile; 9] = [
        Self::Up,
        Self::Down,
        Self::Left,
        Self::Right,
        Self::UpLeft,
        Self::UpRight,
        Self::DownLeft,
        Self::DownRight,
        Self::None,
    ];

    /// The eight moves that change tile.
    pub const DIRECTIONS: [MovementTile; 8] = [
        Self::Up,
        Self::Down,
        Self::Left,
        Self::Right,
        Self::UpLeft,
        Self::UpRight,
        Self::DownLeft,
        Self::DownRight,
    ];

    /// The `(dx, dy)` tile delta of the move.
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, 1),
            Self::Down => (0, -1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
            Self::UpLeft => (-1, 1),
            Self::UpRight => (1, 1),
            Self::DownLeft => (-1, -1),
            Self::DownRight => (1, -1),
            Self::None => (0, 0),
        }
    }

    /// Movement for a delta pair. Components are reduced to their sign, so
    /// any delta maps to a movement.
    pub fn from_delta(dx: i32, dy: i32) -> Self {
        match (dx.signum(), dy.signum()) {
            (0, 1) => Self::Up,
            (0, -1) => Self::Down,
            (-1, 0) => Self::Left,
            (1, 0) => Self::Right,
            (-1, 1) => Self::UpLeft,
            (1, 1) => Self::UpRight,
            (-1, -1) => Self::DownLeft,
            (1, -1) => Self::DownRight,
            _ => Self::None,
        }
    }

    /// Whether both axes change.
    pub const fn is_diagonal(self) -> bool {
        matches!(
            self,
            Self::UpLeft | Self::UpRight | Self::DownLeft | Self::DownRight
        )
    }

    /// Configuration name of the movement.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Up => "UP",
            Self::Down => "DOWN",
            Self::Left => "LEFT",
            Self::Right => "RIGHT",
            Self::UpLeft => "UP_LEFT",
            Self::UpRight => "UP_RIGHT",
            Self::DownLeft => "DOWN_LEFT",
            Self::DownRight => "DOWN_RIGHT",
            Self::None => "NONE",
        }
    }
}

impl fmt::Display for MovementTile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MovementTile {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.name() == s)
            .ok_or_else(|| PathError::UnknownMovement(s.to_string()))
    }
}
