#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The edge tiles are pushed toward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Direction {
    Up = 0,
    Down = 1,
    Right = 2,
    Left = 3,
}

impl Direction {
    pub const ALL: [Self; 4] = [Self::Up, Self::Down, Self::Right, Self::Left];

    pub fn iter() -> impl Iterator<Item = Self> + Clone {
        Self::ALL.into_iter()
    }

    /// Whether this direction walks along rows (as opposed to columns).
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }

    /// Whether index 0 of an extracted line sits at the far end of the row or
    /// column.
    pub const fn is_reversed(self) -> bool {
        matches!(self, Self::Down | Self::Right)
    }
}
