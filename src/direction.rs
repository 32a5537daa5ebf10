use strum::VariantArray;

use crate::location::Location;

#[derive(Copy, Clone, VariantArray, Eq, PartialEq, Hash, Debug, Ord, PartialOrd)]
/// A direction the table may be tilted in, which is also the direction every ball then rolls.
pub enum Direction {
    /// Towards smaller `y`; the top of the rendered board.
    North,
    /// Towards smaller `x`; the left of the rendered board.
    West,
    /// Towards larger `y`; the bottom of the rendered board.
    South,
    /// Towards larger `x`; the right of the rendered board.
    East,
}

impl Direction {
    pub(crate) fn attempt_from(&self, location: Location) -> Location {
        match self {
            Self::North => location.offset_by((0, -1)),
            Self::West => location.offset_by((-1, 0)),
            Self::South => location.offset_by((0, 1)),
            Self::East => location.offset_by((1, 0)),
        }
    }

    pub(crate) fn invert(&self) -> Self {
        match self {
            Self::North => Self::South,
            Self::West => Self::East,
            Self::South => Self::North,
            Self::East => Self::West,
        }
    }

    pub(crate) fn direction_to(a: Location, b: Location) -> Option<Self> {
        Self::VARIANTS.iter().find(|dir| dir.attempt_from(a) == b).copied()
    }

    pub(crate) fn as_index(&self) -> usize {
        match self {
            Self::North => 0,
            Self::West => 1,
            Self::South => 2,
            Self::East => 3,
        }
    }
}
