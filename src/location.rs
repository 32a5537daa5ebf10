use std::num::NonZero;

use ndarray::Ix;

type Coord = usize;
/// The side length of a board.
pub type Dimension = NonZero<Coord>;

#[derive(Clone, Eq, Hash, Copy, PartialEq, Ord, PartialOrd, Debug)]
/// A location `(x, y)` on a board. The top left corner is `Location(1, 1)`;
/// `x` grows to the east and `y` grows to the south.
pub struct Location(pub Coord, pub Coord);

impl Location {
    pub(crate) fn as_index(&self) -> (Ix, Ix) {
        (self.1.wrapping_sub(1), self.0.wrapping_sub(1))
    }
    pub(crate) fn offset_by(self, rhs: (isize, isize)) -> Self {
        Self(self.0.wrapping_add_signed(rhs.0), self.1.wrapping_add_signed(rhs.1))
    }
}

impl From<(Ix, Ix)> for Location {
    fn from(value: (Ix, Ix)) -> Self {
        Self(value.1 + 1, value.0 + 1)
    }
}
