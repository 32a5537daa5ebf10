use crate::ball::BallId;
use crate::direction::Direction;

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct Walls {
    north: bool,
    west: bool,
    south: bool,
    east: bool,
}

/// One cell of the board: which of its four sides carry a wall, and whether a hole sits in it.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct BoardCell {
    walls: Walls,
    hole: Option<BallId>,
}

impl BoardCell {
    pub(crate) fn add_wall(&mut self, side: Direction) {
        match side {
            Direction::North => self.walls.north = true,
            Direction::West => self.walls.west = true,
            Direction::South => self.walls.south = true,
            Direction::East => self.walls.east = true,
        }
    }

    pub(crate) fn has_wall(&self, side: Direction) -> bool {
        match side {
            Direction::North => self.walls.north,
            Direction::West => self.walls.west,
            Direction::South => self.walls.south,
            Direction::East => self.walls.east,
        }
    }

    pub(crate) fn add_hole(&mut self, ball: BallId) {
        self.hole = Some(ball);
    }

    pub(crate) fn hole(&self) -> Option<BallId> {
        self.hole
    }
}
