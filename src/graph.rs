use ndarray::Array2;
use strum::VariantArray;

use crate::ball::BallId;
use crate::cell::BoardCell;
use crate::direction::Direction;
use crate::location::Location;

/// What a rolling ball meets when it tries to enter the next cell over.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum Collision {
    /// The ball keeps rolling.
    Pass,
    /// A wall; the ball comes to rest before it.
    Stop,
    /// The ball's own hole; it falls in.
    FallMatch,
    /// Another ball's hole; the ball falls in illegally.
    FallMismatch,
}

pub(crate) fn probe(cell: &BoardCell, to: Direction, ball: Option<BallId>) -> Collision {
    match cell.hole() {
        Some(owner) => match ball {
            Some(id) if id == owner => Collision::FallMatch,
            _ => Collision::FallMismatch,
        },
        None => match cell.has_wall(to) {
            true => Collision::Stop,
            false => Collision::Pass,
        },
    }
}

/// Roll from `start` towards `to` on an otherwise empty board, reporting where and why the roll
/// ends. A hole in the start cell itself is ignored; the ball is presumed to sit on its rim, so
/// only the wall on the probed side can hold it there.
pub(crate) fn roll(
    cells: &Array2<BoardCell>,
    start: Location,
    to: Direction,
    ball: Option<BallId>,
) -> (Collision, Location) {
    let mut current = start;
    loop {
        let here = cells.get(current.as_index()).unwrap();
        if here.has_wall(to) {
            return (Collision::Stop, current);
        }

        let next = to.attempt_from(current);
        let ahead = cells.get(next.as_index()).unwrap();
        match probe(ahead, to, ball) {
            Collision::Pass => current = next,
            collision => return (collision, next),
        }
    }
}

/// Precomputed rolls out of one cell: for each direction, the cell a lone ball would come to rest
/// in, and every hole it would pass over (or fall into) on the way there.
#[derive(Clone, Debug)]
pub(crate) struct GraphItem {
    rest: [Location; 4],
    holes: [Vec<Location>; 4],
}

impl Default for GraphItem {
    fn default() -> Self {
        Self {
            rest: [Location(0, 0); 4],
            holes: Default::default(),
        }
    }
}

impl GraphItem {
    fn for_cell(cells: &Array2<BoardCell>, from: Location) -> Self {
        let mut item = Self::default();

        for direction in Direction::VARIANTS {
            let mut holes = Vec::new();
            let mut start = from;
            let rest = loop {
                let (collision, at) = roll(cells, start, *direction, None);
                match collision {
                    Collision::Stop => break at,
                    // restart past the hole; a ball bound elsewhere may cross it once closed
                    _ => {
                        holes.push(at);
                        start = at;
                    }
                }
            };

            item.rest[direction.as_index()] = rest;
            item.holes[direction.as_index()] = holes;
        }

        item
    }
}

/// The move graph: for every cell and tilt direction, where a ball starting there ends up and
/// which holes lie on the way. Built once per board; path search reads it instead of re-rolling.
#[derive(Clone, Debug)]
pub(crate) struct MoveGraph {
    items: Array2<GraphItem>,
}

impl MoveGraph {
    pub(crate) fn build(cells: &Array2<BoardCell>) -> Self {
        Self {
            items: Array2::from_shape_fn(cells.raw_dim(), |ind| {
                GraphItem::for_cell(cells, Location::from(ind))
            }),
        }
    }

    pub(crate) fn resting_cell(&self, from: Location, to: Direction) -> Location {
        self.items.get(from.as_index()).unwrap().rest[to.as_index()]
    }

    pub(crate) fn holes_on_way(&self, from: Location, to: Direction) -> &[Location] {
        &self.items.get(from.as_index()).unwrap().holes[to.as_index()]
    }

    /// True iff a ball at `from` cannot leave its cell when the table tilts towards `to`.
    pub(crate) fn is_self_loop(&self, from: Location, to: Direction) -> bool {
        self.resting_cell(from, to) == from
    }
}
