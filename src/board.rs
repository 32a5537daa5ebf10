use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use ndarray::Array2;

use crate::ball::BallId;
use crate::cell::BoardCell;
use crate::direction::Direction;
use crate::graph::MoveGraph;
use crate::location::{Dimension, Location};
use crate::solver::PathSolver;

/// A square tilt-maze board: walled cells, balls, and the holes they must fall into.
///
/// [`Board`]s should be built using a [`BoardBuilder`](crate::builder::BoardBuilder).
pub struct Board {
    pub(crate) cells: Array2<BoardCell>,
    pub(crate) size: Dimension,
    pub(crate) balls: BTreeMap<BallId, Location>,
    pub(crate) holes: BTreeMap<BallId, Location>,
    pub(crate) move_graph: MoveGraph,
}

impl Board {
    /// The side length of this board.
    pub fn size(&self) -> Dimension {
        self.size
    }

    /// Find every shortest tilt sequence which drops all balls into their matching holes.
    ///
    /// Returns an empty [`Vec`] if the board is unsolvable. Search depth is capped at `size`
    /// squared tilts; use [`Self::solve_with_depth`] to pick a different cap.
    pub fn solve(&self) -> Vec<Vec<Direction>> {
        self.solve_with_depth(self.size.get() * self.size.get())
    }

    /// As [`Self::solve`], but give up on any candidate play longer than `depth_limit` tilts.
    ///
    /// The combinatorics of large boards are unbounded in the worst case; the cap is the only
    /// wall-clock control the search has.
    pub fn solve_with_depth(&self, depth_limit: usize) -> Vec<Vec<Direction>> {
        PathSolver::new(&self.cells, &self.move_graph, &self.balls, &self.holes, depth_limit)
            .solve()
    }

    pub(crate) fn ball_at(&self, location: Location) -> Option<BallId> {
        self.balls
            .iter()
            .find(|(_, at)| **at == location)
            .map(|(id, _)| *id)
    }
}

impl Display for Board {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let side = self.size.get();

        for y in 1..=side {
            for x in 1..=side {
                let cell = self.cells.get(Location(x, y).as_index()).unwrap();
                f.write_str("+")?;
                f.write_str(match cell.has_wall(Direction::North) {
                    true => "---",
                    false => "   ",
                })?;
            }
            f.write_str("+\n")?;

            for x in 1..=side {
                let location = Location(x, y);
                let cell = self.cells.get(location.as_index()).unwrap();
                f.write_str(match cell.has_wall(Direction::West) {
                    true => "|",
                    false => " ",
                })?;

                match (self.ball_at(location), cell.hole()) {
                    (Some(ball), _) => write!(f, " {} ", ball)?,
                    (None, Some(hole)) => write!(f, "({})", hole)?,
                    (None, None) => f.write_str("   ")?,
                }
            }
            f.write_str("|\n")?;
        }

        for _ in 1..=side {
            f.write_str("+---")?;
        }
        f.write_str("+\n")
    }
}
