#![warn(missing_docs)]

//! # `rollick`
//!
//! A solver for tilt-maze puzzles: a square board holds numbered balls, matching numbered holes,
//! and walls. Tilting the table rolls every ball at once until something stops it, and the puzzle
//! is won when each ball has fallen into its own hole.
//! Begin by building a board object using a [`BoardBuilder`](builder::BoardBuilder), then call
//! [`solve()`](crate::Board::solve) to obtain every shortest tilt sequence which wins, or an
//! empty set when no sequence does.
//!
//! # Internals
//! Rolling is precomputed once per board into a move graph: for every cell and tilt direction,
//! the cell a lone ball ends up resting in, and the holes it would cross on the way. The search
//! then never re-simulates rolls.
//!
//! Balls are searched one at a time. The first ball's candidate tilt chains are enumerated
//! breadth-first over the move graph; a ball may stop short of its resting cell only if something
//! else ends that tilt in the very next cell, so such stops are recorded as preconditions on the
//! movement rather than rejected outright. Each later ball is then threaded through every
//! surviving chain's exact tilt sequence, branching over its own legal stops, discharging
//! preconditions it satisfies and extending the chain if it has not reached its hole by the end.
//! Chains whose preconditions never settle are discarded, and every survivor is finally replayed
//! with all balls moving together, exactly as the physical table would, before it may be
//! reported. The shortest surviving sequences win; ties are all reported.

pub use board::Board;
pub use builder::BoardBuilder;
pub use direction::Direction;
pub use location::{Dimension, Location};

pub(crate) mod ball;
pub(crate) mod board;
mod tests;
pub(crate) mod cell;
pub(crate) mod direction;
pub(crate) mod graph;
pub(crate) mod location;
pub(crate) mod movement;
pub mod builder;
pub(crate) mod solver;
