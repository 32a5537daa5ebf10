use std::collections::{BTreeMap, HashSet};
use std::num::NonZero;
use std::ops::IndexMut;

use ndarray::Array2;
use unordered_pair::UnorderedPair;

use crate::ball::BallId;
use crate::board::Board;
use crate::cell::BoardCell;
use crate::direction::Direction;
use crate::graph::MoveGraph;
use crate::location::{Dimension, Location};

/// Reasons a builder may become invalid while building.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum BuilderInvalidReason {
    /// A ball, hole, or wall was placed outside the bounds specified by `size` on a builder.
    FeatureOutOfBounds,
    /// A wall was requested between two cells which are not adjacent.
    WallNotBetweenNeighbors,
    /// Two features (balls and/or holes) were placed in the same cell.
    FeatureOverlap,
    /// The number of balls does not match the number of holes, or there are none of either.
    UnpairedBallsAndHoles,
}

/// A builder for square tilt-maze boards.
///
/// Add balls and holes in matching order; the `n`th ball added must fall into the `n`th hole
/// added. Builders mutate themselves while building but can be [`Clone`]d to save their state at
/// some point.
#[derive(Clone)]
pub struct BoardBuilder {
    size: Dimension,
    balls: Vec<Location>,
    holes: Vec<Location>,
    walls: HashSet<UnorderedPair<Location>>,
    invalid_reasons: Vec<BuilderInvalidReason>,
}

impl Default for BoardBuilder {
    fn default() -> Self {
        Self::with_size(NonZero::new(4).unwrap())
    }
}

impl BoardBuilder {
    /// Construct a new builder for a `size` by `size` board with no features.
    pub fn with_size(size: Dimension) -> Self {
        Self {
            size,
            balls: Default::default(),
            holes: Default::default(),
            walls: Default::default(),
            invalid_reasons: Default::default(),
        }
    }

    fn in_bounds(&self, location: Location) -> bool {
        (1..=self.size.get()).contains(&location.0) && (1..=self.size.get()).contains(&location.1)
    }

    /// Add a ball, paired with the hole added at the same position in the call order.
    ///
    /// May cause the builder to enter a [`FeatureOutOfBounds`](BuilderInvalidReason::FeatureOutOfBounds) invalid state if `location` is out of bounds.
    /// If the builder is already in an invalid state, this function does nothing.
    pub fn add_ball(&mut self, location: Location) -> &mut Self {
        if !self.invalid_reasons.is_empty() {
            return self;
        }

        if !self.in_bounds(location) {
            self.invalid_reasons.push(BuilderInvalidReason::FeatureOutOfBounds);
            return self;
        }

        self.balls.push(location);
        self
    }

    /// Add a hole, paired with the ball added at the same position in the call order.
    ///
    /// May cause the builder to enter a [`FeatureOutOfBounds`](BuilderInvalidReason::FeatureOutOfBounds) invalid state if `location` is out of bounds.
    /// If the builder is already in an invalid state, this function does nothing.
    pub fn add_hole(&mut self, location: Location) -> &mut Self {
        if !self.invalid_reasons.is_empty() {
            return self;
        }

        if !self.in_bounds(location) {
            self.invalid_reasons.push(BuilderInvalidReason::FeatureOutOfBounds);
            return self;
        }

        self.holes.push(location);
        self
    }

    /// Place a wall between the two `locations`. The order in which they are specified does not
    /// matter. The border of the board is always walled and need not be added.
    ///
    /// May cause the builder to enter a [`FeatureOutOfBounds`](BuilderInvalidReason::FeatureOutOfBounds)
    /// or [`WallNotBetweenNeighbors`](BuilderInvalidReason::WallNotBetweenNeighbors) invalid state.
    /// If the builder is already in an invalid state, this function does nothing.
    pub fn add_wall(&mut self, locations: UnorderedPair<Location>) -> &mut Self {
        if !self.invalid_reasons.is_empty() {
            return self;
        }

        for location in [locations.0, locations.1] {
            if !self.in_bounds(location) {
                self.invalid_reasons.push(BuilderInvalidReason::FeatureOutOfBounds);
                return self;
            }
        }

        if Direction::direction_to(locations.0, locations.1).is_none() {
            self.invalid_reasons.push(BuilderInvalidReason::WallNotBetweenNeighbors);
            return self;
        }

        self.walls.insert(locations);
        self
    }

    /// Check the validity of this builder, ensuring no [`BuilderInvalidReason`] condition has arisen.
    ///
    /// Returns `None` if the builder is valid, `Some(&Vec<BuilderInvalidReason>)` otherwise.
    pub fn is_valid(&self) -> Option<&Vec<BuilderInvalidReason>> {
        match self.invalid_reasons.is_empty() {
            true => None,
            false => Some(&self.invalid_reasons),
        }
    }

    /// Convert the state of this builder into a [`Board`].
    /// If the builder is invalid for any reason, a reference to a [`Vec`] of [`BuilderInvalidReason`] will indicate why.
    pub fn build(&mut self) -> Result<Board, &Vec<BuilderInvalidReason>> {
        if self.invalid_reasons.is_empty() {
            if self.balls.is_empty() || self.balls.len() != self.holes.len() {
                self.invalid_reasons.push(BuilderInvalidReason::UnpairedBallsAndHoles);
            }

            let mut taken = HashSet::with_capacity(self.balls.len() + self.holes.len());
            if !self.balls.iter().chain(self.holes.iter()).all(|location| taken.insert(*location)) {
                self.invalid_reasons.push(BuilderInvalidReason::FeatureOverlap);
            }
        }

        if !self.invalid_reasons.is_empty() {
            return Err(&self.invalid_reasons);
        }

        let side = self.size.get();
        let mut cells: Array2<BoardCell> =
            Array2::from_shape_simple_fn((side, side), BoardCell::default);

        for along in 1..=side {
            cells.index_mut(Location(along, 1).as_index()).add_wall(Direction::North);
            cells.index_mut(Location(along, side).as_index()).add_wall(Direction::South);
            cells.index_mut(Location(1, along).as_index()).add_wall(Direction::West);
            cells.index_mut(Location(side, along).as_index()).add_wall(Direction::East);
        }

        for pair in &self.walls {
            // adjacency was checked at insertion
            let side_hit = Direction::direction_to(pair.0, pair.1).unwrap();
            cells.index_mut(pair.0.as_index()).add_wall(side_hit);
            cells.index_mut(pair.1.as_index()).add_wall(side_hit.invert());
        }

        let mut holes: BTreeMap<BallId, Location> = BTreeMap::new();
        for (index, location) in self.holes.iter().enumerate() {
            // ball and hole identities start at 1
            let id = index + 1;
            cells.index_mut(location.as_index()).add_hole(id);
            holes.insert(id, *location);
        }

        let balls: BTreeMap<BallId, Location> = self
            .balls
            .iter()
            .enumerate()
            .map(|(index, location)| (index + 1, *location))
            .collect();

        let move_graph = MoveGraph::build(&cells);

        Ok(Board { cells, size: self.size, balls, holes, move_graph })
    }
}
