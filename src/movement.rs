use std::collections::{BTreeMap, BTreeSet};

use crate::ball::BallId;
use crate::direction::Direction;
use crate::location::Location;

/// One tilt of the table and the board state after it: which cells hold balls, which holes are
/// still open, and what must have been true of the other balls for this exact outcome to happen.
///
/// Movements are immutable snapshots; exploring a candidate future clones rather than mutating
/// shared state. Preconditions (`require_ball_at`, `require_closed_hole`) are queued when they do
/// not hold yet and re-checked as later balls are threaded through the same tilt; a movement whose
/// preconditions never settle is discarded along with its whole chain.
#[derive(Clone, Debug)]
pub(crate) struct Movement {
    to: Option<Direction>,
    occupied: BTreeMap<Location, BallId>,
    open_holes: BTreeMap<Location, BallId>,
    required_balls: BTreeSet<Location>,
    required_closed_holes: BTreeSet<Location>,
    loops: [bool; 4],
    // per-ball cells already stopped in, carried along each chain to cut off orbits
    visited: BTreeMap<BallId, BTreeSet<Location>>,
}

impl Movement {
    /// The root state: no tilt yet, no balls in play, every hole open. Balls enter occupancy one
    /// at a time as the search threads them in.
    pub(crate) fn initial(holes: &BTreeMap<BallId, Location>) -> Self {
        Self {
            to: None,
            occupied: BTreeMap::new(),
            open_holes: holes.iter().map(|(id, location)| (*location, *id)).collect(),
            required_balls: BTreeSet::new(),
            required_closed_holes: BTreeSet::new(),
            loops: [false; 4],
            visited: BTreeMap::new(),
        }
    }

    /// The state after tilting towards `to`, before any ball has been re-placed. Occupancy and
    /// hole state carry over; requirements and loop flags start fresh.
    pub(crate) fn follow(&self, to: Direction) -> Self {
        Self {
            to: Some(to),
            occupied: self.occupied.clone(),
            open_holes: self.open_holes.clone(),
            required_balls: BTreeSet::new(),
            required_closed_holes: BTreeSet::new(),
            loops: [false; 4],
            visited: self.visited.clone(),
        }
    }

    pub(crate) fn to(&self) -> Option<Direction> {
        self.to
    }

    /// Move `ball` from `previous` to `current`, which may consume its hole. Fails if `current`
    /// is taken by another ball, or holds a foreign hole not already required closed.
    pub(crate) fn set_ball_position(
        &mut self,
        ball: BallId,
        current: Location,
        previous: Location,
    ) -> bool {
        self.occupied.remove(&previous);

        if self.occupied.contains_key(&current) {
            return false;
        }

        if let Some(owner) = self.open_holes.get(&current).copied() {
            if owner == ball {
                // delivered; the ball leaves play and the hole closes
                self.open_holes.remove(&current);
                self.required_balls.remove(&current);
                return true;
            }
            if !self.required_closed_holes.contains(&current) {
                return false;
            }
        }

        self.occupied.insert(current, ball);
        self.required_balls.remove(&current);
        true
    }

    /// Place `ball` at `at` without a prior cell, checking only for occupancy clashes. Used when
    /// a threaded ball first joins a chain or sits out a tilt against a wall.
    pub(crate) fn record_ball(&mut self, ball: BallId, at: Location) -> bool {
        match self.occupied.get(&at) {
            Some(other) if *other != ball => false,
            _ => {
                self.occupied.insert(at, ball);
                self.required_balls.remove(&at);
                true
            }
        }
    }

    /// For this movement to be legal, some ball must occupy `cell` once the tilt completes.
    /// Satisfied on the spot if one already does.
    pub(crate) fn require_ball_at(&mut self, cell: Location) {
        if !self.occupied.contains_key(&cell) {
            self.required_balls.insert(cell);
        }
    }

    /// For this movement's outcome to hold, the hole at `cell` must be closed. Satisfied on the
    /// spot if it already is.
    pub(crate) fn require_closed_hole(&mut self, cell: Location) {
        if self.open_holes.contains_key(&cell) {
            self.required_closed_holes.insert(cell);
        }
    }

    pub(crate) fn is_good(&self) -> bool {
        self.required_balls.is_empty() && self.required_closed_holes.is_empty()
    }

    /// Drop every queued requirement that later threading has since satisfied.
    pub(crate) fn settle_requirements(&mut self) {
        let occupied = &self.occupied;
        self.required_balls.retain(|cell| !occupied.contains_key(cell));
        let open_holes = &self.open_holes;
        self.required_closed_holes.retain(|cell| open_holes.contains_key(cell));
    }

    pub(crate) fn pending_ball_count(&self) -> usize {
        self.required_balls.len()
    }

    pub(crate) fn pending_closed_holes(&self) -> &BTreeSet<Location> {
        &self.required_closed_holes
    }

    pub(crate) fn add_loop(&mut self, to: Direction) {
        self.loops[to.as_index()] = true;
    }

    pub(crate) fn has_loop(&self, to: Direction) -> bool {
        self.loops[to.as_index()]
    }

    pub(crate) fn occupied(&self) -> &BTreeMap<Location, BallId> {
        &self.occupied
    }

    pub(crate) fn open_holes(&self) -> &BTreeMap<Location, BallId> {
        &self.open_holes
    }

    pub(crate) fn ball_position(&self, ball: BallId) -> Option<Location> {
        self.occupied
            .iter()
            .find(|(_, id)| **id == ball)
            .map(|(location, _)| *location)
    }

    /// A hole closed by a ball threaded through an earlier movement stays closed here.
    pub(crate) fn mark_hole_closed(&mut self, cell: Location) {
        self.open_holes.remove(&cell);
    }

    /// Mark `at` visited for `ball`, reporting whether it was new. A repeat visit means the ball
    /// is orbiting and the chain should not grow further in that direction.
    pub(crate) fn visit(&mut self, ball: BallId, at: Location) -> bool {
        self.visited.entry(ball).or_default().insert(at)
    }

    /// Replace `ball`'s visit record with the one accumulated along `from`'s chain.
    pub(crate) fn adopt_visits(&mut self, ball: BallId, from: &Movement) {
        if let Some(visited) = from.visited.get(&ball) {
            self.visited.insert(ball, visited.clone());
        }
    }
}
