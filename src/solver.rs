use std::collections::{BTreeMap, BTreeSet};
use std::mem;

use itertools::Itertools;
use ndarray::Array2;
use strum::VariantArray;

use crate::ball::BallId;
use crate::cell::BoardCell;
use crate::direction::Direction;
use crate::graph::MoveGraph;
use crate::location::Location;
use crate::movement::Movement;

/// A candidate history of the board: the root state followed by one [`Movement`] per tilt.
pub(crate) type Chain = Vec<Movement>;

/// One way a rolling ball may come to a halt during a tilt.
struct Stop {
    movement: Movement,
    at: Location,
    delivered: bool,
}

/// A chain being rebuilt around one more ball, and where that ball currently sits (`None` once it
/// has fallen into its hole).
struct Partial {
    chain: Chain,
    at: Option<Location>,
}

/// Search for the shortest tilt sequences delivering every ball into its matching hole.
///
/// Balls are handled one at a time in identity order. The first ball's candidate chains are
/// enumerated outright; each later ball is threaded through every surviving chain's exact tilt
/// sequence, branching over its legal stopping points, and the chain is extended if the ball has
/// not fallen by the end. Preconditions recorded along the way (a blocker that must be present, a
/// hole that must already be closed) are settled as later balls take their places; chains with
/// unsettled preconditions are discarded, and the survivors are replayed move for move with all
/// balls at once before being accepted.
pub(crate) struct PathSolver<'a> {
    cells: &'a Array2<BoardCell>,
    graph: &'a MoveGraph,
    balls: &'a BTreeMap<BallId, Location>,
    holes: &'a BTreeMap<BallId, Location>,
    depth_limit: usize,
    // balls not yet threaded into the frontier, and where their holes sit; preconditions no
    // remaining ball could ever satisfy are pruned as soon as they appear
    remaining: usize,
    later_holes: BTreeSet<Location>,
}

impl<'a> PathSolver<'a> {
    pub(crate) fn new(
        cells: &'a Array2<BoardCell>,
        graph: &'a MoveGraph,
        balls: &'a BTreeMap<BallId, Location>,
        holes: &'a BTreeMap<BallId, Location>,
        depth_limit: usize,
    ) -> Self {
        Self {
            cells,
            graph,
            balls,
            holes,
            depth_limit,
            remaining: 0,
            later_holes: BTreeSet::new(),
        }
    }

    pub(crate) fn solve(mut self) -> Vec<Vec<Direction>> {
        let ids = self.balls.keys().copied().collect_vec();
        let mut frontier: Vec<Chain> = Vec::new();

        for (index, ball) in ids.iter().copied().enumerate() {
            self.remaining = ids.len() - index - 1;
            self.later_holes = ids[index + 1..]
                .iter()
                .map(|id| *self.holes.get(id).unwrap())
                .collect();

            frontier = match index {
                0 => {
                    let mut root = Movement::initial(self.holes);
                    let start = *self.balls.get(&ball).unwrap();
                    root.record_ball(ball, start);
                    root.visit(ball, start);
                    self.expand_until_delivered(vec![vec![root]], ball)
                }
                _ => {
                    let previous = mem::take(&mut frontier);
                    previous
                        .iter()
                        .flat_map(|chain| self.thread_ball(chain, ball))
                        .collect_vec()
                }
            };

            if frontier.is_empty() {
                return Vec::new();
            }
        }

        let sequences = frontier
            .into_iter()
            .filter(|chain| chain.iter().all(Movement::is_good))
            .map(|chain| {
                chain[1..]
                    .iter()
                    .map(|movement| movement.to().unwrap())
                    .collect_vec()
            })
            .filter(|sequence| self.replay(sequence))
            .collect_vec();

        sequences
            .into_iter()
            .min_set_by_key(|sequence| sequence.len())
            .into_iter()
            .unique()
            .collect_vec()
    }

    /// True iff some not-yet-threaded ball could still satisfy every pending requirement: each
    /// required cell needs a remaining ball of its own, and only a remaining ball's own hole can
    /// still be closed.
    fn satisfiable(&self, movement: &Movement) -> bool {
        movement.pending_ball_count() <= self.remaining
            && movement
                .pending_closed_holes()
                .iter()
                .all(|cell| self.later_holes.contains(cell))
    }

    /// Every halting point for `ball` rolling from `from` towards `to`, nearest first: its own
    /// hole if the roll reaches it, the resting cell against the wall, and each cell short of
    /// those, legal only if something else ends this tilt in the very next cell. Holes crossed on
    /// the way must close under an earlier tilt or, within this one, under a ball threaded later.
    fn stops_toward(
        &self,
        base: &Movement,
        ball: BallId,
        from: Location,
        to: Direction,
    ) -> Vec<Stop> {
        let rest = self.graph.resting_cell(from, to);
        let mut stops = Vec::new();
        if rest == from {
            return stops;
        }

        let holes_on_way = self.graph.holes_on_way(from, to);
        let mut crossed: Vec<Location> = Vec::new();
        let mut current = from;
        loop {
            current = to.attempt_from(current);
            let open_hole = holes_on_way
                .contains(&current)
                .then(|| base.open_holes().get(&current).copied())
                .flatten();

            if open_hole == Some(ball) {
                let mut movement = base.clone();
                for hole in &crossed {
                    movement.require_closed_hole(*hole);
                }
                if movement.set_ball_position(ball, current, from) && self.satisfiable(&movement) {
                    stops.push(Stop { movement, at: current, delivered: true });
                }
                break;
            }

            let at_rest = current == rest;
            let mut movement = base.clone();
            for hole in &crossed {
                movement.require_closed_hole(*hole);
            }
            if open_hole.is_some() {
                movement.require_closed_hole(current);
            }
            if !at_rest {
                movement.require_ball_at(to.attempt_from(current));
            }
            if movement.set_ball_position(ball, current, from) && self.satisfiable(&movement) {
                stops.push(Stop { movement, at: current, delivered: false });
            }

            if at_rest {
                break;
            }
            if open_hole.is_some() {
                crossed.push(current);
            }
        }

        stops
    }

    /// Breadth-first expansion of `seeds` until every surviving chain has dropped `ball` into its
    /// hole. Chains revisiting a stop cell for this ball, or growing past the depth limit, die.
    fn expand_until_delivered(&self, seeds: Vec<Chain>, ball: BallId) -> Vec<Chain> {
        let mut complete = Vec::new();
        let mut active = seeds;

        while !active.is_empty() {
            let mut next_active = Vec::new();

            for mut chain in active {
                if chain.len() > self.depth_limit {
                    continue;
                }

                let from = match chain.last().unwrap().ball_position(ball) {
                    None => {
                        complete.push(chain);
                        continue;
                    }
                    Some(location) => location,
                };

                for direction in Direction::VARIANTS {
                    if self.graph.is_self_loop(from, *direction) {
                        chain.last_mut().unwrap().add_loop(*direction);
                        continue;
                    }

                    let base = chain.last().unwrap().follow(*direction);
                    for stop in self.stops_toward(&base, ball, from, *direction) {
                        let Stop { mut movement, at, delivered } = stop;
                        if !delivered && !movement.visit(ball, at) {
                            continue;
                        }

                        let mut grown = chain.clone();
                        grown.push(movement);
                        match delivered {
                            true => complete.push(grown),
                            false => next_active.push(grown),
                        }
                    }
                }
            }

            active = next_active;
        }

        complete
    }

    /// Rebuild `chain` with `ball` also in play, replaying the same tilts and branching over the
    /// ball's stopping choices at each one. Rebuilt movements re-settle their queued
    /// requirements, so a precondition of an earlier ball may be discharged here. If the ball is
    /// still rolling around when the original tilts run out, the chain grows new tilts until it
    /// is delivered.
    fn thread_ball(&self, chain: &Chain, ball: BallId) -> Vec<Chain> {
        let start = *self.balls.get(&ball).unwrap();
        let target = *self.holes.get(&ball).unwrap();

        let mut root = chain.first().unwrap().clone();
        if !root.record_ball(ball, start) {
            return Vec::new();
        }
        root.visit(ball, start);

        let mut partials = vec![Partial { chain: vec![root], at: Some(start) }];
        for step in &chain[1..] {
            let to = step.to().unwrap();
            let mut advanced = Vec::new();

            for partial in partials {
                let mut next = step.clone();
                next.adopt_visits(ball, partial.chain.last().unwrap());

                match partial.at {
                    None => {
                        next.mark_hole_closed(target);
                        next.settle_requirements();
                        if self.satisfiable(&next) {
                            let mut grown = partial.chain;
                            grown.push(next);
                            advanced.push(Partial { chain: grown, at: None });
                        }
                    }
                    Some(from) if self.graph.is_self_loop(from, to) => {
                        next.add_loop(to);
                        if !next.record_ball(ball, from) {
                            continue;
                        }
                        next.settle_requirements();
                        if self.satisfiable(&next) {
                            let mut grown = partial.chain;
                            grown.push(next);
                            advanced.push(Partial { chain: grown, at: Some(from) });
                        }
                    }
                    Some(from) => {
                        for stop in self.stops_toward(&next, ball, from, to) {
                            let Stop { mut movement, at, delivered } = stop;
                            if !delivered && !movement.visit(ball, at) {
                                continue;
                            }
                            movement.settle_requirements();
                            if self.satisfiable(&movement) {
                                let mut grown = partial.chain.clone();
                                grown.push(movement);
                                advanced.push(Partial {
                                    chain: grown,
                                    at: (!delivered).then_some(at),
                                });
                            }
                        }
                    }
                }
            }

            partials = advanced;
            if partials.is_empty() {
                return Vec::new();
            }
        }

        let (done, unfinished): (Vec<_>, Vec<_>) =
            partials.into_iter().partition(|partial| partial.at.is_none());

        let mut chains = done.into_iter().map(|partial| partial.chain).collect_vec();
        chains.extend(self.expand_until_delivered(
            unfinished.into_iter().map(|partial| partial.chain).collect_vec(),
            ball,
        ));
        chains
    }

    /// Replay `sequence` with every ball on the board at once, as the physical table would. Per
    /// tilt, balls slide in order of nearness to the tilted edge; a ball reaching a foreign open
    /// hole falls in and sinks the whole sequence. True iff every ball ends up delivered.
    fn replay(&self, sequence: &[Direction]) -> bool {
        let mut occupied: BTreeMap<Location, BallId> =
            self.balls.iter().map(|(id, location)| (*location, *id)).collect();
        let mut open_holes: BTreeMap<Location, BallId> =
            self.holes.iter().map(|(id, location)| (*location, *id)).collect();

        for to in sequence {
            let order = occupied
                .iter()
                .map(|(location, ball)| (*location, *ball))
                .sorted_by_key(|(location, _)| match to {
                    Direction::North => (location.1 as isize, location.0 as isize),
                    Direction::South => (-(location.1 as isize), location.0 as isize),
                    Direction::West => (location.0 as isize, location.1 as isize),
                    Direction::East => (-(location.0 as isize), location.1 as isize),
                })
                .collect_vec();

            for (start, ball) in order {
                occupied.remove(&start);
                let mut current = start;
                let mut fell = false;
                loop {
                    if self.cells.get(current.as_index()).unwrap().has_wall(*to) {
                        break;
                    }
                    let next = to.attempt_from(current);
                    if occupied.contains_key(&next) {
                        break;
                    }
                    if let Some(owner) = open_holes.get(&next).copied() {
                        if owner != ball {
                            return false;
                        }
                        open_holes.remove(&next);
                        fell = true;
                        break;
                    }
                    current = next;
                }
                if !fell {
                    occupied.insert(current, ball);
                }
            }
        }

        occupied.is_empty() && open_holes.is_empty()
    }
}
