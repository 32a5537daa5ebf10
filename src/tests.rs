#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::num::NonZero;

    use strum::VariantArray;
    use unordered_pair::UnorderedPair;

    use crate::builder::{BoardBuilder, BuilderInvalidReason};
    use crate::direction::Direction;
    use crate::graph::{roll, Collision};
    use crate::location::Location;
    use crate::movement::Movement;
    use crate::Board;

    fn crossing_board() -> Board {
        BoardBuilder::with_size(NonZero::new(4).unwrap())
            .add_ball(Location(2, 2))
            .add_hole(Location(1, 1))
            .add_ball(Location(1, 4))
            .add_hole(Location(4, 3))
            .add_wall(UnorderedPair::from((Location(1, 2), Location(1, 3))))
            .add_wall(UnorderedPair::from((Location(3, 2), Location(4, 2))))
            .build()
            .unwrap()
    }

    #[test]
    fn render_basic_board() {
        let board = BoardBuilder::with_size(NonZero::new(3).unwrap())
            .add_ball(Location(1, 1))
            .add_hole(Location(3, 3))
            .add_wall(UnorderedPair::from((Location(2, 2), Location(3, 2))))
            .build()
            .unwrap();

        assert_eq!(board.to_string(), "+---+---+---+
| 1         |
+   +   +   +
|       |   |
+   +   +   +
|        (1)|
+---+---+---+
")
    }

    #[test]
    fn resting_cells_back_onto_walls() {
        let board = crossing_board();
        let side = board.size().get();

        for x in 1..=side {
            for y in 1..=side {
                let from = Location(x, y);
                let here = board.cells.get(from.as_index()).unwrap();

                for direction in Direction::VARIANTS {
                    let rest = board.move_graph.resting_cell(from, *direction);
                    assert_eq!(
                        board.move_graph.is_self_loop(from, *direction),
                        here.has_wall(*direction),
                    );
                    assert!(board.cells.get(rest.as_index()).unwrap().has_wall(*direction));

                    // anything between the start and the resting cell which would have
                    // stopped the ball must be a listed hole
                    let holes_on_way = board.move_graph.holes_on_way(from, *direction);
                    for hole in holes_on_way {
                        assert!(board.cells.get(hole.as_index()).unwrap().hole().is_some());
                    }
                    let mut current = from;
                    while current != rest {
                        current = direction.attempt_from(current);
                        if current != rest && board.cells.get(current.as_index()).unwrap().has_wall(*direction) {
                            assert!(holes_on_way.contains(&current));
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn roll_outcomes() {
        let board = BoardBuilder::with_size(NonZero::new(3).unwrap())
            .add_ball(Location(1, 1))
            .add_hole(Location(3, 1))
            .add_ball(Location(1, 3))
            .add_hole(Location(3, 3))
            .build()
            .unwrap();

        assert_eq!(
            roll(&board.cells, Location(1, 1), Direction::East, Some(1)),
            (Collision::FallMatch, Location(3, 1)),
        );
        assert_eq!(
            roll(&board.cells, Location(1, 1), Direction::East, Some(2)),
            (Collision::FallMismatch, Location(3, 1)),
        );
        assert_eq!(
            roll(&board.cells, Location(1, 1), Direction::North, Some(1)),
            (Collision::Stop, Location(1, 1)),
        );

        // a hole in the start cell never swallows the rolling ball
        assert_eq!(
            roll(&board.cells, Location(3, 1), Direction::East, Some(2)),
            (Collision::Stop, Location(3, 1)),
        );
        assert_eq!(
            roll(&board.cells, Location(3, 1), Direction::South, Some(2)),
            (Collision::FallMatch, Location(3, 3)),
        );
    }

    #[test]
    fn ball_position_bookkeeping() {
        let holes = BTreeMap::from([(1, Location(3, 3))]);
        let mut movement = Movement::initial(&holes);

        assert!(movement.record_ball(1, Location(1, 1)));
        let original = movement.occupied().clone();

        assert!(movement.set_ball_position(1, Location(2, 1), Location(1, 1)));
        assert!(movement.set_ball_position(1, Location(1, 1), Location(2, 1)));
        assert_eq!(movement.occupied(), &original);

        // occupied cells reject a second ball
        assert!(!movement.record_ball(2, Location(1, 1)));
        assert!(movement.record_ball(2, Location(2, 1)));
        assert!(!movement.set_ball_position(1, Location(2, 1), Location(1, 1)));
    }

    #[test]
    fn requirements_settle() {
        let holes = BTreeMap::from([(1, Location(3, 3))]);
        let mut movement = Movement::initial(&holes);
        assert!(movement.is_good());

        movement.record_ball(1, Location(2, 2));
        movement.require_ball_at(Location(2, 2));
        assert!(movement.is_good());

        movement.require_ball_at(Location(1, 2));
        assert!(!movement.is_good());
        movement.record_ball(2, Location(1, 2));
        movement.settle_requirements();
        assert!(movement.is_good());

        movement.require_closed_hole(Location(3, 3));
        assert!(!movement.is_good());

        movement.add_loop(Direction::North);
        assert!(movement.has_loop(Direction::North));
        assert!(!movement.has_loop(Direction::East));
    }

    #[test]
    fn deliver_ball_roundtrip() {
        let holes = BTreeMap::from([(1, Location(3, 3)), (2, Location(1, 3))]);
        let mut movement = Movement::initial(&holes);

        // the wrong ball may not fall in
        movement.record_ball(1, Location(3, 1));
        assert!(!movement.set_ball_position(1, Location(1, 3), Location(3, 1)));

        movement.record_ball(1, Location(3, 1));
        assert!(movement.set_ball_position(1, Location(3, 3), Location(3, 1)));
        assert_eq!(movement.ball_position(1), None);
        assert!(!movement.open_holes().contains_key(&Location(3, 3)));
    }

    #[test]
    fn builder_rejects_out_of_bounds() {
        let mut builder = BoardBuilder::with_size(NonZero::new(3).unwrap());
        builder.add_ball(Location(4, 1));
        assert_eq!(builder.is_valid(), Some(&vec![BuilderInvalidReason::FeatureOutOfBounds]));
    }

    #[test]
    fn builder_rejects_distant_walls() {
        let mut builder = BoardBuilder::with_size(NonZero::new(3).unwrap());
        builder.add_wall(UnorderedPair::from((Location(1, 1), Location(3, 1))));
        assert_eq!(builder.is_valid(), Some(&vec![BuilderInvalidReason::WallNotBetweenNeighbors]));
    }

    #[test]
    fn builder_rejects_overlap() {
        let mut builder = BoardBuilder::with_size(NonZero::new(3).unwrap());
        builder.add_ball(Location(1, 1)).add_hole(Location(1, 1));
        assert!(builder.build().err().unwrap().contains(&BuilderInvalidReason::FeatureOverlap));
    }

    #[test]
    fn builder_rejects_unpaired_features() {
        let mut builder = BoardBuilder::with_size(NonZero::new(3).unwrap());
        builder.add_ball(Location(1, 1));
        assert!(builder
            .build()
            .err()
            .unwrap()
            .contains(&BuilderInvalidReason::UnpairedBallsAndHoles));
    }

    #[test]
    fn solve_open_board_in_two_tilts() {
        let board = BoardBuilder::with_size(NonZero::new(3).unwrap())
            .add_ball(Location(1, 1))
            .add_hole(Location(3, 3))
            .build()
            .unwrap();

        let mut solutions = board.solve();
        solutions.sort();
        assert_eq!(solutions, vec![
            vec![Direction::South, Direction::East],
            vec![Direction::East, Direction::South],
        ])
    }

    #[test]
    fn solve_crossing_pair() {
        let board = crossing_board();

        let mut solutions = board.solve();
        solutions.sort();
        assert_eq!(solutions, vec![
            vec![Direction::North, Direction::West, Direction::East],
            vec![Direction::North, Direction::East, Direction::West],
            vec![Direction::West, Direction::North, Direction::East],
            vec![Direction::East, Direction::North, Direction::West],
        ])
    }

    #[test]
    fn report_unsolvable_orbit() {
        // every tilt orbits the ball around the centre hole without ever crossing it
        let board = BoardBuilder::with_size(NonZero::new(3).unwrap())
            .add_ball(Location(3, 1))
            .add_hole(Location(2, 2))
            .build()
            .unwrap();

        assert!(board.solve().is_empty())
    }

    #[test]
    fn solve_with_blocker() {
        // ball 1 only reaches its hole by resting against ball 2 mid-slide
        let board = BoardBuilder::with_size(NonZero::new(3).unwrap())
            .add_ball(Location(3, 1))
            .add_hole(Location(2, 2))
            .add_ball(Location(2, 1))
            .add_hole(Location(1, 3))
            .build()
            .unwrap();

        assert_eq!(board.solve(), vec![vec![Direction::West, Direction::South]])
    }

    #[test]
    fn depth_limit_cuts_search() {
        let board = BoardBuilder::with_size(NonZero::new(3).unwrap())
            .add_ball(Location(1, 1))
            .add_hole(Location(3, 3))
            .build()
            .unwrap();

        assert!(board.solve_with_depth(1).is_empty());
        assert_eq!(board.solve_with_depth(2).len(), 2);
    }
}
