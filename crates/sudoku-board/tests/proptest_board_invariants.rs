//! Property tests for the board invariants.
//!
//! 1. **Error symmetry**: a cell is flagged exactly when some other cell in
//!    its row, column or box holds the same non-zero digit.
//! 2. **Conflict-free boards are clean**: no flags on a valid partial grid.
//! 3. **Navigation stays on the board**, never travels more than two cells and
//!    steps past a clue whenever the board continues beyond it.
//! 4. **Clues never change** under arbitrary direct input.

use proptest::prelude::*;
use sudoku_board::{
    compute_errors, move_selection, Direction, Grid, InputEvent, InteractionController, Position,
};

fn grid_strategy() -> impl Strategy<Value = Grid> {
    prop::collection::vec(0u8..=9, 81).prop_map(|cells| {
        let mut grid = Grid::empty();
        for (index, value) in cells.into_iter().enumerate() {
            grid.set(Position::new(index / 9, index % 9), value);
        }
        grid
    })
}

fn sparse_grid_strategy() -> impl Strategy<Value = Grid> {
    prop::collection::vec(prop_oneof![4 => Just(0u8), 1 => 1u8..=9], 81).prop_map(|cells| {
        let mut grid = Grid::empty();
        for (index, value) in cells.into_iter().enumerate() {
            grid.set(Position::new(index / 9, index % 9), value);
        }
        grid
    })
}

const SOLVED: &str =
    "534678912672195348198342567859761423426853791713924856961537284287419635345286179";

/// A valid solution with a random subset of cells blanked
fn solved_subset_strategy() -> impl Strategy<Value = Grid> {
    prop::collection::vec(any::<bool>(), 81).prop_map(|keep| {
        let solved = Grid::from_string(SOLVED).unwrap_or_default();
        solved.map(|pos, value| if keep[pos.row * 9 + pos.col] { value } else { 0 })
    })
}

fn position_strategy() -> impl Strategy<Value = Position> {
    (0usize..9, 0usize..9).prop_map(|(row, col)| Position::new(row, col))
}

fn direction_strategy() -> impl Strategy<Value = Direction> {
    prop_oneof![
        Just(Direction::Up),
        Just(Direction::Down),
        Just(Direction::Left),
        Just(Direction::Right),
    ]
}

fn input_strategy() -> impl Strategy<Value = InputEvent> {
    prop_oneof![
        direction_strategy().prop_map(InputEvent::Navigate),
        position_strategy().prop_map(InputEvent::Select),
        (1u8..=9).prop_map(InputEvent::Digit),
        Just(InputEvent::Erase),
    ]
}

fn shares_unit(a: Position, b: Position) -> bool {
    a.row == b.row || a.col == b.col || a.box_index() == b.box_index()
}

/// Brute-force reference: does any peer hold the same digit?
fn has_peer_duplicate(grid: &Grid, pos: Position) -> bool {
    let value = grid.get(pos);
    value != 0
        && Position::all().any(|other| other != pos && shares_unit(pos, other) && grid.get(other) == value)
}

proptest! {
    #[test]
    fn errors_match_peer_duplicates(grid in grid_strategy()) {
        let errors = compute_errors(&grid);
        for pos in Position::all() {
            prop_assert_eq!(errors.get(pos), has_peer_duplicate(&grid, pos), "cell {:?}", pos);
        }
    }

    #[test]
    fn empty_cells_are_never_flagged(grid in grid_strategy()) {
        let errors = compute_errors(&grid);
        for (pos, value) in grid.iter() {
            if value == 0 {
                prop_assert!(!errors.get(pos));
            }
        }
    }

    #[test]
    fn conflict_free_grid_has_no_flags(grid in solved_subset_strategy()) {
        let errors = compute_errors(&grid);
        prop_assert!(errors.iter().all(|(_, flagged)| !flagged));
    }

    #[test]
    fn navigation_stays_on_board(
        start in position_strategy(),
        direction in direction_strategy(),
        mask in sparse_grid_strategy(),
    ) {
        let landed = move_selection(Some(start), direction, Some(&mask));
        prop_assert!(landed.row < 9 && landed.col < 9);

        // Never more than two steps along the movement axis
        let distance = landed.row.abs_diff(start.row) + landed.col.abs_diff(start.col);
        prop_assert!(distance <= 2);
    }

    #[test]
    fn navigation_steps_past_a_clue_when_it_can(
        start in position_strategy(),
        direction in direction_strategy(),
        mut mask in sparse_grid_strategy(),
        clue in 1u8..=9,
    ) {
        let landing = move_selection(Some(start), direction, None);
        prop_assume!(landing != start);
        mask.set(landing, clue);

        let landed = move_selection(Some(start), direction, Some(&mask));
        let further = move_selection(Some(landing), direction, None);
        if further != landing {
            prop_assert_ne!(landed, landing);
        } else {
            prop_assert_eq!(landed, landing);
        }
    }

    #[test]
    fn navigation_without_mask_moves_one_step(
        start in position_strategy(),
        direction in direction_strategy(),
    ) {
        let landed = move_selection(Some(start), direction, None);
        let distance = landed.row.abs_diff(start.row) + landed.col.abs_diff(start.col);
        prop_assert!(distance <= 1);
    }

    #[test]
    fn clues_survive_arbitrary_input(
        puzzle in sparse_grid_strategy(),
        inputs in prop::collection::vec(input_strategy(), 0..64),
    ) {
        let mut controller = InteractionController::default();
        let now = std::time::Instant::now();
        controller.request_new_puzzle(now);
        controller.complete(
            sudoku_board::ServiceReply::Generated(Ok(sudoku_board::GenerateResponse {
                puzzle,
                solution: None,
            })),
            now,
        );

        for input in inputs {
            controller.handle_input(input);
        }

        for (pos, clue) in puzzle.iter() {
            if clue != 0 {
                prop_assert_eq!(controller.state().value(pos), clue);
            }
        }
    }
}
