//! Cursor movement over the board.

use crate::types::{Direction, Grid, Position, SIZE};

/// One clamped step in `direction`; stays put at the edge
pub fn step(pos: Position, direction: Direction) -> Position {
    let last = SIZE - 1;
    match direction {
        Direction::Up => Position::new(pos.row.saturating_sub(1), pos.col),
        Direction::Down => Position::new((pos.row + 1).min(last), pos.col),
        Direction::Left => Position::new(pos.row, pos.col.saturating_sub(1)),
        Direction::Right => Position::new(pos.row, (pos.col + 1).min(last)),
    }
}

/// Compute where the cursor lands after a directional move.
///
/// With no current selection the cursor goes to (0, 0) without moving.
/// If the landing cell is a clue in `fixed`, one further clamped step is
/// taken in the same direction; the cursor stops there even if that cell is
/// also a clue.
pub fn move_selection(current: Option<Position>, direction: Direction, fixed: Option<&Grid>) -> Position {
    let Some(current) = current else {
        return Position::new(0, 0);
    };

    let landing = step(current, direction);
    match fixed {
        Some(mask) if mask.get(landing) != 0 => step(landing, direction),
        _ => landing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_selection_goes_home() {
        for direction in Direction::all() {
            assert_eq!(move_selection(None, direction, None), Position::new(0, 0));
        }
    }

    #[test]
    fn test_plain_moves() {
        let center = Some(Position::new(4, 4));
        assert_eq!(move_selection(center, Direction::Up, None), Position::new(3, 4));
        assert_eq!(move_selection(center, Direction::Down, None), Position::new(5, 4));
        assert_eq!(move_selection(center, Direction::Left, None), Position::new(4, 3));
        assert_eq!(move_selection(center, Direction::Right, None), Position::new(4, 5));
    }

    #[test]
    fn test_clamps_at_edges() {
        assert_eq!(
            move_selection(Some(Position::new(0, 0)), Direction::Up, None),
            Position::new(0, 0)
        );
        assert_eq!(
            move_selection(Some(Position::new(8, 8)), Direction::Right, None),
            Position::new(8, 8)
        );
    }

    #[test]
    fn test_skips_single_clue() {
        let mut mask = Grid::empty();
        mask.set(Position::new(4, 5), 3);
        assert_eq!(
            move_selection(Some(Position::new(4, 4)), Direction::Right, Some(&mask)),
            Position::new(4, 6)
        );
    }

    #[test]
    fn test_two_clues_in_a_row_stops_on_second() {
        let mut mask = Grid::empty();
        mask.set(Position::new(4, 5), 3);
        mask.set(Position::new(4, 6), 8);
        assert_eq!(
            move_selection(Some(Position::new(4, 4)), Direction::Right, Some(&mask)),
            Position::new(4, 6)
        );
    }

    #[test]
    fn test_clue_at_edge_stays_on_clue() {
        let mut mask = Grid::empty();
        mask.set(Position::new(0, 3), 1);
        assert_eq!(
            move_selection(Some(Position::new(1, 3)), Direction::Up, Some(&mask)),
            Position::new(0, 3)
        );
    }
}
