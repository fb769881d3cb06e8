//! Row, column and box duplicate detection.

use crate::types::{ErrorMap, Grid, Position, SIZE};

/// Flag every cell that shares a non-zero digit with another cell in the
/// same row, column or 3x3 box.
///
/// Each unit is scanned in a fixed order, remembering where each digit was
/// first seen; a repeat marks both the current cell and that first cell.
/// Flags from the three kinds of unit are OR-combined. Always a full rescan.
pub fn compute_errors(grid: &Grid) -> ErrorMap {
    let mut errors = ErrorMap::default();

    for row in 0..SIZE {
        mark_duplicates(grid, &mut errors, (0..SIZE).map(|col| Position::new(row, col)));
    }

    for col in 0..SIZE {
        mark_duplicates(grid, &mut errors, (0..SIZE).map(|row| Position::new(row, col)));
    }

    for box_index in 0..SIZE {
        let top = (box_index / 3) * 3;
        let left = (box_index % 3) * 3;
        mark_duplicates(
            grid,
            &mut errors,
            (top..top + 3).flat_map(|row| (left..left + 3).map(move |col| Position::new(row, col))),
        );
    }

    errors
}

fn mark_duplicates(grid: &Grid, errors: &mut ErrorMap, unit: impl Iterator<Item = Position>) {
    // first_seen[d] = where digit d first appeared in this unit
    let mut first_seen: [Option<Position>; 10] = [None; 10];

    for pos in unit {
        let value = grid.get(pos) as usize;
        if value == 0 || value > 9 {
            continue;
        }
        match first_seen[value] {
            Some(first) => {
                errors.set(pos, true);
                errors.set(first, true);
            }
            None => first_seen[value] = Some(pos),
        }
    }
}
