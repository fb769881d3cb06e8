//! Board values plus the three overlays that travel with them.

use crate::constraint::compute_errors;
use crate::error::BoardError;
use crate::types::{ErrorMap, FillSource, FillSourceMap, Grid, Position, Provenance, ProvenanceMap};

/// The live board: digit grid, fixed-clue mask, and per-cell overlays.
///
/// All maps are 9x9 and index-aligned by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridState {
    /// Current digits (0 = empty)
    values: Grid,
    /// Snapshot taken when the puzzle became active; `None` means every cell is editable
    fixed: Option<Grid>,
    /// How each cell was last written
    fill: FillSourceMap,
    /// Clue/solver classification from the last replay
    provenance: ProvenanceMap,
    /// Constraint violations as of the last recompute
    errors: ErrorMap,
}

impl Default for GridState {
    fn default() -> Self {
        Self::new()
    }
}

impl GridState {
    /// An empty, fully editable board
    pub fn new() -> Self {
        Self {
            values: Grid::empty(),
            fixed: None,
            fill: FillSourceMap::default(),
            provenance: ProvenanceMap::default(),
            errors: ErrorMap::default(),
        }
    }

    pub fn get(&self, row: usize, col: usize) -> Result<u8, BoardError> {
        let pos = Position::try_new(row, col).ok_or(BoardError::OutOfBounds { row, col })?;
        Ok(self.values.get(pos))
    }

    /// Write a single digit (0 clears the cell). Overlays are untouched.
    pub fn set(&mut self, row: usize, col: usize, value: u8) -> Result<(), BoardError> {
        let pos = Position::try_new(row, col).ok_or(BoardError::OutOfBounds { row, col })?;
        if value > 9 {
            return Err(BoardError::InvalidValue(value));
        }
        self.values.set(pos, value);
        Ok(())
    }

    /// Install a new puzzle: its clues become fixed and every overlay resets.
    pub fn replace_all(&mut self, grid: Grid) {
        self.values = grid;
        self.fixed = Some(grid);
        self.fill = FillSourceMap::default();
        self.provenance = ProvenanceMap::default();
        self.errors = ErrorMap::default();
    }

    /// Empty board, no fixed cells, overlays cleared
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Replace the digits only, leaving the mask and overlays as they are
    pub fn install_values(&mut self, grid: Grid) {
        self.values = grid;
    }

    /// Recompute the error overlay from the current digits
    pub fn recompute_errors(&mut self) -> &ErrorMap {
        self.errors = compute_errors(&self.values);
        &self.errors
    }

    pub fn clear_errors(&mut self) {
        self.errors = ErrorMap::default();
    }

    /// Whether the cell holds a clue of the active puzzle
    pub fn is_fixed(&self, pos: Position) -> bool {
        self.fixed.is_some_and(|mask| mask.get(pos) != 0)
    }

    pub fn set_fixed(&mut self, mask: Option<Grid>) {
        self.fixed = mask;
    }

    pub fn set_fill_source(&mut self, pos: Position, source: FillSource) {
        self.fill.set(pos, source);
    }

    pub fn set_fill_sources(&mut self, fill: FillSourceMap) {
        self.fill = fill;
    }

    pub fn set_provenance(&mut self, provenance: ProvenanceMap) {
        self.provenance = provenance;
    }

    pub fn reset_provenance(&mut self) {
        self.provenance = ProvenanceMap::default();
    }

    // Getters
    pub fn values(&self) -> &Grid {
        &self.values
    }
    pub fn value(&self, pos: Position) -> u8 {
        self.values.get(pos)
    }
    pub fn fixed_mask(&self) -> Option<&Grid> {
        self.fixed.as_ref()
    }
    pub fn fill_sources(&self) -> &FillSourceMap {
        &self.fill
    }
    pub fn fill_source(&self, pos: Position) -> FillSource {
        self.fill.get(pos)
    }
    pub fn provenance(&self) -> &ProvenanceMap {
        &self.provenance
    }
    pub fn provenance_at(&self, pos: Position) -> Provenance {
        self.provenance.get(pos)
    }
    pub fn errors(&self) -> &ErrorMap {
        &self.errors
    }
    pub fn has_error(&self, pos: Position) -> bool {
        self.errors.get(pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_set_and_get() {
        let mut state = GridState::new();
        state.set(2, 3, 7).unwrap();
        assert_eq!(state.get(2, 3).unwrap(), 7);
        assert_eq!(state.get(3, 2).unwrap(), 0);
    }

    #[test]
    fn test_set_rejects_bad_input() {
        let mut state = GridState::new();
        assert_eq!(state.set(0, 0, 10), Err(BoardError::InvalidValue(10)));
        assert_eq!(state.set(9, 0, 1), Err(BoardError::OutOfBounds { row: 9, col: 0 }));
        assert_eq!(state.get(0, 9), Err(BoardError::OutOfBounds { row: 0, col: 9 }));
    }

    #[test]
    fn test_replace_all_fixes_clues_and_resets_overlays() {
        let mut state = GridState::new();
        state.set_fill_source(Position::new(0, 0), FillSource::User);
        state.set_provenance(ProvenanceMap::filled(Provenance::Answer));

        let mut puzzle = Grid::empty();
        puzzle.set(Position::new(0, 1), 4);
        state.replace_all(puzzle);

        assert_eq!(state.values(), &puzzle);
        assert!(state.is_fixed(Position::new(0, 1)));
        assert!(!state.is_fixed(Position::new(0, 0)));
        assert_eq!(state.fill_sources(), &FillSourceMap::default());
        assert_eq!(state.provenance(), &ProvenanceMap::default());
    }

    #[test]
    fn test_reset_clears_fixed_mask() {
        let mut state = GridState::new();
        state.replace_all(Grid::filled(1));
        state.reset();
        assert!(state.fixed_mask().is_none());
        assert_eq!(state.values(), &Grid::empty());
        assert!(!state.is_fixed(Position::new(0, 0)));
    }

    #[test]
    fn test_set_does_not_alias_fixed_snapshot() {
        let mut state = GridState::new();
        let mut puzzle = Grid::empty();
        puzzle.set(Position::new(1, 1), 3);
        state.replace_all(puzzle);

        state.set(1, 2, 8).unwrap();
        assert_eq!(state.fixed_mask().unwrap().get(Position::new(1, 2)), 0);
    }

    #[test]
    fn test_recompute_errors() {
        let mut state = GridState::new();
        state.set(0, 0, 5).unwrap();
        state.set(0, 8, 5).unwrap();
        state.recompute_errors();
        assert!(state.has_error(Position::new(0, 0)));
        assert!(state.has_error(Position::new(0, 8)));

        state.clear_errors();
        assert!(!state.has_error(Position::new(0, 0)));
    }
}
