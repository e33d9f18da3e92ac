//! Side table holding the decay history of every cell seen during a run.

use std::collections::HashMap;

use nebula_life_core::{Board, Cell};
use nebula_life_system_decay::{CellDecayState, DecayProfile};

/// Per-cell decay states keyed by coordinate.
///
/// Entries are only ever inserted when absent, so a cell that dies and is
/// later reborn resumes the arc it had reached. Nothing is removed until the
/// run ends.
#[derive(Debug, Default)]
pub(crate) struct DecayTable {
    entries: HashMap<Cell, CellDecayState>,
}

impl DecayTable {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Starts tracking `cell` with a fresh state unless it already has one.
    pub(crate) fn track(&mut self, cell: Cell, profile: &DecayProfile) {
        let _ = self
            .entries
            .entry(cell)
            .or_insert_with(|| CellDecayState::new(profile));
    }

    /// Ticks the state of `cell`, tracking it first if needed, and reports
    /// whether the cell is terminal.
    pub(crate) fn advance(&mut self, cell: Cell, profile: &DecayProfile) -> bool {
        self.entries
            .entry(cell)
            .or_insert_with(|| CellDecayState::new(profile))
            .tick(profile)
    }

    /// Drops all history and tracks every cell of `board` from scratch.
    pub(crate) fn reset_for(&mut self, board: &Board, profile: &DecayProfile) {
        self.entries.clear();
        self.entries.reserve(board.len());
        for &cell in board {
            let _ = self.entries.insert(cell, CellDecayState::new(profile));
        }
    }

    pub(crate) fn get(&self, cell: Cell) -> Option<&CellDecayState> {
        self.entries.get(&cell)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROFILE: DecayProfile = DecayProfile::DEFAULT;

    #[test]
    fn track_never_overwrites_history() {
        let mut table = DecayTable::new();
        let cell = Cell::new(3, 4);
        table.track(cell, &PROFILE);
        assert!(!table.advance(cell, &PROFILE));
        let advanced = *table.get(cell).expect("tracked");

        table.track(cell, &PROFILE);
        assert_eq!(table.get(cell), Some(&advanced));
        assert_ne!(advanced, CellDecayState::new(&PROFILE));
    }

    #[test]
    fn advance_tracks_unknown_cells() {
        let mut table = DecayTable::new();
        assert!(!table.advance(Cell::new(0, 0), &PROFILE));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn reset_replaces_all_entries() {
        let mut table = DecayTable::new();
        let _ = table.advance(Cell::new(9, 9), &PROFILE);
        let board: Board = [Cell::new(1, 1), Cell::new(2, 1)].into_iter().collect();
        table.reset_for(&board, &PROFILE);
        assert_eq!(table.len(), 2);
        assert!(table.get(Cell::new(9, 9)).is_none());
        assert_eq!(
            table.get(Cell::new(1, 1)),
            Some(&CellDecayState::new(&PROFILE))
        );
        table.clear();
        assert_eq!(table.len(), 0);
    }
}
