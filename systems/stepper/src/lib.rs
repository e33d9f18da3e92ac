#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Generation stepping over a sparse live-cell set.
//!
//! Only live cells and their Moore neighbors are examined, so the cost of a
//! step scales with the population rather than with the domain area. Cells
//! outside the inclusive domain rectangle are discarded regardless of their
//! neighbor count; there is no wraparound.

use std::collections::HashSet;

use nebula_life_core::{Board, Cell, DomainBounds, SURVIVAL_NEIGHBORS};

/// Pure system that advances a board by one generation.
///
/// The stepper keeps its candidate buffer between calls to avoid reallocating
/// it every generation; it carries no other state, so identical inputs always
/// yield identical boards.
#[derive(Debug, Default)]
pub struct Stepper {
    candidates: HashSet<Cell>,
}

impl Stepper {
    /// Creates a stepper with an empty candidate buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes the generation following `board` inside `bounds`.
    #[must_use]
    pub fn step(&mut self, board: &Board, bounds: &DomainBounds) -> Board {
        self.step_visiting(board, bounds, |_| {})
    }

    /// Computes the next generation and reports every in-domain candidate to `visit`.
    ///
    /// Candidates are visited whether or not they end up live, which lets the
    /// caller prepare per-cell bookkeeping before a cell is first drawn.
    pub fn step_visiting<F>(
        &mut self,
        board: &Board,
        bounds: &DomainBounds,
        mut visit: F,
    ) -> Board
    where
        F: FnMut(Cell),
    {
        self.collect_candidates(board);

        let mut next = Board::with_capacity(board.len());
        for &cell in &self.candidates {
            if !bounds.contains(cell) {
                continue;
            }

            let neighbors = live_neighbors(board, cell);
            if is_live_next(neighbors, board.contains(cell), bounds.survival_threshold()) {
                let _ = next.insert(cell);
            }
            visit(cell);
        }
        next
    }

    fn collect_candidates(&mut self, board: &Board) {
        self.candidates.clear();
        self.candidates.reserve(board.len() * 9);
        for &cell in board {
            let _ = self.candidates.insert(cell);
            self.candidates.extend(cell.neighbors());
        }
    }
}

/// Convenience wrapper that steps `board` once with a throwaway [`Stepper`].
#[must_use]
pub fn step(board: &Board, bounds: &DomainBounds) -> Board {
    Stepper::new().step(board, bounds)
}

/// Counts the Moore neighbors of `cell` that are live on `board`.
#[must_use]
pub fn live_neighbors(board: &Board, cell: Cell) -> u8 {
    let count = cell
        .neighbors()
        .filter(|neighbor| board.contains(*neighbor))
        .count();
    count as u8
}

/// Applies the birth/survive rule: live next iff the neighbor count equals the
/// threshold, or the cell is already live with exactly two neighbors.
#[must_use]
pub const fn is_live_next(neighbors: u8, alive: bool, survival_threshold: u8) -> bool {
    neighbors == survival_threshold || (alive && neighbors == SURVIVAL_NEIGHBORS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_births_on_threshold_and_sustains_on_two() {
        assert!(is_live_next(3, false, 3));
        assert!(is_live_next(3, true, 3));
        assert!(is_live_next(2, true, 3));
        assert!(!is_live_next(2, false, 3));
        assert!(!is_live_next(4, true, 3));
        assert!(!is_live_next(1, true, 3));
    }

    #[test]
    fn candidate_buffer_holds_cells_and_neighbors() {
        let mut stepper = Stepper::new();
        let board: Board = [Cell::new(0, 0), Cell::new(5, 5)].into_iter().collect();
        stepper.collect_candidates(&board);
        assert_eq!(stepper.candidates.len(), 18);

        let single: Board = [Cell::new(2, 2)].into_iter().collect();
        stepper.collect_candidates(&single);
        assert_eq!(stepper.candidates.len(), 9, "buffer must be cleared between steps");
    }
}
