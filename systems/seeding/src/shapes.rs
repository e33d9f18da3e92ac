use nebula_life_core::{Board, Cell};

/// Converts a domain extent into a signed coordinate, saturating at `i32::MAX`.
pub(crate) fn axis_limit(extent: u32) -> i32 {
    i32::try_from(extent).unwrap_or(i32::MAX)
}

/// Marks the closed border of the rectangle spanning `[left, left + width]`
/// by `[top, top + height]`, corners included.
pub(crate) fn outline(board: &mut Board, origin: Cell, width: i32, height: i32) {
    let (left, top) = (origin.x(), origin.y());
    let (right, bottom) = (left + width, top + height);

    for x in left..=right {
        let _ = board.insert(Cell::new(x, top));
        let _ = board.insert(Cell::new(x, bottom));
    }
    for y in top..=bottom {
        let _ = board.insert(Cell::new(left, y));
        let _ = board.insert(Cell::new(right, y));
    }
}

/// Ring between two radii measured from a center cell, both edges inclusive.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Annulus {
    center: Cell,
    inner: f64,
    outer: f64,
}

impl Annulus {
    pub(crate) const fn new(center: Cell, inner: f64, outer: f64) -> Self {
        Self {
            center,
            inner,
            outer,
        }
    }

    pub(crate) fn contains(&self, cell: Cell) -> bool {
        let dx = f64::from(cell.x()) - f64::from(self.center.x());
        let dy = f64::from(cell.y()) - f64::from(self.center.y());
        let distance = dx.hypot(dy);
        distance >= self.inner && distance <= self.outer
    }
}
