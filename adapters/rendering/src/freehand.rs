//! Turns pointer strokes into grid cells.

use glam::Vec2;
use nebula_life_core::{Board, Cell};

use crate::{FrameInput, RenderingError};

/// Side length, in pixels, of the square brush stamped at the pointer.
pub const BRUSH_SIZE_PX: u32 = 8;

/// Outcome of a stroke reported by [`FreehandCapture::update`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StrokeEvent {
    /// The primary button was released; carries every cell the stroke covered.
    Finished(Board),
    /// The secondary button was pressed; the user does not want a run.
    Aborted,
}

/// Accumulates the cells covered by a pointer stroke.
#[derive(Clone, Debug)]
pub struct FreehandCapture {
    scale: i32,
    brush: i32,
    stroke: Option<Board>,
}

impl FreehandCapture {
    /// Creates a capture for cells that are `scale` pixels wide.
    pub fn new(scale: u32) -> Result<Self, RenderingError> {
        let scale = match i32::try_from(scale) {
            Ok(scale) if scale > 0 => scale,
            _ => return Err(RenderingError::InvalidScale { scale }),
        };
        Ok(Self {
            scale,
            brush: BRUSH_SIZE_PX as i32,
            stroke: None,
        })
    }

    /// Cells covered by the stroke in progress.
    #[must_use]
    pub fn stroke(&self) -> Option<&Board> {
        self.stroke.as_ref()
    }

    /// Drops any stroke in progress.
    pub fn reset(&mut self) {
        self.stroke = None;
    }

    /// Feeds one frame of input and reports a finished or aborted stroke.
    pub fn update(&mut self, input: &FrameInput) -> Option<StrokeEvent> {
        if input.secondary_pressed {
            self.stroke = None;
            return Some(StrokeEvent::Aborted);
        }

        if input.primary_pressed && self.stroke.is_none() {
            self.stroke = Some(Board::new());
        }

        let stamping = input.primary_pressed || input.primary_down || input.primary_released;
        if let (true, Some(pointer)) = (stamping, input.pointer) {
            let cells: Vec<Cell> = self.brush_cells(pointer).collect();
            if let Some(stroke) = self.stroke.as_mut() {
                stroke.extend(cells);
            }
        }

        if input.primary_released {
            return self.stroke.take().map(StrokeEvent::Finished);
        }
        None
    }

    /// Grid cells touched by a brush centered on `pointer`.
    pub fn brush_cells(&self, pointer: Vec2) -> impl Iterator<Item = Cell> {
        let (columns, rows) = (self.span(pointer.x), self.span(pointer.y));
        rows.flat_map(move |y| columns.clone().map(move |x| Cell::new(x, y)))
    }

    fn span(&self, center: f32) -> std::ops::RangeInclusive<i32> {
        let first = center.floor() as i32 - self.brush / 2;
        let last = first + self.brush - 1;
        first.div_euclid(self.scale)..=last.div_euclid(self.scale)
    }
}
