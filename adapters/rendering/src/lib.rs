#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Nebula Life adapters.
//!
//! The simulation knows nothing about pixels. Backends receive a [`Scene`]
//! holding grid cells and their colors and map each cell to a
//! `scale x scale` pixel square.

pub mod freehand;

use anyhow::Result as AnyResult;
use glam::Vec2;
use nebula_life_core::{Cell, CellColor};
use std::{error::Error, fmt, time::Duration};

pub use freehand::{FreehandCapture, StrokeEvent, BRUSH_SIZE_PX};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Opaque black used to clear frames.
    pub const BLACK: Color = Color::from_rgb_u8(0, 0, 0);
    /// Opaque white used for the freehand sketch.
    pub const WHITE: Color = Color::from_rgb_u8(255, 255, 255);
    /// Opaque green used for the stats overlay.
    pub const STATS_GREEN: Color = Color::from_rgb_u8(0, 255, 0);

    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }
}

impl From<CellColor> for Color {
    fn from(color: CellColor) -> Self {
        Self::from_rgb_u8(color.red(), color.green(), color.blue())
    }
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Pointer position in window pixels, when the pointer is over the window.
    pub pointer: Option<Vec2>,
    /// The primary button went down on this frame.
    pub primary_pressed: bool,
    /// The primary button is held.
    pub primary_down: bool,
    /// The primary button was released on this frame.
    pub primary_released: bool,
    /// The secondary button went down on this frame.
    pub secondary_pressed: bool,
    /// The user asked to stop the current run.
    pub cancel_run: bool,
    /// Drawable area in pixels, when the backend knows the real window size.
    pub screen: Option<Vec2>,
}

/// Single live cell and the color it is painted with.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellPresentation {
    /// Grid coordinate of the cell.
    pub cell: Cell,
    /// Fill color of the cell.
    pub color: Color,
}

impl CellPresentation {
    /// Creates a new cell descriptor.
    #[must_use]
    pub fn new(cell: Cell, color: impl Into<Color>) -> Self {
        Self {
            cell,
            color: color.into(),
        }
    }
}

/// Timing and population figures shown in the stats overlay.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StatsOverlay {
    /// Time spent ticking decay and stepping the board on the last frame.
    pub step_time: Duration,
    /// Live cells on the board.
    pub cells: usize,
    /// Generation reached by the active run.
    pub generation: u64,
}

/// Scene description handed to a backend every frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Largest column of the domain.
    pub columns: u32,
    /// Largest row of the domain.
    pub rows: u32,
    /// Side length of one cell in pixels.
    pub scale: u32,
    /// Live cells painted this frame.
    pub cells: Vec<CellPresentation>,
    /// Cells drawn by the user that have not started a run yet.
    pub sketch: Vec<Cell>,
    /// Optional diagnostics drawn on top of the cells.
    pub stats: Option<StatsOverlay>,
}

impl Scene {
    /// Creates an empty scene for the provided domain and cell scale.
    pub fn new(columns: u32, rows: u32, scale: u32) -> Result<Self, RenderingError> {
        if scale == 0 {
            return Err(RenderingError::InvalidScale { scale });
        }
        Ok(Self {
            columns,
            rows,
            scale,
            cells: Vec::new(),
            sketch: Vec::new(),
            stats: None,
        })
    }

    /// Side length of one cell in pixels.
    #[must_use]
    pub fn cell_size(&self) -> f32 {
        self.scale as f32
    }

    /// Top-left pixel corner of `cell`.
    #[must_use]
    pub fn cell_origin(&self, cell: Cell) -> Vec2 {
        Vec2::new(cell.x() as f32, cell.y() as f32) * self.cell_size()
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Nebula Life scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the frame delta and the
    /// input captured by the adapter, and refreshes the scene before it is
    /// drawn. One call corresponds to one simulated frame.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq, Eq)]
pub enum RenderingError {
    /// The cell scale must be positive to avoid zero-sized cells.
    InvalidScale {
        /// Provided scale that failed validation.
        scale: u32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidScale { scale } => {
                write!(f, "cell scale must be positive (received {scale})")
            }
        }
    }
}

impl Error for RenderingError {}
