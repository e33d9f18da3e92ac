#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Seed pattern generators that produce the initial board of a run.
//!
//! Random styles draw from a caller-supplied [`Rng`] so that adapters decide
//! whether runs are reproducible. Geometric styles are pure functions of the
//! domain. Outlines are hollow: only the border cells of each shape are live.

mod shapes;

use std::f64::consts::TAU;

use nebula_life_core::{Board, Cell, DomainBounds, SeedStyle, MIN_SEED_CELLS};
use rand::Rng;
use thiserror::Error;

use crate::shapes::{axis_limit, outline, Annulus};

const DEFAULT_POPULATION: f64 = 0.06;
const DEFAULT_PIXEL_SCALE: u32 = 2;

/// Outer annulus margin expressed in screen pixels.
const CIRCLE_OUTER_MARGIN_PX: f64 = 80.0;
/// Inner annulus margin expressed in screen pixels.
const CIRCLE_INNER_MARGIN_PX: f64 = 240.0;

const RING_COUNT: i32 = 40;
const RING_SPACING: f64 = 20.0;
const RING_INSET: f64 = 100.0;
const RING_SAMPLES: usize = 5_000;

const HORIZONTAL_FIRST_ROW: u32 = 32;
const HORIZONTAL_SPACING: usize = 64;

const VERTICAL_DIVISIONS: i32 = 8;
const VERTICAL_SLOTS: [i32; 4] = [1, 3, 5, 7];

const SQUARES_PER_ROW: i32 = 6;

/// Tunable inputs for the random seed styles.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SeedParameters {
    /// Fraction of `columns * rows` sampled as live cells.
    pub population: f64,
    /// Distance, in cells, by which the annulus outer edge is pulled inwards.
    pub outer_margin: f64,
    /// Distance, in cells, by which the annulus inner edge is pulled inwards.
    pub inner_margin: f64,
}

impl SeedParameters {
    /// Derives parameters from a population fraction and the pixels-per-cell scale.
    #[must_use]
    pub fn new(population: f64, pixel_scale: u32) -> Self {
        let scale = f64::from(pixel_scale.max(1));
        Self {
            population,
            outer_margin: CIRCLE_OUTER_MARGIN_PX / scale,
            inner_margin: CIRCLE_INNER_MARGIN_PX / scale,
        }
    }
}

impl Default for SeedParameters {
    fn default() -> Self {
        Self::new(DEFAULT_POPULATION, DEFAULT_PIXEL_SCALE)
    }
}

/// Errors reported when a style cannot be generated.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum SeedError {
    /// The style needs cells drawn by the user; see [`freehand`].
    #[error("the {0} style is drawn by the user and cannot be generated")]
    RequiresDrawing(SeedStyle),
}

/// Produces initial boards for a fixed domain.
#[derive(Clone, Copy, Debug)]
pub struct SeedGenerator {
    bounds: DomainBounds,
    parameters: SeedParameters,
}

impl SeedGenerator {
    /// Creates a generator for the provided domain.
    #[must_use]
    pub const fn new(bounds: DomainBounds, parameters: SeedParameters) -> Self {
        Self { bounds, parameters }
    }

    /// Domain the generator draws into.
    #[must_use]
    pub const fn bounds(&self) -> DomainBounds {
        self.bounds
    }

    /// Population and margins used by the random styles.
    #[must_use]
    pub const fn parameters(&self) -> SeedParameters {
        self.parameters
    }

    /// Builds the board for any generated style.
    pub fn generate<R>(&self, style: SeedStyle, rng: &mut R) -> Result<Board, SeedError>
    where
        R: Rng + ?Sized,
    {
        let board = match style {
            SeedStyle::Random => self.random(rng),
            SeedStyle::Circle => self.circle(rng),
            SeedStyle::CircleEdge => self.circle_edge(),
            SeedStyle::Vertical => self.vertical(),
            SeedStyle::Horizontal => self.horizontal(),
            SeedStyle::Rectangles => self.rectangles(),
            SeedStyle::Squares => self.squares(),
            SeedStyle::Whole => self.whole(),
            SeedStyle::Freehand => return Err(SeedError::RequiresDrawing(style)),
        };
        Ok(board)
    }

    /// Number of samples drawn by the random styles.
    #[must_use]
    pub fn sample_count(&self) -> usize {
        let population = self.parameters.population;
        if !population.is_finite() || population <= 0.0 {
            return 0;
        }
        let area = f64::from(self.bounds.columns()) * f64::from(self.bounds.rows());
        (area * population).floor() as usize
    }

    /// Samples cells uniformly from the inclusive domain. Duplicate samples
    /// collapse, so the board may hold fewer cells than were drawn.
    pub fn random<R>(&self, rng: &mut R) -> Board
    where
        R: Rng + ?Sized,
    {
        let columns = axis_limit(self.bounds.columns());
        let rows = axis_limit(self.bounds.rows());
        let samples = self.sample_count();
        (0..samples)
            .map(|_| Cell::new(rng.gen_range(0..=columns), rng.gen_range(0..=rows)))
            .collect()
    }

    /// Samples a random field and keeps two annular clusters centered at the
    /// left quarter and right three-quarter columns.
    pub fn circle<R>(&self, rng: &mut R) -> Board
    where
        R: Rng + ?Sized,
    {
        let quarter = axis_limit(self.bounds.columns()) / 4;
        let middle = axis_limit(self.bounds.rows()) / 2;
        let half_height = f64::from(middle);
        let outer = half_height - self.parameters.outer_margin;
        let inner = half_height - self.parameters.inner_margin;

        let left = Annulus::new(Cell::new(quarter, middle), inner, outer);
        let right = Annulus::new(Cell::new(quarter * 3, middle), inner, outer);

        self.random(rng)
            .into_iter()
            .filter(|cell| left.contains(*cell) || right.contains(*cell))
            .collect()
    }

    /// Traces forty overlapping ring outlines shifted horizontally. Ring cells
    /// may fall outside the domain; the first generation discards them.
    #[must_use]
    pub fn circle_edge(&self) -> Board {
        let half_height = f64::from(self.bounds.rows()) / 2.0;
        let radius = f64::from((half_height - RING_INSET) as i32);
        let center_y = f64::from(half_height as i32);
        let increment = TAU / RING_SAMPLES as f64;

        let mut board = Board::new();
        for ring in 0..RING_COUNT {
            let center_x = f64::from((half_height + f64::from(ring) * RING_SPACING) as i32);
            let mut angle = 0.0_f64;
            for _ in 0..RING_SAMPLES {
                let x = (center_x + radius * angle.cos()) as i32;
                let y = (center_y + radius * angle.sin()) as i32;
                let _ = board.insert(Cell::new(x, y));
                angle += increment;
            }
        }
        board
    }

    /// Four full-height vertical lines at the odd eighths of the width.
    #[must_use]
    pub fn vertical(&self) -> Board {
        let spacing = axis_limit(self.bounds.columns()) / VERTICAL_DIVISIONS;
        let rows = axis_limit(self.bounds.rows());
        VERTICAL_SLOTS
            .into_iter()
            .flat_map(|slot| (0..rows).map(move |y| Cell::new(spacing * slot, y)))
            .collect()
    }

    /// Full-width horizontal lines every 64 rows, starting at row 32.
    #[must_use]
    pub fn horizontal(&self) -> Board {
        let columns = axis_limit(self.bounds.columns());
        let first = axis_limit(HORIZONTAL_FIRST_ROW);
        let rows = axis_limit(self.bounds.rows());
        (first..rows)
            .step_by(HORIZONTAL_SPACING)
            .flat_map(|y| (0..columns).map(move |x| Cell::new(x, y)))
            .collect()
    }

    /// Four rectangle outlines, two on each half of the domain.
    #[must_use]
    pub fn rectangles(&self) -> Board {
        let margin = axis_limit(self.bounds.rows()) / 5;
        let half_width = axis_limit(self.bounds.columns()) / 2;
        let width = (half_width - margin * 2).max(0);
        let height = margin;
        let right = half_width + margin;

        let mut board = Board::new();
        for (left, top) in [
            (margin, margin),
            (margin, margin * 3),
            (right, margin * 3),
            (right, margin),
        ] {
            outline(&mut board, Cell::new(left, top), width, height);
        }
        board
    }

    /// Twelve square outlines in two rows of six.
    #[must_use]
    pub fn squares(&self) -> Board {
        let margin = axis_limit(self.bounds.rows()) / 5;
        let first_left = margin / 2;

        let mut board = Board::new();
        for top in [margin, margin * 3] {
            for index in 0..SQUARES_PER_ROW {
                let left = first_left + margin * 2 * index;
                outline(&mut board, Cell::new(left, top), margin, margin);
            }
        }
        board
    }

    /// One centered square outline sized to the smaller domain dimension.
    #[must_use]
    pub fn whole(&self) -> Board {
        let columns = axis_limit(self.bounds.columns());
        let rows = axis_limit(self.bounds.rows());
        let side = columns.min(rows);

        let mut board = Board::new();
        outline(
            &mut board,
            Cell::new((columns - side) / 2, (rows - side) / 2),
            side,
            side,
        );
        board
    }
}

/// Outcome of combining drawn cells into a seed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FreehandSeed {
    /// The seed holds enough cells to start a run.
    Viable(Board),
    /// The seed is too sparse; callers keep drawing or discard it.
    Insufficient(Board),
}

impl FreehandSeed {
    /// Reports whether the seed may start a run.
    #[must_use]
    pub const fn is_viable(&self) -> bool {
        matches!(self, FreehandSeed::Viable(_))
    }

    /// Returns the combined board regardless of viability.
    #[must_use]
    pub fn into_board(self) -> Board {
        match self {
            FreehandSeed::Viable(board) | FreehandSeed::Insufficient(board) => board,
        }
    }
}

/// Combines cells drawn by the user with an optional existing board.
///
/// With an existing board the result is the union of both; otherwise it is the
/// drawn set verbatim. Results below [`MIN_SEED_CELLS`] are reported as
/// [`FreehandSeed::Insufficient`].
#[must_use]
pub fn freehand(existing: Option<&Board>, drawn: Board) -> FreehandSeed {
    let board = match existing {
        Some(existing) => existing.union(&drawn),
        None => drawn,
    };

    if board.len() < MIN_SEED_CELLS {
        FreehandSeed::Insufficient(board)
    } else {
        FreehandSeed::Viable(board)
    }
}
