#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Nebula Life engine.
//!
//! This crate defines the vocabulary that connects adapters, the authoritative
//! world, and the pure systems. Adapters submit [`Command`] values describing
//! desired run transitions, the world executes those commands via its `apply`
//! entry point, and then broadcasts [`Event`] values describing what happened.
//! Systems operate on the plain value types defined here ([`Cell`], [`Board`],
//! [`DomainBounds`]) and never own run state themselves.

use std::{
    collections::{hash_set, HashSet},
    fmt,
    str::FromStr,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Smallest live-cell count a seed must contain before a run may start.
pub const MIN_SEED_CELLS: usize = 100;

/// Neighbor count that births a dead cell and sustains a live one.
pub const DEFAULT_SURVIVAL_THRESHOLD: u8 = 3;

/// Neighbor count that sustains an already live cell.
pub const SURVIVAL_NEIGHBORS: u8 = 2;

const NEIGHBOR_OFFSETS: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Location of a single grid cell expressed as signed column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    x: i32,
    y: i32,
}

impl Cell {
    /// Creates a new cell at the provided column and row.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Column of the cell.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Row of the cell.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Returns the cell displaced by the provided offsets.
    #[must_use]
    pub const fn offset(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.wrapping_add(dx),
            y: self.y.wrapping_add(dy),
        }
    }

    /// Iterates the eight Moore neighbors, row by row starting above-left.
    pub fn neighbors(self) -> impl Iterator<Item = Cell> {
        NEIGHBOR_OFFSETS
            .into_iter()
            .map(move |(dx, dy)| self.offset(dx, dy))
    }
}

impl From<(i32, i32)> for Cell {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

/// Set of live cells. Insertion order is irrelevant and duplicates collapse.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    cells: HashSet<Cell>,
}

impl Board {
    /// Creates an empty board.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty board able to hold `capacity` cells without reallocating.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            cells: HashSet::with_capacity(capacity),
        }
    }

    /// Marks the cell as live. Returns `true` when the cell was not live before.
    pub fn insert(&mut self, cell: Cell) -> bool {
        self.cells.insert(cell)
    }

    /// Reports whether the cell is live.
    #[must_use]
    pub fn contains(&self, cell: Cell) -> bool {
        self.cells.contains(&cell)
    }

    /// Number of live cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Reports whether the board has no live cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterates the live cells in unspecified order.
    pub fn iter(&self) -> hash_set::Iter<'_, Cell> {
        self.cells.iter()
    }

    /// Returns a board holding every cell live in either board.
    #[must_use]
    pub fn union(&self, other: &Board) -> Board {
        self.cells.union(&other.cells).copied().collect()
    }

    /// Removes every live cell, keeping the allocation.
    pub fn clear(&mut self) {
        self.cells.clear();
    }

    /// Returns the live cells sorted by row, then column.
    #[must_use]
    pub fn sorted(&self) -> Vec<Cell> {
        let mut cells: Vec<Cell> = self.cells.iter().copied().collect();
        cells.sort_by_key(|cell| (cell.y(), cell.x()));
        cells
    }
}

impl FromIterator<Cell> for Board {
    fn from_iter<I: IntoIterator<Item = Cell>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().collect(),
        }
    }
}

impl Extend<Cell> for Board {
    fn extend<I: IntoIterator<Item = Cell>>(&mut self, iter: I) {
        self.cells.extend(iter);
    }
}

impl IntoIterator for Board {
    type Item = Cell;
    type IntoIter = hash_set::IntoIter<Cell>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.into_iter()
    }
}

impl<'a> IntoIterator for &'a Board {
    type Item = &'a Cell;
    type IntoIter = hash_set::Iter<'a, Cell>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.iter()
    }
}

/// Rectangular domain in which cells may live, plus the birth/survive threshold.
///
/// Both edges are inclusive: a cell is inside when `0 <= x <= columns` and
/// `0 <= y <= rows`. Cells outside are discarded by every generation step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DomainBounds {
    columns: u32,
    rows: u32,
    survival_threshold: u8,
}

impl DomainBounds {
    /// Creates bounds with the default survival threshold.
    #[must_use]
    pub const fn new(columns: u32, rows: u32) -> Self {
        Self {
            columns,
            rows,
            survival_threshold: DEFAULT_SURVIVAL_THRESHOLD,
        }
    }

    /// Derives bounds from a screen size in pixels and a pixels-per-cell scale.
    pub fn from_screen(width: u32, height: u32, scale: u32) -> Result<Self, DomainError> {
        if scale == 0 {
            return Err(DomainError::ZeroScale);
        }
        Ok(Self::new(width / scale, height / scale))
    }

    /// Replaces the neighbor count used by the birth/survive rule.
    #[must_use]
    pub const fn with_survival_threshold(mut self, survival_threshold: u8) -> Self {
        self.survival_threshold = survival_threshold;
        self
    }

    /// Largest valid column.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Largest valid row.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Neighbor count that births a dead cell or sustains a live one.
    #[must_use]
    pub const fn survival_threshold(&self) -> u8 {
        self.survival_threshold
    }

    /// Reports whether the cell lies inside the inclusive domain rectangle.
    #[must_use]
    pub fn contains(&self, cell: Cell) -> bool {
        cell.x() >= 0
            && cell.y() >= 0
            && i64::from(cell.x()) <= i64::from(self.columns)
            && i64::from(cell.y()) <= i64::from(self.rows)
    }

    /// Number of distinct coordinates inside the domain.
    #[must_use]
    pub fn distinct_cells(&self) -> u64 {
        (u64::from(self.columns) + 1) * (u64::from(self.rows) + 1)
    }
}

/// Errors raised while deriving a [`DomainBounds`].
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq, Serialize, Deserialize)]
pub enum DomainError {
    /// The pixels-per-cell scale must be positive.
    #[error("cell scale must be positive")]
    ZeroScale,
}

/// Display color of a single cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellColor {
    red: u8,
    green: u8,
    blue: u8,
}

impl CellColor {
    /// Creates a new cell color from byte RGB components.
    #[must_use]
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Red component of the color.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Green component of the color.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Blue component of the color.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }
}

/// Named strategies for producing an initial board.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SeedStyle {
    /// Uniformly sampled cells across the whole domain.
    #[default]
    Random,
    /// Random cells kept only inside two annuli.
    Circle,
    /// Forty overlapping ring traces.
    CircleEdge,
    /// Four full-height vertical lines.
    Vertical,
    /// Full-width horizontal lines every 64 rows.
    Horizontal,
    /// Four rectangle outlines.
    Rectangles,
    /// Twelve square outlines in two rows.
    Squares,
    /// One large centered square outline.
    Whole,
    /// Cells drawn by the user with the pointer.
    #[serde(alias = "drawn")]
    Freehand,
}

impl SeedStyle {
    /// Every seed style in presentation order.
    pub const ALL: [SeedStyle; 9] = [
        SeedStyle::Random,
        SeedStyle::Circle,
        SeedStyle::CircleEdge,
        SeedStyle::Vertical,
        SeedStyle::Horizontal,
        SeedStyle::Rectangles,
        SeedStyle::Squares,
        SeedStyle::Whole,
        SeedStyle::Freehand,
    ];

    /// Canonical name used in settings files and on the command line.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            SeedStyle::Random => "random",
            SeedStyle::Circle => "circle",
            SeedStyle::CircleEdge => "circleEdge",
            SeedStyle::Vertical => "vertical",
            SeedStyle::Horizontal => "horizontal",
            SeedStyle::Rectangles => "rectangles",
            SeedStyle::Squares => "squares",
            SeedStyle::Whole => "whole",
            SeedStyle::Freehand => "freehand",
        }
    }

    /// Reports whether the style is produced by a generator rather than by drawing.
    #[must_use]
    pub const fn is_generated(self) -> bool {
        !matches!(self, SeedStyle::Freehand)
    }
}

impl fmt::Display for SeedStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SeedStyle {
    type Err = UnknownSeedStyle;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.eq_ignore_ascii_case("drawn") {
            return Ok(SeedStyle::Freehand);
        }
        SeedStyle::ALL
            .into_iter()
            .find(|style| style.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownSeedStyle(trimmed.to_owned()))
    }
}

/// Raised when a seed style name does not match any known strategy.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("unknown seed style '{0}'")]
pub struct UnknownSeedStyle(pub String);

/// Lifecycle phase of a simulation run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RunPhase {
    /// No run exists and no seed has been requested.
    #[default]
    Idle,
    /// A seed is being prepared, for example while the user draws.
    Seeding,
    /// Generations and decay ticks are advancing.
    Simulating,
    /// Every live cell decayed and the run stopped on its own.
    Completed,
    /// The run was stopped by an external request.
    Cancelled,
}

/// Occurrences that move a run between phases.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RunTrigger {
    /// A new seed was requested.
    BeginSeeding,
    /// A seed large enough to simulate was committed.
    SeedAccepted,
    /// A committed seed held too few cells.
    SeedRejected,
    /// One frame of decay ticks and one generation completed.
    FrameAdvanced,
    /// Every live cell reported its terminal decay state.
    AllDecayed,
    /// An external stop request was observed between frames.
    Cancel,
}

impl RunPhase {
    /// Resolves the phase reached when `trigger` occurs in this phase.
    pub fn on(self, trigger: RunTrigger) -> Result<RunPhase, RunError> {
        use RunPhase::{Cancelled, Completed, Idle, Seeding, Simulating};
        use RunTrigger::{
            AllDecayed, BeginSeeding, Cancel, FrameAdvanced, SeedAccepted, SeedRejected,
        };

        let next = match (self, trigger) {
            (Idle | Seeding | Completed | Cancelled, BeginSeeding) => Seeding,
            (Idle | Seeding | Completed | Cancelled, SeedAccepted) => Simulating,
            (Idle | Seeding | Completed | Cancelled, SeedRejected) => Seeding,
            (Seeding, Cancel) => Idle,
            (Simulating, FrameAdvanced) => Simulating,
            (Simulating, AllDecayed) => Completed,
            (Simulating, Cancel) => Cancelled,
            (Simulating, BeginSeeding | SeedAccepted | SeedRejected)
            | (Idle | Seeding | Completed | Cancelled, FrameAdvanced | AllDecayed)
            | (Idle | Completed | Cancelled, Cancel) => {
                return Err(RunError::InvalidTransition {
                    phase: self,
                    trigger,
                })
            }
        };
        Ok(next)
    }

    /// Reports whether a run is currently advancing.
    #[must_use]
    pub const fn is_simulating(self) -> bool {
        matches!(self, RunPhase::Simulating)
    }

    /// Reports whether the previous run has ended and a new seed is expected.
    #[must_use]
    pub const fn awaits_seed(self) -> bool {
        matches!(
            self,
            RunPhase::Idle | RunPhase::Completed | RunPhase::Cancelled
        )
    }
}

/// Recoverable conditions reported by the simulation controller.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunError {
    /// The committed seed held fewer live cells than a run requires.
    #[error("seed holds {cells} live cells but at least {minimum} are required")]
    InsufficientSeed {
        /// Live cells present in the rejected seed.
        cells: usize,
        /// Minimum live cells required to start a run.
        minimum: usize,
    },
    /// The requested command is not valid in the current phase.
    #[error("cannot apply {trigger:?} while the run is {phase:?}")]
    InvalidTransition {
        /// Phase the run was in when the command arrived.
        phase: RunPhase,
        /// Transition that was refused.
        trigger: RunTrigger,
    },
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Replaces the domain used by subsequent runs. Cancels any active run.
    ConfigureDomain {
        /// Domain rectangle and survival threshold to adopt.
        bounds: DomainBounds,
    },
    /// Announces that a seed is being prepared.
    BeginSeeding,
    /// Submits an initial board and starts a run when it is large enough.
    CommitSeed {
        /// Initial live cells.
        board: Board,
    },
    /// Runs one frame: a decay tick for every live cell and, unless the run
    /// completes, one generation step.
    AdvanceFrame,
    /// Stops the active run, or abandons seeding, between frames.
    CancelRun,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that the domain was replaced.
    DomainConfigured {
        /// Domain adopted by the world.
        bounds: DomainBounds,
    },
    /// Confirms that the world awaits a seed.
    SeedingStarted,
    /// Reports that a committed seed was discarded for being too sparse.
    SeedRejected {
        /// Live cells present in the rejected seed.
        cells: usize,
        /// Minimum live cells required to start a run.
        minimum: usize,
    },
    /// Confirms that a run started.
    RunStarted {
        /// Live cells on the settled initial board.
        cells: usize,
    },
    /// Reports the outcome of a frame that did not end the run.
    FrameAdvanced {
        /// Generation reached after the frame's step.
        generation: u64,
        /// Live cells after the frame's step.
        live_cells: usize,
        /// Cells that reported terminal decay during the frame.
        decayed_cells: usize,
    },
    /// Announces that every live cell decayed and the run stopped.
    RunCompleted {
        /// Generation at which the run ended.
        generation: u64,
    },
    /// Announces that the run was stopped on request.
    RunCancelled {
        /// Generation at which the run was stopped.
        generation: u64,
    },
    /// Announces that seeding was abandoned without starting a run.
    SeedingAborted,
    /// Reports that a command was refused in the current phase.
    CommandRejected {
        /// Reason the command was refused.
        error: RunError,
    },
}

#[cfg(test)]
mod tests {
    use super::{
        Board, Cell, CellColor, DomainBounds, DomainError, RunError, RunPhase, RunTrigger,
        SeedStyle, UnknownSeedStyle,
    };
    use serde::{de::DeserializeOwned, Serialize};

    #[test]
    fn neighbors_follow_moore_order() {
        let neighbors: Vec<Cell> = Cell::new(5, 5).neighbors().collect();
        assert_eq!(
            neighbors,
            vec![
                Cell::new(4, 4),
                Cell::new(5, 4),
                Cell::new(6, 4),
                Cell::new(4, 5),
                Cell::new(6, 5),
                Cell::new(4, 6),
                Cell::new(5, 6),
                Cell::new(6, 6),
            ]
        );
    }

    #[test]
    fn bounds_are_inclusive_on_both_edges() {
        let bounds = DomainBounds::new(10, 4);
        assert!(bounds.contains(Cell::new(0, 0)));
        assert!(bounds.contains(Cell::new(10, 4)));
        assert!(!bounds.contains(Cell::new(11, 4)));
        assert!(!bounds.contains(Cell::new(10, 5)));
        assert!(!bounds.contains(Cell::new(-1, 0)));
        assert_eq!(bounds.distinct_cells(), 55);
    }

    #[test]
    fn bounds_from_screen_divide_by_scale() {
        let bounds = DomainBounds::from_screen(2000, 500, 2).expect("positive scale");
        assert_eq!(bounds.columns(), 1000);
        assert_eq!(bounds.rows(), 250);
        assert_eq!(bounds.survival_threshold(), 3);
        assert_eq!(
            DomainBounds::from_screen(2000, 500, 0),
            Err(DomainError::ZeroScale)
        );
    }

    #[test]
    fn board_union_collapses_duplicates() {
        let first: Board = [Cell::new(0, 0), Cell::new(1, 0)].into_iter().collect();
        let second: Board = [Cell::new(1, 0), Cell::new(2, 0)].into_iter().collect();
        let union = first.union(&second);
        assert_eq!(union.len(), 3);
        assert_eq!(
            union.sorted(),
            vec![Cell::new(0, 0), Cell::new(1, 0), Cell::new(2, 0)]
        );
    }

    #[test]
    fn seed_style_names_parse_back() {
        for style in SeedStyle::ALL {
            assert_eq!(style.name().parse::<SeedStyle>(), Ok(style));
        }
        assert_eq!("drawn".parse::<SeedStyle>(), Ok(SeedStyle::Freehand));
        assert_eq!(
            "spiral".parse::<SeedStyle>(),
            Err(UnknownSeedStyle("spiral".to_owned()))
        );
        assert!(!SeedStyle::Freehand.is_generated());
        assert!(SeedStyle::CircleEdge.is_generated());
    }

    #[test]
    fn run_phase_follows_lifecycle() {
        let phase = RunPhase::Idle;
        let phase = phase.on(RunTrigger::BeginSeeding).expect("seeding allowed");
        assert_eq!(phase, RunPhase::Seeding);
        let phase = phase.on(RunTrigger::SeedRejected).expect("re-seed allowed");
        assert_eq!(phase, RunPhase::Seeding);
        let phase = phase.on(RunTrigger::SeedAccepted).expect("start allowed");
        assert_eq!(phase, RunPhase::Simulating);
        let phase = phase.on(RunTrigger::FrameAdvanced).expect("frames allowed");
        assert_eq!(phase, RunPhase::Simulating);
        let phase = phase.on(RunTrigger::AllDecayed).expect("completion allowed");
        assert_eq!(phase, RunPhase::Completed);
        assert!(phase.awaits_seed());
    }

    #[test]
    fn run_phase_rejects_frames_without_run() {
        assert_eq!(
            RunPhase::Completed.on(RunTrigger::FrameAdvanced),
            Err(RunError::InvalidTransition {
                phase: RunPhase::Completed,
                trigger: RunTrigger::FrameAdvanced,
            })
        );
        assert!(RunPhase::Simulating.on(RunTrigger::SeedAccepted).is_err());
        assert!(RunPhase::Idle.on(RunTrigger::Cancel).is_err());
        assert_eq!(RunPhase::Seeding.on(RunTrigger::Cancel), Ok(RunPhase::Idle));
        assert_eq!(
            RunPhase::Simulating.on(RunTrigger::Cancel),
            Ok(RunPhase::Cancelled)
        );
    }

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn value_types_round_trip_through_bincode() {
        assert_round_trip(&Cell::new(-3, 7));
        assert_round_trip(&DomainBounds::new(64, 32).with_survival_threshold(4));
        assert_round_trip(&CellColor::from_rgb(0, 0, 80));
        assert_round_trip(&SeedStyle::CircleEdge);
        assert_round_trip(&RunError::InsufficientSeed {
            cells: 12,
            minimum: 100,
        });
    }
}
