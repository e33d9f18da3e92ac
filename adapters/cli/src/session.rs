//! Endless sequence of runs driven one frame at a time.

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use glam::Vec2;
use log::{debug, info, warn};
use nebula_life_core::{Board, Command, DomainBounds, Event, RunPhase, SeedStyle};
use nebula_life_rendering::{
    CellPresentation, FrameInput, FreehandCapture, Scene, StatsOverlay, StrokeEvent,
};
use nebula_life_system_seeding::{freehand, FreehandSeed, SeedGenerator, SeedParameters};
use nebula_life_world::{self as world, query, World};
use rand::Rng;

use crate::settings::Settings;

/// Couples the world with seeding and drawing input.
///
/// Whenever a run ends the session asks for a new seed of the configured
/// style, so runs follow each other until the adapter stops calling
/// [`Session::frame`].
#[derive(Debug)]
pub(crate) struct Session<R> {
    world: World,
    generator: SeedGenerator,
    style: SeedStyle,
    rng: R,
    capture: FreehandCapture,
    pending: Option<Board>,
    scale: u32,
    show_stats: bool,
    last_step: Duration,
    events: Vec<Event>,
}

impl<R: Rng> Session<R> {
    pub(crate) fn new(settings: &Settings, rng: R) -> Result<Self> {
        let bounds =
            DomainBounds::from_screen(settings.screen_width, settings.screen_height, settings.scale)
                .context("failed to derive the simulation domain")?;
        let capture = FreehandCapture::new(settings.scale)
            .context("failed to configure freehand drawing")?;
        Ok(Self {
            world: World::new(bounds),
            generator: SeedGenerator::new(
                bounds,
                SeedParameters::new(settings.population, settings.scale),
            ),
            style: settings.style,
            rng,
            capture,
            pending: None,
            scale: settings.scale,
            show_stats: settings.show_stats,
            last_step: Duration::ZERO,
            events: Vec::new(),
        })
    }

    /// Domain every run is simulated in.
    pub(crate) fn bounds(&self) -> DomainBounds {
        query::bounds(&self.world)
    }

    pub(crate) fn phase(&self) -> RunPhase {
        query::phase(&self.world)
    }

    /// Processes one frame of input and returns the events it produced.
    pub(crate) fn frame(&mut self, input: &FrameInput) -> &[Event] {
        self.events.clear();

        if let Some(screen) = input.screen {
            self.fit_screen(screen);
        }

        if input.cancel_run && !self.phase().awaits_seed() {
            self.capture.reset();
            self.pending = None;
            self.submit(Command::CancelRun);
        }

        if self.phase().awaits_seed() {
            self.submit(Command::BeginSeeding);
        }

        match self.phase() {
            RunPhase::Seeding if self.style.is_generated() => self.seed_generated(),
            RunPhase::Seeding => self.seed_freehand(input),
            RunPhase::Simulating => {
                let started = Instant::now();
                self.submit(Command::AdvanceFrame);
                self.last_step = started.elapsed();
            }
            RunPhase::Idle | RunPhase::Completed | RunPhase::Cancelled => {}
        }

        &self.events
    }

    /// Resizes the domain to the window the backend actually opened.
    fn fit_screen(&mut self, screen: Vec2) {
        let (width, height) = (screen.x.max(0.0) as u32, screen.y.max(0.0) as u32);
        if width < self.scale || height < self.scale {
            return;
        }
        let bounds = match DomainBounds::from_screen(width, height, self.scale) {
            Ok(bounds) => bounds,
            Err(error) => {
                warn!("{error}");
                return;
            }
        };
        if bounds == self.bounds() {
            return;
        }

        info!(
            "window is {width}x{height} pixels; using a {}x{} domain",
            bounds.columns(),
            bounds.rows()
        );
        self.generator = SeedGenerator::new(bounds, self.generator.parameters());
        self.capture.reset();
        self.pending = None;
        self.submit(Command::ConfigureDomain { bounds });
    }

    fn seed_generated(&mut self) {
        match self.generator.generate(self.style, &mut self.rng) {
            Ok(board) => {
                debug!("generated {} seed cells in the {} style", board.len(), self.style);
                self.submit(Command::CommitSeed { board });
            }
            Err(error) => warn!("{error}"),
        }
    }

    fn seed_freehand(&mut self, input: &FrameInput) {
        match self.capture.update(input) {
            Some(StrokeEvent::Finished(stroke)) => {
                match freehand(self.pending.as_ref(), stroke) {
                    FreehandSeed::Viable(board) => {
                        self.pending = None;
                        self.submit(Command::CommitSeed { board });
                    }
                    FreehandSeed::Insufficient(board) => {
                        debug!("sketch holds {} cells; keep drawing", board.len());
                        self.pending = Some(board);
                    }
                }
            }
            Some(StrokeEvent::Aborted) => {
                self.pending = None;
                self.submit(Command::CancelRun);
            }
            None => {}
        }
    }

    fn submit(&mut self, command: Command) {
        world::apply(&mut self.world, command, &mut self.events);
    }

    /// Refreshes `scene` with the current board colors, sketch and stats.
    pub(crate) fn populate_scene(&self, scene: &mut Scene) {
        let bounds = self.bounds();
        scene.columns = bounds.columns();
        scene.rows = bounds.rows();

        scene.cells.clear();
        scene.cells.extend(
            query::painted_cells(&self.world)
                .map(|(cell, color)| CellPresentation::new(cell, color)),
        );

        scene.sketch.clear();
        if let Some(pending) = &self.pending {
            scene.sketch.extend(pending.iter().copied());
        }
        if let Some(stroke) = self.capture.stroke() {
            scene.sketch.extend(stroke.iter().copied());
        }

        scene.stats = self.show_stats.then(|| StatsOverlay {
            step_time: self.last_step,
            cells: query::board(&self.world).len(),
            generation: query::generation(&self.world),
        });
    }
}
