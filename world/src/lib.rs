#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative run state for Nebula Life.
//!
//! The world owns the live board, the decay side table and the run phase.
//! Adapters mutate it exclusively through [`apply`] and observe it through the
//! read-only [`query`] module.

mod decay_table;

use log::{debug, info, trace, warn};
use nebula_life_core::{
    Board, Command, DomainBounds, Event, RunError, RunPhase, RunTrigger, MIN_SEED_CELLS,
};
use nebula_life_system_decay::DecayProfile;
use nebula_life_system_stepper::Stepper;

use crate::decay_table::DecayTable;

/// Represents the authoritative Nebula Life world state.
#[derive(Debug)]
pub struct World {
    bounds: DomainBounds,
    phase: RunPhase,
    board: Board,
    decay: DecayTable,
    profile: DecayProfile,
    generation: u64,
    stepper: Stepper,
}

impl World {
    /// Creates an idle world for the provided domain.
    #[must_use]
    pub fn new(bounds: DomainBounds) -> Self {
        Self {
            bounds,
            phase: RunPhase::Idle,
            board: Board::new(),
            decay: DecayTable::new(),
            profile: DecayProfile::DEFAULT,
            generation: 0,
            stepper: Stepper::new(),
        }
    }

    /// Replaces the decay profile applied to cells of subsequent runs.
    #[must_use]
    pub fn with_decay_profile(mut self, profile: DecayProfile) -> Self {
        self.profile = profile;
        self
    }

    /// Moves to the phase reached by `trigger`, reporting refusals as events.
    fn transition(&mut self, trigger: RunTrigger, out_events: &mut Vec<Event>) -> bool {
        match self.phase.on(trigger) {
            Ok(next) => {
                debug!("run phase {:?} -> {:?} on {:?}", self.phase, next, trigger);
                self.phase = next;
                true
            }
            Err(error) => {
                warn!("{error}");
                out_events.push(Event::CommandRejected { error });
                false
            }
        }
    }

    fn commit_seed(&mut self, board: Board, out_events: &mut Vec<Event>) {
        let cells = board.len();
        if cells < MIN_SEED_CELLS {
            if self.transition(RunTrigger::SeedRejected, out_events) {
                let error = RunError::InsufficientSeed {
                    cells,
                    minimum: MIN_SEED_CELLS,
                };
                info!("{error}; awaiting another seed");
                out_events.push(Event::SeedRejected {
                    cells,
                    minimum: MIN_SEED_CELLS,
                });
            }
            return;
        }

        if !self.transition(RunTrigger::SeedAccepted, out_events) {
            return;
        }

        // One step discards seed cells outside the domain before anything is painted.
        self.board = self.stepper.step(&board, &self.bounds);
        self.decay.reset_for(&self.board, &self.profile);
        self.generation = 0;

        info!(
            "run started with {} seed cells settling to {}",
            cells,
            self.board.len()
        );
        out_events.push(Event::RunStarted {
            cells: self.board.len(),
        });
    }

    fn advance_frame(&mut self, out_events: &mut Vec<Event>) {
        if !self.phase.is_simulating() {
            let _ = self.transition(RunTrigger::FrameAdvanced, out_events);
            return;
        }

        let mut decayed_cells = 0;
        for &cell in &self.board {
            if self.decay.advance(cell, &self.profile) {
                decayed_cells += 1;
            }
        }

        if decayed_cells == self.board.len() {
            if self.transition(RunTrigger::AllDecayed, out_events) {
                info!(
                    "run completed at generation {} with {} cells decayed",
                    self.generation, decayed_cells
                );
                out_events.push(Event::RunCompleted {
                    generation: self.generation,
                });
                self.reset_run();
            }
            return;
        }

        let decay = &mut self.decay;
        let profile = &self.profile;
        self.board = self
            .stepper
            .step_visiting(&self.board, &self.bounds, |cell| decay.track(cell, profile));
        self.generation = self.generation.saturating_add(1);

        if self.transition(RunTrigger::FrameAdvanced, out_events) {
            trace!(
                "generation {}: {} live, {} decayed, {} tracked",
                self.generation,
                self.board.len(),
                decayed_cells,
                self.decay.len()
            );
            out_events.push(Event::FrameAdvanced {
                generation: self.generation,
                live_cells: self.board.len(),
                decayed_cells,
            });
        }
    }

    fn cancel(&mut self, out_events: &mut Vec<Event>) {
        let was_simulating = self.phase.is_simulating();
        if !self.transition(RunTrigger::Cancel, out_events) {
            return;
        }

        if was_simulating {
            info!("run cancelled at generation {}", self.generation);
            out_events.push(Event::RunCancelled {
                generation: self.generation,
            });
            self.reset_run();
        } else {
            info!("seeding aborted");
            out_events.push(Event::SeedingAborted);
        }
    }

    fn reset_run(&mut self) {
        self.board.clear();
        self.decay.clear();
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureDomain { bounds } => {
            if world.phase.is_simulating() {
                world.cancel(out_events);
            }
            world.bounds = bounds;
            info!(
                "domain configured to {}x{} cells",
                bounds.columns(),
                bounds.rows()
            );
            out_events.push(Event::DomainConfigured { bounds });
        }
        Command::BeginSeeding => {
            if world.transition(RunTrigger::BeginSeeding, out_events) {
                out_events.push(Event::SeedingStarted);
            }
        }
        Command::CommitSeed { board } => world.commit_seed(board, out_events),
        Command::AdvanceFrame => world.advance_frame(out_events),
        Command::CancelRun => world.cancel(out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use nebula_life_core::{Board, Cell, CellColor, DomainBounds, RunPhase};
    use nebula_life_system_decay::{CellDecayState, DecayProfile};

    use super::World;

    /// Current lifecycle phase.
    #[must_use]
    pub fn phase(world: &World) -> RunPhase {
        world.phase
    }

    /// Generations stepped since the active run started.
    #[must_use]
    pub fn generation(world: &World) -> u64 {
        world.generation
    }

    /// Domain in which runs are simulated.
    #[must_use]
    pub fn bounds(world: &World) -> DomainBounds {
        world.bounds
    }

    /// Live cells of the active run. Empty outside a run.
    #[must_use]
    pub fn board(world: &World) -> &Board {
        &world.board
    }

    /// Decay profile applied to every cell.
    #[must_use]
    pub fn decay_profile(world: &World) -> &DecayProfile {
        &world.profile
    }

    /// Decay state recorded for `cell`, if the run has tracked it.
    #[must_use]
    pub fn decay_state(world: &World, cell: Cell) -> Option<&CellDecayState> {
        world.decay.get(cell)
    }

    /// Number of cells carrying decay history, live or not.
    #[must_use]
    pub fn tracked_cells(world: &World) -> usize {
        world.decay.len()
    }

    /// Yields every live cell together with the color it should be painted.
    pub fn painted_cells(world: &World) -> impl Iterator<Item = (Cell, CellColor)> + '_ {
        let fresh = world.profile.initial_color();
        world.board.iter().map(move |&cell| {
            let color = world
                .decay
                .get(cell)
                .map_or(fresh, CellDecayState::color);
            (cell, color)
        })
    }
}
