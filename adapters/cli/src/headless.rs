//! Windowless runs used for batch experiments and smoke tests.

use anyhow::{bail, Result};
use log::info;
use nebula_life_core::{Event, SeedStyle};
use nebula_life_rendering::FrameInput;
use rand::Rng;

use crate::session::Session;

/// How a headless run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum HeadlessOutcome {
    /// Every live cell decayed.
    Completed {
        /// Generation at which the run ended.
        generation: u64,
    },
    /// The frame limit was reached first.
    FrameLimit {
        /// Live cells when the limit was hit.
        live_cells: usize,
    },
}

/// Summary of a headless run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct HeadlessSummary {
    /// Frames processed, including the seeding frame.
    pub(crate) frames: u64,
    /// Seeds discarded for being too sparse.
    pub(crate) rejected_seeds: u32,
    /// How the run ended.
    pub(crate) outcome: HeadlessOutcome,
}

/// Refuses styles that need a pointer.
pub(crate) fn ensure_supported(style: SeedStyle) -> Result<()> {
    if !style.is_generated() {
        bail!("the {style} style needs a window to draw in; pick a generated style");
    }
    Ok(())
}

/// Drives a single run to completion or until `max_frames` frames have passed.
pub(crate) fn run<R: Rng>(session: &mut Session<R>, max_frames: Option<u64>) -> HeadlessSummary {
    let input = FrameInput::default();
    let mut frames = 0;
    let mut rejected_seeds = 0;
    let mut live_cells = 0;

    while max_frames.map_or(true, |limit| frames < limit) {
        frames += 1;
        for event in session.frame(&input) {
            match *event {
                Event::SeedRejected { .. } => rejected_seeds += 1,
                Event::RunStarted { cells } => live_cells = cells,
                Event::FrameAdvanced { live_cells: cells, .. } => live_cells = cells,
                Event::RunCompleted { generation } => {
                    let outcome = HeadlessOutcome::Completed { generation };
                    info!(
                        "headless run completed at generation {generation} after {frames} frames"
                    );
                    return HeadlessSummary {
                        frames,
                        rejected_seeds,
                        outcome,
                    };
                }
                _ => {}
            }
        }
    }

    info!("headless run stopped after {frames} frames with {live_cells} live cells");
    HeadlessSummary {
        frames,
        rejected_seeds,
        outcome: HeadlessOutcome::FrameLimit { live_cells },
    }
}
