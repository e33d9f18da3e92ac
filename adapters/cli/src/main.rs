#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots Nebula Life.

mod headless;
mod session;
mod settings;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use nebula_life_core::SeedStyle;
use nebula_life_rendering::{Color, Presentation, RenderingBackend, Scene};
use nebula_life_rendering_macroquad::MacroquadBackend;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::{headless::HeadlessOutcome, session::Session, settings::Settings};

const WINDOW_TITLE: &str = "Nebula Life";

/// Command-line flags. Each optional flag overrides the matching settings key.
#[derive(Debug, Parser)]
#[command(name = "nebula-life")]
#[command(about = "Game of Life with per-cell color decay")]
struct Args {
    /// Path to the settings file
    #[arg(long, default_value = "settings.toml")]
    settings: PathBuf,

    /// Pixels per cell
    #[arg(long)]
    scale: Option<u32>,

    /// Fraction of the domain sampled by the random styles
    #[arg(long)]
    population: Option<f64>,

    /// Cover the whole screen
    #[arg(long)]
    fullscreen: Option<bool>,

    /// Window width in pixels
    #[arg(long)]
    screen_width: Option<u32>,

    /// Window height in pixels
    #[arg(long)]
    screen_height: Option<u32>,

    /// Seed style: random, circle, circleEdge, vertical, horizontal, rectangles,
    /// squares, whole or freehand
    #[arg(long)]
    style: Option<SeedStyle>,

    /// Draw paint time, step time and cell count
    #[arg(long)]
    show_stats: Option<bool>,

    /// Write the merged settings back to the settings file
    #[arg(long)]
    save: bool,

    /// Simulate without opening a window
    #[arg(long)]
    headless: bool,

    /// Stop a headless run after this many frames
    #[arg(long)]
    max_frames: Option<u64>,

    /// Seed for the random styles; runs are reproducible when set
    #[arg(long)]
    rng_seed: Option<u64>,
}

impl Args {
    /// Overrides `settings` with every flag that was provided.
    fn apply(&self, mut settings: Settings) -> Settings {
        if let Some(scale) = self.scale {
            settings.scale = scale;
        }
        if let Some(population) = self.population {
            settings.population = population;
        }
        if let Some(fullscreen) = self.fullscreen {
            settings.fullscreen = fullscreen;
        }
        if let Some(width) = self.screen_width {
            settings.screen_width = width;
        }
        if let Some(height) = self.screen_height {
            settings.screen_height = height;
        }
        if let Some(style) = self.style {
            settings.style = style;
        }
        if let Some(show_stats) = self.show_stats {
            settings.show_stats = show_stats;
        }
        settings
    }

    fn rng(&self) -> ChaCha8Rng {
        match self.rng_seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        }
    }
}

/// Entry point for the Nebula Life command-line interface.
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let settings = args.apply(Settings::load(&args.settings)?);
    settings.validate().context("invalid settings")?;

    if args.save {
        settings.save(&args.settings)?;
        info!("settings saved to {}", args.settings.display());
    }

    if args.headless {
        run_headless(&args, &settings)
    } else {
        run_windowed(&args, settings)
    }
}

fn run_headless(args: &Args, settings: &Settings) -> Result<()> {
    headless::ensure_supported(settings.style)?;
    let mut session = Session::new(settings, args.rng())?;
    let bounds = session.bounds();
    info!(
        "headless {} run on a {}x{} domain",
        settings.style,
        bounds.columns(),
        bounds.rows()
    );

    let summary = headless::run(&mut session, args.max_frames);
    match summary.outcome {
        HeadlessOutcome::Completed { generation } => println!(
            "completed at generation {generation} after {} frames ({} seeds rejected)",
            summary.frames, summary.rejected_seeds
        ),
        HeadlessOutcome::FrameLimit { live_cells } => println!(
            "stopped after {} frames with {live_cells} live cells ({} seeds rejected)",
            summary.frames, summary.rejected_seeds
        ),
    }
    Ok(())
}

fn run_windowed(args: &Args, settings: Settings) -> Result<()> {
    let mut session = Session::new(&settings, args.rng())?;
    let bounds = session.bounds();
    let scene = Scene::new(bounds.columns(), bounds.rows(), settings.scale)
        .context("failed to build the initial scene")?;
    let presentation = Presentation::new(WINDOW_TITLE, Color::BLACK, scene);

    let backend = MacroquadBackend::new()
        .with_fullscreen(settings.fullscreen)
        .with_window_size(settings.screen_width, settings.screen_height)
        .with_show_fps(settings.show_stats);

    info!("starting {} runs", settings.style);
    backend.run(presentation, move |_dt, input, scene| {
        let _ = session.frame(&input);
        session.populate_scene(scene);
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_settings_keys() {
        let args = Args::parse_from([
            "nebula-life",
            "--scale",
            "4",
            "--style",
            "circleEdge",
            "--fullscreen",
            "false",
            "--show-stats",
            "true",
        ]);
        let merged = args.apply(Settings::default());
        assert_eq!(merged.scale, 4);
        assert_eq!(merged.style, SeedStyle::CircleEdge);
        assert!(!merged.fullscreen);
        assert!(merged.show_stats);
        assert_eq!(merged.population, Settings::default().population);
        assert_eq!(args.settings, PathBuf::from("settings.toml"));
    }

    #[test]
    fn absent_flags_keep_settings() {
        let args = Args::parse_from(["nebula-life"]);
        let settings = Settings {
            scale: 5,
            style: SeedStyle::Whole,
            ..Settings::default()
        };
        assert_eq!(args.apply(settings.clone()), settings);
        assert!(!args.headless && !args.save);
    }

    #[test]
    fn unknown_style_is_a_parse_error() {
        assert!(Args::try_parse_from(["nebula-life", "--style", "spiral"]).is_err());
        let args = Args::try_parse_from(["nebula-life", "--style", "drawn"]).expect("alias");
        assert_eq!(args.style, Some(SeedStyle::Freehand));
    }

    #[test]
    fn seeded_rng_is_reproducible() {
        use rand::Rng;

        let args = Args::parse_from(["nebula-life", "--rng-seed", "9"]);
        let first: u64 = args.rng().gen();
        let second: u64 = args.rng().gen();
        assert_eq!(first, second);
    }
}
