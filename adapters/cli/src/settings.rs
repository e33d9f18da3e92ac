//! Persisted user settings.

use std::{fs, path::Path};

use anyhow::{ensure, Context, Result};
use nebula_life_core::SeedStyle;
use serde::{Deserialize, Serialize};

/// Settings read from and written to `settings.toml`.
///
/// Keys missing from the file fall back to their defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct Settings {
    /// Pixels per cell.
    pub(crate) scale: u32,
    /// Fraction of the domain sampled by the random styles.
    pub(crate) population: f64,
    /// Whether the window covers the whole screen.
    pub(crate) fullscreen: bool,
    /// Window width in pixels.
    pub(crate) screen_width: u32,
    /// Window height in pixels.
    pub(crate) screen_height: u32,
    /// Seed style used for every run.
    pub(crate) style: SeedStyle,
    /// Whether the stats overlay is drawn.
    pub(crate) show_stats: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            scale: 2,
            population: 0.06,
            fullscreen: true,
            screen_width: 2000,
            screen_height: 500,
            style: SeedStyle::Random,
            show_stats: false,
        }
    }
}

impl Settings {
    /// Reads settings from `path`, returning defaults when the file does not exist.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings from {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("failed to load settings from {}", path.display()))
    }

    pub(crate) fn parse(contents: &str) -> Result<Self> {
        let settings: Settings =
            toml::from_str(contents).context("failed to parse settings toml contents")?;
        settings.validate()?;
        Ok(settings)
    }

    /// Writes the settings to `path`, replacing any previous file.
    pub(crate) fn save(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self).context("failed to serialise settings")?;
        fs::write(path, contents)
            .with_context(|| format!("failed to write settings to {}", path.display()))
    }

    /// Rejects values the simulation cannot run with.
    pub(crate) fn validate(&self) -> Result<()> {
        ensure!(self.scale > 0, "scale must be positive");
        ensure!(
            (0.0..=1.0).contains(&self.population),
            "population must lie within 0.0..=1.0 (received {})",
            self.population
        );
        ensure!(
            self.screen_width >= self.scale && self.screen_height >= self.scale,
            "screen size {}x{} is smaller than one cell",
            self.screen_width,
            self.screen_height
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let settings = Settings::parse("scale = 4\nstyle = \"circleEdge\"\n").expect("valid toml");
        assert_eq!(settings.scale, 4);
        assert_eq!(settings.style, SeedStyle::CircleEdge);
        assert_eq!(settings.population, 0.06);
        assert!(settings.fullscreen);
        assert_eq!((settings.screen_width, settings.screen_height), (2000, 500));
        assert!(!settings.show_stats);
    }

    #[test]
    fn legacy_drawn_style_is_accepted() {
        let settings = Settings::parse("style = \"drawn\"").expect("valid toml");
        assert_eq!(settings.style, SeedStyle::Freehand);
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(Settings::parse("scale = 0").is_err());
        assert!(Settings::parse("population = 1.5").is_err());
        assert!(Settings::parse("style = \"spiral\"").is_err());
        assert!(Settings::parse("screen_width = 1\nscale = 2").is_err());
    }

    #[test]
    fn settings_survive_a_save_and_load() {
        let path = std::env::temp_dir().join(format!(
            "nebula-life-settings-{}.toml",
            std::process::id()
        ));
        let settings = Settings {
            scale: 3,
            population: 0.25,
            fullscreen: false,
            screen_width: 900,
            screen_height: 600,
            style: SeedStyle::Squares,
            show_stats: true,
        };
        settings.save(&path).expect("settings written");
        let loaded = Settings::load(&path).expect("settings read");
        fs::remove_file(&path).expect("temporary settings removed");
        assert_eq!(loaded, settings);
    }

    #[test]
    fn absent_file_yields_defaults() {
        let path = std::env::temp_dir().join("nebula-life-settings-that-do-not-exist.toml");
        assert_eq!(Settings::load(&path).expect("defaults"), Settings::default());
    }
}
