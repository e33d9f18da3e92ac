#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Nebula Life.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, so the crate depends on macroquad without its default `audio`
//! feature.

use anyhow::Result;
use glam::Vec2;
use log::info;
use macroquad::input::{
    is_key_pressed, is_mouse_button_down, is_mouse_button_pressed, is_mouse_button_released,
    mouse_position, KeyCode, MouseButton,
};
use nebula_life_core::Cell;
use nebula_life_rendering::{
    Color, FrameInput, Presentation, RenderingBackend, Scene, StatsOverlay,
};
use std::time::{Duration, Instant};

const STATS_FONT_SIZE: f32 = 20.0;
const STATS_MARGIN: f32 = 10.0;

#[derive(Clone, Copy, Debug, Default)]
struct KeyboardShortcuts {
    /// `Q` or `Escape` to quit the render loop.
    quit_requested: bool,
    /// `Space` stops the current run.
    cancel_run: bool,
}

impl KeyboardShortcuts {
    fn poll() -> Self {
        Self {
            quit_requested: is_key_pressed(KeyCode::Escape) || is_key_pressed(KeyCode::Q),
            cancel_run: is_key_pressed(KeyCode::Space),
        }
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug)]
pub struct MacroquadBackend {
    fullscreen: bool,
    window_width: u32,
    window_height: u32,
    show_fps: bool,
}

impl Default for MacroquadBackend {
    fn default() -> Self {
        Self {
            fullscreen: true,
            window_width: 2000,
            window_height: 500,
            show_fps: false,
        }
    }
}

impl MacroquadBackend {
    /// Returns a fullscreen backend with FPS logging disabled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures whether the window covers the whole screen.
    #[must_use]
    pub fn with_fullscreen(mut self, fullscreen: bool) -> Self {
        self.fullscreen = fullscreen;
        self
    }

    /// Configures the window size in pixels used when not fullscreen.
    #[must_use]
    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        self.window_width = width;
        self.window_height = height;
        self
    }

    /// Configures whether the backend logs frame rate metrics once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }

    fn window_conf(&self, window_title: String) -> macroquad::window::Conf {
        macroquad::window::Conf {
            window_title,
            window_width: clamp_dimension(self.window_width),
            window_height: clamp_dimension(self.window_height),
            fullscreen: self.fullscreen,
            ..macroquad::window::Conf::default()
        }
    }
}

fn clamp_dimension(pixels: u32) -> i32 {
    i32::try_from(pixels.max(1)).unwrap_or(i32::MAX)
}

#[derive(Debug, Default)]
struct FpsCounter {
    elapsed: Duration,
    frames: u32,
    paint_accum: Duration,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct FpsMetrics {
    per_second: f32,
    avg_paint: Duration,
}

impl FpsCounter {
    /// Records a rendered frame and returns averages once one second has elapsed.
    fn record_frame(&mut self, frame: Duration, paint: Duration) -> Option<FpsMetrics> {
        self.elapsed += frame;
        self.frames = self.frames.saturating_add(1);
        self.paint_accum += paint;

        if self.elapsed < Duration::from_secs(1) {
            return None;
        }

        let seconds = self.elapsed.as_secs_f32();
        let metrics = FpsMetrics {
            per_second: self.frames as f32 / seconds,
            avg_paint: self.paint_accum / self.frames.max(1),
        };
        *self = Self::default();
        Some(metrics)
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static,
    {
        let Presentation {
            window_title,
            clear_color,
            scene,
        } = presentation;

        let config = self.window_conf(window_title);
        let show_fps = self.show_fps;
        info!(
            "opening {}x{} window (fullscreen: {})",
            config.window_width, config.window_height, config.fullscreen
        );

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let background = to_macroquad_color(clear_color);
            let mut fps_counter = FpsCounter::default();
            let mut last_paint = Duration::ZERO;

            loop {
                let keyboard = KeyboardShortcuts::poll();
                if keyboard.quit_requested {
                    break;
                }

                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));
                let frame_input = gather_frame_input(keyboard);

                update_scene(frame_dt, frame_input, &mut scene);

                let paint_start = Instant::now();
                macroquad::window::clear_background(background);
                draw_cells(&scene);
                draw_sketch(&scene);
                if let Some(stats) = scene.stats {
                    draw_stats(&stats, last_paint);
                }
                last_paint = paint_start.elapsed();

                if let Some(metrics) = fps_counter.record_frame(frame_dt, last_paint) {
                    if show_fps {
                        info!(
                            "FPS: {:.2} | paint: {:>6.2}ms",
                            metrics.per_second,
                            metrics.avg_paint.as_secs_f64() * 1_000.0
                        );
                    }
                }

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

fn gather_frame_input(keyboard: KeyboardShortcuts) -> FrameInput {
    let (cursor_x, cursor_y) = mouse_position();
    FrameInput {
        pointer: Some(Vec2::new(cursor_x, cursor_y)),
        primary_pressed: is_mouse_button_pressed(MouseButton::Left),
        primary_down: is_mouse_button_down(MouseButton::Left),
        primary_released: is_mouse_button_released(MouseButton::Left),
        secondary_pressed: is_mouse_button_pressed(MouseButton::Right),
        cancel_run: keyboard.cancel_run,
        screen: Some(Vec2::new(
            macroquad::window::screen_width(),
            macroquad::window::screen_height(),
        )),
    }
}

/// Pixel rectangle `(x, y, width, height)` covered by `cell`.
fn cell_rect(scene: &Scene, cell: Cell) -> (f32, f32, f32, f32) {
    let origin = scene.cell_origin(cell);
    let size = scene.cell_size();
    (origin.x, origin.y, size, size)
}

fn draw_cells(scene: &Scene) {
    for presentation in &scene.cells {
        let (x, y, width, height) = cell_rect(scene, presentation.cell);
        let color = to_macroquad_color(presentation.color);
        macroquad::shapes::draw_rectangle(x, y, width, height, color);
    }
}

fn draw_sketch(scene: &Scene) {
    let white = to_macroquad_color(Color::WHITE);
    for &cell in &scene.sketch {
        let (x, y, width, height) = cell_rect(scene, cell);
        macroquad::shapes::draw_rectangle(x, y, width, height, white);
    }
}

fn draw_stats(stats: &StatsOverlay, paint: Duration) {
    let green = to_macroquad_color(Color::STATS_GREEN);
    for (index, line) in stats_lines(stats, paint).iter().enumerate() {
        let baseline = STATS_MARGIN + STATS_FONT_SIZE * (index as f32 + 1.0);
        macroquad::text::draw_text(line, STATS_MARGIN, baseline, STATS_FONT_SIZE, green);
    }
}

fn stats_lines(stats: &StatsOverlay, paint: Duration) -> [String; 4] {
    [
        format!("paint: {:.2} ms", paint.as_secs_f64() * 1_000.0),
        format!("step: {:.2} ms", stats.step_time.as_secs_f64() * 1_000.0),
        format!("cells: {}", stats.cells),
        format!("generation: {}", stats.generation),
    ]
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_rect_scales_grid_coordinates() {
        let scene = Scene::new(100, 50, 3).expect("valid scale");
        assert_eq!(cell_rect(&scene, Cell::new(4, 2)), (12.0, 6.0, 3.0, 3.0));
        assert_eq!(cell_rect(&scene, Cell::new(0, 0)), (0.0, 0.0, 3.0, 3.0));
    }

    #[test]
    fn stats_lines_report_times_in_milliseconds() {
        let stats = StatsOverlay {
            step_time: Duration::from_micros(1_500),
            cells: 4_321,
            generation: 17,
        };
        let lines = stats_lines(&stats, Duration::from_millis(3));
        assert_eq!(
            lines,
            [
                "paint: 3.00 ms".to_owned(),
                "step: 1.50 ms".to_owned(),
                "cells: 4321".to_owned(),
                "generation: 17".to_owned(),
            ]
        );
    }

    #[test]
    fn window_conf_reflects_builder_options() {
        let backend = MacroquadBackend::new()
            .with_fullscreen(false)
            .with_window_size(800, 600);
        let config = backend.window_conf("nebula".to_owned());
        assert_eq!(config.window_title, "nebula");
        assert_eq!((config.window_width, config.window_height), (800, 600));
        assert!(!config.fullscreen);
    }

    #[test]
    fn fps_counter_reports_average_after_one_second() {
        let mut counter = FpsCounter::default();
        let frame = Duration::from_millis(250);
        let paint = Duration::from_millis(2);
        assert!(counter.record_frame(frame, paint).is_none());
        assert!(counter.record_frame(frame, paint).is_none());
        assert!(counter.record_frame(frame, paint).is_none());

        let metrics = counter
            .record_frame(frame, paint)
            .expect("should report FPS after one second of samples");
        assert!((metrics.per_second - 4.0).abs() <= 1e-3);
        assert_eq!(metrics.avg_paint, paint);
        assert!(counter.record_frame(frame, paint).is_none());
    }

    #[test]
    fn macroquad_colors_keep_channels() {
        let color = to_macroquad_color(Color::new(0.25, 0.5, 0.75, 1.0));
        assert_eq!((color.r, color.g, color.b, color.a), (0.25, 0.5, 0.75, 1.0));
    }
}
