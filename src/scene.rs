// Copyright (c) 2026 rezky_nightky

use std::f64::consts::TAU;

use crate::{
    cell::Cell,
    frame::Frame,
    glyphs::GlyphRamp,
    palette::{attenuate, modulate, sample_stops, Palette},
    particles::ParticleField,
    pattern::{fluid_pattern, wave_pattern, PatternGrid},
    runtime::{ColorMode, ColorScheme},
};

// Virtual size of the backdrop layer; the visible window scrolls across
// it with a parallax offset.
const WAVE_COLS: u16 = 200;
const WAVE_ROWS: u16 = 60;

// Pulse keyframe: backdrop brightness swings 0.3..0.7 over 3 seconds.
const PULSE_PERIOD_S: f64 = 3.0;
const PULSE_FLOOR: f32 = 0.3;
const PULSE_SWING: f32 = 0.4;

const PANEL_MARGIN: u16 = 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PanelRect {
    pub x: u16,
    pub y: u16,
    pub cols: u16,
    pub rows: u16,
}

pub struct Scene {
    pub frame: u64,
    pub running: bool,
    pub paused: bool,
    pub speed: f64,

    series: Vec<f64>,
    tick_s: f64,
    pattern_cols: u16,
    pattern_rows: u16,

    fluid_ramp: GlyphRamp,
    wave_ramp: GlyphRamp,

    pub palette: Palette,
    color_mode: ColorMode,
    color_scheme: ColorScheme,
    default_background: bool,

    particles: ParticleField,
    particle_count: usize,
    backdrop: bool,

    title: Option<String>,
    title_border: bool,

    cols: u16,
    rows: u16,
}

impl Scene {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        series: Vec<f64>,
        tick_ms: u16,
        pattern_cols: u16,
        pattern_rows: u16,
        fluid_ramp: GlyphRamp,
        color_scheme: ColorScheme,
        color_mode: ColorMode,
        default_background: bool,
        particle_count: usize,
        seed: Option<u64>,
    ) -> Self {
        Self {
            frame: 0,
            running: true,
            paused: false,
            speed: 1.0,
            series,
            tick_s: tick_ms as f64 / 1000.0,
            pattern_cols,
            pattern_rows,
            fluid_ramp,
            wave_ramp: GlyphRamp::minimal(),
            palette: Palette::new(color_scheme, color_mode, default_background),
            color_mode,
            color_scheme,
            default_background,
            particles: ParticleField::new(particle_count, seed),
            particle_count,
            backdrop: true,
            title: None,
            title_border: true,
            cols: 80,
            rows: 24,
        }
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.cols = cols;
        self.rows = rows;
    }

    pub fn set_title(&mut self, title: &str) {
        self.title = Some(title.to_string());
    }

    pub fn set_title_border(&mut self, on: bool) {
        self.title_border = on;
    }

    pub fn set_speed(&mut self, speed: f64) {
        self.speed = speed.clamp(0.001, 100.0);
    }

    pub fn set_backdrop(&mut self, on: bool) {
        self.backdrop = on;
    }

    pub fn toggle_backdrop(&mut self) {
        self.backdrop = !self.backdrop;
    }

    pub fn set_color_scheme(&mut self, scheme: ColorScheme) {
        self.color_scheme = scheme;
        self.palette = Palette::new(scheme, self.color_mode, self.default_background);
    }

    /// Reroll the particle layout, unseeded. Bound to the space key.
    pub fn shuffle_particles(&mut self) {
        self.particles = ParticleField::new(self.particle_count, None);
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    /// Advance animation time by exactly one frame. A paused scene holds
    /// its counter so resuming never jumps.
    pub fn tick(&mut self) {
        if self.paused {
            return;
        }
        self.frame += 1;
    }

    fn time_s(&self) -> f64 {
        self.frame as f64 * self.tick_s * self.speed
    }

    /// Where the fluid panel (border included) lands on this terminal.
    pub fn panel_rect(&self) -> PanelRect {
        let max_cols = self.cols.saturating_sub(2 * (PANEL_MARGIN + 1)).max(4);
        let max_rows = self.rows.saturating_sub(2 * (PANEL_MARGIN + 1)).max(2);
        let cols = self.pattern_cols.min(max_cols);
        let rows = self.pattern_rows.min(max_rows);
        PanelRect {
            x: (self.cols.saturating_sub(cols + 2)) / 2,
            y: (self.rows.saturating_sub(rows + 2)) / 2,
            cols,
            rows,
        }
    }

    pub fn render(&self, frame: &mut Frame) {
        frame.clear();
        let t = self.time_s();

        if self.backdrop {
            self.render_backdrop(frame);
        }
        self.render_particles(frame, t);
        self.render_panel(frame, t);
        if let Some(title) = &self.title {
            self.render_title(frame, title);
        }
    }

    fn render_backdrop(&self, frame: &mut Frame) {
        let waves = wave_pattern(self.frame as f64 * 0.02, WAVE_COLS, WAVE_ROWS, &self.wave_ramp);

        // Parallax drift, wrapped over the virtual surface.
        let ox = (self.frame as f64 * 0.5) as u64 % WAVE_COLS as u64;
        let oy = (self.frame as f64 * 0.2) as u64 % WAVE_ROWS as u64;

        let pulse_t = self.time_s() / PULSE_PERIOD_S * TAU;
        let pulse = PULSE_FLOOR + PULSE_SWING * (((pulse_t.sin() + 1.0) / 2.0) as f32);

        let dim = sample_stops(self.palette.stops(), 0.1);
        let fg = self.palette.resolve(attenuate(dim, pulse));

        for y in 0..frame.height {
            let wy = ((y as u64 + oy) % WAVE_ROWS as u64) as u16;
            for x in 0..frame.width {
                let wx = ((x as u64 + ox) % WAVE_COLS as u64) as u16;
                if let Some(cell) = waves.get(wx, wy) {
                    if cell.glyph != ' ' {
                        frame.set(x, y, Cell::glyph(cell.glyph, fg, self.palette.bg));
                    }
                }
            }
        }
    }

    fn render_particles(&self, frame: &mut Frame, t: f64) {
        let base = sample_stops(self.palette.stops(), 0.8);
        for p in self.particles.cells(t, frame.width, frame.height) {
            let fg = self.palette.resolve(modulate(base, p.bright));
            frame.set(
                p.x,
                p.y,
                Cell {
                    ch: p.glyph,
                    fg,
                    bg: self.palette.bg,
                    bold: p.glyph == 'O',
                },
            );
        }
    }

    fn render_panel(&self, frame: &mut Frame, t: f64) {
        let rect = self.panel_rect();
        let grid = fluid_pattern(&self.series, t, rect.cols, rect.rows, &self.fluid_ramp);

        self.draw_border(frame, rect);
        self.draw_pattern(frame, rect, &grid, t);
    }

    fn draw_border(&self, frame: &mut Frame, rect: PanelRect) {
        let border = self.palette.resolve(sample_stops(self.palette.stops(), 0.5));
        let x1 = rect.x + rect.cols + 1;
        let y1 = rect.y + rect.rows + 1;

        frame.set(rect.x, rect.y, Cell::glyph('╭', border, self.palette.bg));
        frame.set(x1, rect.y, Cell::glyph('╮', border, self.palette.bg));
        frame.set(rect.x, y1, Cell::glyph('╰', border, self.palette.bg));
        frame.set(x1, y1, Cell::glyph('╯', border, self.palette.bg));
        for x in (rect.x + 1)..x1 {
            frame.set(x, rect.y, Cell::glyph('─', border, self.palette.bg));
            frame.set(x, y1, Cell::glyph('─', border, self.palette.bg));
        }
        for y in (rect.y + 1)..y1 {
            frame.set(rect.x, y, Cell::glyph('│', border, self.palette.bg));
            frame.set(x1, y, Cell::glyph('│', border, self.palette.bg));
        }
    }

    fn draw_pattern(&self, frame: &mut Frame, rect: PanelRect, grid: &PatternGrid, t: f64) {
        for gy in 0..grid.rows() {
            let base = self.palette.row_color(gy, grid.rows());
            for (gx, cell) in grid.row(gy).iter().enumerate() {
                // Slow per-column shimmer on top of the row ramp.
                let col_mod = (((t * 1.2) + gx as f64 * 0.12).sin() + 1.0) / 2.0;
                let tinted = crate::palette::density_tint(base, cell.norm);
                let fg = self.palette.resolve(modulate(tinted, col_mod as f32));
                frame.set(
                    rect.x + 1 + gx as u16,
                    rect.y + 1 + gy,
                    Cell::glyph(cell.glyph, fg, self.palette.bg),
                );
            }
        }
    }

    fn render_title(&self, frame: &mut Frame, title: &str) {
        let chars: Vec<char> = title.chars().collect();
        if chars.is_empty() {
            return;
        }
        let w = (chars.len() as u16).min(frame.width.saturating_sub(4));
        let x0 = (frame.width.saturating_sub(w + 4)) / 2;
        let y = frame.height / 2;
        let fg = self.palette.resolve((255, 255, 255));

        if self.title_border && y >= 1 {
            for dx in 0..(w + 4) {
                frame.set(x0 + dx, y - 1, Cell::glyph('─', fg, self.palette.bg));
                frame.set(x0 + dx, y + 1, Cell::glyph('─', fg, self.palette.bg));
            }
        }
        frame.set(x0 + 1, y, Cell::glyph(' ', fg, self.palette.bg));
        for (i, &ch) in chars.iter().take(w as usize).enumerate() {
            frame.set(
                x0 + 2 + i as u16,
                y,
                Cell {
                    ch,
                    fg,
                    bg: self.palette.bg,
                    bold: true,
                },
            );
        }
        frame.set(x0 + 2 + w, y, Cell::glyph(' ', fg, self.palette.bg));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::HK_RAINFALL_MM;

    fn make_scene(series: Vec<f64>) -> Scene {
        let mut scene = Scene::new(
            series,
            30,
            40,
            12,
            GlyphRamp::minimal(),
            ColorScheme::Harbour,
            ColorMode::TrueColor,
            true,
            0,
            Some(1),
        );
        scene.resize(60, 20);
        scene
    }

    #[test]
    fn tick_increments_by_exactly_one() {
        let mut scene = make_scene(HK_RAINFALL_MM.to_vec());
        for expected in 1..=5u64 {
            scene.tick();
            assert_eq!(scene.frame, expected);
        }
    }

    #[test]
    fn pause_freezes_the_counter_and_resume_continues() {
        let mut scene = make_scene(HK_RAINFALL_MM.to_vec());
        scene.tick();
        scene.tick();
        scene.toggle_pause();
        scene.tick();
        scene.tick();
        assert_eq!(scene.frame, 2);
        scene.toggle_pause();
        scene.tick();
        assert_eq!(scene.frame, 3);
    }

    #[test]
    fn backdrop_ignores_the_rainfall_series() {
        let mut a = make_scene(HK_RAINFALL_MM.to_vec());
        let mut b = make_scene(vec![1.0; 12]);
        for _ in 0..10 {
            a.tick();
            b.tick();
        }

        let mut fa = Frame::new(60, 20, None);
        let mut fb = Frame::new(60, 20, None);
        a.render(&mut fa);
        b.render(&mut fb);

        let rect = a.panel_rect();
        assert_eq!(rect, b.panel_rect());
        for y in 0..20u16 {
            for x in 0..60u16 {
                let inside = x >= rect.x
                    && x <= rect.x + rect.cols + 1
                    && y >= rect.y
                    && y <= rect.y + rect.rows + 1;
                if !inside {
                    assert_eq!(fa.get(x, y), fb.get(x, y), "backdrop differs at {},{}", x, y);
                }
            }
        }
    }

    #[test]
    fn backdrop_pulse_swings_the_brightness() {
        // Frame 25 is the pulse crest (t = 0.75s), frame 75 the trough
        // (t = 2.25s) at the 30ms tick and 3s period.
        let mut scene = make_scene(HK_RAINFALL_MM.to_vec());

        let backdrop_fg = |scene: &Scene| -> crossterm::style::Color {
            let mut frame = Frame::new(60, 20, None);
            scene.render(&mut frame);
            let rect = scene.panel_rect();
            for y in 0..20u16 {
                for x in 0..60u16 {
                    let inside = x >= rect.x
                        && x <= rect.x + rect.cols + 1
                        && y >= rect.y
                        && y <= rect.y + rect.rows + 1;
                    if inside {
                        continue;
                    }
                    if let Some(cell) = frame.get(x, y) {
                        if cell.ch != ' ' {
                            if let Some(fg) = cell.fg {
                                return fg;
                            }
                        }
                    }
                }
            }
            panic!("no backdrop cell rendered");
        };

        for _ in 0..25 {
            scene.tick();
        }
        let crest = backdrop_fg(&scene);
        for _ in 0..50 {
            scene.tick();
        }
        let trough = backdrop_fg(&scene);

        match (crest, trough) {
            (
                crossterm::style::Color::Rgb { r: r1, g: g1, b: b1 },
                crossterm::style::Color::Rgb { r: r0, g: g0, b: b0 },
            ) => {
                let swing = (b1 as i16 - b0 as i16)
                    .max(g1 as i16 - g0 as i16)
                    .max(r1 as i16 - r0 as i16);
                assert!(
                    swing > 25,
                    "pulse barely moves: crest {:?} trough {:?}",
                    (r1, g1, b1),
                    (r0, g0, b0)
                );
            }
            other => panic!("expected rgb colors, got {:?}", other),
        }
    }

    #[test]
    fn panel_is_clamped_to_the_terminal() {
        let mut scene = make_scene(HK_RAINFALL_MM.to_vec());
        scene.resize(30, 10);
        let rect = scene.panel_rect();
        assert!(rect.cols + 2 <= 30);
        assert!(rect.rows + 2 <= 10);

        let mut frame = Frame::new(30, 10, None);
        scene.render(&mut frame);
    }

    #[test]
    fn render_is_deterministic_for_a_given_frame() {
        let mut scene = make_scene(HK_RAINFALL_MM.to_vec());
        for _ in 0..7 {
            scene.tick();
        }
        let mut fa = Frame::new(60, 20, None);
        let mut fb = Frame::new(60, 20, None);
        scene.render(&mut fa);
        scene.render(&mut fb);
        for y in 0..20u16 {
            for x in 0..60u16 {
                assert_eq!(fa.get(x, y), fb.get(x, y));
            }
        }
    }
}
