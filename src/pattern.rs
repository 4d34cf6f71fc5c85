// Copyright (c) 2026 rezky_nightky

use crate::glyphs::GlyphRamp;

/// Hong Kong mean monthly rainfall, millimetres, Jan..Dec.
pub const HK_RAINFALL_MM: [f64; 12] = [
    15.2, 8.7, 45.3, 78.9, 156.4, 234.7, 298.5, 267.3, 189.6, 67.8, 23.4, 12.1,
];

// Per-column flow speed: base scale plus a rainfall-weighted bonus, so the
// wettest months stream visibly faster as well as denser.
const BASE_TIME_SCALE: f64 = 20.0;
const SPEED_FACTOR: f64 = 6.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PatternCell {
    pub glyph: char,
    /// Normalized wave intensity in [0, 1]; drives the density tint.
    pub norm: f32,
}

/// One fully computed animation frame of the character texture.
/// Rebuilt from scratch every tick and dropped after drawing.
#[derive(Clone, Debug, PartialEq)]
pub struct PatternGrid {
    cols: u16,
    rows: u16,
    cells: Vec<PatternCell>,
}

impl PatternGrid {
    pub fn cols(&self) -> u16 {
        self.cols
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    pub fn get(&self, x: u16, y: u16) -> Option<PatternCell> {
        if x >= self.cols || y >= self.rows {
            return None;
        }
        Some(self.cells[y as usize * self.cols as usize + x as usize])
    }

    pub fn row(&self, y: u16) -> &[PatternCell] {
        let w = self.cols as usize;
        let start = y as usize * w;
        &self.cells[start..start + w]
    }
}

/// Rainfall-weighted fluid texture. Pure function of its arguments: the
/// same `(series, time, cols, rows)` always yields a byte-identical grid.
pub fn fluid_pattern(
    series: &[f64],
    time: f64,
    cols: u16,
    rows: u16,
    ramp: &GlyphRamp,
) -> PatternGrid {
    let max_val = series.iter().copied().fold(0.0f64, f64::max).max(1e-9);
    let len = series.len();

    let mut cells = Vec::with_capacity(cols as usize * rows as usize);
    for y in 0..rows {
        let yf = y as f64;
        for x in 0..cols {
            let xf = x as f64;

            // Column position picks the month; clamped so a series of the
            // wrong length degrades to repetition instead of a panic.
            let intensity = if len == 0 {
                0.0
            } else {
                let idx = ((xf / cols as f64) * len as f64) as usize;
                series[idx.min(len - 1)] / max_val
            };

            let t = time * (BASE_TIME_SCALE + intensity * SPEED_FACTOR);
            let flow_x = xf + t * 0.2;
            let flow_y = yf - t * 0.8;

            let wave1 = ((xf * 0.18) + (flow_y * 0.12) + (t * 0.05)).sin() * 0.5 + 0.5;
            let wave2 = ((xf * 0.08) + (flow_y * 0.22) + (t * 0.08)).sin() * 0.4 + 0.6;
            let wave3 = ((xf * 0.25) + (flow_y * 0.08) - (t * 0.06)).cos() * 0.5 + 0.5;
            let wave4 = ((flow_x * 0.15) + (flow_y * 0.35) + (t * 0.1)).sin() * 0.3 + 0.7;

            let horizontal = ((xf * 0.15) + (t * 0.12)).sin() * 0.3;
            let diagonal = ((xf * 0.08) + (yf * 0.08) + (t * 0.09)).cos() * 0.25;

            let combined = (wave1 + wave2 + wave3 + wave4) / 4.0 + horizontal + diagonal;
            let modulated = combined * intensity;

            // Deterministic shimmer; no RNG so frames never flicker.
            let noise1 = (xf * 0.5 + flow_y * 0.4 + t * 0.15).sin() * 0.2;
            let noise2 = (xf * 0.7 + yf * 0.3 + t * 0.12).cos() * 0.15;
            let speckle = (xf * 1.2 + yf * 0.8 + t * 0.18).sin() * (xf * 0.6 + yf * 1.1).cos() * 0.25;
            let jitter = (xf * 0.3 + yf * 0.5 + t * 0.1).sin() * 0.1;

            let v = modulated + noise1 + noise2 + speckle + jitter;
            let norm = ((v.tanh() + 1.0) / 2.0) as f32;

            cells.push(PatternCell {
                glyph: ramp.quantize(norm),
                norm,
            });
        }
    }

    PatternGrid { cols, rows, cells }
}

/// Decorative backdrop: two phase-shifted waves multiplied into an
/// interference pattern. Takes no rainfall input at all.
pub fn wave_pattern(time: f64, cols: u16, rows: u16, ramp: &GlyphRamp) -> PatternGrid {
    let mut cells = Vec::with_capacity(cols as usize * rows as usize);
    for y in 0..rows {
        let yf = y as f64;
        for x in 0..cols {
            let xf = x as f64;
            let wave = (xf * 0.05 + yf * 0.03 + time).sin() * (xf * 0.03 + yf * 0.07 - time * 0.5).cos();
            let norm = ((wave + 1.0) / 2.0) as f32;
            cells.push(PatternCell {
                glyph: ramp.quantize(norm),
                norm,
            });
        }
    }
    PatternGrid { cols, rows, cells }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count_glyph(grid: &PatternGrid, xs: std::ops::Range<u16>, glyph: char) -> usize {
        let mut n = 0;
        for y in 0..grid.rows() {
            for x in xs.clone() {
                if grid.get(x, y).unwrap().glyph == glyph {
                    n += 1;
                }
            }
        }
        n
    }

    #[test]
    fn fluid_grid_has_configured_dimensions() {
        let ramp = GlyphRamp::minimal();
        for frame in [0u64, 1, 17, 999] {
            let g = fluid_pattern(&HK_RAINFALL_MM, frame as f64 * 0.03, 120, 40, &ramp);
            assert_eq!(g.cols(), 120);
            assert_eq!(g.rows(), 40);
            assert_eq!(g.row(39).len(), 120);
        }
    }

    #[test]
    fn fluid_pattern_is_deterministic() {
        let ramp = GlyphRamp::minimal();
        let a = fluid_pattern(&HK_RAINFALL_MM, 1.23, 60, 20, &ramp);
        let b = fluid_pattern(&HK_RAINFALL_MM, 1.23, 60, 20, &ramp);
        assert_eq!(a, b);
    }

    #[test]
    fn frame_zero_is_fully_defined_within_the_glyph_set() {
        let ramp = GlyphRamp::minimal();
        let g = fluid_pattern(&HK_RAINFALL_MM, 0.0, 120, 40, &ramp);
        for y in 0..g.rows() {
            for cell in g.row(y) {
                assert!(matches!(cell.glyph, ' ' | '·' | '∘'));
                assert!((0.0..=1.0).contains(&cell.norm));
            }
        }
    }

    #[test]
    fn wet_months_are_denser_than_dry_months() {
        // July (298.5 mm) owns columns 60..70 at 120 cols; February
        // (8.7 mm) owns columns 10..20.
        let ramp = GlyphRamp::minimal();
        let g = fluid_pattern(&HK_RAINFALL_MM, 0.0, 120, 40, &ramp);
        let july = count_glyph(&g, 60..70, '∘');
        let february = count_glyph(&g, 10..20, '∘');
        assert!(
            july > february,
            "expected July columns denser than February: {} vs {}",
            july,
            february
        );
    }

    #[test]
    fn short_or_empty_series_never_panics() {
        let ramp = GlyphRamp::minimal();
        let g = fluid_pattern(&[100.0, 5.0, 42.0], 0.5, 50, 10, &ramp);
        assert_eq!(g.cols(), 50);

        let empty = fluid_pattern(&[], 0.5, 50, 10, &ramp);
        for y in 0..empty.rows() {
            for cell in empty.row(y) {
                assert!((0.0..=1.0).contains(&cell.norm));
            }
        }
    }

    #[test]
    fn wave_pattern_is_deterministic_and_bounded() {
        let ramp = GlyphRamp::minimal();
        let a = wave_pattern(2.0, 200, 60, &ramp);
        let b = wave_pattern(2.0, 200, 60, &ramp);
        assert_eq!(a, b);
        assert_eq!(a.cols(), 200);
        assert_eq!(a.rows(), 60);
        for y in 0..a.rows() {
            for cell in a.row(y) {
                assert!(matches!(cell.glyph, ' ' | '·' | '∘'));
            }
        }
    }
}
