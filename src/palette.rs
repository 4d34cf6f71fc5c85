// Copyright (c) 2026 rezky_nightky

use crossterm::style::Color;

use crate::runtime::{ColorMode, ColorScheme};

pub type Rgb = (u8, u8, u8);

// Rows near the top drift toward white, and the bottom fifth gets an
// extra lift.
const TOP_WHITEN_BIAS: f32 = 0.30;
const BOTTOM_WHITEN_BOOST: f32 = 0.25;

#[derive(Clone, Debug)]
pub struct Palette {
    stops: Vec<Rgb>,
    mode: ColorMode,
    pub bg: Option<Color>,
}

fn dist2(r0: u8, g0: u8, b0: u8, r1: u8, g1: u8, b1: u8) -> i32 {
    let dr = (r0 as i32) - (r1 as i32);
    let dg = (g0 as i32) - (g1 as i32);
    let db = (b0 as i32) - (b1 as i32);
    (dr * dr) + (dg * dg) + (db * db)
}

fn rgb_to_ansi256(r: u8, g: u8, b: u8) -> u8 {
    const CUBE_LEVELS: [u8; 6] = [0, 95, 135, 175, 215, 255];

    let r6 = ((r as u16 * 5) + 127) / 255;
    let g6 = ((g as u16 * 5) + 127) / 255;
    let b6 = ((b as u16 * 5) + 127) / 255;

    let cr = CUBE_LEVELS[r6 as usize];
    let cg = CUBE_LEVELS[g6 as usize];
    let cb = CUBE_LEVELS[b6 as usize];
    let cube_idx = 16 + (36 * r6 as u8) + (6 * g6 as u8) + (b6 as u8);
    let cube_dist = dist2(r, g, b, cr, cg, cb);

    let avg = ((r as u16 + g as u16 + b as u16) / 3) as u8;
    let gray_idx = if avg < 8 {
        16
    } else if avg > 238 {
        231
    } else {
        232 + ((avg - 8) / 10)
    };
    let (gr, gg, gb) = if gray_idx == 16 {
        (0, 0, 0)
    } else if gray_idx == 231 {
        (255, 255, 255)
    } else {
        let v = 8 + 10 * (gray_idx - 232);
        (v, v, v)
    };
    let gray_dist = dist2(r, g, b, gr, gg, gb);

    if gray_dist < cube_dist {
        gray_idx
    } else {
        cube_idx
    }
}

fn rgb_to_color16(r: u8, g: u8, b: u8) -> Color {
    const TABLE: [(Color, (u8, u8, u8)); 16] = [
        (Color::Black, (0, 0, 0)),
        (Color::DarkGrey, (128, 128, 128)),
        (Color::Grey, (192, 192, 192)),
        (Color::White, (255, 255, 255)),
        (Color::DarkRed, (128, 0, 0)),
        (Color::Red, (255, 0, 0)),
        (Color::DarkGreen, (0, 128, 0)),
        (Color::Green, (0, 255, 0)),
        (Color::DarkBlue, (0, 0, 128)),
        (Color::Blue, (0, 0, 255)),
        (Color::DarkCyan, (0, 128, 128)),
        (Color::Cyan, (0, 255, 255)),
        (Color::DarkMagenta, (128, 0, 128)),
        (Color::Magenta, (255, 0, 255)),
        (Color::DarkYellow, (128, 128, 0)),
        (Color::Yellow, (255, 255, 0)),
    ];

    let mut best = Color::White;
    let mut best_d = i32::MAX;
    for (c, (cr, cg, cb)) in TABLE {
        let d = dist2(r, g, b, cr, cg, cb);
        if d < best_d {
            best_d = d;
            best = c;
        }
    }
    best
}

fn lerp_u8(a: u8, b: u8, t: f32) -> u8 {
    let a = a as f32;
    let b = b as f32;
    (a + (b - a) * t).round().clamp(0.0, 255.0) as u8
}

pub fn lerp_rgb(a: Rgb, b: Rgb, t: f32) -> Rgb {
    (
        lerp_u8(a.0, b.0, t),
        lerp_u8(a.1, b.1, t),
        lerp_u8(a.2, b.2, t),
    )
}

/// Sample a stop list at a continuous position in [0, 1].
pub fn sample_stops(stops: &[Rgb], t: f32) -> Rgb {
    if stops.is_empty() {
        return (255, 255, 255);
    }
    if stops.len() == 1 {
        return stops[0];
    }
    let t = t.clamp(0.0, 1.0);
    let segs = stops.len() - 1;
    let pos = t * segs as f32;
    let mut seg = pos.floor() as usize;
    if seg >= segs {
        seg = segs - 1;
    }
    let frac = pos - seg as f32;
    lerp_rgb(stops[seg], stops[seg + 1], frac)
}

/// Vertical ramp position for a display row. Monotonically non-decreasing
/// in `row`: a small top bias pulls early rows back, a bottom boost pushes
/// the last stretch toward the lightest stop.
pub fn ramp_position(row: u16, rows: u16) -> f32 {
    let t = row as f32 / (rows.max(2) - 1) as f32;
    let biased = (t - (1.0 - t) * (TOP_WHITEN_BIAS * 0.15)).max(0.0);
    if t > 0.6 {
        let bottom = (t - 0.6) / 0.4;
        (biased + (1.0 - biased) * (bottom * BOTTOM_WHITEN_BOOST)).min(1.0)
    } else {
        biased
    }
}

fn whiten_amount(row: u16, rows: u16) -> f32 {
    let t = row as f32 / (rows.max(2) - 1) as f32;
    let top = (1.0 - t).max(0.0) * TOP_WHITEN_BIAS;
    let bottom = if t > 0.6 {
        (t - 0.6) / 0.4 * BOTTOM_WHITEN_BOOST
    } else {
        0.0
    };
    (top + bottom).min(1.0)
}

/// Per-cell tint: denser cells drift toward a bright cyan-white.
pub fn density_tint(base: Rgb, norm: f32) -> Rgb {
    let bright = (230, 255, 255);
    let (r, g, b) = lerp_rgb(base, bright, norm * 0.95);
    (
        r,
        (g as f32 + 35.0 * norm).min(255.0) as u8,
        (b as f32 + 70.0 * norm).min(255.0) as u8,
    )
}

/// Small brightness wobble, `m` in [0, 1] maps to roughly +/-4%.
pub fn modulate(rgb: Rgb, m: f32) -> Rgb {
    let f = 1.0 + (m - 0.5) * 0.08;
    let scale = |v: u8| (v as f32 * f).clamp(0.0, 255.0) as u8;
    (scale(rgb.0), scale(rgb.1), scale(rgb.2))
}

/// Composite a color over black at the given opacity, `a` in [0, 1].
pub fn attenuate(rgb: Rgb, a: f32) -> Rgb {
    let a = a.clamp(0.0, 1.0);
    let scale = |v: u8| (v as f32 * a).round().clamp(0.0, 255.0) as u8;
    (scale(rgb.0), scale(rgb.1), scale(rgb.2))
}

pub fn scheme_stops(scheme: ColorScheme) -> &'static [Rgb] {
    match scheme {
        // Victoria Harbour blues, top to bottom.
        ColorScheme::Harbour => &[
            (20, 100, 255),
            (10, 150, 255),
            (0, 200, 255),
            (0, 230, 220),
            (60, 230, 220),
            (190, 245, 250),
        ],
        ColorScheme::Ocean => &[(0, 0, 40), (0, 60, 140), (0, 140, 255), (240, 255, 255)],
        ColorScheme::Typhoon => &[(10, 10, 30), (60, 70, 110), (140, 160, 200), (255, 255, 255)],
        ColorScheme::Monsoon => &[(0, 30, 30), (0, 110, 120), (80, 220, 210), (230, 255, 250)],
        ColorScheme::Mist => &[(30, 30, 36), (110, 115, 125), (200, 205, 215), (255, 255, 255)],
        ColorScheme::Neon => &[(20, 0, 60), (120, 0, 255), (0, 200, 255), (255, 255, 255)],
        ColorScheme::Aurora => &[(0, 30, 20), (0, 160, 90), (80, 255, 200), (200, 160, 255)],
        ColorScheme::Sunset => &[(40, 0, 40), (200, 60, 40), (255, 170, 60), (255, 245, 220)],
        ColorScheme::Mono => &[(255, 255, 255)],
    }
}

impl Palette {
    pub fn new(scheme: ColorScheme, mode: ColorMode, default_background: bool) -> Self {
        let bg = if default_background {
            None
        } else {
            Some(match mode {
                ColorMode::Color16 => Color::Black,
                ColorMode::TrueColor => Color::Rgb { r: 0, g: 0, b: 0 },
                _ => Color::AnsiValue(16),
            })
        };
        Self {
            stops: scheme_stops(scheme).to_vec(),
            mode,
            bg,
        }
    }

    pub fn stops(&self) -> &[Rgb] {
        &self.stops
    }

    /// Base color for a display row: stop sample plus row-position whiten.
    pub fn row_color(&self, row: u16, rows: u16) -> Rgb {
        let base = sample_stops(&self.stops, ramp_position(row, rows));
        let w = whiten_amount(row, rows);
        if w > 0.0 {
            lerp_rgb(base, (255, 255, 255), w * 0.9)
        } else {
            base
        }
    }

    /// Downmix an RGB value to the terminal's capability.
    pub fn resolve(&self, rgb: Rgb) -> Option<Color> {
        let (r, g, b) = rgb;
        match self.mode {
            ColorMode::Mono => None,
            ColorMode::TrueColor => Some(Color::Rgb { r, g, b }),
            ColorMode::Color256 => Some(Color::AnsiValue(rgb_to_ansi256(r, g, b))),
            ColorMode::Color16 => Some(rgb_to_color16(r, g, b)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ramp_position_is_monotonic() {
        for rows in [2u16, 10, 40, 60] {
            let mut prev = ramp_position(0, rows);
            assert!(prev >= 0.0);
            for row in 1..rows {
                let cur = ramp_position(row, rows);
                assert!(
                    cur >= prev,
                    "ramp regressed at row {}/{}: {} < {}",
                    row,
                    rows,
                    cur,
                    prev
                );
                prev = cur;
            }
            assert!(prev <= 1.0);
        }
    }

    #[test]
    fn sample_stops_hits_endpoints() {
        let stops = [(0, 0, 0), (255, 255, 255)];
        assert_eq!(sample_stops(&stops, 0.0), (0, 0, 0));
        assert_eq!(sample_stops(&stops, 1.0), (255, 255, 255));
        assert_eq!(sample_stops(&stops, 0.5), (128, 128, 128));
    }

    #[test]
    fn density_tint_brightens_with_norm() {
        let base = (20, 100, 255);
        let dim = density_tint(base, 0.1);
        let dense = density_tint(base, 0.9);
        assert!(dense.0 >= dim.0);
        assert!(dense.1 >= dim.1);
    }

    #[test]
    fn attenuate_spans_a_visible_range() {
        let dim = sample_stops(scheme_stops(ColorScheme::Harbour), 0.1);
        let lo = attenuate(dim, 0.3);
        let hi = attenuate(dim, 0.7);
        let swing = (hi.0 as i16 - lo.0 as i16)
            .max(hi.1 as i16 - lo.1 as i16)
            .max(hi.2 as i16 - lo.2 as i16);
        assert!(
            swing > 25,
            "pulse range too narrow: lo={:?} hi={:?}",
            lo,
            hi
        );
    }

    #[test]
    fn attenuate_clamps_opacity() {
        assert_eq!(attenuate((100, 150, 200), 1.5), (100, 150, 200));
        assert_eq!(attenuate((100, 150, 200), -0.5), (0, 0, 0));
    }

    #[test]
    fn mono_mode_resolves_to_no_color() {
        let p = Palette::new(ColorScheme::Harbour, ColorMode::Mono, true);
        assert_eq!(p.resolve((10, 20, 30)), None);
    }

    #[test]
    fn truecolor_resolves_verbatim() {
        let p = Palette::new(ColorScheme::Harbour, ColorMode::TrueColor, true);
        assert_eq!(
            p.resolve((10, 20, 30)),
            Some(Color::Rgb {
                r: 10,
                g: 20,
                b: 30
            })
        );
    }

    #[test]
    fn ansi256_downmix_maps_primaries_sanely() {
        assert_eq!(rgb_to_ansi256(0, 0, 0), 16);
        assert_eq!(rgb_to_ansi256(255, 255, 255), 231);
        assert_eq!(rgb_to_ansi256(255, 0, 0), 196);
    }
}
