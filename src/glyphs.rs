// Copyright (c) 2026 rezky_nightky

/// Ordered sparse-to-dense glyph set with the threshold bands that map a
/// normalized wave intensity in [0, 1] onto one glyph.
#[derive(Clone, Debug, PartialEq)]
pub struct GlyphRamp {
    glyphs: Vec<char>,
    // thresholds[i] is the lower bound (exclusive) of glyphs[i + 1];
    // values at or below thresholds[0] map to glyphs[0].
    thresholds: Vec<f32>,
}

impl GlyphRamp {
    /// The classic three-level texture: blank, faint dot, open ring,
    /// with band edges at 0.5 and 0.7.
    pub fn minimal() -> Self {
        Self {
            glyphs: vec![' ', '·', '∘'],
            thresholds: vec![0.5, 0.7],
        }
    }

    /// Evenly spaced bands over [0, 1] for an arbitrary sparse-to-dense set.
    pub fn even(glyphs: Vec<char>) -> Result<Self, String> {
        if glyphs.len() < 2 {
            return Err("glyph ramp needs at least 2 glyphs".to_string());
        }
        let n = glyphs.len();
        let thresholds = (1..n).map(|i| i as f32 / n as f32).collect();
        Ok(Self { glyphs, thresholds })
    }

    #[allow(dead_code)]
    pub fn glyphs(&self) -> &[char] {
        &self.glyphs
    }

    #[allow(dead_code)]
    pub fn densest(&self) -> char {
        *self.glyphs.last().unwrap_or(&' ')
    }

    pub fn quantize(&self, v: f32) -> char {
        let v = v.clamp(0.0, 1.0);
        for (i, &t) in self.thresholds.iter().enumerate().rev() {
            if v > t {
                return self.glyphs[i + 1];
            }
        }
        self.glyphs[0]
    }
}

pub fn ramp_from_str(spec: &str) -> Result<GlyphRamp, String> {
    let trimmed = spec.trim();
    match trimmed.to_ascii_lowercase().as_str() {
        "minimal" => return Ok(GlyphRamp::minimal()),
        "ascii" => return GlyphRamp::even(" .:-=+*#%@".chars().collect()),
        "blocks" => return GlyphRamp::even(" ░▒▓█".chars().collect()),
        "dots" => return GlyphRamp::even(" .•●".chars().collect()),
        "rain" => return GlyphRamp::even(" ´‚.·˙".chars().collect()),
        _ => {}
    }
    // Anything else is a literal sparse-to-dense glyph string.
    let glyphs: Vec<char> = spec.chars().collect();
    GlyphRamp::even(glyphs).map_err(|_| {
        format!(
            "unsupported glyph ramp: {} (see --list-glyphs, or pass 2+ literal glyphs)",
            trimmed
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_ramp_band_edges() {
        let r = GlyphRamp::minimal();
        assert_eq!(r.quantize(0.0), ' ');
        assert_eq!(r.quantize(0.5), ' ');
        assert_eq!(r.quantize(0.55), '·');
        assert_eq!(r.quantize(0.7), '·');
        assert_eq!(r.quantize(0.71), '∘');
        assert_eq!(r.quantize(1.0), '∘');
    }

    #[test]
    fn quantize_clamps_out_of_range_input() {
        let r = GlyphRamp::minimal();
        assert_eq!(r.quantize(-3.0), ' ');
        assert_eq!(r.quantize(7.0), '∘');
    }

    #[test]
    fn presets_resolve_and_literals_are_honored() {
        assert_eq!(ramp_from_str("minimal").unwrap(), GlyphRamp::minimal());
        let ascii = ramp_from_str("ascii").unwrap();
        assert_eq!(ascii.glyphs().len(), 10);
        assert_eq!(ascii.densest(), '@');

        let lit = ramp_from_str(" #").unwrap();
        assert_eq!(lit.glyphs(), &[' ', '#']);
        assert_eq!(lit.quantize(0.9), '#');
    }

    #[test]
    fn single_glyph_literal_is_rejected() {
        assert!(ramp_from_str("#").is_err());
    }
}
