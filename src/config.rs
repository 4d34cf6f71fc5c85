// Copyright (c) 2026 rezky_nightky

use std::io::IsTerminal;
use std::str::FromStr;

use clap::Parser;

pub const DEFAULT_PARAMS_USAGE: &str = "DEFAULT PARAMS USAGE:\n  rainscape --tick-ms 30 --speed 1 --width 120 --height 40 --glyphs minimal --color harbour --color-bg black --particles 10";

pub fn color_enabled_stdout() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if matches!(std::env::var("CLICOLOR").ok().as_deref(), Some("0")) {
        return false;
    }
    std::io::stdout().is_terminal()
}

fn colorize_help_detail(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 64);
    for chunk in text.split_inclusive('\n') {
        let (line, nl) = chunk
            .strip_suffix('\n')
            .map(|l| (l, "\n"))
            .unwrap_or((chunk, ""));

        let is_heading =
            !line.starts_with(' ') && line.ends_with(':') && line == line.to_ascii_uppercase();

        if is_heading {
            out.push_str("\x1b[1;36m");
            out.push_str(line);
            out.push_str("\x1b[0m");
            out.push_str(nl);
            continue;
        }

        if let Some(rest) = line.strip_prefix("      Example:") {
            out.push_str("      \x1b[32mExample:\x1b[0m");
            out.push_str(rest);
            out.push_str(nl);
            continue;
        }

        if let Some(rest) = line.strip_prefix("  rainscape") {
            out.push_str("  \x1b[1;34mrainscape\x1b[0m");
            out.push_str(rest);
            out.push_str(nl);
            continue;
        }

        if let Some(rest) = line.strip_prefix("  -") {
            out.push_str("  \x1b[33m-");
            out.push_str(rest);
            out.push_str("\x1b[0m");
            out.push_str(nl);
            continue;
        }

        out.push_str(line);
        out.push_str(nl);
    }
    out
}

pub fn default_params_usage_for_help() -> String {
    if color_enabled_stdout() {
        colorize_help_detail(DEFAULT_PARAMS_USAGE)
    } else {
        DEFAULT_PARAMS_USAGE.to_string()
    }
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorBg {
    #[value(name = "black")]
    Black,
    #[value(name = "default-background")]
    DefaultBackground,
    #[value(name = "transparent")]
    Transparent,
}

/// Comma-separated monthly rainfall magnitudes. Twelve values is the
/// canonical shape; shorter or longer lists are still accepted since the
/// generator clamps the month index.
#[derive(Clone, Debug)]
pub struct SeriesSpec(pub Vec<f64>);

impl FromStr for SeriesSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut vals = Vec::new();
        for (i, part) in s.split(',').enumerate() {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            let v: f64 = part
                .parse()
                .map_err(|_| format!("invalid rainfall value at position {}", i + 1))?;
            if !v.is_finite() || v < 0.0 {
                return Err(format!(
                    "rainfall value at position {} must be finite and non-negative",
                    i + 1
                ));
            }
            vals.push(v);
        }
        if vals.is_empty() {
            return Err("expected at least one rainfall value".to_string());
        }
        Ok(Self(vals))
    }
}

#[derive(Parser, Debug, Clone)]
#[command(name = "rainscape", version, disable_version_flag = true)]
pub struct Args {
    #[arg(
        short = 't',
        long = "tick-ms",
        default_value_t = 30,
        help_heading = "GENERAL",
        help = "Frame tick period in milliseconds (min 1 max 1000)"
    )]
    pub tick_ms: u16,

    #[arg(
        long = "duration",
        help_heading = "GENERAL",
        help = "Stop after N seconds (min 0.1 max 86400; <=0 disables)"
    )]
    pub duration: Option<f64>,

    #[arg(
        short = 's',
        long = "screensaver",
        help_heading = "GENERAL",
        help = "Screensaver mode (exit on keypress)"
    )]
    pub screensaver: bool,

    #[arg(
        short = 'm',
        long = "title",
        help_heading = "GENERAL",
        help = "Centered title overlay"
    )]
    pub title: Option<String>,

    #[arg(
        long = "no-title-border",
        help_heading = "GENERAL",
        help = "Draw the title without rules above and below (use with --title)"
    )]
    pub no_title_border: bool,

    #[arg(
        long = "seed",
        help_heading = "GENERAL",
        help = "Seed for the one-time particle layout (default: random)"
    )]
    pub seed: Option<u64>,

    #[arg(
        short = 'W',
        long = "width",
        default_value_t = 120,
        help_heading = "PATTERN",
        help = "Fluid pattern columns (min 12 max 1000; clamped to the terminal)"
    )]
    pub width: u16,

    #[arg(
        short = 'H',
        long = "height",
        default_value_t = 40,
        help_heading = "PATTERN",
        help = "Fluid pattern rows (min 4 max 1000; clamped to the terminal)"
    )]
    pub height: u16,

    #[arg(
        long = "data",
        help_heading = "PATTERN",
        help = "Custom rainfall series as comma-separated values (default: Hong Kong monthly means)"
    )]
    pub data: Option<SeriesSpec>,

    #[arg(
        short = 'S',
        long = "speed",
        default_value_t = 1.0,
        help_heading = "PATTERN",
        help = "Animation time multiplier (min 0.001 max 100)"
    )]
    pub speed: f64,

    #[arg(
        short = 'g',
        long = "glyphs",
        default_value = "minimal",
        help_heading = "PATTERN",
        help = "Glyph ramp preset or literal sparse-to-dense glyph string (see --list-glyphs)"
    )]
    pub glyphs: String,

    #[arg(
        short = 'B',
        long = "no-background",
        help_heading = "PATTERN",
        help = "Disable the parallax wave backdrop"
    )]
    pub no_background: bool,

    #[arg(
        short = 'p',
        long = "particles",
        default_value_t = 10,
        help_heading = "PATTERN",
        help = "Floating particle count (min 0 max 500; 0 disables)"
    )]
    pub particles: u16,

    #[arg(
        short = 'c',
        long = "color",
        default_value = "harbour",
        help_heading = "APPEARANCE",
        help = "Color theme (see --list-colors)"
    )]
    pub color: String,

    #[arg(
        long = "color-bg",
        default_value_t = ColorBg::Black,
        value_enum,
        help_heading = "APPEARANCE",
        help = "Background mode (black, default-background, transparent)"
    )]
    pub color_bg: ColorBg,

    #[arg(
        long = "colormode",
        help_heading = "APPEARANCE",
        help = "Force color mode (allowed: 0,8,24). Default: 24-bit if supported (COLORTERM), else 8-bit (TERM=...256color)"
    )]
    pub colormode: Option<u16>,

    #[arg(
        long = "check-bitcolor",
        help_heading = "HELP",
        help = "Print detected terminal color capability and exit"
    )]
    pub check_bitcolor: bool,

    #[arg(
        long = "help-detail",
        help_heading = "HELP",
        help = "Show detailed help for all parameters and exit"
    )]
    pub help_detail: bool,

    #[arg(
        long = "list-glyphs",
        help_heading = "HELP",
        help = "List available glyph ramp presets and exit"
    )]
    pub list_glyphs: bool,

    #[arg(
        long = "list-colors",
        help_heading = "HELP",
        help = "List available color themes and exit"
    )]
    pub list_colors: bool,

    #[arg(
        long = "info",
        short = 'i',
        help_heading = "HELP",
        help = "Print version info and exit"
    )]
    pub info: bool,

    #[arg(
        long = "version",
        short = 'v',
        help_heading = "HELP",
        help = "Print version and exit"
    )]
    pub version: bool,
}

pub fn print_list_glyphs() {
    if color_enabled_stdout() {
        println!("\x1b[1;36mAVAILABLE GLYPH RAMPS:\x1b[0m");
        println!("\x1b[2mNOTE: Use the VALUE (left side) with --glyphs, or pass 2+ literal glyphs sparse-to-dense.\x1b[0m");
    } else {
        println!("AVAILABLE GLYPH RAMPS:");
        println!("NOTE: Use the VALUE (left side) with --glyphs, or pass 2+ literal glyphs sparse-to-dense.");
    }
    println!();
    println!("VALUE        DESCRIPTION");
    println!("minimal      Blank, dot, ring ( ·∘) with 0.5/0.7 density bands");
    println!("ascii        Ten-step ASCII density ramp ( .:-=+*#%@)");
    println!("blocks       Shading blocks ( ░▒▓█)");
    println!("dots         Round dots ( .•●)");
    println!("rain         Drizzle texture ( ´‚.·˙)");
}

pub fn print_list_colors() {
    if color_enabled_stdout() {
        println!("\x1b[1;36mAVAILABLE COLOR THEMES:\x1b[0m");
        println!("\x1b[2mNOTE: Use only the VALUE (left side) with --color.\x1b[0m");
    } else {
        println!("AVAILABLE COLOR THEMES:");
        println!("NOTE: Use only the VALUE (left side) with --color.");
    }
    println!();
    println!("VALUE        DESCRIPTION");
    println!("harbour      Victoria Harbour blues (the default)");
    println!("ocean        Deep blue to foam white");
    println!("typhoon      Storm greys and slate blues");
    println!("monsoon      Teal rain bands");
    println!("mist         Soft neutral greys");
    println!("neon         Violet to electric cyan");
    println!("aurora       Green-teal into violet");
    println!("sunset       Dusk purples and amber");
    println!("mono         No color (plain glyphs)");
}

pub fn print_help_detail() {
    let block = format!(
        "{}\n\nUSAGE:\n  rainscape [OPTIONS]\n\nGENERAL:\n  -t, --tick-ms <ms>\n      Frame tick period in milliseconds (min 1 max 1000).\n      Example: rainscape --tick-ms 16\n\n  --duration <seconds>\n      Stop after N seconds (min 0.1 max 86400).\n      Example: rainscape --duration 10\n\n  -s, --screensaver\n      Screensaver mode (exit on keypress).\n      Example: rainscape -s\n\n  -m, --title <text>\n      Centered title overlay.\n      Example: rainscape -m \"HK RAINFALL\"\n\n  --seed <number>\n      Seed for the one-time particle layout.\n      Example: rainscape --seed 42\n\nPATTERN:\n  -W, --width <cols>  -H, --height <rows>\n      Fluid pattern size (clamped to the terminal).\n      Example: rainscape -W 100 -H 36\n\n  --data <csv>\n      Custom rainfall series; defaults to the Hong Kong monthly means.\n      Example: rainscape --data 15.2,8.7,45.3,78.9,156.4,234.7,298.5,267.3,189.6,67.8,23.4,12.1\n\n  -S, --speed <number>\n      Animation time multiplier (min 0.001 max 100).\n      Example: rainscape --speed 0.5\n\n  -g, --glyphs <name|literal>\n      Glyph ramp preset, or a literal sparse-to-dense glyph string.\n      Example: rainscape --glyphs blocks\n\n  -B, --no-background\n      Disable the parallax wave backdrop.\n      Example: rainscape -B\n\n  -p, --particles <count>\n      Floating particle count (min 0 max 500).\n      Example: rainscape --particles 0\n\nAPPEARANCE:\n  -c, --color <name>\n      Set theme (see --list-colors).\n      Example: rainscape --color typhoon\n\n  --colormode <0|8|24>\n      Force color mode; otherwise auto-detected from COLORTERM/TERM.\n      Example: rainscape --colormode 24\n\n  --color-bg <black|default-background|transparent>\n      Background mode.\n      Example: rainscape --color-bg transparent\n\nKEYS:\n  q / Esc      quit\n  p            pause / resume\n  space        reroll the particle layout\n  b            toggle the backdrop\n  Up / Down    speed up / slow down\n  1-9          switch color theme\n\nHELP:\n  --check-bitcolor\n      Print detected terminal color capability and exit.\n\n  --help\n      Show short help.\n\n  --help-detail\n      Show this detailed help.\n\n  --list-glyphs\n      List available glyph ramp presets and exit.\n\n  --list-colors\n      List available color themes and exit.\n\n  -v, --version\n      Print version and exit.\n\n  -i, --info\n      Print version info and exit.\n",
        DEFAULT_PARAMS_USAGE
    );

    if color_enabled_stdout() {
        print!("{}", colorize_help_detail(&block));
    } else {
        print!("{}", block);
    }

    println!("LIMITS / VALID RANGES:");
    println!("  --tick-ms <ms>           min 1 max 1000");
    println!("  --duration <seconds>     min 0.1 max 86400 (<=0 disables)");
    println!("  --speed <number>         min 0.001 max 100");
    println!("  --width <cols>           min 12 max 1000");
    println!("  --height <rows>          min 4 max 1000");
    println!("  --particles <count>      min 0 max 500");
    println!("  --colormode <0|8|24>     allowed values only");
    println!();
    print_list_glyphs();
    println!();
    print_list_colors();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn series_spec_parses_the_hk_dataset() {
        let s: SeriesSpec = "15.2,8.7,45.3,78.9,156.4,234.7,298.5,267.3,189.6,67.8,23.4,12.1"
            .parse()
            .unwrap();
        assert_eq!(s.0.len(), 12);
        assert_eq!(s.0[6], 298.5);
    }

    #[test]
    fn series_spec_accepts_non_canonical_lengths() {
        let s: SeriesSpec = "1,2,3".parse().unwrap();
        assert_eq!(s.0, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn series_spec_rejects_bad_values() {
        assert!("".parse::<SeriesSpec>().is_err());
        assert!("1,-2".parse::<SeriesSpec>().is_err());
        assert!("1,NaN".parse::<SeriesSpec>().is_err());
        assert!("1,abc".parse::<SeriesSpec>().is_err());
    }
}
