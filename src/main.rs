// Copyright (c) 2026 rezky_nightky

mod cell;
mod config;
mod frame;
mod glyphs;
mod palette;
mod particles;
mod pattern;
mod runtime;
mod scene;
mod terminal;

use std::env;
use std::time::{Duration, Instant};

#[cfg(unix)]
use std::thread;

use clap::builder::styling::{AnsiColor as ClapAnsiColor, Color as ClapColor};
use clap::builder::styling::{Effects as ClapEffects, Style as ClapStyle};
use clap::builder::Styles as ClapStyles;
use clap::{CommandFactory, FromArgMatches};
use crossterm::event::{Event, KeyCode, KeyEventKind};

#[cfg(unix)]
use signal_hook::consts::{SIGHUP, SIGINT, SIGTERM};
#[cfg(unix)]
use signal_hook::iterator::Signals;

use crate::config::{
    color_enabled_stdout, default_params_usage_for_help, print_help_detail, print_list_colors,
    print_list_glyphs, Args, ColorBg,
};
use crate::frame::Frame;
use crate::glyphs::ramp_from_str;
use crate::pattern::HK_RAINFALL_MM;
use crate::runtime::{ColorMode, ColorScheme};
use crate::scene::Scene;
use crate::terminal::{restore_terminal_best_effort, Terminal};

const HELP_TEMPLATE_PLAIN: &str = "\
{before-help}{about-with-newline}
USAGE:
  {usage}

{all-args}{after-help}";

const HELP_TEMPLATE_COLOR: &str = "\
{before-help}{about-with-newline}
\x1b[1;36mUSAGE:\x1b[0m
  {usage}

{all-args}{after-help}";

fn build_info() -> &'static str {
    env!("RAINSCAPE_BUILD")
}

fn clap_styles() -> ClapStyles {
    ClapStyles::styled()
        .header(
            ClapStyle::new()
                .effects(ClapEffects::BOLD)
                .fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Cyan))),
        )
        .usage(
            ClapStyle::new()
                .effects(ClapEffects::BOLD)
                .fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Green))),
        )
        .literal(ClapStyle::new().fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Yellow))))
        .placeholder(ClapStyle::new().fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Magenta))))
}

fn require_f64_range(name: &str, v: f64, min: f64, max: f64) -> f64 {
    if !v.is_finite() {
        eprintln!("failed to apply {} {} (must be a finite number)", name, v);
        std::process::exit(1);
    }
    if v < min || v > max {
        eprintln!("failed to apply {} {} (min {} max {})", name, v, min, max);
        std::process::exit(1);
    }
    v
}

fn require_u16_range(name: &str, v: u16, min: u16, max: u16) -> u16 {
    if v < min || v > max {
        eprintln!("failed to apply {} {} (min {} max {})", name, v, min, max);
        std::process::exit(1);
    }
    v
}

fn detect_color_mode_auto() -> ColorMode {
    let colorterm = env::var("COLORTERM")
        .unwrap_or_default()
        .to_ascii_lowercase();
    if colorterm.contains("truecolor") || colorterm.contains("24bit") {
        return ColorMode::TrueColor;
    }

    let term = env::var("TERM").unwrap_or_default().to_ascii_lowercase();
    if term == "dumb" {
        return ColorMode::Mono;
    }
    if term.contains("256color") {
        return ColorMode::Color256;
    }

    ColorMode::Color256
}

fn detect_color_mode(args: &Args) -> ColorMode {
    if let Some(m) = args.colormode {
        return match m {
            0 => ColorMode::Mono,
            8 => ColorMode::Color256,
            24 => ColorMode::TrueColor,
            _ => {
                eprintln!("invalid --colormode: {} (allowed: 0,8,24)", m);
                std::process::exit(1);
            }
        };
    }

    detect_color_mode_auto()
}

fn color_mode_label(m: ColorMode) -> &'static str {
    match m {
        ColorMode::TrueColor => "24-bit truecolor",
        ColorMode::Color256 => "8-bit (256-color)",
        ColorMode::Mono => "mono",
        ColorMode::Color16 => "16-color",
    }
}

fn parse_color_scheme(s: &str) -> Result<ColorScheme, String> {
    match s.trim().to_ascii_lowercase().as_str() {
        "harbour" | "harbor" => Ok(ColorScheme::Harbour),
        "ocean" | "deep-sea" | "deep_sea" | "deepsea" => Ok(ColorScheme::Ocean),
        "typhoon" | "storm" => Ok(ColorScheme::Typhoon),
        "monsoon" => Ok(ColorScheme::Monsoon),
        "mist" | "fog" => Ok(ColorScheme::Mist),
        "neon" | "synthwave" => Ok(ColorScheme::Neon),
        "aurora" => Ok(ColorScheme::Aurora),
        "sunset" | "dusk" => Ok(ColorScheme::Sunset),
        "mono" | "none" => Ok(ColorScheme::Mono),
        _ => Err(format!("invalid color: {} (see --list-colors)", s)),
    }
}

fn scheme_for_digit(d: char) -> Option<ColorScheme> {
    match d {
        '1' => Some(ColorScheme::Harbour),
        '2' => Some(ColorScheme::Ocean),
        '3' => Some(ColorScheme::Typhoon),
        '4' => Some(ColorScheme::Monsoon),
        '5' => Some(ColorScheme::Mist),
        '6' => Some(ColorScheme::Neon),
        '7' => Some(ColorScheme::Aurora),
        '8' => Some(ColorScheme::Sunset),
        '9' => Some(ColorScheme::Mono),
        _ => None,
    }
}

fn main() -> std::io::Result<()> {
    std::panic::set_hook(Box::new(|info| {
        restore_terminal_best_effort();
        eprintln!("{}", info);
    }));

    #[cfg(unix)]
    {
        if let Ok(mut signals) = Signals::new([SIGINT, SIGTERM, SIGHUP]) {
            thread::spawn(move || {
                if let Some(sig) = signals.forever().next() {
                    restore_terminal_best_effort();
                    std::process::exit(128 + sig);
                }
            });
        }
    }

    #[cfg(windows)]
    {
        if let Err(e) = ctrlc::set_handler(|| {
            restore_terminal_best_effort();
            std::process::exit(130);
        }) {
            eprintln!("failed to install Ctrl-C handler: {}", e);
        }
    }

    let mut cmd = Args::command();
    cmd = cmd.styles(clap_styles());
    cmd = cmd.before_help(default_params_usage_for_help());
    let help_template = if color_enabled_stdout() {
        HELP_TEMPLATE_COLOR
    } else {
        HELP_TEMPLATE_PLAIN
    };
    cmd = cmd.help_template(help_template);
    cmd.build();

    if cmd.get_arguments().any(|a| a.get_id().as_str() == "help") {
        cmd = cmd.mut_arg("help", |a| a.help_heading("HELP"));
    }
    cmd.build();

    let matches = cmd.get_matches();
    let args = Args::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    if args.list_glyphs {
        print_list_glyphs();
        return Ok(());
    }

    if args.list_colors {
        print_list_colors();
        return Ok(());
    }

    if args.help_detail {
        print_help_detail();
        return Ok(());
    }

    if args.check_bitcolor {
        let colorterm = env::var("COLORTERM").unwrap_or_default();
        let term = env::var("TERM").unwrap_or_default();
        let auto = detect_color_mode_auto();
        let effective = detect_color_mode(&args);

        println!("BITCOLOR CHECK:");
        println!(
            "  COLORTERM: {}",
            if colorterm.is_empty() {
                "(unset)"
            } else {
                &colorterm
            }
        );
        println!(
            "  TERM: {}",
            if term.is_empty() { "(unset)" } else { &term }
        );
        println!("  auto_detected: {}", color_mode_label(auto));
        if args.colormode.is_some() {
            println!("  forced: {}", color_mode_label(effective));
        }
        println!("  effective: {}", color_mode_label(effective));
        return Ok(());
    }

    if args.version {
        println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    if args.info {
        println!("Version: v{}", env!("CARGO_PKG_VERSION"));
        println!("Build: {}", build_info());
        println!("Copyright: (c) 2026 {}", env!("CARGO_PKG_AUTHORS"));
        println!("License: {}", env!("CARGO_PKG_LICENSE"));
        println!("Source: {}", env!("CARGO_PKG_REPOSITORY"));
        return Ok(());
    }

    let color_mode = detect_color_mode(&args);

    let tick_ms = require_u16_range("--tick-ms", args.tick_ms, 1, 1000);
    let width = require_u16_range("--width", args.width, 12, 1000);
    let height = require_u16_range("--height", args.height, 4, 1000);
    let particles = require_u16_range("--particles", args.particles, 0, 500);
    let speed = require_f64_range("--speed", args.speed, 0.001, 100.0);
    let duration_s = args.duration.map(|s| {
        if !s.is_finite() {
            eprintln!("failed to apply --duration {} (must be a finite number)", s);
            std::process::exit(1);
        }
        if s > 0.0 {
            return require_f64_range("--duration", s, 0.1, 86400.0);
        }
        s
    });

    let color_scheme = match parse_color_scheme(&args.color) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    let fluid_ramp = match ramp_from_str(&args.glyphs) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    let series = args
        .data
        .as_ref()
        .map(|s| s.0.clone())
        .unwrap_or_else(|| HK_RAINFALL_MM.to_vec());

    let mut term = Terminal::new()?;
    let (w, h) = term.size()?;

    let mut scene = Scene::new(
        series,
        tick_ms,
        width,
        height,
        fluid_ramp,
        color_scheme,
        color_mode,
        matches!(
            args.color_bg,
            ColorBg::DefaultBackground | ColorBg::Transparent
        ),
        particles as usize,
        args.seed,
    );
    scene.set_speed(speed);
    scene.set_backdrop(!args.no_background);
    scene.resize(w, h);
    if let Some(title) = &args.title {
        scene.set_title(title);
        scene.set_title_border(!args.no_title_border);
    }

    let mut frame = Frame::new(w, h, scene.palette.bg);

    let start_time = Instant::now();
    let end_time = duration_s.and_then(|s| {
        if s <= 0.0 {
            return None;
        }
        Some(start_time + Duration::from_secs_f64(s))
    });

    let tick_period = Duration::from_millis(tick_ms as u64);
    let mut next_frame = Instant::now();

    while scene.running {
        if end_time.is_some_and(|end| Instant::now() >= end) {
            break;
        }
        let mut pending_resize: Option<(u16, u16)> = None;

        loop {
            while Terminal::poll_event(Duration::from_millis(0))? {
                let ev = Terminal::read_event()?;
                match ev {
                    Event::Resize(nw, nh) => {
                        pending_resize = Some((nw, nh));
                    }
                    Event::Key(k) if k.kind == KeyEventKind::Press => {
                        if args.screensaver {
                            scene.running = false;
                            break;
                        }

                        match k.code {
                            KeyCode::Esc | KeyCode::Char('q') => scene.running = false,
                            KeyCode::Char('p') => scene.toggle_pause(),
                            KeyCode::Char(' ') => scene.shuffle_particles(),
                            KeyCode::Char('b') => scene.toggle_backdrop(),
                            KeyCode::Up => {
                                let s = scene.speed * 1.25;
                                scene.set_speed(s.min(100.0));
                            }
                            KeyCode::Down => {
                                let s = scene.speed / 1.25;
                                scene.set_speed(s.max(0.001));
                            }
                            KeyCode::Char(d) => {
                                if let Some(scheme) = scheme_for_digit(d) {
                                    scene.set_color_scheme(scheme);
                                }
                            }
                            _ => {}
                        }
                    }
                    _ => {}
                }
            }

            if !scene.running || pending_resize.is_some() {
                break;
            }

            let now = Instant::now();
            if now >= next_frame {
                break;
            }

            let mut timeout = next_frame - now;
            if let Some(end) = end_time {
                if now >= end {
                    break;
                }
                timeout = timeout.min(end - now);
            }
            let _ = Terminal::poll_event(timeout)?;
        }

        if !scene.running {
            break;
        }

        if let Some((nw, nh)) = pending_resize {
            scene.resize(nw, nh);
            frame = Frame::new(nw, nh, scene.palette.bg);
        }

        scene.tick();
        scene.render(&mut frame);
        term.draw(&frame)?;

        next_frame += tick_period;
        let now = Instant::now();
        if now > next_frame {
            next_frame = now;
        }
    }

    Ok(())
}
