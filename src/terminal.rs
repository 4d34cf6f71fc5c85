// Copyright (c) 2026 rezky_nightky

use std::io::{stdout, Result, Stdout, Write};

use crossterm::{
    cursor, event,
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal, ExecutableCommand, QueueableCommand,
};

use crate::cell::Cell;
use crate::frame::Frame;

pub struct Terminal {
    stdout: Stdout,
    last: Option<Vec<Cell>>,
    last_size: (u16, u16),
    run_buf: String,
}

impl Terminal {
    pub fn new() -> Result<Self> {
        let mut out = stdout();
        terminal::enable_raw_mode()?;
        let init_res: Result<()> = (|| {
            out.execute(terminal::EnterAlternateScreen)?;
            out.execute(cursor::Hide)?;
            let _ = out.execute(terminal::DisableLineWrap);
            out.execute(SetAttribute(Attribute::Reset))?;
            out.execute(ResetColor)?;
            out.execute(terminal::Clear(terminal::ClearType::All))?;
            out.flush()?;
            Ok(())
        })();
        if let Err(e) = init_res {
            restore_terminal_best_effort();
            return Err(e);
        }
        Ok(Self {
            stdout: out,
            last: None,
            last_size: (0, 0),
            run_buf: String::with_capacity(256),
        })
    }

    pub fn size(&self) -> Result<(u16, u16)> {
        terminal::size()
    }

    pub fn poll_event(timeout: std::time::Duration) -> Result<bool> {
        event::poll(timeout)
    }

    pub fn read_event() -> Result<event::Event> {
        event::read()
    }

    /// Emit the frame, diffing against what is already on screen and
    /// batching same-style runs per row into single writes.
    pub fn draw(&mut self, frame: &Frame) -> Result<()> {
        let size = (frame.width, frame.height);
        let full = self.last.is_none() || self.last_size != size;
        if full {
            self.stdout
                .queue(terminal::Clear(terminal::ClearType::All))?;
            self.last = Some(vec![
                Cell::blank_with_bg(None);
                frame.width as usize * frame.height as usize
            ]);
            self.last_size = size;
        }
        let last = self.last.as_mut().expect("set above");

        let mut cur_fg: Option<Color> = None;
        let mut cur_bg: Option<Color> = None;
        let mut cur_bold = false;
        let mut cur_pos: Option<(u16, u16)> = None;
        let width = frame.width as usize;

        for y in 0..frame.height {
            let row_start = y as usize * width;
            let mut x = 0u16;
            while (x as usize) < width {
                let idx = row_start + x as usize;
                let cell = frame.cell_at_index(idx);
                if !full && last[idx] == cell {
                    x += 1;
                    continue;
                }

                // Start of a run: gather following cells with the same
                // style that also need repainting.
                self.run_buf.clear();
                self.run_buf.push(cell.ch);
                last[idx] = cell;
                let x0 = x;
                x += 1;
                while (x as usize) < width {
                    let j = row_start + x as usize;
                    let next = frame.cell_at_index(j);
                    if !full && last[j] == next {
                        break;
                    }
                    if next.fg != cell.fg || next.bg != cell.bg || next.bold != cell.bold {
                        break;
                    }
                    self.run_buf.push(next.ch);
                    last[j] = next;
                    x += 1;
                }

                if cur_pos != Some((x0, y)) {
                    self.stdout.queue(cursor::MoveTo(x0, y))?;
                }
                if cell.fg != cur_fg {
                    self.stdout
                        .queue(SetForegroundColor(cell.fg.unwrap_or(Color::Reset)))?;
                    cur_fg = cell.fg;
                }
                if cell.bg != cur_bg {
                    self.stdout
                        .queue(SetBackgroundColor(cell.bg.unwrap_or(Color::Reset)))?;
                    cur_bg = cell.bg;
                }
                if cell.bold != cur_bold {
                    self.stdout.queue(SetAttribute(if cell.bold {
                        Attribute::Bold
                    } else {
                        Attribute::NormalIntensity
                    }))?;
                    cur_bold = cell.bold;
                }
                self.stdout.queue(Print(self.run_buf.as_str()))?;

                cur_pos = if (x as usize) < width {
                    Some((x, y))
                } else {
                    None
                };
            }
        }

        self.stdout.queue(SetAttribute(Attribute::Reset))?;
        self.stdout.queue(ResetColor)?;
        self.stdout.flush()?;
        Ok(())
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        restore_terminal_best_effort();
    }
}

pub fn restore_terminal_best_effort() {
    let mut out = stdout();
    let _ = out.execute(SetAttribute(Attribute::Reset));
    let _ = out.execute(ResetColor);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::EnableLineWrap);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
    let _ = out.flush();
}
