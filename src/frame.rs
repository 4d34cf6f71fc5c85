// Copyright (c) 2026 rezky_nightky

use crate::cell::Cell;

/// One terminal-sized grid of styled cells. The scene repaints it fully
/// every tick; the terminal layer diffs it against what is on screen.
#[derive(Clone, Debug)]
pub struct Frame {
    pub width: u16,
    pub height: u16,
    cells: Vec<Cell>,
    blank: Cell,
}

impl Frame {
    pub fn new(width: u16, height: u16, bg: Option<crossterm::style::Color>) -> Self {
        let len = width as usize * height as usize;
        let blank = Cell::blank_with_bg(bg);
        Self {
            width,
            height,
            cells: vec![blank; len],
            blank,
        }
    }

    pub fn clear(&mut self) {
        self.cells.fill(self.blank);
    }

    pub fn index(&self, x: u16, y: u16) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    #[allow(dead_code)]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    pub fn cell_at_index(&self, i: usize) -> Cell {
        self.cells[i]
    }

    pub fn set(&mut self, x: u16, y: u16, cell: Cell) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = cell;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_get_round_trip() {
        let mut f = Frame::new(4, 3, None);
        let c = Cell {
            ch: 'x',
            fg: None,
            bg: None,
            bold: true,
        };
        f.set(3, 2, c);
        assert_eq!(f.get(3, 2), Some(&c));
    }

    #[test]
    fn out_of_bounds_writes_are_ignored() {
        let mut f = Frame::new(4, 3, None);
        f.set(4, 0, Cell::blank_with_bg(None));
        f.set(0, 3, Cell::blank_with_bg(None));
        assert!(f.get(4, 0).is_none());
        assert!(f.get(0, 3).is_none());
    }

    #[test]
    fn clear_restores_blanks() {
        let mut f = Frame::new(2, 2, None);
        f.set(
            0,
            0,
            Cell {
                ch: 'x',
                fg: None,
                bg: None,
                bold: false,
            },
        );
        f.clear();
        assert_eq!(f.get(0, 0).unwrap().ch, ' ');
    }
}
