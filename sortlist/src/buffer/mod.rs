//! Character-cell surface the scene is rendered into.

use crate::text::char_width;
use crate::types::{Rgb, TextStyle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub symbol: char,
    pub fg: Rgb,
    pub bg: Rgb,
    pub style: TextStyle,
    /// Second column of a double-width character.
    pub continuation: bool,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            symbol: ' ',
            fg: Rgb::WHITE,
            bg: Rgb::BLACK,
            style: TextStyle::new(),
            continuation: false,
        }
    }
}

/// Integer cell rectangle, already clipped to a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl CellRect {
    pub fn right(&self) -> u16 {
        self.x.saturating_add(self.width)
    }

    pub fn bottom(&self) -> u16 {
        self.y.saturating_add(self.height)
    }

    pub fn contains(&self, x: u16, y: u16) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }
}

#[derive(Debug, Clone)]
pub struct Buffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl Buffer {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::default(); width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn area(&self) -> CellRect {
        CellRect {
            x: 0,
            y: 0,
            width: self.width,
            height: self.height,
        }
    }

    fn index(&self, x: u16, y: u16) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y as usize * self.width as usize + x as usize)
    }

    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.cells.get(self.index(x, y)?)
    }

    pub fn get_mut(&mut self, x: u16, y: u16) -> Option<&mut Cell> {
        let i = self.index(x, y)?;
        self.cells.get_mut(i)
    }

    /// Paint the background of every cell in `rect`.
    pub fn fill(&mut self, rect: CellRect, bg: Rgb) {
        for y in rect.y..rect.bottom().min(self.height) {
            for x in rect.x..rect.right().min(self.width) {
                if let Some(cell) = self.get_mut(x, y) {
                    *cell = Cell { bg, ..Cell::default() };
                }
            }
        }
    }

    /// Set a symbol, keeping the cell's background. Cells outside `clip`
    /// are left alone.
    pub fn put(&mut self, x: u16, y: u16, symbol: char, fg: Rgb, style: TextStyle, clip: CellRect) {
        if !clip.contains(x, y) {
            return;
        }
        if let Some(cell) = self.get_mut(x, y) {
            cell.symbol = symbol;
            cell.fg = fg;
            cell.style = style;
            cell.continuation = false;
        }
    }

    /// Write `text` starting at (`x`, `y`). Wide characters take two
    /// columns; one that would straddle the clip edge is dropped.
    pub fn put_str(
        &mut self,
        x: u16,
        y: u16,
        text: &str,
        fg: Rgb,
        style: TextStyle,
        clip: CellRect,
    ) {
        let mut col = x;
        for ch in text.chars() {
            let width = char_width(ch) as u16;
            if width == 0 {
                continue;
            }
            if col.saturating_add(width) > clip.right() {
                break;
            }
            self.put(col, y, ch, fg, style, clip);
            if width == 2 {
                if let Some(cell) = self.get_mut(col + 1, y) {
                    cell.symbol = ' ';
                    cell.continuation = true;
                }
            }
            col = col.saturating_add(width);
        }
    }

    /// Cells that differ from `previous`, with their coordinates.
    pub fn diff<'a>(&'a self, previous: &'a Buffer) -> impl Iterator<Item = (u16, u16, &'a Cell)> {
        let width = self.width.max(1) as usize;
        self.cells
            .iter()
            .zip(previous.cells.iter())
            .enumerate()
            .filter(|(_, (now, before))| now != before)
            .map(move |(i, (cell, _))| ((i % width) as u16, (i / width) as u16, cell))
    }

    pub fn clear(&mut self) {
        self.cells.fill(Cell::default());
    }

    /// The symbols of one row as a string, continuation cells skipped.
    pub fn row_text(&self, y: u16) -> String {
        (0..self.width)
            .filter_map(|x| self.get(x, y))
            .filter(|cell| !cell.continuation)
            .map(|cell| cell.symbol)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_str_clips_to_rect() {
        let mut buf = Buffer::new(10, 1);
        let clip = CellRect {
            x: 2,
            y: 0,
            width: 3,
            height: 1,
        };
        buf.put_str(0, 0, "abcdef", Rgb::WHITE, TextStyle::new(), clip);
        assert_eq!(buf.row_text(0), "  cde     ");
    }

    #[test]
    fn test_wide_char_marks_continuation() {
        let mut buf = Buffer::new(4, 1);
        buf.put_str(0, 0, "日x", Rgb::WHITE, TextStyle::new(), buf.area());
        assert_eq!(buf.get(0, 0).map(|c| c.symbol), Some('日'));
        assert_eq!(buf.get(1, 0).map(|c| c.continuation), Some(true));
        assert_eq!(buf.row_text(0), "日x ");
    }

    #[test]
    fn test_diff_reports_changed_cells() {
        let before = Buffer::new(3, 2);
        let mut after = before.clone();
        after.put(2, 1, '#', Rgb::WHITE, TextStyle::new(), after.area());
        let changed: Vec<_> = after.diff(&before).map(|(x, y, _)| (x, y)).collect();
        assert_eq!(changed, vec![(2, 1)]);
    }
}
