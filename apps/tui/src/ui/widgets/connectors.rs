//! Box-drawing connectors rasterised onto terminal cells.
//!
//! Segments mark the edges they cross in a per-cell bitmask, so a stem
//! meeting a sibling bar comes out as `┴` and a drop leaving it as `┬`.

use kurbo::Point;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;

const UP: u8 = 0b0001;
const DOWN: u8 = 0b0010;
const LEFT: u8 = 0b0100;
const RIGHT: u8 = 0b1000;

/// Connector mask over a canvas, in canvas-relative cells.
#[derive(Debug, Clone)]
pub struct ConnectorGrid {
    width: i32,
    height: i32,
    cells: Vec<u8>,
}

impl ConnectorGrid {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width: i32::from(width),
            height: i32::from(height),
            cells: vec![0; usize::from(width) * usize::from(height)],
        }
    }

    /// Adds an axis-aligned segment given in canvas-relative screen coordinates.
    /// Diagonal input is drawn as its vertical leg followed by its horizontal leg.
    pub fn add_segment(&mut self, from: Point, to: Point) {
        let (x0, y0) = cell(from);
        let (x1, y1) = cell(to);
        self.vertical(x0, y0, y1);
        self.horizontal(y1, x0, x1);
    }

    pub fn glyph_at(&self, x: i32, y: i32) -> Option<char> {
        self.index(x, y).and_then(|i| glyph(self.cells[i]))
    }

    /// Writes every marked cell into `buf`, offset by the canvas origin.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn render(&self, canvas: Rect, buf: &mut Buffer, style: Style) {
        for y in 0..self.height {
            for x in 0..self.width {
                if let Some(symbol) = self.glyph_at(x, y) {
                    let position = (canvas.x + x as u16, canvas.y + y as u16);
                    if let Some(cell) = buf.cell_mut(position) {
                        cell.set_char(symbol).set_style(style);
                    }
                }
            }
        }
    }

    fn vertical(&mut self, x: i32, y0: i32, y1: i32) {
        let (top, bottom) = (y0.min(y1), y0.max(y1));
        // Only rows that can touch the canvas matter.
        for y in top.max(-1)..bottom.min(self.height) {
            self.mark(x, y, DOWN);
            self.mark(x, y + 1, UP);
        }
    }

    fn horizontal(&mut self, y: i32, x0: i32, x1: i32) {
        let (left, right) = (x0.min(x1), x0.max(x1));
        for x in left.max(-1)..right.min(self.width) {
            self.mark(x, y, RIGHT);
            self.mark(x + 1, y, LEFT);
        }
    }

    fn mark(&mut self, x: i32, y: i32, bits: u8) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] |= bits;
        }
    }

    #[allow(clippy::cast_sign_loss)]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return None;
        }
        Some((y * self.width + x) as usize)
    }
}

#[allow(clippy::cast_possible_truncation)]
fn cell(point: Point) -> (i32, i32) {
    (point.x.floor() as i32, point.y.floor() as i32)
}

const fn glyph(bits: u8) -> Option<char> {
    let symbol = match bits {
        0 => return None,
        b if b == UP | DOWN || b == UP || b == DOWN => '│',
        b if b == LEFT | RIGHT || b == LEFT || b == RIGHT => '─',
        b if b == DOWN | RIGHT => '┌',
        b if b == DOWN | LEFT => '┐',
        b if b == UP | RIGHT => '└',
        b if b == UP | LEFT => '┘',
        b if b == UP | DOWN | RIGHT => '├',
        b if b == UP | DOWN | LEFT => '┤',
        b if b == DOWN | LEFT | RIGHT => '┬',
        b if b == UP | LEFT | RIGHT => '┴',
        _ => '┼',
    };
    Some(symbol)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(grid: &ConnectorGrid, y: i32) -> String {
        (0..grid.width)
            .map(|x| grid.glyph_at(x, y).unwrap_or(' '))
            .collect()
    }

    #[test]
    fn stem_bar_and_drops_join_with_tees() {
        let mut grid = ConnectorGrid::new(9, 4);
        // Stem from the parent at column 4 to the bar on row 1.
        grid.add_segment(Point::new(4.5, 0.0), Point::new(4.5, 1.0));
        grid.add_segment(Point::new(0.5, 1.0), Point::new(8.5, 1.0));
        grid.add_segment(Point::new(0.5, 1.0), Point::new(0.5, 3.0));
        grid.add_segment(Point::new(8.5, 1.0), Point::new(8.5, 3.0));

        assert_eq!(row(&grid, 0), "    │    ");
        assert_eq!(row(&grid, 1), "┌───┴───┐");
        assert_eq!(row(&grid, 2), "│       │");
    }

    #[test]
    fn centre_child_under_stem_crosses() {
        let mut grid = ConnectorGrid::new(5, 3);
        grid.add_segment(Point::new(2.0, 0.0), Point::new(2.0, 1.0));
        grid.add_segment(Point::new(0.0, 1.0), Point::new(4.0, 1.0));
        grid.add_segment(Point::new(2.0, 1.0), Point::new(2.0, 2.0));
        assert_eq!(grid.glyph_at(2, 1), Some('┼'));
    }

    #[test]
    fn segments_outside_the_canvas_are_clipped() {
        let mut grid = ConnectorGrid::new(4, 4);
        grid.add_segment(Point::new(-50.0, 2.0), Point::new(50.0, 2.0));
        grid.add_segment(Point::new(100.0, -10.0), Point::new(100.0, 10.0));
        assert_eq!(row(&grid, 2), "────");
        assert_eq!(grid.glyph_at(4, 2), None);
    }
}
