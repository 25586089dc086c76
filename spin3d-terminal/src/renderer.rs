/// ASCII point rasterizer for terminal rendering
use crossterm::{
    cursor::MoveTo,
    style::{Color as TermColor, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use spin3d_core::{Color, Surface};
use std::io::Write;

/// Character ramp from far (small disc) to near (large disc)
const LUMINOSITY_RAMP: &[char] = &['.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Virtual pixels per terminal cell; cells are roughly twice as tall as wide
pub const CELL_WIDTH: u32 = 8;
pub const CELL_HEIGHT: u32 = 16;

/// Disc radii map onto the ramp between these bounds
const MIN_RADIUS: f64 = 1.0;
const MAX_RADIUS: f64 = 3.5;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Cell {
    glyph: char,
    color: Color,
}

/// Terminal surface that rasterizes discs onto a grid of character cells
///
/// The surface reports its size in virtual pixels (`cols * CELL_WIDTH` by
/// `rows * CELL_HEIGHT`) so shapes keep canvas-like proportions.
pub struct AsciiRenderer {
    cols: usize,
    rows: usize,
    cells: Vec<Option<Cell>>,
}

impl AsciiRenderer {
    pub fn new(cols: usize, rows: usize) -> Self {
        Self {
            cols,
            rows,
            cells: vec![None; cols * rows],
        }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Adopt a new terminal size; contents are discarded
    pub fn resize(&mut self, cols: usize, rows: usize) {
        self.cols = cols;
        self.rows = rows;
        self.cells = vec![None; cols * rows];
    }

    /// Glyph at a cell, or a space when empty
    pub fn glyph_at(&self, col: usize, row: usize) -> char {
        if col >= self.cols || row >= self.rows {
            return ' ';
        }
        self.cells[row * self.cols + col].map_or(' ', |c| c.glyph)
    }

    /// Number of non-empty cells
    pub fn lit_cells(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    fn glyph_for_radius(radius: f64) -> char {
        let t = ((radius - MIN_RADIUS) / (MAX_RADIUS - MIN_RADIUS)).clamp(0.0, 1.0);
        let index = (t * (LUMINOSITY_RAMP.len() - 1) as f64).round() as usize;
        LUMINOSITY_RAMP[index.min(LUMINOSITY_RAMP.len() - 1)]
    }

    fn plot(&mut self, col: i64, row: i64, cell: Cell) {
        if col < 0 || row < 0 || col >= self.cols as i64 || row >= self.rows as i64 {
            return;
        }
        self.cells[row as usize * self.cols + col as usize] = Some(cell);
    }

    /// Write the whole grid, one `MoveTo` per row
    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        let mut current: Option<Color> = None;

        for row in 0..self.rows {
            writer.queue(MoveTo(0, row as u16))?;
            for col in 0..self.cols {
                match self.cells[row * self.cols + col] {
                    Some(cell) => {
                        if current != Some(cell.color) {
                            writer.queue(SetForegroundColor(to_term_color(cell.color)))?;
                            current = Some(cell.color);
                        }
                        writer.queue(Print(cell.glyph))?;
                    }
                    None => {
                        writer.queue(Print(' '))?;
                    }
                }
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

impl Surface for AsciiRenderer {
    fn size(&self) -> (u32, u32) {
        (self.cols as u32 * CELL_WIDTH, self.rows as u32 * CELL_HEIGHT)
    }

    fn clear(&mut self) {
        for cell in &mut self.cells {
            *cell = None;
        }
    }

    fn fill_disc(&mut self, x: f64, y: f64, radius: f64, color: Color) {
        if !x.is_finite() || !y.is_finite() {
            return;
        }
        let cell = Cell {
            glyph: Self::glyph_for_radius(radius),
            color,
        };
        let (cw, ch) = (CELL_WIDTH as f64, CELL_HEIGHT as f64);

        // Every cell whose centre the disc covers, plus the one under its centre
        let min_col = ((x - radius) / cw).floor() as i64;
        let max_col = ((x + radius) / cw).floor() as i64;
        let min_row = ((y - radius) / ch).floor() as i64;
        let max_row = ((y + radius) / ch).floor() as i64;
        for row in min_row..=max_row {
            for col in min_col..=max_col {
                let dx = (col as f64 + 0.5) * cw - x;
                let dy = (row as f64 + 0.5) * ch - y;
                if dx * dx + dy * dy <= radius * radius {
                    self.plot(col, row, cell);
                }
            }
        }
        self.plot((x / cw).floor() as i64, (y / ch).floor() as i64, cell);
    }
}

fn to_term_color(color: Color) -> TermColor {
    TermColor::Rgb {
        r: color.r,
        g: color.g,
        b: color.b,
    }
}
