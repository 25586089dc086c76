/// Drawing surface contract between the render pipeline and its hosts
use crate::color::Color;

/// A 2D target that can be cleared and filled with discs
///
/// Hosts may change the size at any time between frames; the pipeline asks
/// for it again on every render.
pub trait Surface {
    /// Current (width, height) in surface units
    fn size(&self) -> (u32, u32);

    /// Erase everything drawn so far
    fn clear(&mut self);

    /// Fill a disc centred at (x, y)
    fn fill_disc(&mut self, x: f64, y: f64, radius: f64, color: Color);
}

/// A recorded `fill_disc` call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Disc {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub color: Color,
}

/// In-memory surface that keeps the discs of the current frame
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    width: u32,
    height: u32,
    discs: Vec<Disc>,
    clears: usize,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            discs: Vec::new(),
            clears: 0,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    /// Discs drawn since the last clear
    pub fn discs(&self) -> &[Disc] {
        &self.discs
    }

    /// Number of times the surface has been cleared
    pub fn clears(&self) -> usize {
        self.clears
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn clear(&mut self) {
        self.discs.clear();
        self.clears += 1;
    }

    fn fill_disc(&mut self, x: f64, y: f64, radius: f64, color: Color) {
        self.discs.push(Disc { x, y, radius, color });
    }
}
