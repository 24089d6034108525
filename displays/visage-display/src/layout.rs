//! Panel geometry for the face grid

use visage_core::MATRIX_SIZE;

use crate::backend::Rgb565;

/// Where and how big the face is drawn
///
/// The grid is centered on the panel; each cell is a `cell_size` square.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Layout {
    /// Panel width in pixels
    pub width: u16,
    /// Panel height in pixels
    pub height: u16,
    /// Side of one grid cell in pixels
    pub cell_size: u16,
    /// Lit cells
    pub foreground: Rgb565,
    /// Unlit cells and the area around the grid
    pub background: Rgb565,
}

impl Default for Layout {
    fn default() -> Self {
        Self::new()
    }
}

impl Layout {
    /// 240x320 portrait panel, 20 px cells, white on black
    pub const fn new() -> Self {
        Self {
            width: 240,
            height: 320,
            cell_size: 20,
            foreground: Rgb565::WHITE,
            background: Rgb565::BLACK,
        }
    }

    /// Side of the whole grid in pixels
    pub const fn grid_size(&self) -> u16 {
        self.cell_size.saturating_mul(MATRIX_SIZE as u16)
    }

    /// Left edge of the grid
    pub const fn x_offset(&self) -> u16 {
        self.width.saturating_sub(self.grid_size()) / 2
    }

    /// Top edge of the grid
    pub const fn y_offset(&self) -> u16 {
        self.height.saturating_sub(self.grid_size()) / 2
    }

    /// Whether the grid fits on the panel
    pub const fn fits(&self) -> bool {
        self.cell_size > 0 && self.grid_size() <= self.width && self.grid_size() <= self.height
    }

    /// Top-left pixel of a cell
    ///
    /// Saturates at `u16::MAX` for layouts that do not [`fit`](Self::fits);
    /// the backend then rejects the rectangle.
    pub fn cell_origin(&self, row: usize, col: usize) -> (u16, u16) {
        (
            Self::along(self.x_offset(), col, self.cell_size),
            Self::along(self.y_offset(), row, self.cell_size),
        )
    }

    fn along(offset: u16, index: usize, cell_size: u16) -> u16 {
        let index = u16::try_from(index).unwrap_or(u16::MAX);
        offset.saturating_add(index.saturating_mul(cell_size))
    }
}
