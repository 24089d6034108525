//! 12x12 monochrome face grid
//!
//! Each row is stored as the low 12 bits of a `u16`, most significant bit
//! on the left, so binary literals read the way the face looks:
//!
//! ```
//! use visage_core::matrix::FaceMatrix;
//!
//! let m = FaceMatrix::from_rows([
//!     0b1000_0000_0001, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
//! ]);
//! assert!(m.get(0, 0));
//! assert!(m.get(0, 11));
//! assert!(!m.get(0, 5));
//! ```

/// Rows and columns in the face grid
pub const MATRIX_SIZE: usize = 12;

const ROW_MASK: u16 = (1 << MATRIX_SIZE) - 1;

/// A 12x12 grid of on/off cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FaceMatrix {
    rows: [u16; MATRIX_SIZE],
}

impl FaceMatrix {
    /// All cells off
    pub const fn blank() -> Self {
        Self {
            rows: [0; MATRIX_SIZE],
        }
    }

    /// Build from row bitmasks; bits above column 11 are ignored
    pub const fn from_rows(rows: [u16; MATRIX_SIZE]) -> Self {
        let mut masked = rows;
        let mut i = 0;
        while i < MATRIX_SIZE {
            masked[i] &= ROW_MASK;
            i += 1;
        }
        Self { rows: masked }
    }

    /// Row bitmasks
    pub fn rows(&self) -> &[u16; MATRIX_SIZE] {
        &self.rows
    }

    /// Whether a cell is on; out-of-range cells read as off
    pub fn get(&self, row: usize, col: usize) -> bool {
        if row >= MATRIX_SIZE || col >= MATRIX_SIZE {
            return false;
        }
        self.rows[row] & Self::bit(col) != 0
    }

    /// Switch a cell on or off; out-of-range writes are ignored
    pub fn set(&mut self, row: usize, col: usize, on: bool) {
        if row >= MATRIX_SIZE || col >= MATRIX_SIZE {
            return;
        }
        if on {
            self.rows[row] |= Self::bit(col);
        } else {
            self.rows[row] &= !Self::bit(col);
        }
    }

    /// Number of lit cells
    pub fn lit(&self) -> u32 {
        self.rows.iter().map(|r| r.count_ones()).sum()
    }

    /// Iterate over every lit cell as `(row, col)`
    pub fn lit_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells().filter(|&(_, _, on)| on).map(|(r, c, _)| (r, c))
    }

    /// Iterate over every cell as `(row, col, on)`, row-major
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, bool)> + '_ {
        (0..MATRIX_SIZE)
            .flat_map(|row| (0..MATRIX_SIZE).map(move |col| (row, col)))
            .map(move |(row, col)| (row, col, self.get(row, col)))
    }

    /// Cells whose state differs from `previous`, with their new state
    pub fn changes<'a>(
        &'a self,
        previous: &'a FaceMatrix,
    ) -> impl Iterator<Item = (usize, usize, bool)> + 'a {
        self.cells()
            .filter(move |&(row, col, on)| previous.get(row, col) != on)
    }

    const fn bit(col: usize) -> u16 {
        1 << (MATRIX_SIZE - 1 - col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_has_no_lit_cells() {
        let m = FaceMatrix::blank();
        assert_eq!(m.lit(), 0);
        assert_eq!(m.lit_cells().count(), 0);
    }

    #[test]
    fn test_from_rows_masks_high_bits() {
        let mut rows = [0u16; MATRIX_SIZE];
        rows[3] = 0xFFFF;
        let m = FaceMatrix::from_rows(rows);
        assert_eq!(m.rows()[3], 0x0FFF);
        assert_eq!(m.lit(), 12);
    }

    #[test]
    fn test_get_set() {
        let mut m = FaceMatrix::blank();
        m.set(2, 9, true);
        assert!(m.get(2, 9));
        assert_eq!(m.rows()[2], 0b0000_0000_0100);
        m.set(2, 9, false);
        assert!(!m.get(2, 9));
    }

    #[test]
    fn test_out_of_range_ignored() {
        let mut m = FaceMatrix::blank();
        m.set(12, 0, true);
        m.set(0, 12, true);
        assert_eq!(m, FaceMatrix::blank());
        assert!(!m.get(40, 40));
    }

    #[test]
    fn test_changes_reports_both_directions() {
        let mut before = FaceMatrix::blank();
        before.set(1, 1, true);
        before.set(5, 5, true);
        let mut after = before;
        after.set(1, 1, false);
        after.set(7, 3, true);

        let changes: std::vec::Vec<_> = after.changes(&before).collect();
        assert_eq!(changes, vec![(1, 1, false), (7, 3, true)]);
        assert_eq!(after.changes(&after).count(), 0);
    }

    #[test]
    fn test_cells_row_major() {
        let cells: std::vec::Vec<_> = FaceMatrix::blank().cells().take(13).collect();
        assert_eq!(cells[0], (0, 0, false));
        assert_eq!(cells[11], (0, 11, false));
        assert_eq!(cells[12], (1, 0, false));
    }
}
