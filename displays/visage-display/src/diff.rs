//! Diffing face renderer
//!
//! Keeps a copy of the last grid that reached the panel and repaints only
//! the cells that changed. Unforced draws are rate-limited to 60 per
//! second; a forced draw (or the first one) clears the panel and paints
//! every lit cell.

use visage_core::{FaceMatrix, RenderSink};

use crate::backend::{DisplayError, PixelBackend};
use crate::layout::Layout;

/// Target refresh rate
pub const FRAMES_PER_SECOND: u32 = 60;

/// Minimum gap between unforced draws (ms)
pub const FRAME_INTERVAL_MS: u32 = 1000 / FRAMES_PER_SECOND;

/// Counters for what the renderer actually did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RenderStats {
    /// Full clears
    pub repaints: u32,
    /// Cells painted by incremental draws
    pub patched_cells: u32,
    /// Draws dropped by the rate limit
    pub throttled: u32,
    /// Draws that hit a backend error
    pub failures: u32,
}

/// Render sink that paints a face grid onto a [`PixelBackend`]
pub struct RenderDiff<B: PixelBackend> {
    backend: B,
    layout: Layout,
    snapshot: FaceMatrix,
    initialized: bool,
    last_draw_ms: Option<u32>,
    stats: RenderStats,
}

impl<B: PixelBackend> RenderDiff<B> {
    pub fn new(backend: B, layout: Layout) -> Self {
        Self {
            backend,
            layout,
            snapshot: FaceMatrix::blank(),
            initialized: false,
            last_draw_ms: None,
            stats: RenderStats::default(),
        }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Grid currently on the panel, if the panel is in a known state
    pub fn snapshot(&self) -> Option<&FaceMatrix> {
        self.initialized.then_some(&self.snapshot)
    }

    pub fn stats(&self) -> RenderStats {
        self.stats
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    fn repaint(&mut self, frame: &FaceMatrix) -> Result<(), DisplayError> {
        self.stats.repaints += 1;
        self.backend.fill(self.layout.background)?;
        for (row, col) in frame.lit_cells() {
            self.paint_cell(row, col, true)?;
        }
        Ok(())
    }

    fn patch(&mut self, frame: &FaceMatrix) -> Result<(), DisplayError> {
        let previous = self.snapshot;
        for (row, col, on) in frame.changes(&previous) {
            self.paint_cell(row, col, on)?;
            self.stats.patched_cells += 1;
        }
        Ok(())
    }

    fn paint_cell(&mut self, row: usize, col: usize, on: bool) -> Result<(), DisplayError> {
        let (x, y) = self.layout.cell_origin(row, col);
        let size = self.layout.cell_size;
        let color = if on {
            self.layout.foreground
        } else {
            self.layout.background
        };
        self.backend.fill_rect(x, y, size, size, color)
    }
}

impl<B: PixelBackend> RenderSink for RenderDiff<B> {
    fn draw(&mut self, now_ms: u32, frame: &FaceMatrix, force: bool) {
        if !force {
            if let Some(last) = self.last_draw_ms {
                if now_ms.wrapping_sub(last) < FRAME_INTERVAL_MS {
                    self.stats.throttled += 1;
                    return;
                }
            }
        }
        self.last_draw_ms = Some(now_ms);

        let result = if force || !self.initialized {
            self.repaint(frame)
        } else {
            self.patch(frame)
        };

        match result {
            Ok(()) => {
                self.snapshot = *frame;
                self.initialized = true;
            }
            Err(_e) => {
                self.stats.failures += 1;
                self.initialized = false;

                #[cfg(feature = "defmt")]
                defmt::warn!("render: backend error {:?}, full repaint next", _e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::Rgb565;
    use proptest::prelude::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Op {
        Fill(Rgb565),
        Rect(u16, u16, Rgb565),
    }

    #[derive(Default)]
    struct Log {
        ops: std::vec::Vec<Op>,
        fail_after: Option<usize>,
    }

    impl PixelBackend for Log {
        fn fill(&mut self, color: Rgb565) -> Result<(), DisplayError> {
            self.ops.push(Op::Fill(color));
            Ok(())
        }

        fn fill_rect(
            &mut self,
            x: u16,
            y: u16,
            _w: u16,
            _h: u16,
            color: Rgb565,
        ) -> Result<(), DisplayError> {
            if let Some(n) = self.fail_after {
                if self.ops.len() >= n {
                    return Err(DisplayError::Communication);
                }
            }
            self.ops.push(Op::Rect(x, y, color));
            Ok(())
        }

        fn dimensions(&self) -> (u16, u16) {
            (240, 320)
        }
    }

    fn grid(cells: &[(usize, usize)]) -> FaceMatrix {
        let mut m = FaceMatrix::blank();
        for &(r, c) in cells {
            m.set(r, c, true);
        }
        m
    }

    fn renderer() -> RenderDiff<Log> {
        RenderDiff::new(Log::default(), Layout::new())
    }

    #[test]
    fn test_first_draw_is_full() {
        let mut r = renderer();
        r.draw(0, &grid(&[(0, 0), (2, 3)]), false);
        assert_eq!(
            r.backend().ops,
            vec![
                Op::Fill(Rgb565::BLACK),
                Op::Rect(0, 40, Rgb565::WHITE),
                Op::Rect(60, 80, Rgb565::WHITE),
            ]
        );
        assert_eq!(r.stats().repaints, 1);
    }

    #[test]
    fn test_incremental_paints_only_changes() {
        let mut r = renderer();
        r.draw(0, &grid(&[(0, 0), (1, 1)]), false);
        r.backend_mut().ops.clear();

        r.draw(20, &grid(&[(0, 0), (5, 5)]), false);
        assert_eq!(
            r.backend().ops,
            vec![
                Op::Rect(20, 60, Rgb565::BLACK),
                Op::Rect(100, 140, Rgb565::WHITE),
            ]
        );
        assert_eq!(r.stats().repaints, 1);
        assert_eq!(r.stats().patched_cells, 2);
    }

    #[test]
    fn test_identical_frame_paints_nothing() {
        let mut r = renderer();
        let face = grid(&[(3, 3)]);
        r.draw(0, &face, false);
        r.backend_mut().ops.clear();
        r.draw(100, &face, false);
        assert!(r.backend().ops.is_empty());
    }

    #[test]
    fn test_rate_limit() {
        let mut r = renderer();
        r.draw(0, &grid(&[(0, 0)]), false);
        r.draw(FRAME_INTERVAL_MS - 1, &grid(&[(1, 1)]), false);
        assert_eq!(r.snapshot(), Some(&grid(&[(0, 0)])));
        assert_eq!(r.stats().throttled, 1);

        r.draw(FRAME_INTERVAL_MS, &grid(&[(1, 1)]), false);
        assert_eq!(r.snapshot(), Some(&grid(&[(1, 1)])));
    }

    #[test]
    fn test_force_bypasses_rate_limit_and_repaints() {
        let mut r = renderer();
        r.draw(0, &grid(&[(0, 0)]), false);
        r.backend_mut().ops.clear();
        r.draw(1, &grid(&[(0, 0)]), true);
        assert_eq!(
            r.backend().ops,
            vec![Op::Fill(Rgb565::BLACK), Op::Rect(0, 40, Rgb565::WHITE)]
        );
        assert_eq!(r.stats().repaints, 2);
    }

    #[test]
    fn test_backend_error_invalidates() {
        let mut r = renderer();
        r.draw(0, &grid(&[(0, 0)]), false);
        r.backend_mut().fail_after = Some(1);
        r.draw(20, &grid(&[(4, 4)]), false);
        assert_eq!(r.snapshot(), None);
        assert_eq!(r.stats().failures, 1);

        // Recovered backend gets a full repaint
        r.backend_mut().fail_after = None;
        r.backend_mut().ops.clear();
        r.draw(40, &grid(&[(4, 4)]), false);
        assert_eq!(r.backend().ops[0], Op::Fill(Rgb565::BLACK));
        assert_eq!(r.snapshot(), Some(&grid(&[(4, 4)])));
    }

    proptest! {
        #[test]
        fn prop_patches_track_cell_changes(
            frames in proptest::collection::vec(proptest::array::uniform12(0u16..0x1000), 1..20)
        ) {
            let mut r = renderer();
            let mut previous: Option<FaceMatrix> = None;
            let mut expected = 0u32;
            for (i, rows) in frames.iter().enumerate() {
                let frame = FaceMatrix::from_rows(*rows);
                if let Some(prev) = previous {
                    expected += frame.changes(&prev).count() as u32;
                }
                r.draw(i as u32 * FRAME_INTERVAL_MS, &frame, false);
                prop_assert_eq!(r.snapshot(), Some(&frame));
                previous = Some(frame);
            }
            prop_assert_eq!(r.stats().patched_cells, expected);
            prop_assert_eq!(r.stats().repaints, 1);
            prop_assert_eq!(r.stats().throttled, 0);
        }
    }
}
