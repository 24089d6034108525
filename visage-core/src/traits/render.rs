//! Render sink trait

use crate::matrix::FaceMatrix;

/// Anything that can show a face grid
///
/// Drivers call `draw` freely, several times per tick if they like. The
/// sink decides what actually reaches the panel: `force` asks for a full
/// repaint, otherwise an implementation may rate-limit or paint only the
/// cells that changed.
pub trait RenderSink {
    /// Offer a grid for display
    ///
    /// - `now_ms`: Milliseconds since boot (wrapping), used for rate limiting
    /// - `frame`: The complete grid to show
    /// - `force`: Skip the rate limit and repaint the whole panel
    fn draw(&mut self, now_ms: u32, frame: &FaceMatrix, force: bool);
}

impl<T: RenderSink + ?Sized> RenderSink for &mut T {
    fn draw(&mut self, now_ms: u32, frame: &FaceMatrix, force: bool) {
        (**self).draw(now_ms, frame, force)
    }
}
