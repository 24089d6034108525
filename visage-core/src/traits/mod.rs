//! Output abstraction traits
//!
//! These traits define the interface between the expression logic
//! and whatever actually paints pixels.

pub mod render;

pub use render::RenderSink;
