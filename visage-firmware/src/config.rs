//! Build-time face configuration
//!
//! `build.rs` validates `face.toml` and generates the constants included
//! here. Edit face.toml and rebuild to customize.

use visage_core::config::{ExpressionDefaults, FaceConfig, IdleTiming};
use visage_display::Layout;

include!(concat!(env!("OUT_DIR"), "/face_config.rs"));

/// Panel layout with the configured cell size
pub const fn layout() -> Layout {
    let mut layout = Layout::new();
    layout.cell_size = CELL_SIZE;
    layout
}
