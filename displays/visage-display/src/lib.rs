//! Pixel backend trait and face renderer for Visage
//!
//! This crate provides:
//! - `PixelBackend` trait for solid-fill displays (TFT over SPI, test buffers)
//! - `Layout` for placing the 12x12 face grid on a panel
//! - `RenderDiff`, a `RenderSink` that paints only what changed
//!
//! # Architecture
//!
//! The expression logic in `visage-core` draws whole grids through the
//! `RenderSink` trait and never sees pixels. `RenderDiff` turns those
//! grids into rectangle fills, so a panel driver only has to implement
//! `fill` and `fill_rect`.

#![cfg_attr(not(test), no_std)]

pub mod backend;
pub mod diff;
pub mod layout;

// Re-export key types
pub use backend::{DisplayError, PixelBackend, Rgb565};
pub use diff::{RenderDiff, RenderStats, FRAME_INTERVAL_MS};
pub use layout::Layout;
