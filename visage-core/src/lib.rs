//! Board-agnostic expression logic for the pixel face
//!
//! This crate contains everything that does not depend on the panel or
//! the MCU:
//!
//! - The 12x12 face grid and the bitmap set
//! - Emotion state machine and command dispatch
//! - Idle, mood and speech drivers
//! - The render sink trait
//! - Configuration type definitions
//!
//! Time is always passed in as milliseconds since boot and randomness as
//! a [`rand::RngCore`], so every behavior is reproducible on the host.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod bitmaps;
pub mod config;
pub mod matrix;
pub mod scheduler;
pub mod state;
pub mod traits;

pub use config::FaceConfig;
pub use matrix::{FaceMatrix, MATRIX_SIZE};
pub use state::{Emotion, Face, FaceEvent, TickOutcome};
pub use traits::RenderSink;
