//! Configuration types
//!
//! Board-agnostic tuning for expression timing. The firmware bakes a
//! validated copy in at build time; tests use the defaults.

pub mod face;

pub use face::*;
