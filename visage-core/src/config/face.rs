//! Face tuning parameters

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Parameters a command may override
///
/// These are the values in effect before any command sets them. Commands
/// overwrite them live and they are never reset.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ExpressionDefaults {
    /// Seconds a non-neutral emotion stays active
    pub duration_s: f32,
    /// Global animation speed multiplier
    pub intensity: f32,
    /// Mouth speed; larger is slower
    pub mouth_speed: f32,
    /// Mood animation duration in seconds
    pub anim_duration_s: f32,
}

impl ExpressionDefaults {
    pub const fn new() -> Self {
        Self {
            duration_s: 65.5,
            intensity: 0.4,
            mouth_speed: 0.5,
            anim_duration_s: 5.0,
        }
    }
}

impl Default for ExpressionDefaults {
    fn default() -> Self {
        Self::new()
    }
}

/// Idle (neutral) behavior timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct IdleTiming {
    /// Minimum gap between blinks (ms)
    pub blink_base_ms: u32,
    /// Random extra gap added per blink, exclusive upper bound (ms)
    pub blink_jitter_ms: u32,
    /// Minimum gap between yawns (ms)
    pub yawn_base_ms: u32,
    /// Random extra gap added per yawn, exclusive upper bound (ms)
    pub yawn_jitter_ms: u32,
    /// How long the runtime freezes on a yawn (ms)
    pub yawn_hold_ms: u32,
    /// Pupil offset is drawn from `-pupil_range..=pupil_range`
    pub pupil_range: i8,
}

impl IdleTiming {
    pub const fn new() -> Self {
        Self {
            blink_base_ms: 3000,
            blink_jitter_ms: 2000,
            yawn_base_ms: 10_000,
            yawn_jitter_ms: 5000,
            yawn_hold_ms: 800,
            pupil_range: 3,
        }
    }
}

impl Default for IdleTiming {
    fn default() -> Self {
        Self::new()
    }
}

/// Complete face configuration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FaceConfig {
    /// Initial live parameters
    pub expression: ExpressionDefaults,
    /// Minimum time between committed transitions (ms)
    pub settle_ms: u32,
    /// Neutral blink/yawn timing
    pub idle: IdleTiming,
}

impl FaceConfig {
    pub const fn new() -> Self {
        Self {
            expression: ExpressionDefaults::new(),
            settle_ms: 500,
            idle: IdleTiming::new(),
        }
    }
}

impl Default for FaceConfig {
    fn default() -> Self {
        Self::new()
    }
}
