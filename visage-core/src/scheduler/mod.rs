//! Expression drivers
//!
//! One driver per emotion category. Each runs once per tick, reads the
//! clock it is handed, updates its state slot and draws through a
//! [`RenderSink`](crate::traits::RenderSink). None of them block.

pub mod idle;
pub mod mood;
pub mod speech;

pub use idle::drive_neutral;
pub use mood::{drive_mood, frame_ms, MoodFrames};
pub use speech::{
    count_syllables, cycle_timing, drive_talking, AnimationFrame, AnimationSequence,
    CycleTiming, FrameTag, MouthFrames, MouthShape, SpeechParams, SpeechStatus, MAX_FRAMES,
};

/// Seconds to whole milliseconds; NaN and negatives become zero
pub fn secs_to_ms(seconds: f32) -> u32 {
    (seconds * 1000.0) as u32
}
