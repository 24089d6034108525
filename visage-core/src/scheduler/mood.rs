//! Four-phase mood animation
//!
//! Each mood cycles `start -> a -> b -> c` at a speed-dependent frame rate
//! for `anim_duration` seconds, flashes its `end` face, then starts over on
//! the next tick. Short durations (two seconds or less) show `start`
//! without animating.

use super::secs_to_ms;
use crate::bitmaps::*;
use crate::matrix::FaceMatrix;
use crate::state::emotion::{AnimState, Emotion};
use crate::traits::RenderSink;

/// Shortest time a mood frame is shown (ms)
pub const MIN_FRAME_MS: u32 = 100;

/// Mood animations never run at or below this many seconds
pub const STATIC_THRESHOLD_S: f32 = 2.0;

/// Bitmaps for one mood
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoodFrames {
    pub phases: [&'static FaceMatrix; 4],
    pub end: &'static FaceMatrix,
    /// `false` pins the mood to its start face
    pub animated: bool,
}

impl MoodFrames {
    const fn cycle(
        start: &'static FaceMatrix,
        a: &'static FaceMatrix,
        b: &'static FaceMatrix,
        c: &'static FaceMatrix,
        end: &'static FaceMatrix,
    ) -> Self {
        Self {
            phases: [start, a, b, c],
            end,
            animated: true,
        }
    }

    const fn still(face: &'static FaceMatrix) -> Self {
        Self {
            phases: [face; 4],
            end: face,
            animated: false,
        }
    }

    pub fn start(&self) -> &'static FaceMatrix {
        self.phases[0]
    }

    /// Frames for a mood emotion; `None` for neutral and talking
    pub fn for_emotion(emotion: Emotion) -> Option<&'static MoodFrames> {
        match emotion {
            Emotion::Smile => Some(&SMILE_FRAMES),
            Emotion::SmileLove => Some(&SMILE_LOVE_FRAMES),
            Emotion::Embarrassed => Some(&EMBARRASSED_FRAMES),
            Emotion::Scary => Some(&SCARY_FRAMES),
            Emotion::Happy => Some(&HAPPY_FRAMES),
            Emotion::Sad => Some(&SAD_FRAMES),
            Emotion::Surprise => Some(&SURPRISE_FRAMES),
            Emotion::Neutral | Emotion::Talking => None,
        }
    }
}

static SMILE_FRAMES: MoodFrames = MoodFrames::cycle(&SMILE_B, &SMILE_A, &SMILE_B, &SMILE_A, &SMILE);
static SMILE_LOVE_FRAMES: MoodFrames =
    MoodFrames::cycle(&SMILE_LOVE, &SMILE_LOVE_A, &SMILE_LOVE_B, &SMILE_LOVE_A, &SMILE);
static EMBARRASSED_FRAMES: MoodFrames = MoodFrames::still(&EMBARRASSED);
static SCARY_FRAMES: MoodFrames =
    MoodFrames::cycle(&SCARY_B, &SCARY_C, &SCARY_D, &SCARY_C, &SCARY_A);
static HAPPY_FRAMES: MoodFrames = MoodFrames::cycle(&SMILE, &SMILE_A, &SMILE, &HAPPY, &HAPPY);
static SAD_FRAMES: MoodFrames = MoodFrames::cycle(&SAD_A, &SAD_A, &SAD, &SAD, &SAD_A);
static SURPRISE_FRAMES: MoodFrames = MoodFrames::cycle(
    &NEUTRAL_NO_BLINK,
    &SURPRISE,
    &SURPRISE,
    &SURPRISE,
    &NEUTRAL_NO_BLINK,
);

/// Time each phase is shown at `speed`
///
/// `speed` is seconds per frame; anything under 0.1 s (including NaN and
/// negatives) is raised to the floor.
pub fn frame_ms(speed: f32) -> u32 {
    ((speed * 1000.0) as u32).max(MIN_FRAME_MS)
}

/// Run a mood for one tick
pub fn drive_mood<S: RenderSink + ?Sized>(
    state: &mut AnimState,
    frames: &MoodFrames,
    speed: f32,
    duration_s: f32,
    now_ms: u32,
    sink: &mut S,
) {
    if !state.animating {
        if !frames.animated || !(duration_s > STATIC_THRESHOLD_S) {
            sink.draw(now_ms, frames.start(), false);
        } else {
            state.animating = true;
            state.start_ms = now_ms;
            state.last_frame_ms = now_ms;
            state.frame = 0;
            state.cycle_count = 0;
            sink.draw(now_ms, frames.start(), true);

            #[cfg(feature = "defmt")]
            defmt::debug!("mood: start, speed {}, {} s", speed, duration_s);
        }
        return;
    }

    let elapsed = now_ms.wrapping_sub(state.start_ms);
    if elapsed >= secs_to_ms(duration_s) {
        state.animating = false;
        sink.draw(now_ms, frames.end, true);

        #[cfg(feature = "defmt")]
        defmt::debug!("mood: complete after {} cycles", state.cycle_count);
        return;
    }

    let frame_ms = frame_ms(speed);
    if now_ms.wrapping_sub(state.last_frame_ms) >= frame_ms {
        state.frame = (state.frame + 1) % 4;
        state.cycle_count = elapsed / frame_ms.saturating_mul(2);
        state.last_frame_ms = now_ms;
        sink.draw(now_ms, frames.phases[usize::from(state.frame)], false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::render::recording::Recorder;
    use proptest::prelude::*;

    #[test]
    fn test_frame_ms_floor() {
        assert_eq!(frame_ms(0.2), 200);
        assert_eq!(frame_ms(0.05), 100);
        assert_eq!(frame_ms(0.0), 100);
        assert_eq!(frame_ms(-1.0), 100);
        assert_eq!(frame_ms(f32::NAN), 100);
    }

    #[test]
    fn test_every_mood_has_frames() {
        for emotion in Emotion::ALL {
            let frames = MoodFrames::for_emotion(emotion);
            match emotion {
                Emotion::Neutral | Emotion::Talking => assert!(frames.is_none()),
                _ => assert!(frames.is_some()),
            }
        }
    }

    #[test]
    fn test_short_duration_is_static() {
        let frames = MoodFrames::for_emotion(Emotion::Smile).unwrap();
        let mut state = AnimState::default();
        let mut sink = Recorder::default();
        for t in (0..5000).step_by(50) {
            drive_mood(&mut state, frames, 0.2, 2.0, t, &mut sink);
        }
        assert!(!state.animating);
        assert_eq!(sink.forced(), 0);
        assert!(sink.calls.iter().all(|c| c.1 == SMILE_B));
    }

    #[test]
    fn test_embarrassed_never_animates() {
        let frames = MoodFrames::for_emotion(Emotion::Embarrassed).unwrap();
        let mut state = AnimState::default();
        let mut sink = Recorder::default();
        drive_mood(&mut state, frames, 0.2, 10.0, 0, &mut sink);
        drive_mood(&mut state, frames, 0.2, 10.0, 500, &mut sink);
        assert!(!state.animating);
        assert!(sink.calls.iter().all(|c| c.1 == EMBARRASSED && !c.2));
    }

    #[test]
    fn test_cycle_end_then_restart() {
        let frames = MoodFrames::for_emotion(Emotion::Happy).unwrap();
        let mut state = AnimState::default();
        let mut sink = Recorder::default();

        drive_mood(&mut state, frames, 0.2, 3.0, 1000, &mut sink);
        assert!(state.animating);
        assert_eq!(sink.last(), Some(&(1000, SMILE, true)));

        // Not yet a full frame
        drive_mood(&mut state, frames, 0.2, 3.0, 1150, &mut sink);
        assert_eq!(state.frame, 0);

        drive_mood(&mut state, frames, 0.2, 3.0, 1200, &mut sink);
        assert_eq!(state.frame, 1);
        assert_eq!(sink.last(), Some(&(1200, SMILE_A, false)));

        drive_mood(&mut state, frames, 0.2, 3.0, 1400, &mut sink);
        drive_mood(&mut state, frames, 0.2, 3.0, 1600, &mut sink);
        assert_eq!(state.frame, 3);
        assert_eq!(sink.last_frame(), Some(HAPPY));
        assert_eq!(state.cycle_count, 600 / 400);

        drive_mood(&mut state, frames, 0.2, 3.0, 1800, &mut sink);
        assert_eq!(state.frame, 0);

        // Duration reached
        drive_mood(&mut state, frames, 0.2, 3.0, 4000, &mut sink);
        assert!(!state.animating);
        assert_eq!(sink.last(), Some(&(4000, HAPPY, true)));

        // Next tick starts a fresh cycle from the start face
        drive_mood(&mut state, frames, 0.2, 3.0, 4005, &mut sink);
        assert!(state.animating);
        assert_eq!(state.frame, 0);
        assert_eq!(state.start_ms, 4005);
        assert_eq!(sink.last(), Some(&(4005, SMILE, true)));

        drive_mood(&mut state, frames, 0.2, 3.0, 4205, &mut sink);
        assert_eq!(state.frame, 1);
        assert_eq!(sink.last(), Some(&(4205, SMILE_A, false)));
    }

    proptest! {
        #[test]
        fn prop_animates_until_duration(
            duration_s in 2.01f32..20.0,
            speed in 0.0f32..2.0,
            step in 1u32..300,
        ) {
            let frames = MoodFrames::for_emotion(Emotion::Scary).unwrap();
            let mut state = AnimState::default();
            let mut sink = Recorder::default();
            let duration_ms = secs_to_ms(duration_s);

            drive_mood(&mut state, frames, speed, duration_s, 0, &mut sink);
            prop_assert!(state.animating);

            let mut t = 0;
            while t < duration_ms {
                drive_mood(&mut state, frames, speed, duration_s, t, &mut sink);
                prop_assert!(state.animating);
                t += step;
            }
            drive_mood(&mut state, frames, speed, duration_s, t, &mut sink);
            prop_assert!(!state.animating);
            prop_assert_eq!(sink.last(), Some(&(t, SCARY_A, true)));

            drive_mood(&mut state, frames, speed, duration_s, t + 1, &mut sink);
            prop_assert!(state.animating);
            prop_assert_eq!(sink.last(), Some(&(t + 1, SCARY_B, true)));
        }
    }
}
