//! Neutral idle behavior: blinking and the occasional yawn

use rand::RngCore;

use crate::bitmaps::{NEUTRAL_BLINK, NEUTRAL_HALF_BLINK, NEUTRAL_NO_BLINK, NEUTRAL_YAWN};
use crate::config::IdleTiming;
use crate::matrix::FaceMatrix;
use crate::state::emotion::{roll, BlinkPhase, NeutralState};
use crate::traits::RenderSink;

impl BlinkPhase {
    pub fn bitmap(self) -> &'static FaceMatrix {
        match self {
            BlinkPhase::Open => &NEUTRAL_NO_BLINK,
            BlinkPhase::Half => &NEUTRAL_HALF_BLINK,
            BlinkPhase::Closed => &NEUTRAL_BLINK,
        }
    }
}

/// Run neutral for one tick
///
/// Returns `Some(hold_ms)` when a yawn was drawn; the caller should freeze
/// the loop for that long so the yawn stays on screen.
pub fn drive_neutral<R: RngCore, S: RenderSink + ?Sized>(
    state: &mut NeutralState,
    idle: &IdleTiming,
    now_ms: u32,
    rng: &mut R,
    sink: &mut S,
) -> Option<u32> {
    if now_ms.wrapping_sub(state.last_blink_ms) > state.blink_interval_ms {
        if !state.blinking {
            state.blinking = true;
            state.blink_start_ms = now_ms;
            state.blink_phase = BlinkPhase::Half;
        }
        state.last_blink_ms = now_ms;
        state.blink_interval_ms = roll(rng, idle.blink_base_ms, idle.blink_jitter_ms);
    }

    if now_ms.wrapping_sub(state.last_yawn_ms) > state.yawn_interval_ms {
        state.last_yawn_ms = now_ms;
        state.yawn_interval_ms = roll(rng, idle.yawn_base_ms, idle.yawn_jitter_ms);
        sink.draw(now_ms, &NEUTRAL_YAWN, true);

        #[cfg(feature = "defmt")]
        defmt::debug!("neutral: yawn, next in {} ms", state.yawn_interval_ms);

        return Some(idle.yawn_hold_ms);
    }

    if state.blinking {
        state.blink_phase = BlinkPhase::at(now_ms.wrapping_sub(state.blink_start_ms));
        if state.blink_phase == BlinkPhase::Open {
            state.blinking = false;
        }
    } else {
        state.blink_phase = BlinkPhase::Open;
    }
    sink.draw(now_ms, state.blink_phase.bitmap(), false);
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::render::recording::Recorder;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn fixed_idle() -> IdleTiming {
        IdleTiming {
            blink_base_ms: 3000,
            blink_jitter_ms: 0,
            yawn_base_ms: 10_000,
            yawn_jitter_ms: 0,
            yawn_hold_ms: 800,
            pupil_range: 3,
        }
    }

    #[test]
    fn test_open_eyes_between_blinks() {
        let idle = fixed_idle();
        let mut rng = SmallRng::seed_from_u64(0);
        let mut state = NeutralState::new(0, &mut rng, &idle);
        let mut sink = Recorder::default();

        assert_eq!(drive_neutral(&mut state, &idle, 1000, &mut rng, &mut sink), None);
        assert_eq!(sink.last(), Some(&(1000, NEUTRAL_NO_BLINK, false)));
        assert!(!state.blinking);
    }

    #[test]
    fn test_blink_sequence() {
        let idle = fixed_idle();
        let mut rng = SmallRng::seed_from_u64(0);
        let mut state = NeutralState::new(0, &mut rng, &idle);
        let mut sink = Recorder::default();

        drive_neutral(&mut state, &idle, 3001, &mut rng, &mut sink);
        assert!(state.blinking);
        assert_eq!(sink.last_frame(), Some(NEUTRAL_HALF_BLINK));

        drive_neutral(&mut state, &idle, 3150, &mut rng, &mut sink);
        assert_eq!(sink.last_frame(), Some(NEUTRAL_BLINK));

        drive_neutral(&mut state, &idle, 3250, &mut rng, &mut sink);
        assert_eq!(sink.last_frame(), Some(NEUTRAL_HALF_BLINK));

        drive_neutral(&mut state, &idle, 3301, &mut rng, &mut sink);
        assert_eq!(sink.last_frame(), Some(NEUTRAL_NO_BLINK));
        assert!(!state.blinking);

        // Next blink is scheduled from when the last one started
        drive_neutral(&mut state, &idle, 6001, &mut rng, &mut sink);
        assert!(!state.blinking);
        drive_neutral(&mut state, &idle, 6002, &mut rng, &mut sink);
        assert!(state.blinking);
    }

    #[test]
    fn test_yawn_requests_hold() {
        let idle = fixed_idle();
        let mut rng = SmallRng::seed_from_u64(0);
        let mut state = NeutralState::new(0, &mut rng, &idle);
        let mut sink = Recorder::default();

        let hold = drive_neutral(&mut state, &idle, 10_001, &mut rng, &mut sink);
        assert_eq!(hold, Some(800));
        assert_eq!(sink.last(), Some(&(10_001, NEUTRAL_YAWN, true)));
        assert_eq!(state.last_yawn_ms, 10_001);

        // No second yawn right away
        let hold = drive_neutral(&mut state, &idle, 10_900, &mut rng, &mut sink);
        assert_eq!(hold, None);
    }

    #[test]
    fn test_blink_intervals_rerolled() {
        let idle = IdleTiming::default();
        let mut rng = SmallRng::seed_from_u64(11);
        let mut state = NeutralState::new(0, &mut rng, &idle);
        let mut sink = Recorder::default();
        let mut seen = std::collections::BTreeSet::new();

        let mut t = 0;
        while t < 120_000 {
            let before = state.last_blink_ms;
            drive_neutral(&mut state, &idle, t, &mut rng, &mut sink);
            if state.last_blink_ms != before {
                assert!((3000..5000).contains(&state.blink_interval_ms));
                seen.insert(state.blink_interval_ms);
            }
            t += 10;
        }
        assert!(seen.len() > 1);
    }
}
