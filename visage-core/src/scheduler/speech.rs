//! Speech-synchronized mouth animation
//!
//! When speech starts, the text and its duration are turned into a flat
//! list of open/closed mouth frames. The list is then played back against
//! the clock, one frame per entry, without blocking.

use heapless::Vec;
use rand::{Rng, RngCore};

use super::secs_to_ms;
use crate::bitmaps;
use crate::matrix::FaceMatrix;
use crate::state::emotion::TalkingState;
use crate::traits::RenderSink;

/// Upper bound on frames in one utterance
pub const MAX_FRAMES: usize = 1024;

/// Characters counted as syllable nuclei (compared after lowercasing)
pub const VOWELS: &str = "аеёиоуыэюяaeiouy";

/// Shortest open+closed cycle (ms)
pub const MIN_CYCLE_MS: u32 = 150;

/// Longest open+closed cycle (ms)
pub const MAX_CYCLE_MS: u32 = 800;

/// Base speech rate in syllables per second
const SYLLABLES_PER_SECOND: f32 = 3.5;

/// A trailing partial cycle shorter than this is dropped
const MIN_FINAL_MS: u32 = 50;

const PAUSE_MS: u32 = 100;
const PAUSE_EVERY_CYCLES: u32 = 4;

/// Why a frame is in the sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameTag {
    Open,
    Closed,
    /// Open mouth filling the time left at the end
    Final,
    /// Short closed-mouth breath every few cycles
    Pause,
}

/// One entry in a speech sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AnimationFrame {
    pub bitmap: &'static FaceMatrix,
    pub duration_ms: u32,
    pub tag: FrameTag,
}

/// Bitmaps used while talking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouthFrames {
    pub open: &'static FaceMatrix,
    pub closed: &'static FaceMatrix,
    /// Shown when not speaking
    pub rest: &'static FaceMatrix,
}

/// Face worn while talking, selected by `talking_emotion`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MouthShape {
    #[default]
    Neutral,
    Angry,
    SmileTricky,
    Tricky,
    Smile,
    Ha,
}

impl MouthShape {
    pub const ALL: [MouthShape; 6] = [
        MouthShape::Neutral,
        MouthShape::Angry,
        MouthShape::SmileTricky,
        MouthShape::Tricky,
        MouthShape::Smile,
        MouthShape::Ha,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            MouthShape::Neutral => "neutral",
            MouthShape::Angry => "angry",
            MouthShape::SmileTricky => "smile_tricky",
            MouthShape::Tricky => "tricky",
            MouthShape::Smile => "smile",
            MouthShape::Ha => "ha",
        }
    }

    /// Unknown names fall back to `Neutral`
    pub fn from_name(name: &str) -> Self {
        Self::ALL
            .iter()
            .copied()
            .find(|s| s.name() == name)
            .unwrap_or_default()
    }

    pub const fn frames(self) -> MouthFrames {
        use bitmaps::*;
        let (open, closed, rest) = match self {
            MouthShape::Neutral => (&TALKING_A, &TALKING_B, &NEUTRAL_NO_BLINK),
            MouthShape::Angry => (&ANGRY_OPEN_MOUTH, &ANGRY_CLOSED_MOUTH, &ANGRY_CLOSED),
            MouthShape::SmileTricky => (&TALKING_TRICKY_A, &TALKING_TRICKY_B, &SMILE_A),
            MouthShape::Tricky => (&SMILE_TRICKY_A, &SMILE_TRICKY_B, &NEUTRAL_NO_BLINK),
            MouthShape::Smile => (&SMILE, &TALKING_A, &NEUTRAL_NO_BLINK),
            MouthShape::Ha => (&HAPPY_CIRCLE, &NEUTRAL_CIRCLE, &NEUTRAL_NO_BLINK),
        };
        MouthFrames { open, closed, rest }
    }
}

/// Vowels in `text`, never less than one
pub fn count_syllables(text: &str) -> usize {
    text.chars()
        .flat_map(char::to_lowercase)
        .filter(|c| VOWELS.contains(*c))
        .count()
        .max(1)
}

/// Mouth cycle split into open and closed halves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CycleTiming {
    pub cycle_ms: u32,
    pub open_ms: u32,
    pub closed_ms: u32,
}

/// Cycle timing for a mouth speed
///
/// Larger `mouth_speed` means calmer, longer cycles. The cycle is
/// `1000 / (3.5 / mouth_speed)` ms, truncated and clamped to 150..=800,
/// and split 60/40 between open and closed.
pub fn cycle_timing(mouth_speed: f32) -> CycleTiming {
    let cycle_ms = if mouth_speed.is_finite() && mouth_speed > 0.0 {
        let rate = SYLLABLES_PER_SECOND * (1.0 / mouth_speed);
        ((1000.0 / rate) as u32).clamp(MIN_CYCLE_MS, MAX_CYCLE_MS)
    } else {
        MIN_CYCLE_MS
    };
    CycleTiming {
        cycle_ms,
        open_ms: cycle_ms * 6 / 10,
        closed_ms: cycle_ms * 4 / 10,
    }
}

/// Vary a duration by up to ±10%
fn jitter<R: RngCore>(duration_ms: u32, rng: &mut R) -> u32 {
    let spread = duration_ms / 5;
    let offset = if spread == 0 {
        0
    } else {
        rng.gen_range(0..spread)
    };
    duration_ms - duration_ms / 10 + offset
}

/// Frames for one utterance plus playback position
#[derive(Debug, Clone)]
pub struct AnimationSequence {
    frames: Vec<AnimationFrame, MAX_FRAMES>,
    index: usize,
    frame_start_ms: u32,
    syllables: usize,
    /// Next draw of the current frame must be a full repaint
    dirty: bool,
}

impl Default for AnimationSequence {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimationSequence {
    /// Empty sequence
    pub const fn new() -> Self {
        Self {
            frames: Vec::new(),
            index: 0,
            frame_start_ms: 0,
            syllables: 0,
            dirty: false,
        }
    }

    /// Build a sequence covering at most `total_ms`
    #[allow(clippy::too_many_arguments)]
    pub fn build<R: RngCore>(
        text: &str,
        total_ms: u32,
        mouth_speed: f32,
        open: &'static FaceMatrix,
        closed: &'static FaceMatrix,
        rng: &mut R,
        now_ms: u32,
    ) -> Self {
        let mut sequence = Self::new();
        sequence.rebuild(text, total_ms, mouth_speed, open, closed, rng, now_ms);
        sequence
    }

    /// Replace the contents in place with a new utterance
    ///
    /// Empty `text` or a zero `total_ms` leaves the sequence empty.
    #[allow(clippy::too_many_arguments)]
    pub fn rebuild<R: RngCore>(
        &mut self,
        text: &str,
        total_ms: u32,
        mouth_speed: f32,
        open: &'static FaceMatrix,
        closed: &'static FaceMatrix,
        rng: &mut R,
        now_ms: u32,
    ) {
        self.clear();
        if text.is_empty() || total_ms == 0 {
            return;
        }

        self.syllables = count_syllables(text);
        let timing = cycle_timing(mouth_speed);

        let mut accumulated: u32 = 0;
        let mut cycles: u32 = 0;

        while accumulated < total_ms {
            let open_ms = jitter(timing.open_ms, rng);
            let closed_ms = jitter(timing.closed_ms, rng);

            if accumulated + open_ms + closed_ms <= total_ms {
                if self.frames.capacity() - self.frames.len() < 2 {
                    break;
                }
                self.push(open, open_ms, FrameTag::Open);
                self.push(closed, closed_ms, FrameTag::Closed);
                accumulated += open_ms + closed_ms;
                cycles += 1;
            } else {
                let remaining = total_ms - accumulated;
                if remaining > MIN_FINAL_MS {
                    self.push(open, remaining, FrameTag::Final);
                }
                break;
            }

            if cycles % PAUSE_EVERY_CYCLES == 0 && accumulated + PAUSE_MS < total_ms {
                if !self.push(closed, PAUSE_MS, FrameTag::Pause) {
                    break;
                }
                accumulated += PAUSE_MS;
            }
        }

        self.frame_start_ms = now_ms;
        self.dirty = true;

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "speech: {} syllables, cycle {} ms, {} frames in {} cycles",
            self.syllables,
            timing.cycle_ms,
            self.frames.len(),
            cycles
        );
    }

    fn push(&mut self, bitmap: &'static FaceMatrix, duration_ms: u32, tag: FrameTag) -> bool {
        self.frames
            .push(AnimationFrame {
                bitmap,
                duration_ms,
                tag,
            })
            .is_ok()
    }

    /// Drop all frames
    pub fn clear(&mut self) {
        self.frames.clear();
        self.index = 0;
        self.syllables = 0;
        self.dirty = false;
    }

    pub fn frames(&self) -> &[AnimationFrame] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Index of the frame being shown
    pub fn index(&self) -> usize {
        self.index
    }

    /// Syllables counted in the text this sequence was built from
    pub fn syllables(&self) -> usize {
        self.syllables
    }

    /// Sum of all frame durations
    pub fn scheduled_ms(&self) -> u32 {
        self.frames.iter().map(|f| f.duration_ms).sum()
    }

    /// Every frame has been shown
    pub fn is_finished(&self) -> bool {
        self.index >= self.frames.len()
    }

    /// Play back against the clock
    ///
    /// Returns `true` while frames remain. Advances at most one frame per
    /// call; the newly current frame is drawn once when it is reached. The
    /// first frame is redrawn on every call while it is current.
    pub fn advance<S: RenderSink + ?Sized>(&mut self, now_ms: u32, sink: &mut S) -> bool {
        let Some(current) = self.frames.get(self.index).copied() else {
            return false;
        };

        if now_ms.wrapping_sub(self.frame_start_ms) >= current.duration_ms {
            self.index += 1;
            self.frame_start_ms = now_ms;
            match self.frames.get(self.index) {
                Some(next) => {
                    sink.draw(now_ms, next.bitmap, false);
                    true
                }
                None => {
                    #[cfg(feature = "defmt")]
                    defmt::debug!("speech: sequence complete ({} frames)", self.frames.len());
                    false
                }
            }
        } else {
            if self.index == 0 || self.dirty {
                sink.draw(now_ms, current.bitmap, self.dirty);
                self.dirty = false;
            }
            true
        }
    }
}

/// What the talking driver did this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SpeechStatus {
    /// Not talking; rest face shown
    Silent,
    /// A new utterance began
    Started,
    Speaking,
    /// The utterance just ran out its duration
    Finished,
}

/// Live inputs to the talking driver
#[derive(Debug, Clone, Copy)]
pub struct SpeechParams<'a> {
    pub text: &'a str,
    pub duration_s: f32,
    pub mouth_speed: f32,
    pub shape: MouthShape,
}

/// Run the talking emotion for one tick
pub fn drive_talking<R: RngCore, S: RenderSink + ?Sized>(
    state: &mut TalkingState,
    sequence: &mut AnimationSequence,
    params: &SpeechParams<'_>,
    now_ms: u32,
    rng: &mut R,
    sink: &mut S,
) -> SpeechStatus {
    let speech_ms = secs_to_ms(params.duration_s);

    if !state.talking {
        let frames = params.shape.frames();
        if params.text.is_empty() || speech_ms == 0 {
            sink.draw(now_ms, frames.rest, false);
            return SpeechStatus::Silent;
        }

        #[cfg(feature = "defmt")]
        defmt::info!(
            "speech: start, {} ms, mouth_speed {}, shape {}",
            speech_ms,
            params.mouth_speed,
            params.shape
        );

        state.talking = true;
        state.start_ms = now_ms;
        state.shape = params.shape;
        sequence.rebuild(
            params.text,
            speech_ms,
            params.mouth_speed,
            frames.open,
            frames.closed,
            rng,
            now_ms,
        );
        sequence.advance(now_ms, sink);
        return SpeechStatus::Started;
    }

    let rest = state.shape.frames().rest;
    if now_ms.wrapping_sub(state.start_ms) < speech_ms {
        if !sequence.advance(now_ms, sink) {
            sink.draw(now_ms, rest, false);
        }
        SpeechStatus::Speaking
    } else {
        state.talking = false;
        sequence.clear();
        sink.draw(now_ms, rest, true);

        #[cfg(feature = "defmt")]
        defmt::info!("speech: finished");

        SpeechStatus::Finished
    }
}
