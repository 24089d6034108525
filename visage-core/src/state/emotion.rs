//! Emotions and their per-emotion runtime state

use rand::{Rng, RngCore};

use crate::config::IdleTiming;
use crate::scheduler::speech::MouthShape;

/// The nine expressive states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Emotion {
    Neutral,
    Smile,
    SmileLove,
    Embarrassed,
    Scary,
    Happy,
    Sad,
    Surprise,
    Talking,
}

/// Which driver runs an emotion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Category {
    /// Blinking and yawning
    Idle,
    /// Speech-synchronized mouth
    Speech,
    /// Four-phase mood cycle
    Mood,
}

impl Emotion {
    /// Number of emotions
    pub const COUNT: usize = 9;

    /// Every emotion, in table order
    pub const ALL: [Emotion; Self::COUNT] = [
        Emotion::Neutral,
        Emotion::Smile,
        Emotion::SmileLove,
        Emotion::Embarrassed,
        Emotion::Scary,
        Emotion::Happy,
        Emotion::Sad,
        Emotion::Surprise,
        Emotion::Talking,
    ];

    /// Wire name
    pub const fn name(self) -> &'static str {
        match self {
            Emotion::Neutral => "neutral",
            Emotion::Smile => "smile",
            Emotion::SmileLove => "smile_love",
            Emotion::Embarrassed => "embarrassed",
            Emotion::Scary => "scary",
            Emotion::Happy => "happy",
            Emotion::Sad => "sad",
            Emotion::Surprise => "surprise",
            Emotion::Talking => "talking",
        }
    }

    /// Look up an emotion by its wire name (exact match)
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|e| e.name() == name)
    }

    /// Position in [`Emotion::ALL`]
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn category(self) -> Category {
        match self {
            Emotion::Neutral => Category::Idle,
            Emotion::Talking => Category::Speech,
            _ => Category::Mood,
        }
    }
}

/// Where the eyes are in a blink
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BlinkPhase {
    #[default]
    Open,
    Half,
    Closed,
}

impl BlinkPhase {
    /// Phase `elapsed_ms` after a blink started
    ///
    /// Half-closed for 100 ms, closed for 100 ms, half-closed for 100 ms,
    /// then open again.
    pub fn at(elapsed_ms: u32) -> Self {
        match elapsed_ms {
            0..=99 => BlinkPhase::Half,
            100..=199 => BlinkPhase::Closed,
            200..=299 => BlinkPhase::Half,
            _ => BlinkPhase::Open,
        }
    }
}

/// Idle state for `neutral`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NeutralState {
    /// A blink is in progress
    pub blinking: bool,
    pub blink_phase: BlinkPhase,
    pub blink_start_ms: u32,
    /// When the last blink was scheduled
    pub last_blink_ms: u32,
    /// Gap until the next blink
    pub blink_interval_ms: u32,
    pub last_yawn_ms: u32,
    /// Gap until the next yawn
    pub yawn_interval_ms: u32,
    /// Horizontal gaze offset in cells
    pub pupil_offset: i8,
}

impl NeutralState {
    /// Fresh state with timers starting at `now_ms`
    pub fn new<R: RngCore>(now_ms: u32, rng: &mut R, idle: &IdleTiming) -> Self {
        let range = idle.pupil_range.max(0);
        Self {
            blinking: false,
            blink_phase: BlinkPhase::Open,
            blink_start_ms: now_ms,
            last_blink_ms: now_ms,
            blink_interval_ms: roll(rng, idle.blink_base_ms, idle.blink_jitter_ms),
            last_yawn_ms: now_ms,
            yawn_interval_ms: roll(rng, idle.yawn_base_ms, idle.yawn_jitter_ms),
            pupil_offset: rng.gen_range(-range..=range),
        }
    }
}

/// `base + uniform[0, jitter)`
pub(crate) fn roll<R: RngCore>(rng: &mut R, base: u32, jitter: u32) -> u32 {
    if jitter == 0 {
        base
    } else {
        base.saturating_add(rng.gen_range(0..jitter))
    }
}

/// Speech state for `talking`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TalkingState {
    /// A speech sequence is playing
    pub talking: bool,
    pub start_ms: u32,
    /// Mouth shape latched when speech started
    pub shape: MouthShape,
}

/// Mood animation state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AnimState {
    pub animating: bool,
    /// Phase index, 0..4
    pub frame: u8,
    pub cycle_count: u32,
    pub start_ms: u32,
    pub last_frame_ms: u32,
}

/// Per-emotion state, tagged by driver category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EmotionState {
    Neutral(NeutralState),
    Talking(TalkingState),
    Anim(AnimState),
}

impl EmotionState {
    /// Freshly initialized state for `emotion`
    pub fn initial<R: RngCore>(
        emotion: Emotion,
        now_ms: u32,
        rng: &mut R,
        idle: &IdleTiming,
    ) -> Self {
        match emotion.category() {
            Category::Idle => EmotionState::Neutral(NeutralState::new(now_ms, rng, idle)),
            Category::Speech => EmotionState::Talking(TalkingState::default()),
            Category::Mood => EmotionState::Anim(AnimState::default()),
        }
    }

    pub fn category(&self) -> Category {
        match self {
            EmotionState::Neutral(_) => Category::Idle,
            EmotionState::Talking(_) => Category::Speech,
            EmotionState::Anim(_) => Category::Mood,
        }
    }
}

/// One state slot per emotion, created once and reset in place
#[derive(Debug, Clone)]
pub struct EmotionTable {
    states: [EmotionState; Emotion::COUNT],
}

impl EmotionTable {
    pub fn new<R: RngCore>(now_ms: u32, rng: &mut R, idle: &IdleTiming) -> Self {
        let mut states = [EmotionState::Anim(AnimState::default()); Emotion::COUNT];
        for emotion in Emotion::ALL {
            states[emotion.index()] = EmotionState::initial(emotion, now_ms, rng, idle);
        }
        Self { states }
    }

    /// Reinitialize the slot for `emotion`
    pub fn reset<R: RngCore>(&mut self, emotion: Emotion, now_ms: u32, rng: &mut R, idle: &IdleTiming) {
        self.states[emotion.index()] = EmotionState::initial(emotion, now_ms, rng, idle);
    }

    pub fn get(&self, emotion: Emotion) -> &EmotionState {
        &self.states[emotion.index()]
    }

    pub fn get_mut(&mut self, emotion: Emotion) -> &mut EmotionState {
        &mut self.states[emotion.index()]
    }
}
