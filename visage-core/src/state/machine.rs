//! Emotion dispatcher
//!
//! Owns the active emotion, the per-emotion state table, the live
//! parameters and the in-flight speech sequence. Commands only record a
//! pending transition; [`Face::tick`] commits it once the settle guard has
//! passed, runs the active driver and reverts timed-out emotions.

use heapless::{String, Vec};
use rand::RngCore;
use visage_protocol::{Command, Field, MAX_VALUE_LEN};

use super::emotion::{Emotion, EmotionState, EmotionTable};
use super::events::FaceEvent;
use crate::config::FaceConfig;
use crate::scheduler::{
    drive_mood, drive_neutral, drive_talking, secs_to_ms, AnimationSequence, MoodFrames,
    MouthShape, SpeechParams, SpeechStatus,
};
use crate::traits::RenderSink;

/// Neutral runs at this fraction of `intensity`
const NEUTRAL_SPEED_SCALE: f32 = 0.2;

/// Reasons a decoded command was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandError {
    /// No `key:value` pairs at all
    Empty,
    /// Pairs present but no `emotion`
    MissingEmotion,
}

/// Parameters commands overwrite and drivers read every tick
#[derive(Debug, Clone, PartialEq)]
pub struct Params {
    pub duration_s: f32,
    pub intensity: f32,
    pub mouth_speed: f32,
    pub anim_duration_s: f32,
    pub text: String<MAX_VALUE_LEN>,
    pub talking_emotion: MouthShape,
}

impl Params {
    fn from_config(config: &FaceConfig) -> Self {
        Self {
            duration_s: config.expression.duration_s,
            intensity: config.expression.intensity,
            mouth_speed: config.expression.mouth_speed,
            anim_duration_s: config.expression.anim_duration_s,
            text: String::new(),
            talking_emotion: MouthShape::Neutral,
        }
    }

    /// Speed handed to the driver of `emotion`
    pub fn speed_for(&self, emotion: Emotion) -> f32 {
        match emotion {
            Emotion::Neutral => NEUTRAL_SPEED_SCALE * self.intensity,
            Emotion::Talking => self.intensity,
            _ => self.mouth_speed * self.intensity,
        }
    }

    fn clear_speech(&mut self) {
        self.text.clear();
        self.talking_emotion = MouthShape::Neutral;
    }
}

/// Result of one tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickOutcome {
    /// Transitions to report, in order
    pub events: Vec<FaceEvent, 2>,
    /// The runtime should freeze this long before the next tick
    pub hold_ms: Option<u32>,
}

/// The face controller
pub struct Face<R: RngCore> {
    config: FaceConfig,
    params: Params,
    table: EmotionTable,
    active: Emotion,
    pending: Option<Emotion>,
    last_transition_ms: u32,
    speech: AnimationSequence,
    rng: R,
}

impl<R: RngCore> Face<R> {
    /// Start in neutral at `now_ms`
    pub fn new(config: FaceConfig, mut rng: R, now_ms: u32) -> Self {
        let table = EmotionTable::new(now_ms, &mut rng, &config.idle);
        Self {
            params: Params::from_config(&config),
            config,
            table,
            active: Emotion::Neutral,
            pending: None,
            last_transition_ms: now_ms,
            speech: AnimationSequence::new(),
            rng,
        }
    }

    pub fn active(&self) -> Emotion {
        self.active
    }

    pub fn pending(&self) -> Option<Emotion> {
        self.pending
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn config(&self) -> &FaceConfig {
        &self.config
    }

    pub fn state(&self, emotion: Emotion) -> &EmotionState {
        self.table.get(emotion)
    }

    pub fn speech(&self) -> &AnimationSequence {
        &self.speech
    }

    pub fn last_transition_ms(&self) -> u32 {
        self.last_transition_ms
    }

    /// Accept a decoded command
    ///
    /// Parameters take effect immediately; the emotion change waits for
    /// the next tick past the settle guard. Later commands replace an
    /// uncommitted one. Unknown emotion names become `neutral`.
    pub fn apply(&mut self, command: &Command) -> Result<Emotion, CommandError> {
        if command.is_empty() {
            return Err(CommandError::Empty);
        }
        let name = command
            .text(Field::Emotion)
            .ok_or(CommandError::MissingEmotion)?;

        for field in Field::ALL.into_iter().filter(|f| f.is_numeric()) {
            self.update_number(command, field);
        }

        if let Some(text) = command.text(Field::Text) {
            self.params.text.clear();
            for c in text.chars() {
                if self.params.text.push(c).is_err() {
                    break;
                }
            }
        }
        if let Some(shape) = command.text(Field::TalkingEmotion) {
            self.params.talking_emotion = MouthShape::from_name(shape);
        }

        let emotion = Emotion::from_name(name).unwrap_or_else(|| {
            #[cfg(feature = "defmt")]
            defmt::warn!("face: unknown emotion '{}', using neutral", name);
            Emotion::Neutral
        });
        self.pending = Some(emotion);
        Ok(emotion)
    }

    fn update_number(&mut self, command: &Command, field: Field) {
        let value = match command.number(field) {
            Some(Ok(value)) => value,
            Some(Err(_e)) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("face: {:?}, keeping previous value", _e);
                return;
            }
            None => return,
        };
        match field {
            Field::Duration => self.params.duration_s = value,
            Field::Intensity => self.params.intensity = value,
            Field::MouthSpeed => self.params.mouth_speed = value,
            Field::AnimDuration => self.params.anim_duration_s = value,
            _ => {}
        }
    }

    /// Run one control-loop iteration
    pub fn tick<S: RenderSink + ?Sized>(&mut self, now_ms: u32, sink: &mut S) -> TickOutcome {
        let mut outcome = TickOutcome::default();

        if let Some(target) = self.pending {
            if now_ms.wrapping_sub(self.last_transition_ms) > self.config.settle_ms {
                self.pending = None;
                self.switch_to(target, now_ms);
                let _ = outcome.events.push(FaceEvent::Switched {
                    emotion: target,
                    at_ms: now_ms,
                });

                #[cfg(feature = "defmt")]
                defmt::info!("face: switched to {}", target.name());
            }
        }

        outcome.hold_ms = self.drive(now_ms, sink);

        if self.active != Emotion::Neutral
            && now_ms.wrapping_sub(self.last_transition_ms) >= secs_to_ms(self.params.duration_s)
        {
            let finished = self.active;
            self.params.clear_speech();
            self.switch_to(Emotion::Neutral, now_ms);
            if let Some(hold) = self.drive(now_ms, sink) {
                outcome.hold_ms = Some(hold);
            }
            let _ = outcome.events.push(FaceEvent::Finished { emotion: finished });

            #[cfg(feature = "defmt")]
            defmt::info!("face: {} timed out", finished.name());
        }

        outcome
    }

    fn switch_to(&mut self, emotion: Emotion, now_ms: u32) {
        self.table
            .reset(emotion, now_ms, &mut self.rng, &self.config.idle);
        self.active = emotion;
        self.last_transition_ms = now_ms;
        self.speech.clear();
        if emotion != Emotion::Talking {
            self.params.clear_speech();
        }
    }

    fn drive<S: RenderSink + ?Sized>(&mut self, now_ms: u32, sink: &mut S) -> Option<u32> {
        let emotion = self.active;
        match self.table.get_mut(emotion) {
            EmotionState::Neutral(state) => {
                drive_neutral(state, &self.config.idle, now_ms, &mut self.rng, sink)
            }
            EmotionState::Talking(state) => {
                let params = SpeechParams {
                    text: &self.params.text,
                    duration_s: self.params.duration_s,
                    mouth_speed: self.params.mouth_speed,
                    shape: self.params.talking_emotion,
                };
                let status = drive_talking(
                    state,
                    &mut self.speech,
                    &params,
                    now_ms,
                    &mut self.rng,
                    sink,
                );
                if status == SpeechStatus::Finished {
                    self.params.clear_speech();
                }
                None
            }
            EmotionState::Anim(state) => {
                if let Some(frames) = MoodFrames::for_emotion(emotion) {
                    let speed = self.params.speed_for(emotion);
                    drive_mood(state, frames, speed, self.params.anim_duration_s, now_ms, sink);
                }
                None
            }
        }
    }
}
