//! Emotion state machine
//!
//! Exactly one emotion is active at a time. Each emotion owns a state slot
//! that lives for the whole run and is reinitialized in place whenever the
//! face switches into it.

pub mod emotion;
pub mod events;
pub mod machine;

pub use emotion::{
    AnimState, BlinkPhase, Category, Emotion, EmotionState, EmotionTable, NeutralState,
    TalkingState,
};
pub use events::FaceEvent;
pub use machine::{CommandError, Face, Params, TickOutcome};
