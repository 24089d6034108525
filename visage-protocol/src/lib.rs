//! Visage command protocol
//!
//! This crate defines the text protocol between a host (speech engine,
//! chat bot, test script) and the face controller. The protocol is designed
//! to survive an unbuffered, lossy serial link without ever blocking the
//! render loop.
//!
//! # Protocol Overview
//!
//! Every command is a single brace-delimited line:
//! ```text
//! {emotion:talking,text:"hello there",duration:2.5,mouth_speed:0.4}\n
//! ```
//!
//! It is loosely JSON-shaped but deliberately *not* JSON: there is no
//! nesting and no escape sequences. See [`command`] for the exact grammar.
//!
//! The controller answers with one line per committed transition:
//! ```text
//! {"status": "ok", "emotion": "talking", "timestamp": 12.34}
//! {"event": "emotion_finished", "emotion": "talking"}
//! ```

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod command;
pub mod framer;
pub mod reply;

pub use command::{Command, Field, FieldError, MAX_FIELDS, MAX_KEY_LEN, MAX_VALUE_LEN};
pub use framer::{ByteSource, FrameError, RawMessage, StreamFramer, MAX_MESSAGE_LEN};
pub use reply::{Reply, MAX_REPLY_LEN};
