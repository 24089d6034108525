//! Line framing for the command stream.
//!
//! Commands arrive one byte at a time from a source that may have nothing
//! to offer on any given tick. The framer accumulates bytes until a
//! line-feed closes a brace-balanced message:
//!
//! - `\r` is dropped
//! - `{` opens a message (or nests one level deeper)
//! - `}` closes one level; depth never goes below zero
//! - `\n` emits the buffer if it holds a balanced message, otherwise
//!   discards it
//! - everything else (braces included) is kept verbatim

use heapless::Vec;

/// Maximum buffered message length in bytes
pub const MAX_MESSAGE_LEN: usize = 2048;

/// A complete, brace-balanced message line (without the line terminator)
pub type RawMessage = Vec<u8, MAX_MESSAGE_LEN>;

/// Reasons a partially accumulated line was dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Line exceeded [`MAX_MESSAGE_LEN`]
    Overflow,
    /// Line ended without ever opening a message
    Unterminated,
    /// Line ended while braces were still open
    Unbalanced,
    /// `}` seen with no open brace; kept as content
    StrayClose,
}

/// Non-blocking byte source
///
/// `read_byte` must return immediately: `None` means "nothing right now",
/// not end of stream.
pub trait ByteSource {
    /// Fetch the next available byte, if any
    fn read_byte(&mut self) -> Option<u8>;
}

impl<I: Iterator<Item = u8>> ByteSource for I {
    fn read_byte(&mut self) -> Option<u8> {
        self.next()
    }
}

/// Accumulates bytes into brace-balanced, newline-terminated messages
#[derive(Debug, Clone)]
pub struct StreamFramer {
    buffer: RawMessage,
    in_message: bool,
    brace_depth: u16,
}

impl Default for StreamFramer {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamFramer {
    /// Create an empty framer
    pub const fn new() -> Self {
        Self {
            buffer: Vec::new(),
            in_message: false,
            brace_depth: 0,
        }
    }

    /// Discard any partial line
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.in_message = false;
        self.brace_depth = 0;
    }

    /// Bytes accumulated for the line in progress
    pub fn pending(&self) -> &[u8] {
        &self.buffer
    }

    /// Current brace nesting depth
    pub fn depth(&self) -> u16 {
        self.brace_depth
    }

    /// Whether an opening brace has been seen on the current line
    pub fn in_message(&self) -> bool {
        self.in_message
    }

    /// Feed a single byte
    ///
    /// Returns `Ok(Some(message))` when a line-feed completes a balanced
    /// message, `Ok(None)` when more bytes are needed, or `Err` when the
    /// byte caused (or reported) a discard. A `StrayClose` error does not
    /// discard anything; the brace is kept as content.
    pub fn feed(&mut self, byte: u8) -> Result<Option<RawMessage>, FrameError> {
        match byte {
            b'\r' => Ok(None),
            b'\n' => self.end_line(),
            _ => {
                if self.buffer.push(byte).is_err() {
                    self.reset();
                    return Err(FrameError::Overflow);
                }
                match byte {
                    b'{' if self.in_message => {
                        self.brace_depth = self.brace_depth.saturating_add(1);
                    }
                    b'{' => {
                        self.in_message = true;
                        self.brace_depth = 1;
                    }
                    b'}' if self.in_message => {
                        if self.brace_depth == 0 {
                            return Err(FrameError::StrayClose);
                        }
                        self.brace_depth -= 1;
                    }
                    _ => {}
                }
                Ok(None)
            }
        }
    }

    fn end_line(&mut self) -> Result<Option<RawMessage>, FrameError> {
        if self.buffer.is_empty() {
            self.reset();
            return Ok(None);
        }

        let verdict = if !self.in_message {
            Err(FrameError::Unterminated)
        } else if self.brace_depth != 0 {
            Err(FrameError::Unbalanced)
        } else {
            Ok(Some(core::mem::take(&mut self.buffer)))
        };

        self.reset();
        verdict
    }

    /// Drain the source until it runs dry or a message completes
    ///
    /// Never blocks. At most one message is returned per call; anything the
    /// source still holds after a completed line is left for the next call.
    pub fn poll<S: ByteSource + ?Sized>(&mut self, source: &mut S) -> Option<RawMessage> {
        while let Some(byte) = source.read_byte() {
            match self.feed(byte) {
                Ok(Some(message)) => {
                    #[cfg(feature = "defmt")]
                    defmt::debug!("framer: message complete ({} bytes)", message.len());
                    return Some(message);
                }
                Ok(None) => {}
                Err(_e) => {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("framer: dropped input: {:?}", _e);
                }
            }
        }
        None
    }
}
