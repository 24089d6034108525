//! Command decoding.
//!
//! A command line is a flat list of `key:value` pairs. The grammar is
//! intentionally small and forgiving:
//!
//! ```text
//! command = [ "{" ] pair *( "," pair ) [ "}" ]
//! pair    = token ":" token
//! token   = quoted / bare
//! quoted  = ( DQUOTE *any DQUOTE ) / ( "'" *any "'" )
//! bare    = *( any except { } , : " ' )
//! ```
//!
//! - Quotes toggle string mode and are not part of the token. Inside a
//!   string, structural characters and the other quote style are literal.
//! - Bare tokens lose leading/trailing whitespace; interior whitespace is
//!   kept.
//! - A pair is recorded only when both key and value are non-empty, so a
//!   key without `:` silently disappears.
//! - Later duplicates overwrite earlier ones.
//!
//! Decoding never fails; malformed input just yields fewer fields.

use heapless::{FnvIndexMap, String};

use crate::framer::RawMessage;

/// Maximum number of distinct fields kept per command
pub const MAX_FIELDS: usize = 8;

/// Maximum key length in bytes
pub const MAX_KEY_LEN: usize = 24;

/// Maximum value length in bytes (longer values are truncated)
pub const MAX_VALUE_LEN: usize = 256;

/// Known command fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Field {
    /// Target emotion name (required)
    Emotion,
    /// Emotion lifetime in seconds
    Duration,
    /// Speed multiplier for the active animation
    Intensity,
    /// Speech text
    Text,
    /// Inverse mouth movement rate
    MouthSpeed,
    /// Mood cycle length in seconds
    AnimDuration,
    /// Mouth shape set used while talking
    TalkingEmotion,
}

impl Field {
    /// All known fields
    pub const ALL: [Field; 7] = [
        Field::Emotion,
        Field::Duration,
        Field::Intensity,
        Field::Text,
        Field::MouthSpeed,
        Field::AnimDuration,
        Field::TalkingEmotion,
    ];

    /// Wire key for this field
    pub const fn key(self) -> &'static str {
        match self {
            Field::Emotion => "emotion",
            Field::Duration => "duration",
            Field::Intensity => "intensity",
            Field::Text => "text",
            Field::MouthSpeed => "mouth_speed",
            Field::AnimDuration => "anim_duration",
            Field::TalkingEmotion => "talking_emotion",
        }
    }

    /// Look up a field by wire key
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.key() == key)
    }

    /// Whether this field carries a floating point number
    pub const fn is_numeric(self) -> bool {
        matches!(
            self,
            Field::Duration | Field::Intensity | Field::MouthSpeed | Field::AnimDuration
        )
    }
}

/// Field value could not be interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FieldError {
    /// Value is not a finite floating point number
    NotANumber(Field),
}

/// A decoded command: field name → raw string value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Command {
    fields: FnvIndexMap<String<MAX_KEY_LEN>, String<MAX_VALUE_LEN>, MAX_FIELDS>,
}

impl Command {
    /// Create an empty command
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a framed message
    ///
    /// Messages that are not valid UTF-8 decode to an empty command.
    pub fn decode(raw: &RawMessage) -> Self {
        match core::str::from_utf8(raw) {
            Ok(text) => Self::decode_str(text),
            Err(_) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("decoder: message is not valid UTF-8");
                Self::new()
            }
        }
    }

    /// Decode a command line
    pub fn decode_str(input: &str) -> Self {
        let mut tokenizer = Tokenizer::new();
        for c in input.chars() {
            tokenizer.push(c);
        }
        tokenizer.finish()
    }

    /// Number of recorded fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether no pair was recorded
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Raw value for an arbitrary key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k.as_str() == key)
            .map(|(_, v)| v.as_str())
    }

    /// Raw value for a known field
    pub fn text(&self, field: Field) -> Option<&str> {
        self.get(field.key())
    }

    /// Numeric value for a known field
    ///
    /// Returns `None` when the field is absent and `Some(Err(_))` when it
    /// is present but not a finite number.
    pub fn number(&self, field: Field) -> Option<Result<f32, FieldError>> {
        let raw = self.text(field)?;
        Some(
            raw.trim()
                .parse::<f32>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or(FieldError::NotANumber(field)),
        )
    }

    /// Iterate over all recorded pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Key,
    Value,
}

/// Single pass tokenizer over command characters
struct Tokenizer {
    command: Command,
    key: String<MAX_KEY_LEN>,
    value: String<MAX_VALUE_LEN>,
    slot: Slot,
    quote: Option<char>,
    /// Bytes of unquoted whitespace at the end of the current token
    trailing_ws: usize,
}

impl Tokenizer {
    fn new() -> Self {
        Self {
            command: Command::new(),
            key: String::new(),
            value: String::new(),
            slot: Slot::Key,
            quote: None,
            trailing_ws: 0,
        }
    }

    fn push(&mut self, c: char) {
        if let Some(open) = self.quote {
            if c == open {
                self.quote = None;
            } else {
                self.append(c);
                self.trailing_ws = 0;
            }
            return;
        }

        if matches!(c, '{' | ',' | ':' | '}') {
            self.trim_trailing_ws();
        }

        match c {
            '{' | ',' => {
                self.flush();
                self.clear();
                self.slot = Slot::Key;
            }
            ':' => {
                if self.flush() {
                    self.clear();
                } else {
                    // Keep the key, drop an orphaned value
                    self.value.clear();
                }
                self.slot = Slot::Value;
            }
            '}' => {
                self.flush();
                self.clear();
            }
            '"' | '\'' => {
                self.trailing_ws = 0;
                self.quote = Some(c);
            }
            c if c.is_whitespace() => {
                if !self.current_is_empty() && self.append(c) {
                    self.trailing_ws += c.len_utf8();
                }
            }
            c => {
                self.append(c);
                self.trailing_ws = 0;
            }
        }
    }

    fn current_is_empty(&self) -> bool {
        match self.slot {
            Slot::Key => self.key.is_empty(),
            Slot::Value => self.value.is_empty(),
        }
    }

    /// Strip unquoted whitespace from the end of the current token
    fn trim_trailing_ws(&mut self) {
        let trailing = core::mem::take(&mut self.trailing_ws);
        match self.slot {
            Slot::Key => self.key.truncate(self.key.len() - trailing),
            Slot::Value => self.value.truncate(self.value.len() - trailing),
        }
    }

    /// Append to the current token; `false` once it is full
    fn append(&mut self, c: char) -> bool {
        let pushed = match self.slot {
            Slot::Key => self.key.push(c).is_ok(),
            Slot::Value => self.value.push(c).is_ok(),
        };
        if !pushed {
            #[cfg(feature = "defmt")]
            defmt::trace!("decoder: token truncated");
        }
        pushed
    }

    /// Record the current pair if complete; returns whether it was recorded
    fn flush(&mut self) -> bool {
        if self.key.is_empty() || self.value.is_empty() {
            return false;
        }
        let key = core::mem::take(&mut self.key);
        let value = core::mem::take(&mut self.value);
        if self.command.fields.insert(key, value).is_err() {
            #[cfg(feature = "defmt")]
            defmt::warn!("decoder: too many fields, pair dropped");
        }
        true
    }

    fn clear(&mut self) {
        self.key.clear();
        self.value.clear();
        self.trailing_ws = 0;
    }

    fn finish(mut self) -> Command {
        self.trim_trailing_ws();
        self.flush();
        #[cfg(feature = "defmt")]
        defmt::debug!("decoder: {} field(s)", self.command.len());
        self.command
    }
}
