//! Reply lines sent back to the host.

use core::fmt::Write;

use heapless::String;

/// Maximum encoded reply length (including the trailing line-feed)
pub const MAX_REPLY_LEN: usize = 96;

/// Messages from the face controller to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Reply<'a> {
    /// A commanded transition was committed
    Ack {
        /// Emotion now active
        emotion: &'a str,
        /// Milliseconds since boot at commit time
        timestamp_ms: u32,
    },
    /// An emotion ran out its duration and the face returned to neutral
    Finished {
        /// Emotion that expired
        emotion: &'a str,
    },
}

impl<'a> Reply<'a> {
    /// Encode this reply as a newline-terminated line
    ///
    /// Timestamps are rendered in seconds with two decimals.
    pub fn encode(&self) -> Result<String<MAX_REPLY_LEN>, core::fmt::Error> {
        let mut line = String::new();
        match self {
            Reply::Ack {
                emotion,
                timestamp_ms,
            } => write!(
                line,
                "{{\"status\": \"ok\", \"emotion\": \"{}\", \"timestamp\": {}.{:02}}}\n",
                emotion,
                timestamp_ms / 1000,
                (timestamp_ms % 1000) / 10
            )?,
            Reply::Finished { emotion } => write!(
                line,
                "{{\"event\": \"emotion_finished\", \"emotion\": \"{}\"}}\n",
                emotion
            )?,
        }
        Ok(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ack_line() {
        let reply = Reply::Ack {
            emotion: "happy",
            timestamp_ms: 12_345,
        };
        assert_eq!(
            reply.encode().unwrap().as_str(),
            "{\"status\": \"ok\", \"emotion\": \"happy\", \"timestamp\": 12.34}\n"
        );
    }

    #[test]
    fn test_ack_pads_centiseconds() {
        let reply = Reply::Ack {
            emotion: "sad",
            timestamp_ms: 3_050,
        };
        assert!(reply.encode().unwrap().ends_with("\"timestamp\": 3.05}\n"));
    }

    #[test]
    fn test_finished_line() {
        let reply = Reply::Finished { emotion: "talking" };
        assert_eq!(
            reply.encode().unwrap().as_str(),
            "{\"event\": \"emotion_finished\", \"emotion\": \"talking\"}\n"
        );
    }

    #[test]
    fn test_replies_fit_for_every_emotion_name() {
        // Longest built-in emotion name plus a large timestamp
        let reply = Reply::Ack {
            emotion: "smile_love",
            timestamp_ms: u32::MAX,
        };
        assert!(reply.encode().is_ok());
    }
}
