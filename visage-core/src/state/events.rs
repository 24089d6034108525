//! Events reported by the dispatcher

use visage_protocol::Reply;

use super::emotion::Emotion;

/// Something the host should hear about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FaceEvent {
    /// A commanded transition was committed
    Switched { emotion: Emotion, at_ms: u32 },
    /// `emotion` timed out and the face went back to neutral
    Finished { emotion: Emotion },
}

impl FaceEvent {
    /// Wire reply for this event
    pub fn reply(&self) -> Reply<'static> {
        match *self {
            FaceEvent::Switched { emotion, at_ms } => Reply::Ack {
                emotion: emotion.name(),
                timestamp_ms: at_ms,
            },
            FaceEvent::Finished { emotion } => Reply::Finished {
                emotion: emotion.name(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_switched_reply() {
        let event = FaceEvent::Switched {
            emotion: Emotion::SmileLove,
            at_ms: 1500,
        };
        assert_eq!(
            event.reply(),
            Reply::Ack {
                emotion: "smile_love",
                timestamp_ms: 1500
            }
        );
    }

    #[test]
    fn test_finished_reply() {
        let event = FaceEvent::Finished {
            emotion: Emotion::Talking,
        };
        assert_eq!(event.reply(), Reply::Finished { emotion: "talking" });
    }
}
