//! Face control loop
//!
//! One pass per tick: drain the command bytes, decode at most one
//! message, run the emotion state machine and queue any replies.

use defmt::*;
use embassy_time::{Duration, Instant, Ticker, Timer};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use visage_core::Face;
use visage_display::RenderDiff;
use visage_protocol::{Command, StreamFramer};

use crate::channels::{REPLIES, RX_BYTES};
use crate::config::FACE_CONFIG;
use crate::Panel;

/// Control loop period in milliseconds
pub const TICK_INTERVAL_MS: u64 = 5;

/// Milliseconds since boot, wrapping
fn now_ms() -> u32 {
    Instant::now().as_millis() as u32
}

/// Face task - owns the state machine and the panel
#[embassy_executor::task]
pub async fn face_task(mut display: RenderDiff<Panel>) {
    info!("Face task started");

    let rng = SmallRng::seed_from_u64(Instant::now().as_ticks());
    let mut face = Face::new(FACE_CONFIG, rng, now_ms());
    let mut framer = StreamFramer::new();
    let mut ticker = Ticker::every(Duration::from_millis(TICK_INTERVAL_MS));

    loop {
        let mut bytes = core::iter::from_fn(|| RX_BYTES.try_receive().ok());
        if let Some(raw) = framer.poll(&mut bytes) {
            let command = Command::decode(&raw);
            match face.apply(&command) {
                Ok(emotion) => debug!("Queued emotion {}", emotion.name()),
                Err(e) => warn!("Rejected command: {:?}", e),
            }
        }

        let outcome = face.tick(now_ms(), &mut display);

        for event in &outcome.events {
            match event.reply().encode() {
                Ok(line) => {
                    if REPLIES.try_send(line).is_err() {
                        warn!("Reply queue full, dropping {:?}", event);
                    }
                }
                Err(_) => warn!("Reply too long for {:?}", event),
            }
        }

        if let Some(hold) = outcome.hold_ms {
            // Keep the yawn on screen; input queues up meanwhile
            Timer::after_millis(u64::from(hold)).await;
        }

        ticker.next().await;
    }
}
