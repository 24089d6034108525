//! End-to-end: bytes in, pixels out

use rand::rngs::SmallRng;
use rand::SeedableRng;
use visage_core::bitmaps;
use visage_core::state::EmotionState;
use visage_core::{Emotion, Face, FaceConfig, FaceEvent, FaceMatrix};
use visage_display::{DisplayError, Layout, PixelBackend, RenderDiff, Rgb565};
use visage_protocol::{Command, StreamFramer};

/// Backend that keeps a full framebuffer
struct Framebuffer {
    width: u16,
    height: u16,
    pixels: Vec<Rgb565>,
    fills: usize,
}

impl Framebuffer {
    fn new() -> Self {
        Self {
            width: 240,
            height: 320,
            pixels: vec![Rgb565(0x1234); 240 * 320],
            fills: 0,
        }
    }

    fn pixel(&self, x: u16, y: u16) -> Rgb565 {
        self.pixels[usize::from(y) * usize::from(self.width) + usize::from(x)]
    }

    /// Read the grid back by sampling each cell's center
    fn grid(&self, layout: &Layout) -> FaceMatrix {
        let mut m = FaceMatrix::blank();
        for row in 0..12 {
            for col in 0..12 {
                let (x, y) = layout.cell_origin(row, col);
                let half = layout.cell_size / 2;
                m.set(row, col, self.pixel(x + half, y + half) == layout.foreground);
            }
        }
        m
    }
}

impl PixelBackend for Framebuffer {
    fn fill(&mut self, color: Rgb565) -> Result<(), DisplayError> {
        self.pixels.iter_mut().for_each(|p| *p = color);
        self.fills += 1;
        Ok(())
    }

    fn fill_rect(
        &mut self,
        x: u16,
        y: u16,
        width: u16,
        height: u16,
        color: Rgb565,
    ) -> Result<(), DisplayError> {
        if x + width > self.width || y + height > self.height {
            return Err(DisplayError::InvalidCoordinates);
        }
        for py in y..y + height {
            for px in x..x + width {
                let i = usize::from(py) * usize::from(self.width) + usize::from(px);
                self.pixels[i] = color;
            }
        }
        Ok(())
    }

    fn dimensions(&self) -> (u16, u16) {
        (self.width, self.height)
    }
}

struct Session {
    framer: StreamFramer,
    face: Face<SmallRng>,
    display: RenderDiff<Framebuffer>,
    replies: Vec<String>,
}

impl Session {
    fn new() -> Self {
        Self {
            framer: StreamFramer::new(),
            face: Face::new(FaceConfig::default(), SmallRng::seed_from_u64(99), 0),
            display: RenderDiff::new(Framebuffer::new(), Layout::new()),
            replies: Vec::new(),
        }
    }

    /// One control-loop pass, same order as the firmware
    fn tick(&mut self, now_ms: u32, input: &[u8]) -> Vec<FaceEvent> {
        let mut source = input.iter().copied();
        if let Some(raw) = self.framer.poll(&mut source) {
            let command = Command::decode(&raw);
            let _ = self.face.apply(&command);
        }
        let outcome = self.face.tick(now_ms, &mut self.display);
        for event in &outcome.events {
            self.replies
                .push(event.reply().encode().unwrap().as_str().to_owned());
        }
        outcome.events.iter().copied().collect()
    }

    fn shown(&self) -> FaceMatrix {
        self.display.backend().grid(self.display.layout())
    }
}

#[test]
fn test_boots_into_neutral_face() {
    let mut s = Session::new();
    s.tick(0, b"");
    assert_eq!(s.shown(), bitmaps::NEUTRAL_NO_BLINK);
    // Area outside the grid is background
    assert_eq!(s.display.backend().pixel(5, 5), Rgb565::BLACK);
}

#[test]
fn test_command_switches_and_acks() {
    let mut s = Session::new();
    s.tick(0, b"");
    s.tick(100, b"{\"emotion\":\"sad\",\"duration\":\"3.5\"}\n");
    assert_eq!(s.face.pending(), Some(Emotion::Sad));

    let events = s.tick(600, b"");
    assert_eq!(
        events,
        vec![FaceEvent::Switched {
            emotion: Emotion::Sad,
            at_ms: 600
        }]
    );
    assert_eq!(
        s.replies,
        vec!["{\"status\": \"ok\", \"emotion\": \"sad\", \"timestamp\": 0.60}\n".to_string()]
    );
    assert_eq!(s.shown(), bitmaps::SAD_A);
}

#[test]
fn test_timeout_returns_to_neutral() {
    let mut s = Session::new();
    s.tick(0, b"{emotion:happy,duration:3,anim_duration:2}\n");
    s.tick(600, b"");
    assert_eq!(s.face.active(), Emotion::Happy);

    let mut finished = Vec::new();
    let mut t = 600;
    while t <= 4000 {
        finished.extend(
            s.tick(t, b"")
                .into_iter()
                .filter(|e| matches!(e, FaceEvent::Finished { .. })),
        );
        t += 10;
    }
    assert_eq!(
        finished,
        vec![FaceEvent::Finished {
            emotion: Emotion::Happy
        }]
    );
    assert_eq!(
        s.replies.last().map(String::as_str),
        Some("{\"event\": \"emotion_finished\", \"emotion\": \"happy\"}\n")
    );
    assert_eq!(s.face.active(), Emotion::Neutral);
}

#[test]
fn test_split_line_and_noise() {
    let mut s = Session::new();
    s.tick(0, b"garbage without braces\n{emotion:");
    assert_eq!(s.face.pending(), None);
    s.tick(10, b"surprise}\r\n");
    assert_eq!(s.face.pending(), Some(Emotion::Surprise));
}

#[test]
fn test_talking_moves_mouth() {
    let mut s = Session::new();
    s.tick(
        0,
        b"{emotion:talking,text:'hello there, how are you',duration:3,mouth_speed:1}\n",
    );
    s.tick(600, b"");
    assert!(matches!(
        s.face.state(Emotion::Talking),
        EmotionState::Talking(t) if t.talking
    ));

    let mut seen_open = false;
    let mut seen_closed = false;
    let mut t = 600;
    while t < 4000 {
        s.tick(t, b"");
        let shown = s.shown();
        seen_open |= shown == bitmaps::TALKING_A;
        seen_closed |= shown == bitmaps::TALKING_B;
        t += 5;
    }
    assert!(seen_open && seen_closed);
    assert_eq!(s.face.active(), Emotion::Neutral);
    assert_eq!(s.shown(), bitmaps::NEUTRAL_NO_BLINK);
}

#[test]
fn test_incremental_redraws_after_first_paint() {
    let mut s = Session::new();
    s.tick(0, b"");
    s.tick(0, b"{emotion:scary,anim_duration:10,duration:30,mouth_speed:1,intensity:0.2}\n");
    for t in (600..3000).step_by(5) {
        s.tick(t, b"");
    }
    let stats = s.display.stats();
    // Boot paint plus the forced start of the mood
    assert_eq!(stats.repaints, 2);
    assert!(stats.patched_cells > 0);
    assert_eq!(s.display.backend().fills, 2);
}
