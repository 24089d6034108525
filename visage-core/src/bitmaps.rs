//! Face bitmaps
//!
//! Every face is laid out the same way: rows 2-5 hold the eyes, row 6 the
//! cheeks and rows 7-10 the mouth. Rows 0, 1 and 11 stay dark.

use crate::matrix::{FaceMatrix, MATRIX_SIZE};

type Eyes = [u16; 4];
type Mouth = [u16; 4];

const fn face(eyes: Eyes, cheeks: u16, mouth: Mouth) -> FaceMatrix {
    let mut rows = [0u16; MATRIX_SIZE];
    rows[2] = eyes[0];
    rows[3] = eyes[1];
    rows[4] = eyes[2];
    rows[5] = eyes[3];
    rows[6] = cheeks;
    rows[7] = mouth[0];
    rows[8] = mouth[1];
    rows[9] = mouth[2];
    rows[10] = mouth[3];
    FaceMatrix::from_rows(rows)
}

// Eyes
const EYES_OPEN: Eyes = [0b0110_0000_0110, 0b0110_0000_0110, 0b0110_0000_0110, 0];
const EYES_HALF: Eyes = [0, 0b0110_0000_0110, 0b0110_0000_0110, 0];
const EYES_SHUT: Eyes = [0, 0, 0b1110_0000_0111, 0];
const EYES_ARC: Eyes = [0, 0b0010_0000_0100, 0b0101_0000_1010, 0];
const EYES_WIDE: Eyes = [0b1110_0000_0111, 0b1010_0000_0101, 0b1110_0000_0111, 0];
const EYES_FILLED: Eyes = [0b1110_0000_0111, 0b1110_0000_0111, 0b1110_0000_0111, 0];
const EYES_PINPOINT: Eyes = [0, 0b0100_0000_0010, 0, 0];
const EYES_HEART: Eyes = [0b1010_0000_0101, 0b1110_0000_0111, 0b0100_0000_0010, 0];
const EYES_HEART_SMALL: Eyes = [0, 0b1010_0000_0101, 0b0100_0000_0010, 0];
const EYES_DROOP: Eyes = [0b0001_0000_1000, 0b0110_0000_0110, 0b0110_0000_0110, 0];
const EYES_ANGRY: Eyes = [0b1000_0000_0001, 0b0100_0000_0010, 0b0110_0000_0110, 0b0110_0000_0110];
const EYES_WINK: Eyes = [0b0110_0000_0000, 0b0110_0000_0000, 0b0110_0000_0111, 0];
const EYES_DOWNCAST: Eyes = [0, 0, 0b0110_0000_0110, 0b0110_0000_0110];

// Cheeks
const NO_CHEEKS: u16 = 0;
const BLUSH: u16 = 0b1100_0000_0011;
const TEAR: u16 = 0b0100_0000_0000;

// Mouths
const MOUTH_FLAT: Mouth = [0, 0b0011_1111_1100, 0, 0];
const MOUTH_SMILE: Mouth = [0b0100_0000_0010, 0b0011_1111_1100, 0, 0];
const MOUTH_SMILE_WIDE: Mouth = [0b1000_0000_0001, 0b0100_0000_0010, 0b0011_1111_1100, 0];
const MOUTH_GRIN: Mouth = [0b0111_1111_1110, 0b0100_0000_0010, 0b0011_1111_1100, 0];
const MOUTH_LAUGH: Mouth = [0b0111_1111_1110, 0b0111_1111_1110, 0b0011_1111_1100, 0b0001_1111_1000];
const MOUTH_FROWN: Mouth = [0, 0b0011_1111_1100, 0b0100_0000_0010, 0];
const MOUTH_FROWN_DEEP: Mouth = [0, 0b0001_1111_1000, 0b0010_0000_0100, 0b0100_0000_0010];
const MOUTH_SQUIGGLE: Mouth = [0, 0b0011_0011_0000, 0b0000_1100_1100, 0];
const MOUTH_OPEN: Mouth = [0b0011_1111_1100, 0b0010_0000_0100, 0b0011_1111_1100, 0];
const MOUTH_HALF_OPEN: Mouth = [0, 0b0011_1111_1100, 0b0001_1111_1000, 0];
const MOUTH_YAWN: Mouth = [0b0001_1111_1000, 0b0010_0000_0100, 0b0010_0000_0100, 0b0001_1111_1000];
const MOUTH_O_SMALL: Mouth = [0b0000_1111_0000, 0b0000_1001_0000, 0b0000_1111_0000, 0];
const MOUTH_O_BIG: Mouth = [0b0011_1111_1100, 0b0010_0000_0100, 0b0010_0000_0100, 0b0011_1111_1100];
const MOUTH_JAGGED_A: Mouth = [0, 0b0101_0101_0100, 0b0010_1010_1010, 0];
const MOUTH_JAGGED_B: Mouth = [0, 0b0010_1010_1010, 0b0101_0101_0100, 0];
const MOUTH_GRIT: Mouth = [0, 0b0001_1111_1000, 0b0001_1111_1000, 0];
const MOUTH_SHOUT: Mouth = [0b0001_1111_1000, 0b0010_0000_0100, 0b0001_1111_1000, 0];
const MOUTH_TIGHT: Mouth = [0, 0b0001_1111_1000, 0, 0];
const MOUTH_SMIRK: Mouth = [0b0000_0000_0010, 0b0011_1111_1100, 0, 0];
const MOUTH_SMIRK_OPEN: Mouth = [0b0000_0000_0010, 0b0011_1111_1100, 0b0001_1111_1000, 0];

// Neutral
pub const NEUTRAL_NO_BLINK: FaceMatrix = face(EYES_OPEN, NO_CHEEKS, MOUTH_FLAT);
pub const NEUTRAL_HALF_BLINK: FaceMatrix = face(EYES_HALF, NO_CHEEKS, MOUTH_FLAT);
pub const NEUTRAL_BLINK: FaceMatrix = face(EYES_SHUT, NO_CHEEKS, MOUTH_FLAT);
pub const NEUTRAL_YAWN: FaceMatrix = face(EYES_SHUT, NO_CHEEKS, MOUTH_YAWN);
pub const NEUTRAL_CIRCLE: FaceMatrix = face(EYES_OPEN, NO_CHEEKS, MOUTH_O_SMALL);

// Smile
pub const SMILE: FaceMatrix = face(EYES_OPEN, NO_CHEEKS, MOUTH_SMILE);
pub const SMILE_A: FaceMatrix = face(EYES_OPEN, NO_CHEEKS, MOUTH_SMILE_WIDE);
pub const SMILE_B: FaceMatrix = face(EYES_ARC, NO_CHEEKS, MOUTH_SMILE_WIDE);

// Love
pub const SMILE_LOVE: FaceMatrix = face(EYES_HEART, NO_CHEEKS, MOUTH_SMILE);
pub const SMILE_LOVE_A: FaceMatrix = face(EYES_HEART_SMALL, BLUSH, MOUTH_SMILE_WIDE);
pub const SMILE_LOVE_B: FaceMatrix = face(EYES_HEART, BLUSH, MOUTH_SMILE_WIDE);

pub const EMBARRASSED: FaceMatrix = face(EYES_DOWNCAST, BLUSH, MOUTH_SQUIGGLE);

pub const SURPRISE: FaceMatrix = face(EYES_WIDE, NO_CHEEKS, MOUTH_O_BIG);

// Sad
pub const SAD: FaceMatrix = face(EYES_DROOP, NO_CHEEKS, MOUTH_FROWN);
pub const SAD_A: FaceMatrix = face(EYES_DROOP, TEAR, MOUTH_FROWN_DEEP);

// Happy
pub const HAPPY: FaceMatrix = face(EYES_ARC, NO_CHEEKS, MOUTH_GRIN);
pub const HAPPY_CIRCLE: FaceMatrix = face(EYES_ARC, NO_CHEEKS, MOUTH_O_BIG);

// Scary
pub const SCARY_A: FaceMatrix = face(EYES_WIDE, NO_CHEEKS, MOUTH_GRIT);
pub const SCARY_B: FaceMatrix = face(EYES_FILLED, NO_CHEEKS, MOUTH_JAGGED_A);
pub const SCARY_C: FaceMatrix = face(EYES_WIDE, NO_CHEEKS, MOUTH_JAGGED_B);
pub const SCARY_D: FaceMatrix = face(EYES_PINPOINT, NO_CHEEKS, MOUTH_JAGGED_A);

// Angry
pub const ANGRY_CLOSED: FaceMatrix = face(EYES_ANGRY, NO_CHEEKS, MOUTH_TIGHT);
pub const ANGRY_CLOSED_MOUTH: FaceMatrix = face(EYES_ANGRY, NO_CHEEKS, MOUTH_GRIT);
pub const ANGRY_OPEN_MOUTH: FaceMatrix = face(EYES_ANGRY, NO_CHEEKS, MOUTH_SHOUT);

// Talking
pub const TALKING_A: FaceMatrix = face(EYES_OPEN, NO_CHEEKS, MOUTH_OPEN);
pub const TALKING_B: FaceMatrix = face(EYES_OPEN, NO_CHEEKS, MOUTH_HALF_OPEN);
pub const TALKING_TRICKY_A: FaceMatrix = face(EYES_ARC, NO_CHEEKS, MOUTH_LAUGH);
pub const TALKING_TRICKY_B: FaceMatrix = face(EYES_ARC, NO_CHEEKS, MOUTH_HALF_OPEN);
pub const SMILE_TRICKY_A: FaceMatrix = face(EYES_WINK, NO_CHEEKS, MOUTH_SMIRK_OPEN);
pub const SMILE_TRICKY_B: FaceMatrix = face(EYES_WINK, NO_CHEEKS, MOUTH_SMIRK);

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [FaceMatrix; 30] = [
        NEUTRAL_NO_BLINK,
        NEUTRAL_HALF_BLINK,
        NEUTRAL_BLINK,
        NEUTRAL_YAWN,
        NEUTRAL_CIRCLE,
        SMILE,
        SMILE_A,
        SMILE_B,
        SMILE_LOVE,
        SMILE_LOVE_A,
        SMILE_LOVE_B,
        EMBARRASSED,
        SURPRISE,
        SAD,
        SAD_A,
        HAPPY,
        HAPPY_CIRCLE,
        SCARY_A,
        SCARY_B,
        SCARY_C,
        SCARY_D,
        ANGRY_CLOSED,
        ANGRY_CLOSED_MOUTH,
        ANGRY_OPEN_MOUTH,
        TALKING_A,
        TALKING_B,
        TALKING_TRICKY_A,
        TALKING_TRICKY_B,
        SMILE_TRICKY_A,
        SMILE_TRICKY_B,
    ];

    #[test]
    fn test_every_face_is_distinct() {
        for (i, a) in ALL.iter().enumerate() {
            for b in &ALL[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_border_rows_stay_dark() {
        for m in &ALL {
            assert_eq!(m.rows()[0], 0);
            assert_eq!(m.rows()[1], 0);
            assert_eq!(m.rows()[11], 0);
            assert!(m.lit() > 0);
        }
    }

    #[test]
    fn test_blink_sequence_closes_progressively() {
        assert!(NEUTRAL_NO_BLINK.lit() > NEUTRAL_HALF_BLINK.lit());
        assert!(NEUTRAL_HALF_BLINK.lit() > NEUTRAL_BLINK.lit());
    }
}
