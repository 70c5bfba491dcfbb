//! Segment patterns for the two digit seven segment display.
//!
//! Patterns are active low, a cleared bit lights the segment. Bit 7 is unused and always 0.

/// Position of each segment in a pattern byte.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Segment {
    A = 5,
    B = 4,
    C = 2,
    D = 1,
    E = 0,
    F = 6,
    G = 3,
}

impl Segment {
    pub const ALL: [Segment; 7] = [
        Segment::A,
        Segment::B,
        Segment::C,
        Segment::D,
        Segment::E,
        Segment::F,
        Segment::G,
    ];
}

pub const OFF: u8 = 0b0111_1111;
/// Right hand segments of a digit, marks the tone on that side.
pub const BC: u8 = 0b0110_1011;
/// Left hand segments of a digit, marks the tone on that side.
pub const EF: u8 = 0b0011_1110;
pub const VICTORY: u8 = 0b0000_0000;
pub const DEFEAT: u8 = 0b0111_0111;

/// Decimal digits `0..=9`.
pub const NUMBERS: [u8; 10] = [0x08, 0x6B, 0x44, 0x41, 0x23, 0x11, 0x10, 0x4B, 0x00, 0x01];

/// Tone markers for sequence digits `0..=3`, as `[left, right]`.
const TONE_MARKERS: [[u8; 2]; 4] = [[EF, OFF], [BC, OFF], [OFF, EF], [OFF, BC]];

pub const fn is_lit(pattern: u8, segment: Segment) -> bool {
    pattern & (1 << segment as u8) == 0
}

/// The segment patterns currently on the display, left digit first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentBuffer {
    digits: [u8; 2],
}

impl Default for SegmentBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl SegmentBuffer {
    pub const fn new() -> Self {
        Self { digits: [OFF, OFF] }
    }

    pub const fn digits(&self) -> [u8; 2] {
        self.digits
    }

    /// Mark sequence digit `0..=3`, anything else clears the display.
    pub fn show_digit(&mut self, digit: u8) {
        match TONE_MARKERS.get(usize::from(digit)) {
            Some(marker) => self.digits = *marker,
            None => self.clear(),
        }
    }

    pub fn clear(&mut self) {
        self.digits = [OFF, OFF];
    }

    pub fn show_victory(&mut self) {
        self.digits = [VICTORY, VICTORY];
    }

    pub fn show_defeat(&mut self) {
        self.digits = [DEFEAT, DEFEAT];
    }

    /// Show the last two decimal digits of `score`, without a leading zero.
    pub fn show_score(&mut self, score: u16) {
        let units = NUMBERS[usize::from(score % 10)];
        let tens = if score < 10 {
            OFF
        } else {
            NUMBERS[usize::from(score / 10 % 10)]
        };
        self.digits = [tens, units];
    }
}
