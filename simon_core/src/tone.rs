//! Tone to buzzer frequency mapping, with the octave shift controlled over serial.

use log::debug;

/// Clock of the PWM timer driving the buzzer.
pub const TIMER_HZ: u32 = 3_333_333;

/// Timer periods at octave -2 for the four tones: E high, C sharp, A and E low.
const BASE_PERIODS: [u32; 4] = [40_040, 47_620, 30_028, 80_320];

/// The period has to fit the 16 bit timer register.
pub const MIN_OCTAVE: i8 = -1;
pub const MAX_OCTAVE: i8 = 2;

/// Buzzer model tracking the octave shift and the tone that is sounding.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ToneGenerator {
    octave: i8,
    playing: Option<u8>,
}

impl ToneGenerator {
    pub const fn new() -> Self {
        Self {
            octave: 0,
            playing: None,
        }
    }

    pub const fn octave(&self) -> i8 {
        self.octave
    }

    /// Returns `false` if the octave was already at its maximum.
    pub fn raise_octave(&mut self) -> bool {
        self.shift_octave(1)
    }

    /// Returns `false` if the octave was already at its minimum.
    pub fn lower_octave(&mut self) -> bool {
        self.shift_octave(-1)
    }

    fn shift_octave(&mut self, by: i8) -> bool {
        let octave = (self.octave + by).clamp(MIN_OCTAVE, MAX_OCTAVE);
        let changed = octave != self.octave;
        self.octave = octave;
        debug!("octave {}", self.octave);
        changed
    }

    pub fn reset_octave(&mut self) {
        self.octave = 0;
    }

    /// Timer period for a tone at the current octave, `None` for digits outside `0..=3`.
    pub fn period(&self, digit: u8) -> Option<u32> {
        let base = *BASE_PERIODS.get(usize::from(digit))?;
        Some(base >> (self.octave + 2) as u32)
    }

    /// Frequency in Hz for a tone at the current octave.
    pub fn frequency_hz(&self, digit: u8) -> Option<u32> {
        self.period(digit).map(|period| TIMER_HZ / period)
    }

    pub fn start(&mut self, digit: u8) {
        self.playing = (usize::from(digit) < BASE_PERIODS.len()).then_some(digit);
    }

    pub fn stop(&mut self) {
        self.playing = None;
    }

    /// The tone that is sounding.
    pub fn playing(&self) -> Option<u8> {
        self.playing
    }

    /// Frequency of the tone that is sounding.
    pub fn current_frequency_hz(&self) -> Option<u32> {
        self.playing.and_then(|digit| self.frequency_hz(digit))
    }
}
