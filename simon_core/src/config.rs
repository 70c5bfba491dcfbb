//! Timing and generator constants of the reference board.
//!
//! Everything is expressed in ticks of the elapsed time clock, which runs at [`ELAPSED_TICK_MS`].

/// Period of the elapsed time tick.
pub const ELAPSED_TICK_MS: u32 = 1;

/// Period of the button sampling tick.
pub const BUTTON_SAMPLE_MS: u32 = 5;

/// How long a tone sounds, both during playback and after the player releases a button.
pub const TONE_TICKS: u16 = 125;

/// How long the result (or rank) stays on the display before the next round starts.
pub const SHOW_LEVEL_TICKS: u16 = 250;

/// Feedback mask of the sequence LFSR.
pub const LFSR_MASK: u32 = 0xE202_3CAB;

/// Start state of the sequence LFSR after power up.
pub const DEFAULT_SEED: u32 = 0x1019_3944;

/// Shortest playback duration, reached with the knob fully counter clockwise.
pub const PLAYBACK_BASE_TICKS: u16 = 250;

/// Scale applied to the knob sample, the result is divided by 256.
pub const PLAYBACK_KNOB_SCALE: u32 = 1757;

/// Playback duration used before the knob is first sampled.
pub const DEFAULT_PLAYBACK_TICKS: u16 = PLAYBACK_BASE_TICKS;

/// Maps a raw 8 bit knob sample to a playback duration in ticks.
///
/// Ranges from 250 ticks at sample 0 up to 2000 ticks at sample 255.
pub const fn playback_duration(sample: u8) -> u16 {
    PLAYBACK_BASE_TICKS + ((PLAYBACK_KNOB_SCALE * sample as u32) >> 8) as u16
}

/// Fixed thresholds used by the game state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    /// Ticks a tone sounds for.
    pub tone_ticks: u16,
    /// Ticks the level or rank stays on the display.
    pub show_level_ticks: u16,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            tone_ticks: TONE_TICKS,
            show_level_ticks: SHOW_LEVEL_TICKS,
        }
    }
}
