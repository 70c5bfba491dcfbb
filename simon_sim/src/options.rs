//! Command line options of the simulator.

use simon_core::serial::SEED_DIGITS;

/// Shortest hold that survives the debouncer, three samples plus one spare.
pub const MIN_HOLD_MS: u32 = 20;

/// Game and input options, every one of them can also be set from the environment.
#[derive(clap::Parser, Clone, Debug)]
pub struct SimOptions {
    /// Start state of the sequence generator, up to 8 hexadecimal digits.
    ///
    /// Without it the power up seed is used. The seed can also be changed while playing by
    /// typing `9` followed by 8 hexadecimal digits.
    #[arg(
        long,
        env = "SIMON_SEED",
        value_parser = parse_seed,
        help_heading = "GAME CONFIGURATION"
    )]
    pub seed: Option<u32>,

    /// Position of the playback speed knob, 0 is the fastest and 255 the slowest.
    #[arg(
        long,
        env = "SIMON_KNOB",
        default_value_t = 128,
        help_heading = "GAME CONFIGURATION"
    )]
    pub knob: u8,

    /// How long a key press holds the virtual button down, in milliseconds.
    #[arg(
        long,
        env = "SIMON_HOLD_MS",
        default_value_t = 60,
        help_heading = "INPUT CONFIGURATION"
    )]
    pub hold_ms: u32,

    /// Wall clock milliseconds per simulated millisecond. Use values above 1 to slow the game down.
    #[arg(
        long,
        env = "SIMON_TICK_SCALE",
        default_value_t = 1.0,
        help_heading = "INPUT CONFIGURATION"
    )]
    pub tick_scale: f64,
}

impl SimOptions {
    pub fn validate(&self) -> Result<(), OptionsError> {
        if self.hold_ms < MIN_HOLD_MS {
            return Err(OptionsError::HoldTooShort {
                hold_ms: self.hold_ms,
            });
        }

        if !self.tick_scale.is_finite() || self.tick_scale <= 0.0 {
            return Err(OptionsError::InvalidTickScale {
                scale: self.tick_scale,
            });
        }

        Ok(())
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum OptionsError {
    #[error(
        "The seed '{text}' is not a hexadecimal number of at most {} digits.",
        SEED_DIGITS
    )]
    InvalidSeed { text: String },
    #[error("A seed of 0 never leaves 0, the sequence would only contain S1.")]
    ZeroSeed,
    #[error(
        "A hold of {hold_ms} ms is filtered by the debouncer, use at least {} ms.",
        MIN_HOLD_MS
    )]
    HoldTooShort { hold_ms: u32 },
    #[error("The tick scale has to be a positive number, got {scale}.")]
    InvalidTickScale { scale: f64 },
}

fn parse_seed(text: &str) -> Result<u32, OptionsError> {
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);

    if digits.is_empty() || digits.len() > usize::from(SEED_DIGITS) {
        return Err(OptionsError::InvalidSeed {
            text: text.to_owned(),
        });
    }

    match u32::from_str_radix(digits, 16) {
        Ok(0) => Err(OptionsError::ZeroSeed),
        Ok(seed) => Ok(seed),
        Err(_) => Err(OptionsError::InvalidSeed {
            text: text.to_owned(),
        }),
    }
}
