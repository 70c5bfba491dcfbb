//! Decoder for the single key serial commands.
//!
//! | keys      | command                                     |
//! |-----------|---------------------------------------------|
//! | `1` / `q` | press S1                                    |
//! | `2` / `w` | press S2                                    |
//! | `3` / `e` | press S3                                    |
//! | `4` / `r` | press S4                                    |
//! | `,` / `k` | raise the tones by one octave               |
//! | `.` / `l` | lower the tones by one octave               |
//! | `0` / `p` | reset                                       |
//! | `9` / `o` | new seed, followed by 8 hexadecimal digits  |
//!
//! Any other byte outside a seed payload is ignored.

use log::{trace, warn};

use crate::buttons::Button;

/// Number of hexadecimal digits following the seed command.
pub const SEED_DIGITS: u8 = 8;

/// A fully decoded command.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Command {
    Press(Button),
    IncreaseFrequency,
    DecreaseFrequency,
    Reset,
    Seed(u32),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("'{}' is not a hexadecimal digit, seed discarded after {received} digits", printable(.byte))]
    InvalidSeedDigit { byte: u8, received: u8 },
}

fn printable(byte: &u8) -> char {
    char::from(*byte)
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum DecoderState {
    AwaitingCommand,
    AwaitingPayload { seed: u32, received: u8 },
}

#[derive(Debug, Clone)]
pub struct CommandDecoder {
    state: DecoderState,
}

impl Default for CommandDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandDecoder {
    pub const fn new() -> Self {
        Self {
            state: DecoderState::AwaitingCommand,
        }
    }

    /// Whether the decoder is in the middle of a seed payload.
    pub fn is_reading_payload(&self) -> bool {
        matches!(self.state, DecoderState::AwaitingPayload { .. })
    }

    /// Feed one received byte.
    ///
    /// Returns `Ok(None)` when more bytes are needed or the byte was ignored. On error the
    /// partial seed is dropped and the decoder waits for a new command.
    pub fn push(&mut self, byte: u8) -> Result<Option<Command>, DecodeError> {
        match self.state {
            DecoderState::AwaitingCommand => Ok(self.command(byte)),
            DecoderState::AwaitingPayload { seed, received } => {
                let Some(nibble) = char::from(byte).to_digit(16) else {
                    self.state = DecoderState::AwaitingCommand;
                    let err = DecodeError::InvalidSeedDigit { byte, received };
                    warn!("{}", err);
                    return Err(err);
                };

                let seed = (seed << 4) | nibble;
                let received = received + 1;
                if received < SEED_DIGITS {
                    self.state = DecoderState::AwaitingPayload { seed, received };
                    return Ok(None);
                }

                self.state = DecoderState::AwaitingCommand;
                Ok(Some(Command::Seed(seed)))
            }
        }
    }

    fn command(&mut self, byte: u8) -> Option<Command> {
        let command = match byte {
            b'1' | b'q' => Command::Press(Button::S1),
            b'2' | b'w' => Command::Press(Button::S2),
            b'3' | b'e' => Command::Press(Button::S3),
            b'4' | b'r' => Command::Press(Button::S4),
            b',' | b'k' => Command::IncreaseFrequency,
            b'.' | b'l' => Command::DecreaseFrequency,
            b'0' | b'p' => Command::Reset,
            b'9' | b'o' => {
                self.state = DecoderState::AwaitingPayload {
                    seed: 0,
                    received: 0,
                };
                return None;
            }
            other => {
                trace!("ignoring serial byte {:#04x}", other);
                return None;
            }
        };
        Some(command)
    }
}
