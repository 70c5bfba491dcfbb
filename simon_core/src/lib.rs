//! Control core of a Simon style memory game.
//!
//! Simon plays a pseudo random sequence of tones, the player repeats it on four buttons, and every
//! successful round makes the sequence one tone longer.
//!
//! # Running a game
//! The crate is split along the same lines as the firmware it runs in:
//! - two periodic ticks, [`Clock`] (every 1 ms) and [`ButtonSampler`] (every 5 ms), write to a
//!   [`SharedState`];
//! - a control loop calls [`Game::poll`] as often as it can, which reads the [`SharedState`] and
//!   drives the display and buzzer through an [`Outputs`] implementation.
//!
//! Both sides only need a shared reference to the [`SharedState`], so on the target it can live
//! in a `static` and on a host behind an `Arc`.
//!
//! ```
//! use simon_core::{ButtonSampler, ButtonSet, Clock, FixedKnob, Game, Outputs, SharedState};
//!
//! struct Board;
//!
//! impl Outputs for Board {
//!     fn show_digit(&mut self, _digit: u8) {}
//!     fn clear_display(&mut self) {}
//!     fn show_victory(&mut self) {}
//!     fn show_defeat(&mut self) {}
//!     fn show_score(&mut self, _score: u16) {}
//!     fn tone_on(&mut self, _digit: u8) {}
//!     fn tone_off(&mut self) {}
//! }
//!
//! let shared = SharedState::new();
//! let mut clock = Clock::new(&shared, FixedKnob(0));
//! let mut sampler = ButtonSampler::new(&shared);
//! let mut game = Game::new(&shared);
//!
//! for ms in 0..1_000 {
//!     clock.tick();
//!     if ms % 5 == 0 {
//!         sampler.tick(ButtonSet::EMPTY);
//!     }
//!     game.poll(&mut Board);
//! }
//! ```
//!
//! External inputs that are not buttons, such as a reset line or the serial port, act on the game
//! through [`SharedState::request_reset`] and [`SharedState::request_seed`]. The [`serial`] module
//! decodes the serial commands into those requests.
#![cfg_attr(not(test), no_std)]

pub mod buttons;
pub mod clock;
pub mod config;
mod debounce;
mod game;
mod judge;
mod outputs;
pub mod segments;
mod sequence;
pub mod serial;
pub mod tone;

pub use buttons::{Button, ButtonSet, EdgeDetector, Edges};
pub use clock::{ButtonSampler, Clock, FixedKnob, Knob, SharedState};
pub use config::Timing;
pub use debounce::Debouncer;
pub use game::{Game, Phase, PlayerPhase, ResultPhase, SimonPhase, State, Transition};
pub use judge::RoundJudge;
pub use outputs::Outputs;
pub use sequence::Lfsr;
