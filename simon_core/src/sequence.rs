//! Pseudo random digit sequence backed by a 32 bit linear feedback shift register.
//!
//! The sequence is fully determined by its start state, which is what makes replaying Simon's
//! sequence to the player possible: [`Lfsr::reset_to_start`] rewinds and the same digits come out
//! again. State `0` maps to itself and produces an endless run of `0` digits. Nothing seeds the
//! register with `0` by itself, a seed request with `0` will do exactly that.

use crate::config::{DEFAULT_SEED, LFSR_MASK};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lfsr {
    state: u32,
    start: u32,
}

impl Default for Lfsr {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

impl Lfsr {
    pub const fn new(seed: u32) -> Self {
        Self {
            state: seed,
            start: seed,
        }
    }

    /// The working register.
    pub const fn state(&self) -> u32 {
        self.state
    }

    /// The state the next [`reset_to_start`](Self::reset_to_start) rewinds to.
    pub const fn start_state(&self) -> u32 {
        self.start
    }

    /// Step the register once and return the next digit in `0..=3`.
    pub fn advance(&mut self) -> u8 {
        self.state = step(self.state);
        (self.state & 0b11) as u8
    }

    pub fn reset_to_start(&mut self) {
        self.state = self.start;
    }

    /// Replace the start state. The working register is left alone until the next rewind.
    pub fn reseed(&mut self, start: u32) {
        self.start = start;
    }

    /// Continue future rounds from wherever the register is now.
    pub fn restart_from_current(&mut self) {
        self.start = self.state;
    }
}

/// One shift of the register.
pub const fn step(state: u32) -> u32 {
    let out = state & 1;
    let shifted = state >> 1;
    if out == 1 { shifted ^ LFSR_MASK } else { shifted }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn digits(lfsr: &mut Lfsr, n: usize) -> [u8; 32] {
        let mut out = [0; 32];
        for d in out.iter_mut().take(n) {
            *d = lfsr.advance();
        }
        out
    }

    #[test]
    fn first_steps_of_default_seed() {
        // 0x10193944 is even, so the first step is a plain shift
        assert_eq!(step(DEFAULT_SEED), 0x080C_9CA2);
        // 0x080C9CA2 is even too
        assert_eq!(step(0x080C_9CA2), 0x0406_4E51);
        // odd, so the mask is applied
        assert_eq!(step(0x0406_4E51), 0x0203_2728 ^ LFSR_MASK);

        let mut lfsr = Lfsr::default();
        assert_eq!(lfsr.advance(), 0b10);
        assert_eq!(lfsr.advance(), 0b01);
        assert_eq!(lfsr.advance(), ((0x0203_2728 ^ LFSR_MASK) & 0b11) as u8);
    }

    #[test]
    fn rewinding_replays_the_same_digits() {
        let mut lfsr = Lfsr::new(0x1234_5678);

        lfsr.reset_to_start();
        let first = digits(&mut lfsr, 32);
        lfsr.reset_to_start();
        let second = digits(&mut lfsr, 32);

        assert_eq!(first, second);
        assert!(first.iter().all(|d| *d < 4));
    }

    #[test]
    fn reseed_takes_effect_on_rewind() {
        let mut lfsr = Lfsr::default();
        lfsr.advance();
        let before = lfsr.state();

        lfsr.reseed(0xCAFE_F00D);
        assert_eq!(lfsr.state(), before);

        lfsr.reset_to_start();
        assert_eq!(lfsr.state(), 0xCAFE_F00D);
    }

    #[test]
    fn restart_from_current_moves_the_start() {
        let mut lfsr = Lfsr::default();
        lfsr.advance();
        lfsr.advance();
        let failed_at = lfsr.state();

        lfsr.restart_from_current();
        lfsr.advance();
        lfsr.reset_to_start();

        assert_eq!(lfsr.state(), failed_at);
        assert_eq!(lfsr.start_state(), failed_at);
    }

    #[test]
    fn zero_is_a_fixed_point() {
        let mut lfsr = Lfsr::new(0);
        for _ in 0..64 {
            assert_eq!(lfsr.advance(), 0);
            assert_eq!(lfsr.state(), 0);
        }
    }

    #[test]
    fn nonzero_states_never_reach_zero() {
        let mut state = DEFAULT_SEED;
        for _ in 0..10_000 {
            state = step(state);
            assert_ne!(state, 0);
        }
    }
}
