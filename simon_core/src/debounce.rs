//! Two bit vertical counter debouncing all buttons at once.
//!
//! Every button has a 2 bit counter, spread over `count0` (low bit) and `count1` (high bit). A
//! sample that differs from the stable state advances the counter of that button, a sample that
//! agrees resets it. The stable state only flips when the counter wraps from 3, so a change has to
//! be seen on the detecting sample and then on two further consecutive samples. Any sample in
//! between that agrees with the stable state starts the count over.

use crate::buttons::ButtonSet;

#[derive(Debug, Default, Clone)]
pub struct Debouncer {
    stable: u8,
    count0: u8,
    count1: u8,
}

impl Debouncer {
    /// All buttons start released.
    pub const fn new() -> Self {
        Self {
            stable: 0,
            count0: 0,
            count1: 0,
        }
    }

    /// Feed one raw sample, returning the debounced state.
    pub fn sample(&mut self, raw: ButtonSet) -> ButtonSet {
        let delta = self.stable ^ raw.bits();
        self.count1 = (self.count1 ^ self.count0) & delta;
        self.count0 = !self.count0 & delta;
        self.stable ^= self.count1 & self.count0;

        self.state()
    }

    /// The debounced state as of the last sample.
    pub const fn state(&self) -> ButtonSet {
        ButtonSet::from_bits(self.stable)
    }
}
