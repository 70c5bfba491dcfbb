/// Tracks whether every step of the player's answer so far matched Simon's sequence.
///
/// Once a mismatch is seen the round is lost, nothing short of [`RoundJudge::new`] makes it
/// confirmed again. Steps have to be reported in order, this is not checked here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundJudge {
    confirmed: bool,
}

impl Default for RoundJudge {
    fn default() -> Self {
        Self::new()
    }
}

impl RoundJudge {
    pub const fn new() -> Self {
        Self { confirmed: true }
    }

    pub fn confirm_step(&mut self, reported: u8, expected: u8) {
        if self.confirmed {
            self.confirmed = reported == expected;
        }
    }

    pub const fn is_confirmed(&self) -> bool {
        self.confirmed
    }
}
