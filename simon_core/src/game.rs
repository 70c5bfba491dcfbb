//! The game state machine.
//!
//! A round has Simon play a sequence of digits, then the player repeat it, then the result is
//! shown. Each of those is its own small state machine nested inside the outer [`State`]. The
//! whole thing is advanced by calling [`Game::poll`] as often as possible from the control loop,
//! every call reads the shared state once, derives button edges, and performs at most one step of
//! the active sub-machine.
//!
//! A reset request aborts any phase on the next poll and sends the game back to [`State::Init`],
//! silencing the buzzer and clearing the display on the way.

use core::fmt;

use log::{debug, info, trace};

use crate::{
    buttons::{Button, EdgeDetector, Edges},
    clock::SharedState,
    config::Timing,
    judge::RoundJudge,
    outputs::Outputs,
    sequence::Lfsr,
};

/// The outer game state.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum State {
    Init,
    SimonsTurn,
    PlayersTurn,
    Result,
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            State::Init => "init",
            State::SimonsTurn => "Simon's turn",
            State::PlayersTurn => "player's turn",
            State::Result => "result",
        };
        f.write_str(name)
    }
}

/// Playback of the sequence.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum SimonPhase {
    /// Start the tone of the next digit.
    Start,
    /// The tone is sounding.
    Play,
    /// Gap between two tones.
    Silent,
}

/// Waiting for and replaying the player's input.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum PlayerPhase {
    /// Waiting for a button press.
    Pause,
    /// The tone of `button` is sounding, first until it is released and then for the rest of the
    /// tone length.
    Play { button: Button, released: bool },
}

/// Showing the outcome of a round.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ResultPhase {
    /// Decide between victory and defeat.
    Rank,
    /// Defeat is showing, the rank follows.
    ShowRank,
    /// Victory or rank is showing, the next round follows.
    ShowLevel,
}

/// The full, nested, game phase.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Phase {
    Init,
    SimonsTurn(SimonPhase),
    PlayersTurn(PlayerPhase),
    Result(ResultPhase),
}

impl Phase {
    pub const fn state(&self) -> State {
        match self {
            Phase::Init => State::Init,
            Phase::SimonsTurn(_) => State::SimonsTurn,
            Phase::PlayersTurn(_) => State::PlayersTurn,
            Phase::Result(_) => State::Result,
        }
    }
}

/// A change of the outer [`State`] caused by a poll.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Transition {
    pub from: State,
    pub to: State,
}

/// Contains the full state of one game.
///
/// Create one before starting the control loop and call [`poll`](Self::poll) on every iteration.
/// The tick sources update the same [`SharedState`] concurrently.
#[derive(Debug)]
pub struct Game<'a> {
    shared: &'a SharedState,
    timing: Timing,

    phase: Phase,
    edges: EdgeDetector,

    lfsr: Lfsr,
    judge: RoundJudge,

    length: u16,
    step: u16,
    rank: u16,
}

impl<'a> Game<'a> {
    /// Create a game using the reference timing and the power up seed.
    pub fn new(shared: &'a SharedState) -> Self {
        Self::with_config(shared, Timing::default(), Lfsr::default())
    }

    pub fn with_config(shared: &'a SharedState, timing: Timing, lfsr: Lfsr) -> Self {
        Self {
            shared,
            timing,
            phase: Phase::Init,
            edges: EdgeDetector::new(),
            lfsr,
            judge: RoundJudge::new(),
            length: 1,
            step: 0,
            rank: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn state(&self) -> State {
        self.phase.state()
    }

    /// Length of the sequence played this round.
    pub fn length(&self) -> u16 {
        self.length
    }

    /// Index of the digit currently being played or repeated.
    pub fn step(&self) -> u16 {
        self.step
    }

    /// Sequence length reached in the last finished round.
    pub fn rank(&self) -> u16 {
        self.rank
    }

    /// Whether the player's answer matched so far in this round.
    pub fn is_confirmed(&self) -> bool {
        self.judge.is_confirmed()
    }

    pub fn lfsr(&self) -> &Lfsr {
        &self.lfsr
    }

    /// Run one iteration of the control loop.
    ///
    /// Returns the transition if the outer state changed.
    pub fn poll<O: Outputs>(&mut self, out: &mut O) -> Option<Transition> {
        let edges = self.edges.update(self.shared.buttons());
        let elapsed = self.shared.elapsed();
        let from = self.state();

        match self.phase {
            Phase::Init => self.init(),
            Phase::SimonsTurn(phase) => self.simons_turn(phase, elapsed, out),
            Phase::PlayersTurn(phase) => self.players_turn(phase, edges, elapsed, out),
            Phase::Result(phase) => self.result(phase, elapsed, out),
        }

        let to = self.state();
        if from == to {
            return None;
        }

        info!("{} -> {}", from, to);
        Some(Transition { from, to })
    }

    fn set_phase(&mut self, phase: Phase) {
        trace!("phase {:?}", phase);
        self.phase = phase;
    }

    /// Go back to [`State::Init`], leaving the outputs idle.
    fn abort<O: Outputs>(&mut self, out: &mut O) {
        info!("reset requested in {:?}", self.phase);
        out.tone_off();
        out.clear_display();
        self.shared.set_playback_updates(true);
        self.set_phase(Phase::Init);
    }

    fn init(&mut self) {
        if self.shared.take_reset() {
            debug!("dropping reset request, already starting over");
        }

        self.length = 1;
        self.shared.set_playback_updates(true);
        self.enter_simons_turn();
    }

    fn enter_simons_turn(&mut self) {
        if let Some(seed) = self.shared.take_seed() {
            info!("new seed {:#010x}", seed);
            self.lfsr.reseed(seed);
        }

        self.lfsr.reset_to_start();
        self.step = 0;
        self.set_phase(Phase::SimonsTurn(SimonPhase::Start));
    }

    fn simons_turn<O: Outputs>(&mut self, phase: SimonPhase, elapsed: u16, out: &mut O) {
        if self.shared.take_reset() {
            self.abort(out);
            return;
        }

        if self.step >= self.length {
            self.enter_players_turn();
            return;
        }

        match phase {
            SimonPhase::Start => {
                let digit = self.lfsr.advance();
                debug!("Simon plays step {} digit {}", self.step, digit);

                out.show_digit(digit);
                out.tone_on(digit);
                self.shared.reset_elapsed();
                self.shared.set_playback_updates(false);
                self.set_phase(Phase::SimonsTurn(SimonPhase::Play));
            }
            SimonPhase::Play => {
                if elapsed >= self.timing.tone_ticks {
                    out.tone_off();
                    out.clear_display();
                    self.shared.set_playback_updates(true);
                    self.set_phase(Phase::SimonsTurn(SimonPhase::Silent));
                }
            }
            SimonPhase::Silent => {
                // Tone and gap together last the playback duration, rounded down to even
                let half = self.shared.playback_duration() >> 1;
                if elapsed >= 2 * half {
                    self.step += 1;
                    self.set_phase(Phase::SimonsTurn(SimonPhase::Start));
                }
            }
        }
    }

    fn enter_players_turn(&mut self) {
        self.step = 0;
        self.judge = RoundJudge::new();
        self.lfsr.reset_to_start();
        self.set_phase(Phase::PlayersTurn(PlayerPhase::Pause));
    }

    fn players_turn<O: Outputs>(
        &mut self,
        phase: PlayerPhase,
        edges: Edges,
        elapsed: u16,
        out: &mut O,
    ) {
        if self.shared.take_reset() {
            self.abort(out);
            return;
        }

        if self.step >= self.length || !self.judge.is_confirmed() {
            self.enter_result();
            return;
        }

        match phase {
            PlayerPhase::Pause => {
                self.shared.set_playback_updates(true);

                // Only one press per poll, simultaneous presses go to the highest priority
                let Some(button) = edges.pressed.first() else {
                    return;
                };
                debug!("{} pressed for step {}", button, self.step);

                self.shared.set_playback_updates(false);
                out.tone_on(button.index());
                out.show_digit(button.index());
                self.shared.reset_elapsed();
                self.set_phase(Phase::PlayersTurn(PlayerPhase::Play {
                    button,
                    released: false,
                }));
            }
            PlayerPhase::Play {
                button,
                released: false,
            } => {
                if edges.released.contains(button) {
                    self.set_phase(Phase::PlayersTurn(PlayerPhase::Play {
                        button,
                        released: true,
                    }));
                }
            }
            PlayerPhase::Play {
                button,
                released: true,
            } => {
                if elapsed >= self.timing.tone_ticks {
                    out.tone_off();
                    out.clear_display();
                    self.shared.set_playback_updates(true);

                    let expected = self.lfsr.advance();
                    self.judge.confirm_step(button.index(), expected);
                    debug!(
                        "step {}: expected {}, got {}",
                        self.step,
                        expected,
                        button.index()
                    );

                    self.step += 1;
                    self.set_phase(Phase::PlayersTurn(PlayerPhase::Pause));
                }
            }
        }
    }

    fn enter_result(&mut self) {
        self.set_phase(Phase::Result(ResultPhase::Rank));
    }

    fn result<O: Outputs>(&mut self, phase: ResultPhase, elapsed: u16, out: &mut O) {
        if self.shared.take_reset() {
            self.abort(out);
            return;
        }

        match phase {
            ResultPhase::Rank => {
                self.shared.reset_elapsed();

                if self.judge.is_confirmed() {
                    out.show_victory();
                    self.rank = self.length;
                    self.length = self.length.saturating_add(1);
                    info!("round won, next length {}", self.length);
                    self.set_phase(Phase::Result(ResultPhase::ShowLevel));
                } else {
                    out.show_defeat();
                    self.rank = self.length.saturating_sub(1);
                    self.length = 1;
                    self.lfsr.restart_from_current();
                    info!(
                        "round lost with rank {}, continuing from {:#010x}",
                        self.rank,
                        self.lfsr.start_state()
                    );
                    self.set_phase(Phase::Result(ResultPhase::ShowRank));

                    // Falls through into the rank check without waiting for another poll
                    let elapsed = self.shared.elapsed();
                    self.show_rank(elapsed, out);
                }
            }
            ResultPhase::ShowRank => self.show_rank(elapsed, out),
            ResultPhase::ShowLevel => {
                if elapsed >= self.timing.show_level_ticks {
                    out.clear_display();
                    self.enter_simons_turn();
                }
            }
        }
    }

    fn show_rank<O: Outputs>(&mut self, elapsed: u16, out: &mut O) {
        if elapsed >= self.shared.playback_duration() {
            self.shared.reset_elapsed();
            out.show_score(self.rank);
            self.set_phase(Phase::Result(ResultPhase::ShowLevel));
        }
    }
}
