//! Deterministic virtual time rig driving the real ticks and the game.

#![allow(dead_code)]

use simon_core::{
    Button, ButtonSampler, ButtonSet, Clock, FixedKnob, Game, Lfsr, Outputs, Phase, PlayerPhase,
    SharedState, State, Timing, Transition, config::BUTTON_SAMPLE_MS,
};

/// Control loop iterations per millisecond of virtual time.
pub const POLLS_PER_MS: usize = 4;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum OutputEvent {
    Digit(u8),
    Clear,
    Victory,
    Defeat,
    Score(u16),
    ToneOn(u8),
    ToneOff,
}

/// Records every output call and keeps the resulting buzzer state.
#[derive(Debug, Default)]
pub struct Recorder {
    pub events: Vec<OutputEvent>,
    pub tone: Option<u8>,
}

impl Recorder {
    pub fn take(&mut self) -> Vec<OutputEvent> {
        std::mem::take(&mut self.events)
    }
}

impl Outputs for Recorder {
    fn show_digit(&mut self, digit: u8) {
        self.events.push(OutputEvent::Digit(digit));
    }

    fn clear_display(&mut self) {
        self.events.push(OutputEvent::Clear);
    }

    fn show_victory(&mut self) {
        self.events.push(OutputEvent::Victory);
    }

    fn show_defeat(&mut self) {
        self.events.push(OutputEvent::Defeat);
    }

    fn show_score(&mut self, score: u16) {
        self.events.push(OutputEvent::Score(score));
    }

    fn tone_on(&mut self, digit: u8) {
        self.tone = Some(digit);
        self.events.push(OutputEvent::ToneOn(digit));
    }

    fn tone_off(&mut self) {
        self.tone = None;
        self.events.push(OutputEvent::ToneOff);
    }
}

pub struct Rig {
    pub shared: &'static SharedState,
    pub game: Game<'static>,
    pub out: Recorder,
    pub transitions: Vec<Transition>,

    clock: Clock<'static, FixedKnob>,
    sampler: ButtonSampler<'static>,
    raw: ButtonSet,
    now_ms: u32,
}

impl Rig {
    pub fn new(knob: u8) -> Self {
        Self::with_lfsr(knob, Lfsr::default())
    }

    pub fn with_lfsr(knob: u8, lfsr: Lfsr) -> Self {
        let shared: &'static SharedState = Box::leak(Box::new(SharedState::new()));

        Self {
            shared,
            game: Game::with_config(shared, Timing::default(), lfsr),
            out: Recorder::default(),
            transitions: Vec::new(),
            clock: Clock::new(shared, FixedKnob(knob)),
            sampler: ButtonSampler::new(shared),
            raw: ButtonSet::EMPTY,
            now_ms: 0,
        }
    }

    pub fn now_ms(&self) -> u32 {
        self.now_ms
    }

    /// Run a single control loop iteration without advancing time.
    pub fn poll(&mut self) -> Option<Transition> {
        let transition = self.game.poll(&mut self.out);
        self.transitions.extend(transition);
        transition
    }

    /// Advance virtual time by one millisecond.
    pub fn step_ms(&mut self) {
        self.clock.tick();
        if self.now_ms % BUTTON_SAMPLE_MS == 0 {
            self.sampler.tick(self.raw);
        }
        self.now_ms += 1;

        for _ in 0..POLLS_PER_MS {
            self.poll();
        }
    }

    pub fn run_ms(&mut self, ms: u32) {
        for _ in 0..ms {
            self.step_ms();
        }
    }

    /// Step until `done` holds, panicking after `limit_ms`.
    pub fn run_until(&mut self, limit_ms: u32, done: impl Fn(&Game<'static>) -> bool) {
        for _ in 0..limit_ms {
            if done(&self.game) {
                return;
            }
            self.step_ms();
        }
        assert!(
            done(&self.game),
            "condition not reached within {limit_ms} ms, phase {:?}",
            self.game.phase()
        );
    }

    pub fn run_until_state(&mut self, state: State, limit_ms: u32) {
        self.run_until(limit_ms, |game| game.state() == state);
    }

    /// Set the raw level of the button lines.
    pub fn set_raw(&mut self, raw: ButtonSet) {
        self.raw = raw;
    }

    /// Press `button` for `hold_ms`, then release it and wait for the game to take the step.
    pub fn answer(&mut self, button: Button, hold_ms: u32) {
        assert_eq!(
            self.game.phase(),
            Phase::PlayersTurn(PlayerPhase::Pause),
            "not waiting for input"
        );
        self.set_raw(button.into());
        self.run_ms(hold_ms);
        self.set_raw(ButtonSet::EMPTY);
        self.run_until(1_000, |game| {
            game.phase() == Phase::PlayersTurn(PlayerPhase::Pause)
                || game.state() != State::PlayersTurn
        });
    }

    /// Wait for the player's turn and answer with `buttons`.
    pub fn play_round(&mut self, buttons: &[Button]) {
        self.run_until_state(State::PlayersTurn, 60_000);
        for button in buttons {
            if self.game.state() != State::PlayersTurn {
                break;
            }
            self.answer(*button, 40);
        }
        self.run_until_state(State::Result, 1_000);
    }
}

/// The first `n` digits produced from the power up seed, as the buttons that play them.
pub fn expected_buttons(lfsr: &Lfsr, n: usize) -> Vec<Button> {
    let mut lfsr = lfsr.clone();
    lfsr.reset_to_start();
    (0..n)
        .map(|_| Button::from_index(lfsr.advance()).expect("digits are below 4"))
        .collect()
}

/// Some button other than `button`.
pub fn wrong(button: Button) -> Button {
    Button::from_index((button.index() + 1) % 4).expect("index below 4")
}
