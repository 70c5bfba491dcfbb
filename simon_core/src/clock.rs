//! State shared between the periodic ticks and the control loop, and the ticks themselves.
//!
//! On the target the ticks run from timer interrupts (or high priority tasks) while
//! [`Game::poll`](crate::Game::poll) spins in the background. Every shared value is a single
//! atomic of at most the platform word size, so neither side ever needs a lock and a reader can
//! never observe a half written value.

use core::sync::atomic::{AtomicBool, AtomicU8, AtomicU16, AtomicU32, Ordering};

use crate::{
    buttons::ButtonSet,
    config::{DEFAULT_PLAYBACK_TICKS, playback_duration},
    debounce::Debouncer,
};

/// Source of the playback speed, usually a potentiometer on an ADC channel.
pub trait Knob {
    /// Latest 8 bit sample.
    fn sample(&mut self) -> u8;
}

/// A knob stuck at one position.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FixedKnob(pub u8);

impl Knob for FixedKnob {
    fn sample(&mut self) -> u8 {
        self.0
    }
}

/// Handle shared by the tick sources, the control loop and whatever produces reset and seed
/// requests.
///
/// Only [`Clock`] advances the elapsed time and only [`ButtonSampler`] publishes button states.
/// The control loop is allowed to zero the elapsed time at phase boundaries.
#[derive(Debug)]
pub struct SharedState {
    elapsed: AtomicU16,
    buttons: AtomicU8,

    playback_duration: AtomicU16,
    playback_updates: AtomicBool,

    reset: AtomicBool,

    seed: AtomicU32,
    seed_pending: AtomicBool,
}

impl Default for SharedState {
    fn default() -> Self {
        Self::new()
    }
}

impl SharedState {
    pub const fn new() -> Self {
        Self {
            elapsed: AtomicU16::new(0),
            buttons: AtomicU8::new(0),
            playback_duration: AtomicU16::new(DEFAULT_PLAYBACK_TICKS),
            playback_updates: AtomicBool::new(true),
            reset: AtomicBool::new(false),
            seed: AtomicU32::new(0),
            seed_pending: AtomicBool::new(false),
        }
    }

    /// Ticks since the last call to [`reset_elapsed`](Self::reset_elapsed), wrapping at 16 bits.
    pub fn elapsed(&self) -> u16 {
        self.elapsed.load(Ordering::Relaxed)
    }

    pub fn reset_elapsed(&self) {
        self.elapsed.store(0, Ordering::Relaxed);
    }

    fn advance_elapsed(&self) {
        // fetch_add wraps and cannot lose a concurrent `reset_elapsed`
        self.elapsed.fetch_add(1, Ordering::Relaxed);
    }

    /// The current debounced button state.
    pub fn buttons(&self) -> ButtonSet {
        ButtonSet::from_bits(self.buttons.load(Ordering::Relaxed))
    }

    pub(crate) fn publish_buttons(&self, state: ButtonSet) {
        self.buttons.store(state.bits(), Ordering::Relaxed);
    }

    pub fn playback_duration(&self) -> u16 {
        self.playback_duration.load(Ordering::Relaxed)
    }

    fn store_playback_duration(&self, ticks: u16) {
        self.playback_duration.store(ticks, Ordering::Relaxed);
    }

    /// Allow or stop the elapsed tick from recomputing the playback duration from the knob.
    ///
    /// Updates are suspended while a tone plays so the knob can't change the rhythm halfway.
    pub fn set_playback_updates(&self, enabled: bool) {
        self.playback_updates.store(enabled, Ordering::Relaxed);
    }

    pub fn playback_updates_enabled(&self) -> bool {
        self.playback_updates.load(Ordering::Relaxed)
    }

    /// Ask the game to abort whatever it is doing and start over.
    pub fn request_reset(&self) {
        self.reset.store(true, Ordering::Relaxed);
    }

    pub fn reset_requested(&self) -> bool {
        self.reset.load(Ordering::Relaxed)
    }

    /// Consume a pending reset request.
    pub fn take_reset(&self) -> bool {
        self.reset.swap(false, Ordering::Relaxed)
    }

    /// Queue a new start state for the sequence, applied when the next playback starts.
    pub fn request_seed(&self, seed: u32) {
        self.seed.store(seed, Ordering::Relaxed);
        self.seed_pending.store(true, Ordering::Release);
    }

    /// Consume a pending seed request.
    pub fn take_seed(&self) -> Option<u32> {
        self.seed_pending
            .swap(false, Ordering::Acquire)
            .then(|| self.seed.load(Ordering::Relaxed))
    }
}

/// The elapsed time tick, run every [`ELAPSED_TICK_MS`](crate::config::ELAPSED_TICK_MS).
#[derive(Debug)]
pub struct Clock<'a, K> {
    shared: &'a SharedState,
    knob: K,
}

impl<'a, K: Knob> Clock<'a, K> {
    pub fn new(shared: &'a SharedState, knob: K) -> Self {
        Self { shared, knob }
    }

    pub fn tick(&mut self) {
        self.shared.advance_elapsed();

        if self.shared.playback_updates_enabled() {
            let duration = playback_duration(self.knob.sample());
            self.shared.store_playback_duration(duration);
        }
    }
}

/// The button sampling tick, run every [`BUTTON_SAMPLE_MS`](crate::config::BUTTON_SAMPLE_MS).
#[derive(Debug)]
pub struct ButtonSampler<'a> {
    shared: &'a SharedState,
    debouncer: Debouncer,
}

impl<'a> ButtonSampler<'a> {
    pub fn new(shared: &'a SharedState) -> Self {
        Self {
            shared,
            debouncer: Debouncer::new(),
        }
    }

    /// Debounce one raw sample of the button lines and publish the result.
    pub fn tick(&mut self, raw: ButtonSet) {
        let state = self.debouncer.sample(raw);
        self.shared.publish_buttons(state);
    }
}
