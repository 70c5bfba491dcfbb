//! The virtual board: display, buzzer, button lines and the playback knob.

use std::sync::{
    Arc,
    atomic::{AtomicU8, AtomicU32, Ordering},
};

use simon_core::{
    Button, ButtonSet, Knob, Outputs, buttons::BUTTON_COUNT, segments::SegmentBuffer,
    tone::ToneGenerator,
};

/// Display and buzzer, driven by the game on the control thread.
#[derive(Debug, Default)]
pub struct Board {
    display: SegmentBuffer,
    tone: ToneGenerator,
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn display(&self) -> &SegmentBuffer {
        &self.display
    }

    pub fn tone(&self) -> &ToneGenerator {
        &self.tone
    }

    pub fn tone_mut(&mut self) -> &mut ToneGenerator {
        &mut self.tone
    }
}

impl Outputs for Board {
    fn show_digit(&mut self, digit: u8) {
        self.display.show_digit(digit);
    }

    fn clear_display(&mut self) {
        self.display.clear();
    }

    fn show_victory(&mut self) {
        self.display.show_victory();
    }

    fn show_defeat(&mut self) {
        self.display.show_defeat();
    }

    fn show_score(&mut self, score: u16) {
        self.display.show_score(score);
    }

    fn tone_on(&mut self, digit: u8) {
        self.tone.start(digit);
    }

    fn tone_off(&mut self) {
        self.tone.stop();
    }
}

/// Raw button lines. A key press holds its line down for a number of ticks.
#[derive(Debug)]
pub struct ButtonLines {
    holds: [AtomicU32; BUTTON_COUNT],
}

impl Default for ButtonLines {
    fn default() -> Self {
        Self::new()
    }
}

impl ButtonLines {
    pub const fn new() -> Self {
        Self {
            holds: [const { AtomicU32::new(0) }; BUTTON_COUNT],
        }
    }

    /// Hold `button` down for the next `ticks` calls to [`tick`](Self::tick).
    ///
    /// Pressing a button that is already down never shortens its hold.
    pub fn press(&self, button: Button, ticks: u32) {
        self.holds[usize::from(button.index())].fetch_max(ticks, Ordering::Relaxed);
    }

    /// Raw level of the lines for this tick.
    pub fn tick(&self) -> ButtonSet {
        Button::ALL
            .into_iter()
            .filter(|button| {
                self.holds[usize::from(button.index())]
                    .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |left| {
                        left.checked_sub(1)
                    })
                    .is_ok()
            })
            .collect()
    }
}

/// Playback speed knob shared between the keyboard and the tick thread.
#[derive(Debug, Clone)]
pub struct SharedKnob(Arc<AtomicU8>);

impl SharedKnob {
    pub fn new(value: u8) -> Self {
        Self(Arc::new(AtomicU8::new(value)))
    }

    pub fn value(&self) -> u8 {
        self.0.load(Ordering::Relaxed)
    }

    /// Turn the knob by `delta`, stopping at the ends. Returns the new position.
    pub fn turn(&self, delta: i16) -> u8 {
        let turned = |value: u8| {
            let value = (i16::from(value) + delta).clamp(0, i16::from(u8::MAX));
            u8::try_from(value).unwrap_or(u8::MAX)
        };

        match self
            .0
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |value| {
                Some(turned(value))
            }) {
            Ok(previous) | Err(previous) => turned(previous),
        }
    }
}

impl Knob for SharedKnob {
    fn sample(&mut self) -> u8 {
        self.value()
    }
}
