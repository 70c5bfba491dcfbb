/// Trait with the display and buzzer operations a [`Game`](crate::Game) can call.
///
/// A board should have a single implementation of this trait, providing it when calling
/// [`Game::poll`](crate::Game::poll).
///
/// All methods are fire and forget. The game assumes a call has taken effect before the next one,
/// any buffering is up to the implementation. None of them may block, they are called from the
/// control loop between two polls of the shared state.
pub trait Outputs {
    /// Show the marker of a sequence digit. Digits outside `0..=3` should clear the display.
    fn show_digit(&mut self, digit: u8);

    fn clear_display(&mut self);

    /// The player repeated the whole sequence.
    fn show_victory(&mut self);

    /// The player made a mistake.
    fn show_defeat(&mut self);

    /// Show a score on the two digit display.
    fn show_score(&mut self, score: u16);

    /// Start the tone of a sequence digit in `0..=3`.
    fn tone_on(&mut self, digit: u8);

    fn tone_off(&mut self);
}

impl<T: Outputs + ?Sized> Outputs for &mut T {
    fn show_digit(&mut self, digit: u8) {
        (**self).show_digit(digit)
    }

    fn clear_display(&mut self) {
        (**self).clear_display()
    }

    fn show_victory(&mut self) {
        (**self).show_victory()
    }

    fn show_defeat(&mut self) {
        (**self).show_defeat()
    }

    fn show_score(&mut self, score: u16) {
        (**self).show_score(score)
    }

    fn tone_on(&mut self, digit: u8) {
        (**self).tone_on(digit)
    }

    fn tone_off(&mut self) {
        (**self).tone_off()
    }
}
