//! Logical button levels and the press/release edges derived from them.

use core::fmt;

/// Number of physical buttons on the board.
pub const BUTTON_COUNT: usize = 4;

/// One of the four push buttons, `S1` has the highest priority.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Button {
    S1,
    S2,
    S3,
    S4,
}

impl Button {
    /// All buttons in priority order.
    pub const ALL: [Button; BUTTON_COUNT] = [Button::S1, Button::S2, Button::S3, Button::S4];

    /// Zero based index, which is also the digit and tone this button plays.
    pub const fn index(self) -> u8 {
        self as u8
    }

    pub const fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Button::S1),
            1 => Some(Button::S2),
            2 => Some(Button::S3),
            3 => Some(Button::S4),
            _ => None,
        }
    }

    const fn mask(self) -> u8 {
        1 << self.index()
    }
}

impl fmt::Display for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S{}", self.index() + 1)
    }
}

/// A set of buttons, used both for snapshots of pressed buttons and for edges.
///
/// Bit `i` corresponds to [`Button::from_index(i)`](Button::from_index). A set bit means
/// "pressed" regardless of the electrical polarity of the board.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ButtonSet(u8);

impl ButtonSet {
    const VALID: u8 = (1 << BUTTON_COUNT) - 1;

    pub const EMPTY: ButtonSet = ButtonSet(0);
    pub const ALL: ButtonSet = ButtonSet(Self::VALID);

    /// Build a set from raw bits, bits above the button count are dropped.
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & Self::VALID)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn contains(self, button: Button) -> bool {
        self.0 & button.mask() != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn with(self, button: Button) -> Self {
        Self(self.0 | button.mask())
    }

    /// The highest priority button in this set.
    pub fn first(self) -> Option<Button> {
        Button::ALL.into_iter().find(|b| self.contains(*b))
    }
}

impl FromIterator<Button> for ButtonSet {
    fn from_iter<T: IntoIterator<Item = Button>>(iter: T) -> Self {
        iter.into_iter().fold(ButtonSet::EMPTY, ButtonSet::with)
    }
}

impl From<Button> for ButtonSet {
    fn from(button: Button) -> Self {
        ButtonSet::EMPTY.with(button)
    }
}

/// Edges between two consecutive snapshots.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct Edges {
    /// Buttons that went from released to pressed.
    pub pressed: ButtonSet,
    /// Buttons that went from pressed to released.
    pub released: ButtonSet,
}

impl Edges {
    pub const fn between(previous: ButtonSet, current: ButtonSet) -> Self {
        let changed = previous.0 ^ current.0;
        Self {
            pressed: ButtonSet(changed & current.0),
            released: ButtonSet(changed & previous.0),
        }
    }
}

/// Keeps the last observed snapshot so edges can be recomputed on every poll.
#[derive(Debug, Default, Clone)]
pub struct EdgeDetector {
    previous: ButtonSet,
}

impl EdgeDetector {
    /// Start with all buttons released.
    pub const fn new() -> Self {
        Self {
            previous: ButtonSet::EMPTY,
        }
    }

    /// Diff `current` against the previous snapshot and remember it for the next call.
    pub fn update(&mut self, current: ButtonSet) -> Edges {
        let edges = Edges::between(self.previous, current);
        self.previous = current;
        edges
    }
}
