//! Joypad snapshots and press (edge) detection.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Joypad buttons, numbered by their bit position in an [`InputMask`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Button {
    B = 0,
    Y = 1,
    Select = 2,
    Start = 3,
    Up = 4,
    Down = 5,
    Left = 6,
    Right = 7,
    A = 8,
    X = 9,
    L = 10,
    R = 11,
    L2 = 12,
    R2 = 13,
    L3 = 14,
    R3 = 15,
}

impl Button {
    pub const ALL: [Self; 16] = [
        Self::B,
        Self::Y,
        Self::Select,
        Self::Start,
        Self::Up,
        Self::Down,
        Self::Left,
        Self::Right,
        Self::A,
        Self::X,
        Self::L,
        Self::R,
        Self::L2,
        Self::R2,
        Self::L3,
        Self::R3,
    ];

    fn as_str(self) -> &'static str {
        match self {
            Self::B => "b",
            Self::Y => "y",
            Self::Select => "select",
            Self::Start => "start",
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
            Self::A => "a",
            Self::X => "x",
            Self::L => "l",
            Self::R => "r",
            Self::L2 => "l2",
            Self::R2 => "r2",
            Self::L3 => "l3",
            Self::R3 => "r3",
        }
    }

    #[must_use]
    pub const fn bit(self) -> u16 {
        1 << self as u8
    }
}

impl fmt::Display for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown button `{0}`")]
pub struct UnknownButton(pub String);

impl FromStr for Button {
    type Err = UnknownButton;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|b| b.as_str() == raw)
            .ok_or_else(|| UnknownButton(s.to_owned()))
    }
}

/// Snapshot of which joypad buttons are held.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputMask(u16);

impl InputMask {
    pub const EMPTY: Self = Self(0);

    #[must_use]
    pub const fn from_bits(bits: u16) -> Self {
        Self(bits)
    }

    #[must_use]
    pub const fn bits(self) -> u16 {
        self.0
    }

    #[must_use]
    pub const fn with(self, button: Button) -> Self {
        Self(self.0 | button.bit())
    }

    #[must_use]
    pub const fn contains(self, button: Button) -> bool {
        self.0 & button.bit() != 0
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl FromIterator<Button> for InputMask {
    fn from_iter<I: IntoIterator<Item = Button>>(iter: I) -> Self {
        iter.into_iter().fold(Self::EMPTY, Self::with)
    }
}

/// Turns held-button snapshots into per-tick presses.
///
/// A button counts as pressed only on the tick it goes from released to held.
#[derive(Debug, Clone, Copy, Default)]
pub struct EdgeDetector {
    previous: InputMask,
    current: InputMask,
}

impl EdgeDetector {
    /// Record this tick's snapshot and return the buttons newly pressed.
    pub fn update(&mut self, held: InputMask) -> InputMask {
        self.previous = self.current;
        self.current = held;
        self.pressed()
    }

    /// Buttons held now but not on the previous tick.
    #[must_use]
    pub fn pressed(&self) -> InputMask {
        InputMask(self.current.0 & !self.previous.0)
    }

    #[must_use]
    pub fn previous(&self) -> InputMask {
        self.previous
    }

    #[must_use]
    pub fn current(&self) -> InputMask {
        self.current
    }
}
