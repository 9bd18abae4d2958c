//! Type contracts for the dual n-back memory game.
//!
//! Only the data shapes exist here; round generation and scoring are not
//! part of this crate.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the eight cells of the visual grid, numbered 1 to 8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct VisualSquare(u8);

impl VisualSquare {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 8;

    pub fn new(cell: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&cell).then_some(Self(cell))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn all() -> impl Iterator<Item = Self> {
        (Self::MIN..=Self::MAX).map(Self)
    }
}

impl TryFrom<u8> for VisualSquare {
    type Error = OutOfRange;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(OutOfRange::Square(value))
    }
}

impl From<VisualSquare> for u8 {
    fn from(square: VisualSquare) -> Self {
        square.0
    }
}

/// One of the seven spoken letters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AudioSound {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
}

impl AudioSound {
    pub const ALL: [AudioSound; 7] = [
        AudioSound::A,
        AudioSound::B,
        AudioSound::C,
        AudioSound::D,
        AudioSound::E,
        AudioSound::F,
        AudioSound::G,
    ];

    pub fn letter(self) -> char {
        match self {
            AudioSound::A => 'A',
            AudioSound::B => 'B',
            AudioSound::C => 'C',
            AudioSound::D => 'D',
            AudioSound::E => 'E',
            AudioSound::F => 'F',
            AudioSound::G => 'G',
        }
    }
}

impl TryFrom<char> for AudioSound {
    type Error = OutOfRange;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|sound| sound.letter() == value)
            .ok_or(OutOfRange::Sound(value))
    }
}

impl fmt::Display for AudioSound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum OutOfRange {
    #[error("square {0} is outside 1..=8")]
    Square(u8),
    #[error("sound {0:?} is not one of A..=G")]
    Sound(char),
}

/// The stimulus presented in one trial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pair {
    pub square: VisualSquare,
    pub sound: AudioSound,
}

/// One round: its index, the lag `n`, and the pairs generated for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Round {
    pub round: u32,
    pub n: u32,
    pub generated_pairs: Vec<Pair>,
}
