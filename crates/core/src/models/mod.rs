//! Shared domain models.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Smallest number that can be picked or drawn.
pub const NUMBER_MIN: u8 = 1;
/// Largest number that can be picked or drawn.
pub const NUMBER_MAX: u8 = 45;
/// Maximum amount of numbers the user may pick manually.
pub const PICK_LIMIT: usize = 5;
/// Amount of numbers in a completed draw.
pub const DRAW_SIZE: usize = 6;

/// Returns true when `value` lies within the number pool.
pub fn in_pool(value: u8) -> bool {
    (NUMBER_MIN..=NUMBER_MAX).contains(&value)
}

/// Numbers that cannot form a draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvalidDraw {
    /// A number lies outside the pool.
    #[error("{0} is outside 1-45")]
    OutOfRange(u8),
    /// A number appears more than once.
    #[error("{0} appears more than once")]
    Duplicate(u8),
}

/// A completed draw: six distinct numbers sorted ascending.
///
/// Deserialization validates the numbers like [`DrawResult::try_from`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "[u8; DRAW_SIZE]")]
pub struct DrawResult([u8; DRAW_SIZE]);

impl DrawResult {
    /// Builds a result from six numbers, sorting them.
    ///
    /// # Panics
    ///
    /// Panics when the numbers repeat or leave the pool.
    pub(crate) fn from_unsorted(numbers: [u8; DRAW_SIZE]) -> Self {
        match Self::try_from(numbers) {
            Ok(result) => result,
            Err(err) => panic!("invalid draw {numbers:?}: {err}"),
        }
    }

    /// Drawn numbers in ascending order.
    pub fn numbers(&self) -> &[u8; DRAW_SIZE] {
        &self.0
    }

    /// Whether `value` is part of this draw.
    pub fn contains(&self, value: u8) -> bool {
        self.0.binary_search(&value).is_ok()
    }

    /// Iterate over the numbers in slot order.
    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        self.0.iter().copied()
    }
}

impl TryFrom<[u8; DRAW_SIZE]> for DrawResult {
    type Error = InvalidDraw;

    fn try_from(mut numbers: [u8; DRAW_SIZE]) -> Result<Self, Self::Error> {
        if let Some(value) = numbers.iter().copied().find(|value| !in_pool(*value)) {
            return Err(InvalidDraw::OutOfRange(value));
        }
        numbers.sort_unstable();
        if let Some(pair) = numbers.windows(2).find(|pair| pair[0] == pair[1]) {
            return Err(InvalidDraw::Duplicate(pair[0]));
        }
        Ok(Self(numbers))
    }
}

impl fmt::Display for DrawResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .0
            .iter()
            .map(|value| value.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "[{joined}]")
    }
}

/// Visual category of a number, one per band of ten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumberBucket {
    /// 1 through 10.
    Yellow,
    /// 11 through 20.
    Blue,
    /// 21 through 30.
    Red,
    /// 31 through 40.
    Gray,
    /// 41 through 45.
    Green,
}

impl NumberBucket {
    /// Bucket for a number of the pool. Values past 40 all land in `Green`.
    pub fn of(value: u8) -> Self {
        match value {
            0..=10 => Self::Yellow,
            11..=20 => Self::Blue,
            21..=30 => Self::Red,
            31..=40 => Self::Gray,
            _ => Self::Green,
        }
    }

    /// Short lowercase name, handy for logs.
    pub fn label(self) -> &'static str {
        match self {
            Self::Yellow => "yellow",
            Self::Blue => "blue",
            Self::Red => "red",
            Self::Gray => "gray",
            Self::Green => "green",
        }
    }
}
