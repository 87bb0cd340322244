/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

/// The two sides of a Tak game.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Color {
    #[default]
    White,
    Black,
}

impl Color {
    /// Number of colors.
    pub const COUNT: usize = 2;

    /// Returns the opposite color.
    #[inline(always)]
    pub const fn opponent(&self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }

    /// Returns this color's index into color-keyed arrays.
    #[inline(always)]
    pub const fn index(&self) -> usize {
        *self as usize
    }

    /// Returns `true` if this color is White.
    #[inline(always)]
    pub const fn is_white(&self) -> bool {
        matches!(self, Self::White)
    }

    /// Human-readable name of this color.
    #[inline(always)]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::White => "white",
            Self::Black => "black",
        }
    }
}

impl fmt::Display for Color {
    #[inline(always)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome of a finished game.
///
/// `None` is a draw (a flat count tie).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Winner {
    #[default]
    None,
    White,
    Black,
}

impl Winner {
    /// Converts a [`Color`] into the corresponding [`Winner`].
    #[inline(always)]
    pub const fn from_color(color: Color) -> Self {
        match color {
            Color::White => Self::White,
            Color::Black => Self::Black,
        }
    }

    /// Returns `true` if `color` is the winning side.
    #[inline(always)]
    pub const fn is(&self, color: Color) -> bool {
        matches!(
            (self, color),
            (Self::White, Color::White) | (Self::Black, Color::Black)
        )
    }
}

/// The three kinds of Tak stone.
///
/// Only the top stone of a stack carries a kind; buried stones are always
/// flat.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PieceKind {
    /// A flat stone. Counts toward roads and the flat count.
    #[default]
    Flat,

    /// A standing stone (wall). Blocks slides, contributes to nothing.
    Standing,

    /// A capstone. Counts toward roads and can flatten standing stones.
    Capstone,
}

impl PieceKind {
    /// Number of stone kinds.
    pub const COUNT: usize = 3;

    /// Returns this kind's index into kind-keyed arrays.
    #[inline(always)]
    pub const fn index(&self) -> usize {
        *self as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opponent() {
        assert_eq!(Color::White.opponent(), Color::Black);
        assert_eq!(Color::Black.opponent(), Color::White);
        assert_eq!(Color::White.opponent().opponent(), Color::White);
    }

    #[test]
    fn test_winner() {
        assert!(Winner::from_color(Color::White).is(Color::White));
        assert!(!Winner::from_color(Color::White).is(Color::Black));
        assert!(!Winner::None.is(Color::White));
        assert!(!Winner::None.is(Color::Black));
    }
}
