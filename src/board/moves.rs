/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, str::FromStr};

use anyhow::{anyhow, bail};
use arrayvec::ArrayVec;

/// Stones dropped per square during a slide, in slide order.
///
/// A slide travels at most `S - 1` squares, so a capacity of 8 covers every
/// supported board size.
pub type Drops = ArrayVec<u8, 8>;

/// What a [`Move`] does.
///
/// The declaration order is meaningful: slide kinds compare strictly greater
/// than place kinds, and move reordering relies on that comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum MoveKind {
    /// Place a flat stone on an empty square.
    PlaceFlat,

    /// Place a standing stone on an empty square.
    PlaceStanding,

    /// Place a capstone on an empty square.
    PlaceCapstone,

    /// Slide a stack toward smaller `x`.
    SlideLeft,

    /// Slide a stack toward larger `x`.
    SlideRight,

    /// Slide a stack toward larger `y`.
    SlideUp,

    /// Slide a stack toward smaller `y`.
    SlideDown,
}

impl MoveKind {
    /// Returns `true` if this kind moves a stack rather than placing a stone.
    #[inline(always)]
    pub const fn is_slide(&self) -> bool {
        matches!(
            self,
            Self::SlideLeft | Self::SlideRight | Self::SlideUp | Self::SlideDown
        )
    }

    /// The per-square step of a slide kind.
    #[inline(always)]
    pub const fn offset(&self) -> (i8, i8) {
        match self {
            Self::SlideLeft => (-1, 0),
            Self::SlideRight => (1, 0),
            Self::SlideUp => (0, 1),
            Self::SlideDown => (0, -1),
            _ => (0, 0),
        }
    }
}

/// A single Tak move: a placement or a stack slide.
///
/// `(x, y)` is the placed-on square for placements and the origin square
/// for slides. `drops` is empty for placements.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub struct Move {
    pub x: u8,
    pub y: u8,
    pub kind: MoveKind,
    pub drops: Drops,
}

impl Default for MoveKind {
    #[inline(always)]
    fn default() -> Self {
        Self::PlaceFlat
    }
}

impl Move {
    /// Constructs a placement move.
    #[inline(always)]
    pub fn place(kind: MoveKind, x: u8, y: u8) -> Self {
        debug_assert!(!kind.is_slide());
        Self {
            x,
            y,
            kind,
            drops: Drops::new(),
        }
    }

    /// Constructs a slide move.
    #[inline(always)]
    pub fn slide(kind: MoveKind, x: u8, y: u8, drops: Drops) -> Self {
        debug_assert!(kind.is_slide());
        Self { x, y, kind, drops }
    }

    /// Total number of stones picked up by a slide.
    #[inline(always)]
    pub fn carry(&self) -> u8 {
        self.drops.iter().sum()
    }
}

impl fmt::Display for Move {
    /// Formats this move in PTN.
    ///
    /// Slides always print their carry count, even when it is 1, matching
    /// the notation this crate parses back.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.drops.is_empty() {
            write!(f, "{}", self.carry())?;
        }

        match self.kind {
            MoveKind::PlaceStanding => write!(f, "S")?,
            MoveKind::PlaceCapstone => write!(f, "C")?,
            _ => {}
        }

        write!(f, "{}{}", (b'a' + self.x) as char, (b'1' + self.y) as char)?;

        match self.kind {
            MoveKind::SlideLeft => write!(f, "<")?,
            MoveKind::SlideRight => write!(f, ">")?,
            MoveKind::SlideUp => write!(f, "+")?,
            MoveKind::SlideDown => write!(f, "-")?,
            _ => {}
        }

        for d in &self.drops {
            write!(f, "{d}")?;
        }

        Ok(())
    }
}

impl FromStr for Move {
    type Err = anyhow::Error;

    /// Parses PTN move notation: `[CFS]?[1-8]?[a-h][1-9][<>+-]?[1-8]*`.
    ///
    /// If the dropped stones don't account for the full carry, the
    /// remainder is dropped on the final square, so `3c3>` means "slide
    /// three stones one square right".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        let mut i = 0;

        // Optional placement marker
        let place = match bytes.get(i) {
            Some(&b @ (b'C' | b'F' | b'S')) => {
                i += 1;
                Some(b)
            }
            _ => None,
        };

        // Optional carry count
        let carry = match bytes.get(i) {
            Some(&b @ b'1'..=b'8') => {
                i += 1;
                Some(b - b'0')
            }
            _ => None,
        };

        let x = match bytes.get(i) {
            Some(&b @ b'a'..=b'h') => {
                i += 1;
                b - b'a'
            }
            _ => bail!("invalid move {s:?}: expected a square"),
        };
        let y = match bytes.get(i) {
            Some(&b @ b'1'..=b'9') => {
                i += 1;
                b - b'1'
            }
            _ => bail!("invalid move {s:?}: expected a square"),
        };

        // Optional slide direction
        let kind = match bytes.get(i) {
            Some(b'<') => Some(MoveKind::SlideLeft),
            Some(b'>') => Some(MoveKind::SlideRight),
            Some(b'+') => Some(MoveKind::SlideUp),
            Some(b'-') => Some(MoveKind::SlideDown),
            _ => None,
        };

        let Some(kind) = kind else {
            // A placement
            if carry.is_some() {
                bail!("invalid move {s:?}: can't carry without a direction");
            }
            if i != bytes.len() {
                bail!("invalid move {s:?}: trailing characters");
            }
            let kind = match place {
                None | Some(b'F') => MoveKind::PlaceFlat,
                Some(b'S') => MoveKind::PlaceStanding,
                Some(b'C') => MoveKind::PlaceCapstone,
                _ => unreachable!(),
            };
            return Ok(Self::place(kind, x, y));
        };
        i += 1;

        if place.is_some() {
            bail!("invalid move {s:?}: placement marker on a slide");
        }

        let mut drops = Drops::new();
        let mut remaining = i16::from(carry.unwrap_or(1));
        while let Some(&b @ b'1'..=b'8') = bytes.get(i) {
            i += 1;
            drops
                .try_push(b - b'0')
                .map_err(|_| anyhow!("invalid move {s:?}: too many drops"))?;
            remaining -= i16::from(b - b'0');
        }

        if i != bytes.len() {
            bail!("invalid move {s:?}: trailing characters");
        }

        // Any unaccounted-for stones land on the final square
        if remaining > 0 {
            drops
                .try_push(remaining as u8)
                .map_err(|_| anyhow!("invalid move {s:?}: too many drops"))?;
        } else if remaining < 0 {
            bail!("invalid move {s:?}: drops exceed carry");
        }

        Ok(Self::slide(kind, x, y, drops))
    }
}
