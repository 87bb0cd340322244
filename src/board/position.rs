/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use anyhow::{bail, Context, Result};
use thiserror::Error;

use super::{zobrist, Bitboard, Color, Constants, Move, MoveKind, PieceKind, Winner};

/// Ways a move can violate the rules.
///
/// The search treats these as "skip this move"; everything else that can go
/// wrong during a search is a real failure.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MoveError {
    #[error("square is off the board")]
    OutOfBounds,

    #[error("square is occupied")]
    Occupied,

    #[error("only flat placements are legal on the first two plies")]
    IllegalOpening,

    #[error("no stones of that kind remain in reserve")]
    OutOfPieces,

    #[error("stack is not controlled by the mover")]
    NotYourStack,

    #[error("carry exceeds the stack height or the carry limit")]
    TooManyPieces,

    #[error("invalid drop counts")]
    InvalidDrops,

    #[error("slide is blocked")]
    Blocked,
}

/// Road-contributing squares of each color, partitioned into maximal
/// 4-connected groups.
///
/// Flats and capstones contribute; standing stones do not. The evaluator
/// and the terminal test both consume this.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Analysis {
    pub white_groups: Vec<Bitboard>,
    pub black_groups: Vec<Bitboard>,
}

impl Analysis {
    /// The groups belonging to `color`.
    #[inline(always)]
    pub fn groups(&self, color: Color) -> &[Bitboard] {
        match color {
            Color::White => &self.white_groups,
            Color::Black => &self.black_groups,
        }
    }
}

/// A complete Tak position.
///
/// Positions are values: [`Position::apply`] never mutates in place, it
/// clones and returns the successor. The top stone of every occupied square
/// is tracked in the four bitboards; full stack contents live in `height`
/// and `stacks`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    c: Constants,

    /// Plies played so far. White moves on even plies.
    move_number: u32,

    white_stones: u8,
    black_stones: u8,
    white_caps: u8,
    black_caps: u8,

    /// Squares whose top stone is White's.
    pub white: Bitboard,

    /// Squares whose top stone is Black's.
    pub black: Bitboard,

    /// Squares whose top stone is standing.
    pub standing: Bitboard,

    /// Squares whose top stone is a capstone.
    pub caps: Bitboard,

    /// Stack height per square.
    pub height: [u8; 64],

    /// Stack colors per square: bit `j` is the color of the `j`-th stone
    /// from the bottom, 1 = black.
    pub stacks: [u64; 64],

    hash: u64,

    analysis: Analysis,
}

/// Initial (flat, capstone) reserves per board size.
#[inline(always)]
const fn reserves(size: u8) -> (u8, u8) {
    match size {
        4 => (15, 0),
        5 => (21, 1),
        6 => (30, 1),
        7 => (40, 2),
        _ => (50, 2),
    }
}

impl Position {
    /// An empty board of the given size, White to move.
    pub fn new(size: u8) -> Self {
        let (stones, caps) = reserves(size);
        Self {
            c: Constants::new(size),
            move_number: 0,
            white_stones: stones,
            black_stones: stones,
            white_caps: caps,
            black_caps: caps,
            white: Bitboard::EMPTY,
            black: Bitboard::EMPTY,
            standing: Bitboard::EMPTY,
            caps: Bitboard::EMPTY,
            height: [0; 64],
            stacks: [0; 64],
            hash: 0,
            analysis: Analysis::default(),
        }
    }

    /// Board dimension.
    #[inline(always)]
    pub fn size(&self) -> u8 {
        self.c.size
    }

    /// The precomputed bitboard masks for this board size.
    #[inline(always)]
    pub fn constants(&self) -> &Constants {
        &self.c
    }

    /// Plies played so far.
    #[inline(always)]
    pub fn move_number(&self) -> i64 {
        self.move_number as i64
    }

    /// The side to move.
    #[inline(always)]
    pub fn to_move(&self) -> Color {
        if self.move_number % 2 == 0 {
            Color::White
        } else {
            Color::Black
        }
    }

    /// Zobrist hash of this position. Equal positions hash equal.
    #[inline(always)]
    pub fn hash(&self) -> u64 {
        self.hash
    }

    /// Flat stones remaining in `color`'s reserve.
    #[inline(always)]
    pub fn stones_remaining(&self, color: Color) -> u8 {
        match color {
            Color::White => self.white_stones,
            Color::Black => self.black_stones,
        }
    }

    /// Capstones remaining in `color`'s reserve.
    #[inline(always)]
    pub fn caps_remaining(&self, color: Color) -> u8 {
        match color {
            Color::White => self.white_caps,
            Color::Black => self.black_caps,
        }
    }

    /// The cached road-group analysis of this position.
    #[inline(always)]
    pub fn analysis(&self) -> &Analysis {
        &self.analysis
    }

    /// Bit index of square `(x, y)`.
    #[inline(always)]
    pub(crate) fn sq(&self, x: u8, y: u8) -> usize {
        (y * self.c.size + x) as usize
    }

    /// The color and kind of the top stone at `(x, y)`, if occupied.
    pub fn top(&self, x: u8, y: u8) -> Option<(Color, PieceKind)> {
        let bit = Bitboard::from_coords(x, y, self.c.size);
        let color = if (self.white & bit).is_nonempty() {
            Color::White
        } else if (self.black & bit).is_nonempty() {
            Color::Black
        } else {
            return None;
        };

        Some((color, self.kind_at(x, y)))
    }

    /// Kind of the top stone at `(x, y)`. Flat for empty squares.
    #[inline(always)]
    fn kind_at(&self, x: u8, y: u8) -> PieceKind {
        let bit = Bitboard::from_coords(x, y, self.c.size);
        if (self.caps & bit).is_nonempty() {
            PieceKind::Capstone
        } else if (self.standing & bit).is_nonempty() {
            PieceKind::Standing
        } else {
            PieceKind::Flat
        }
    }

    /// Terminal test: returns `(over, winner)`.
    ///
    /// A road wins immediately; when both colors hold a road, the player
    /// who made the last move takes the game. Otherwise a full board or an
    /// exhausted reserve ends the game on a flat count, with a tie drawn.
    pub fn game_over(&self) -> (bool, Winner) {
        let white_road = self.analysis.white_groups.iter().any(|&g| self.c.spans(g));
        let black_road = self.analysis.black_groups.iter().any(|&g| self.c.spans(g));

        if white_road || black_road {
            let winner = if white_road && black_road {
                Winner::from_color(self.to_move().opponent())
            } else if white_road {
                Winner::White
            } else {
                Winner::Black
            };
            return (true, winner);
        }

        let full = (self.white | self.black) == self.c.mask;
        let white_out = self.white_stones == 0 && self.white_caps == 0;
        let black_out = self.black_stones == 0 && self.black_caps == 0;

        if full || white_out || black_out {
            let wf = (self.white & !self.standing & !self.caps).popcount();
            let bf = (self.black & !self.standing & !self.caps).popcount();
            let winner = match wf.cmp(&bf) {
                std::cmp::Ordering::Greater => Winner::White,
                std::cmp::Ordering::Less => Winner::Black,
                std::cmp::Ordering::Equal => Winner::None,
            };
            return (true, winner);
        }

        (false, Winner::None)
    }

    /// Applies `m`, returning the successor position.
    ///
    /// `self` is never modified. Rule violations come back as [`MoveError`].
    pub fn apply(&self, m: &Move) -> Result<Self, MoveError> {
        let s = self.c.size;
        if m.x >= s || m.y >= s {
            return Err(MoveError::OutOfBounds);
        }

        let mover = self.to_move();
        let mut next = self.clone();

        if m.kind.is_slide() {
            next.do_slide(m, mover)?;
        } else {
            next.do_place(m, mover)?;
        }

        next.move_number += 1;
        next.hash ^= zobrist::side_key(mover) ^ zobrist::side_key(mover.opponent());
        next.reanalyze();

        Ok(next)
    }

    /// XOR this square's contribution in or out of the hash.
    #[inline(always)]
    fn toggle_square_hash(&mut self, x: u8, y: u8) {
        let idx = self.sq(x, y);
        self.hash ^= zobrist::square_key(idx, self.stacks[idx], self.height[idx], self.kind_at(x, y));
    }

    /// Set the top-stone bookkeeping bits for `(x, y)`.
    #[inline(always)]
    fn set_top(&mut self, x: u8, y: u8, color: Color, kind: PieceKind) {
        let bit = Bitboard::from_coords(x, y, self.c.size);
        self.white &= !bit;
        self.black &= !bit;
        self.standing &= !bit;
        self.caps &= !bit;

        match color {
            Color::White => self.white |= bit,
            Color::Black => self.black |= bit,
        }
        match kind {
            PieceKind::Standing => self.standing |= bit,
            PieceKind::Capstone => self.caps |= bit,
            PieceKind::Flat => {}
        }
    }

    fn do_place(&mut self, m: &Move, mover: Color) -> Result<(), MoveError> {
        let idx = self.sq(m.x, m.y);
        if self.height[idx] != 0 {
            return Err(MoveError::Occupied);
        }

        // The opening swap: the first two plies place a flat for the opponent
        let color = if self.move_number < 2 {
            if m.kind != MoveKind::PlaceFlat {
                return Err(MoveError::IllegalOpening);
            }
            mover.opponent()
        } else {
            mover
        };

        let kind = match m.kind {
            MoveKind::PlaceFlat => PieceKind::Flat,
            MoveKind::PlaceStanding => PieceKind::Standing,
            MoveKind::PlaceCapstone => PieceKind::Capstone,
            _ => unreachable!(),
        };

        let reserve = match (color, kind) {
            (Color::White, PieceKind::Capstone) => &mut self.white_caps,
            (Color::Black, PieceKind::Capstone) => &mut self.black_caps,
            (Color::White, _) => &mut self.white_stones,
            (Color::Black, _) => &mut self.black_stones,
        };
        if *reserve == 0 {
            return Err(MoveError::OutOfPieces);
        }
        *reserve -= 1;

        self.toggle_square_hash(m.x, m.y);
        self.stacks[idx] = (color == Color::Black) as u64;
        self.height[idx] = 1;
        self.set_top(m.x, m.y, color, kind);
        self.toggle_square_hash(m.x, m.y);

        Ok(())
    }

    fn do_slide(&mut self, m: &Move, mover: Color) -> Result<(), MoveError> {
        if self.move_number < 2 {
            return Err(MoveError::IllegalOpening);
        }

        let s = self.c.size;
        let idx = self.sq(m.x, m.y);
        let h = self.height[idx];

        match self.top(m.x, m.y) {
            Some((color, _)) if color == mover => {}
            _ => return Err(MoveError::NotYourStack),
        }

        let carry = m.carry();
        if carry == 0 || m.drops.is_empty() || m.drops.iter().any(|&d| d == 0) {
            return Err(MoveError::InvalidDrops);
        }
        if carry > h || carry > s {
            return Err(MoveError::TooManyPieces);
        }

        let moving_kind = self.kind_at(m.x, m.y);

        // Lift the top `carry` stones off the source
        let kept = h - carry;
        let mut segment = self.stacks[idx] >> kept;

        self.toggle_square_hash(m.x, m.y);
        self.height[idx] = kept;
        self.stacks[idx] &= (1u64 << kept) - 1;
        if kept == 0 {
            let bit = Bitboard::from_coords(m.x, m.y, s);
            self.white &= !bit;
            self.black &= !bit;
            self.standing &= !bit;
            self.caps &= !bit;
        } else {
            // The newly exposed top is always a flat
            let color = if (self.stacks[idx] >> (kept - 1)) & 1 == 1 {
                Color::Black
            } else {
                Color::White
            };
            self.set_top(m.x, m.y, color, PieceKind::Flat);
        }
        self.toggle_square_hash(m.x, m.y);

        // Walk the drops
        let (dx, dy) = m.kind.offset();
        let (mut x, mut y) = (m.x as i8, m.y as i8);

        for (i, &d) in m.drops.iter().enumerate() {
            x += dx;
            y += dy;
            if x < 0 || y < 0 || x >= s as i8 || y >= s as i8 {
                return Err(MoveError::OutOfBounds);
            }
            let (tx, ty) = (x as u8, y as u8);
            let tidx = self.sq(tx, ty);
            let last = i == m.drops.len() - 1;

            match self.kind_at(tx, ty) {
                PieceKind::Capstone => return Err(MoveError::Blocked),
                PieceKind::Standing => {
                    // Only a lone capstone flattens a wall
                    if !(last && d == 1 && moving_kind == PieceKind::Capstone) {
                        return Err(MoveError::Blocked);
                    }
                }
                PieceKind::Flat => {}
            }

            self.toggle_square_hash(tx, ty);

            let dropped = segment & ((1u64 << d) - 1);
            self.stacks[tidx] |= dropped << self.height[tidx];
            self.height[tidx] += d;
            segment >>= d;

            let top_color = if (dropped >> (d - 1)) & 1 == 1 {
                Color::Black
            } else {
                Color::White
            };
            // The carried top keeps its kind and lands on the final square
            let kind = if last { moving_kind } else { PieceKind::Flat };
            self.set_top(tx, ty, top_color, kind);

            self.toggle_square_hash(tx, ty);
        }

        Ok(())
    }

    /// Recompute the road groups. Called after every transition.
    fn reanalyze(&mut self) {
        let white_road = self.white & !self.standing;
        let black_road = self.black & !self.standing;
        self.analysis.white_groups = self.c.flood_groups(white_road);
        self.analysis.black_groups = self.c.flood_groups(black_road);
    }

    /// Recompute the Zobrist hash from scratch. Used by the TPS parser;
    /// transitions maintain the hash incrementally.
    fn rehash(&mut self) {
        let s = self.c.size;
        let mut hash = zobrist::side_key(self.to_move());
        for y in 0..s {
            for x in 0..s {
                let idx = self.sq(x, y);
                hash ^= zobrist::square_key(idx, self.stacks[idx], self.height[idx], self.kind_at(x, y));
            }
        }
        self.hash = hash;
    }

    /// Parses a position from [TPS](https://ustak.org/tak-positional-system-tps/).
    ///
    /// Rows are listed from the top of the board down; stacks read bottom
    /// to top with an optional trailing `S`/`C` marking the top stone.
    pub fn from_tps(tps: &str) -> Result<Self> {
        let mut parts = tps.split_whitespace();
        let board = parts.next().context("empty TPS string")?;
        let player: u8 = parts
            .next()
            .context("TPS is missing the side to move")?
            .parse()
            .context("invalid side to move")?;
        let full_move: u32 = parts
            .next()
            .context("TPS is missing the move number")?
            .parse()
            .context("invalid move number")?;

        if !(1..=2).contains(&player) {
            bail!("side to move must be 1 or 2, got {player}");
        }
        if full_move == 0 {
            bail!("move numbers start at 1");
        }

        let rows: Vec<&str> = board.split('/').collect();
        let size = rows.len() as u8;
        if !(4..=8).contains(&size) {
            bail!("unsupported board size {size}");
        }

        let mut p = Self::new(size);
        p.move_number = (full_move - 1) * 2 + (player - 1) as u32;

        // Rows come top-down
        for (i, row) in rows.iter().enumerate() {
            let y = size - 1 - i as u8;
            let mut x = 0u8;

            for cell in row.split(',') {
                if let Some(run) = cell.strip_prefix('x') {
                    let n: u8 = if run.is_empty() {
                        1
                    } else {
                        run.parse().context("invalid empty-square run")?
                    };
                    x += n;
                    continue;
                }

                if x >= size {
                    bail!("row {row:?} overflows the board");
                }

                let idx = p.sq(x, y);
                let mut kind = PieceKind::Flat;
                for ch in cell.chars() {
                    match ch {
                        '1' | '2' => {
                            let color = if ch == '2' { Color::Black } else { Color::White };
                            p.stacks[idx] |= ((color == Color::Black) as u64) << p.height[idx];
                            p.height[idx] += 1;

                            // Account the stone against its reserve
                            let reserve = match color {
                                Color::White => &mut p.white_stones,
                                Color::Black => &mut p.black_stones,
                            };
                            if *reserve == 0 {
                                bail!("TPS places more {color} stones than the reserve holds");
                            }
                            *reserve -= 1;
                        }
                        'S' => kind = PieceKind::Standing,
                        'C' => kind = PieceKind::Capstone,
                        _ => bail!("invalid TPS square {cell:?}"),
                    }
                }

                let h = p.height[idx];
                if h == 0 {
                    bail!("invalid TPS square {cell:?}");
                }
                let color = if (p.stacks[idx] >> (h - 1)) & 1 == 1 {
                    Color::Black
                } else {
                    Color::White
                };

                // Capstones come from the capstone reserve, not the flats
                if kind == PieceKind::Capstone {
                    let (stones, caps) = match color {
                        Color::White => (&mut p.white_stones, &mut p.white_caps),
                        Color::Black => (&mut p.black_stones, &mut p.black_caps),
                    };
                    *stones += 1;
                    if *caps == 0 {
                        bail!("TPS places more {color} capstones than the reserve holds");
                    }
                    *caps -= 1;
                }

                p.set_top(x, y, color, kind);
                x += 1;
            }

            if x != size {
                bail!("row {row:?} does not cover the board");
            }
        }

        p.rehash();
        p.reanalyze();
        Ok(p)
    }

    /// Formats this position as TPS.
    pub fn to_tps(&self) -> String {
        let s = self.c.size;
        let mut rows = Vec::with_capacity(s as usize);

        for y in (0..s).rev() {
            let mut cells = Vec::with_capacity(s as usize);
            let mut run = 0u8;

            for x in 0..s {
                let idx = self.sq(x, y);
                if self.height[idx] == 0 {
                    run += 1;
                    continue;
                }
                if run > 0 {
                    cells.push(if run == 1 { "x".into() } else { format!("x{run}") });
                    run = 0;
                }

                let mut cell = String::new();
                for j in 0..self.height[idx] {
                    cell.push(if (self.stacks[idx] >> j) & 1 == 1 { '2' } else { '1' });
                }
                match self.kind_at(x, y) {
                    PieceKind::Standing => cell.push('S'),
                    PieceKind::Capstone => cell.push('C'),
                    PieceKind::Flat => {}
                }
                cells.push(cell);
            }
            if run > 0 {
                cells.push(if run == 1 { "x".into() } else { format!("x{run}") });
            }

            rows.push(cells.join(","));
        }

        let player = if self.to_move() == Color::White { 1 } else { 2 };
        let full_move = self.move_number / 2 + 1;
        format!("{} {player} {full_move}", rows.join("/"))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_tps())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mv(s: &str) -> Move {
        s.parse().unwrap()
    }

    #[test]
    fn test_opening_swap() {
        let p = Position::new(5);
        assert_eq!(p.to_move(), Color::White);

        // White's first placement is a black stone
        let p = p.apply(&mv("a1")).unwrap();
        assert_eq!(p.top(0, 0), Some((Color::Black, PieceKind::Flat)));
        assert_eq!(p.to_move(), Color::Black);

        // Black's first placement is a white stone
        let p = p.apply(&mv("e5")).unwrap();
        assert_eq!(p.top(4, 4), Some((Color::White, PieceKind::Flat)));
        assert_eq!(p.to_move(), Color::White);
        assert_eq!(p.move_number(), 2);
    }

    #[test]
    fn test_opening_rejects_walls_and_caps() {
        let p = Position::new(5);
        assert_eq!(p.apply(&mv("Sa1")), Err(MoveError::IllegalOpening));
        assert_eq!(p.apply(&mv("Ca1")), Err(MoveError::IllegalOpening));
    }

    #[test]
    fn test_opening_rejects_slides() {
        // Black owns the a1 stone after the swap but still must place
        let p = Position::new(5).apply(&mv("a1")).unwrap();
        assert_eq!(p.apply(&mv("a1>")), Err(MoveError::IllegalOpening));
    }

    #[test]
    fn test_place_on_occupied_square() {
        let p = Position::new(5).apply(&mv("a1")).unwrap();
        assert_eq!(p.apply(&mv("a1")), Err(MoveError::Occupied));
    }

    #[test]
    fn test_apply_is_pure() {
        let p = Position::new(5);
        let hash = p.hash();
        let _ = p.apply(&mv("a1")).unwrap();
        assert_eq!(p.hash(), hash);
        assert_eq!(p.move_number(), 0);
    }

    #[test]
    fn test_slide_distributes_stack() {
        // c3 holds black under white; White slides two stones right
        let p = Position::from_tps("x5/x5/x2,21,x2/x5/x5 1 5").unwrap();
        assert_eq!(p.top(2, 2), Some((Color::White, PieceKind::Flat)));

        let p = p.apply(&mv("2c3>11")).unwrap();
        assert_eq!(p.top(2, 2), None);
        assert_eq!(p.top(3, 2), Some((Color::Black, PieceKind::Flat)));
        assert_eq!(p.top(4, 2), Some((Color::White, PieceKind::Flat)));
    }

    #[test]
    fn test_slide_requires_control() {
        let p = Position::from_tps("x5/x5/x2,12,x2/x5/x5 1 5").unwrap();
        assert_eq!(p.apply(&mv("c3>")), Err(MoveError::NotYourStack));
    }

    #[test]
    fn test_carry_limit() {
        // A six-high stack on a 5x5 board can carry at most five
        let p = Position::from_tps("x5/x5/x2,212121,x2/x5/x5 1 7").unwrap();
        assert_eq!(p.apply(&mv("6c3>6")), Err(MoveError::TooManyPieces));
        assert!(p.apply(&mv("5c3>5")).is_ok());
    }

    #[test]
    fn test_capstone_smashes_wall() {
        let p = Position::from_tps("x5/x5/x2,1C,2S,x2/x5/x5 1 5").unwrap();
        let p = p.apply(&mv("c3>")).unwrap();
        assert_eq!(p.top(3, 2), Some((Color::White, PieceKind::Capstone)));
        assert!(p.standing.is_empty());
        assert_eq!(p.height[p.sq(3, 2)], 2);
    }

    #[test]
    fn test_walls_block_flats() {
        let p = Position::from_tps("x5/x5/x2,1,2S,x2/x5/x5 1 5").unwrap();
        assert_eq!(p.apply(&mv("c3>")), Err(MoveError::Blocked));
    }

    #[test]
    fn test_capstone_must_be_alone_to_smash() {
        // Capstone on a flat; dropping both stones onto the wall is illegal
        let p = Position::from_tps("x5/x5/x2,11C,2S,x2/x5/x5 1 5").unwrap();
        assert_eq!(p.apply(&mv("2c3>2")), Err(MoveError::Blocked));
        assert!(p.apply(&mv("2c3>11")).is_err());
        assert!(p.apply(&mv("c3>")).is_ok());
    }

    #[test]
    fn test_caps_block_everything() {
        let p = Position::from_tps("x5/x5/x2,1C,2C,x2/x5/x5 1 5").unwrap();
        assert_eq!(p.apply(&mv("c3>")), Err(MoveError::Blocked));
    }

    #[test]
    fn test_road_wins() {
        let p = Position::from_tps("x5/x5/x5/x5/1,1,1,1,1 2 6").unwrap();
        assert_eq!(p.game_over(), (true, Winner::White));

        let p = Position::from_tps("2,x4/2,x4/2,x4/2,x4/2,x4 1 6").unwrap();
        assert_eq!(p.game_over(), (true, Winner::Black));
    }

    #[test]
    fn test_walls_do_not_make_roads() {
        let p = Position::from_tps("x5/x5/x5/x5/1,1,1S,1,1 2 6").unwrap();
        assert_eq!(p.game_over(), (false, Winner::None));
    }

    #[test]
    fn test_flat_count_on_full_board() {
        // A full 4x4 board, eight flats each: a draw
        let p = Position::from_tps("1,2,1,2/2,1,2,1/1,2,1,2/2,1,2,1 1 9").unwrap();
        assert_eq!(p.game_over(), (true, Winner::None));

        // Standing a black stone hands White the flat majority
        let p = Position::from_tps("1,2,1,2/2,1,2,1/1,2,1,2/2S,1,2,1 1 9").unwrap();
        assert_eq!(p.game_over(), (true, Winner::White));
    }

    #[test]
    fn test_tps_round_trip() {
        let tps = "2,x4/x2,2,x2/x,2,2,x2/x2,12,2,1/1,1,21,2,1 1 9";
        let p = Position::from_tps(tps).unwrap();
        assert_eq!(p.to_tps(), tps);
        assert_eq!(p.size(), 5);
        assert_eq!(p.to_move(), Color::White);
        assert_eq!(p.move_number(), 16);
    }

    #[test]
    fn test_tps_matches_played_position() {
        let played = Position::new(5)
            .apply(&mv("a1"))
            .unwrap()
            .apply(&mv("e5"))
            .unwrap();
        let parsed = Position::from_tps("x4,1/x5/x5/x5/2,x4 1 2").unwrap();

        assert_eq!(played.to_tps(), parsed.to_tps());
        assert_eq!(played.hash(), parsed.hash());
        assert_eq!(played, parsed);
    }

    #[test]
    fn test_hash_tracks_side_to_move() {
        let a = Position::from_tps("x4,1/x5/x5/x5/2,x4 1 2").unwrap();
        let b = Position::from_tps("x4,1/x5/x5/x5/2,x4 2 2").unwrap();
        assert_ne!(a.hash(), b.hash());
    }

    #[test]
    fn test_incremental_hash_matches_rehash() {
        let mut p = Position::new(5)
            .apply(&mv("a1"))
            .unwrap()
            .apply(&mv("e5"))
            .unwrap()
            .apply(&mv("c3"))
            .unwrap()
            .apply(&mv("Sd3"))
            .unwrap()
            .apply(&mv("c3<"))
            .unwrap();

        let incremental = p.hash();
        p.rehash();
        assert_eq!(p.hash(), incremental);
    }

    #[test]
    fn test_reserves_decrement() {
        let p = Position::new(5);
        assert_eq!(p.stones_remaining(Color::White), 21);
        assert_eq!(p.caps_remaining(Color::White), 1);

        // The opening swap spends the opponent's stone
        let p = p.apply(&mv("a1")).unwrap();
        assert_eq!(p.stones_remaining(Color::Black), 20);
        assert_eq!(p.stones_remaining(Color::White), 21);
    }
}
