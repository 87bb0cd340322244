/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use super::{Drops, Move, MoveKind, PieceKind, Position};

/// The four slide directions, in generation order.
const DIRECTIONS: [MoveKind; 4] = [
    MoveKind::SlideLeft,
    MoveKind::SlideRight,
    MoveKind::SlideUp,
    MoveKind::SlideDown,
];

impl Position {
    /// Generates every legal move in this position.
    ///
    /// Placements come first in square order, then slides by origin square,
    /// direction, and carry count. Every returned move passes
    /// [`Position::apply`].
    pub fn all_moves(&self) -> Vec<Move> {
        let mut moves = Vec::with_capacity(64);
        self.place_moves(&mut moves);
        if self.move_number() >= 2 {
            self.slide_moves(&mut moves);
        }
        moves
    }

    fn place_moves(&self, moves: &mut Vec<Move>) {
        let s = self.size();
        let mover = self.to_move();
        let opening = self.move_number() < 2;

        // During the opening the mover places the opponent's flat, so the
        // relevant reserve is the opponent's
        let owner = if opening { mover.opponent() } else { mover };
        let stones = self.stones_remaining(owner);
        let caps = self.caps_remaining(owner);

        for y in 0..s {
            for x in 0..s {
                if self.height[self.sq(x, y)] != 0 {
                    continue;
                }
                if stones > 0 {
                    moves.push(Move::place(MoveKind::PlaceFlat, x, y));
                    if !opening {
                        moves.push(Move::place(MoveKind::PlaceStanding, x, y));
                    }
                }
                if !opening && caps > 0 {
                    moves.push(Move::place(MoveKind::PlaceCapstone, x, y));
                }
            }
        }
    }

    fn slide_moves(&self, moves: &mut Vec<Move>) {
        let s = self.size();
        let mover = self.to_move();

        for y in 0..s {
            for x in 0..s {
                let idx = self.sq(x, y);
                let h = self.height[idx];
                if h == 0 {
                    continue;
                }
                match self.top(x, y) {
                    Some((color, _)) if color == mover => {}
                    _ => continue,
                }

                let is_cap = matches!(self.top(x, y), Some((_, PieceKind::Capstone)));
                let max_carry = h.min(s);

                for kind in DIRECTIONS {
                    for carry in 1..=max_carry {
                        let mut drops = Drops::new();
                        self.enum_drops(x, y, x, y, kind, carry, is_cap, &mut drops, moves);
                    }
                }
            }
        }
    }

    /// Enumerate all ways of dropping `remaining` stones onward from
    /// `(x, y)`, appending each completed sequence as a move from the
    /// origin square.
    #[allow(clippy::too_many_arguments)]
    fn enum_drops(
        &self,
        ox: u8,
        oy: u8,
        x: u8,
        y: u8,
        kind: MoveKind,
        remaining: u8,
        is_cap: bool,
        drops: &mut Drops,
        moves: &mut Vec<Move>,
    ) {
        let s = self.size();
        let (dx, dy) = kind.offset();
        let (nx, ny) = (x as i8 + dx, y as i8 + dy);
        if nx < 0 || ny < 0 || nx >= s as i8 || ny >= s as i8 {
            return;
        }
        let (nx, ny) = (nx as u8, ny as u8);

        match self.top_kind(nx, ny) {
            PieceKind::Capstone => return,
            PieceKind::Standing => {
                // A lone capstone may finish here, flattening the wall
                if is_cap && remaining == 1 {
                    drops.push(1);
                    moves.push(Move::slide(kind, ox, oy, drops.clone()));
                    drops.pop();
                }
                return;
            }
            PieceKind::Flat => {}
        }

        for d in 1..=remaining {
            drops.push(d);
            if d == remaining {
                moves.push(Move::slide(kind, ox, oy, drops.clone()));
            } else {
                self.enum_drops(ox, oy, nx, ny, kind, remaining - d, is_cap, drops, moves);
            }
            drops.pop();
        }
    }

    /// Kind of the top stone at `(x, y)`, treating empty squares as flat.
    #[inline(always)]
    fn top_kind(&self, x: u8, y: u8) -> PieceKind {
        match self.top(x, y) {
            Some((_, kind)) => kind,
            None => PieceKind::Flat,
        }
    }
}
