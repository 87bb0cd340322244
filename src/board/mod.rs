/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

/// Bitboards and the per-size mask constants.
mod bitboard;

/// Move representation and PTN notation.
mod moves;

/// Legal move generation.
mod movegen;

/// Stone colors and kinds.
mod piece;

/// Position state, move application, and the terminal test.
mod position;

/// Compile-time Zobrist hash keys.
mod zobrist;

pub use bitboard::*;
pub use moves::*;
pub use piece::*;
pub use position::*;
