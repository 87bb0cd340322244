/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

/// The Tak rules engine: positions, moves, bitboards, and notation.
mod board;

/// Static evaluation of positions.
mod eval;

/// Main engine logic; all search related code.
mod search;

/// Types and utilities for rating how good/bad a position is.
mod score;

/// Transposition table.
mod ttable;

/// Magic numbers used by the search.
mod tune;

pub use board::*;
pub use eval::*;
pub use score::*;
pub use search::*;
pub use ttable::*;
