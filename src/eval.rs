/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use crate::{Bitboard, Color, Constants, Position, Score, Winner};

/// A replaceable static evaluation function.
///
/// Receives the searcher's precomputed [`Constants`] alongside the position
/// so custom evaluators can use the same bitboard primitives.
pub type EvalFn = Box<dyn Fn(&Constants, &Position) -> Score + Send>;

/// Feature weights for the default evaluator.
///
/// All features are linear; `groups` is indexed by the width or height of a
/// road group's bounding box, so longer group spans can be rewarded
/// progressively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Weights {
    /// Per flat stone with nothing on top of it.
    pub top_flat: i64,

    /// Per standing stone.
    pub standing: i64,

    /// Per capstone.
    pub capstone: i64,

    /// Per friendly stone buried in any stack.
    pub flat: i64,

    /// Per enemy stone captured under a friendly top, capped at `S - 1`
    /// per square.
    pub captured: i64,

    /// Per empty or capturable square adjacent to a road group.
    pub liberties: i64,

    /// For having the move.
    pub tempo: i64,

    /// Indexed by road-group bounding-box extent.
    pub groups: [i64; 8],
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            top_flat: 400,
            standing: 200,
            capstone: 300,
            flat: 100,
            captured: 25,
            liberties: 20,
            tempo: 250,
            groups: [0, 0, 0, 100, 300, 500, 0, 0],
        }
    }
}

impl Weights {
    /// Wraps these weights into an [`EvalFn`].
    pub fn evaluator(self) -> EvalFn {
        Box::new(move |c, p| evaluate(&self, c, p))
    }
}

/// Statically evaluate `p` for the side to move.
///
/// Terminal positions resolve exactly: wins score near [`Score::MAX`],
/// offset so that faster wins (and wins keeping more stones in reserve)
/// score higher.
pub fn evaluate(w: &Weights, c: &Constants, p: &Position) -> Score {
    let (over, winner) = p.game_over();
    if over {
        let pieces = match winner {
            Winner::White => p.stones_remaining(Color::White) as i64,
            Winner::Black => p.stones_remaining(Color::Black) as i64,
            Winner::None => return Score::ZERO,
        };
        return if winner.is(p.to_move()) {
            Score::MAX - p.move_number() + pieces
        } else {
            Score::MIN + p.move_number() - pieces
        };
    }

    let mut ws: i64 = 0;
    let mut bs: i64 = 0;

    if p.to_move() == Color::White {
        ws += w.tempo;
    } else {
        bs += w.tempo;
    }

    ws += (p.white & !p.caps & !p.standing).popcount() as i64 * w.top_flat;
    bs += (p.black & !p.caps & !p.standing).popcount() as i64 * w.top_flat;
    ws += (p.white & p.standing).popcount() as i64 * w.standing;
    bs += (p.black & p.standing).popcount() as i64 * w.standing;
    ws += (p.white & p.caps).popcount() as i64 * w.capstone;
    bs += (p.black & p.caps).popcount() as i64 * w.capstone;

    let size = c.size as i64;
    for i in 0..(size * size) as usize {
        let h = p.height[i] as i64;
        if h <= 1 {
            continue;
        }

        // Stones buried beneath the top of the stack
        let buried = p.stacks[i] & ((1 << (h - 1)) - 1);
        let bf = buried.count_ones() as i64;
        let wf = h - bf - 1;
        ws += wf * w.flat;
        bs += bf * w.flat;

        let captured = (h - 1).min(size - 1);
        if (p.white.inner() >> i) & 1 != 0 {
            ws += captured * w.captured;
        } else {
            bs += captured * w.captured;
        }
    }

    let analysis = p.analysis();
    ws += score_groups(w, c, &analysis.white_groups);
    bs += score_groups(w, c, &analysis.black_groups);

    let wr = p.white & !p.standing;
    let br = p.black & !p.standing;
    let wl = (c.grow(wr, !p.black) & !wr).popcount() as i64;
    let bl = (c.grow(br, !p.white) & !br).popcount() as i64;
    ws += w.liberties * wl;
    bs += w.liberties * bl;

    if p.to_move() == Color::White {
        Score::new(ws - bs)
    } else {
        Score::new(bs - ws)
    }
}

/// Score one color's road groups by bounding-box extent.
///
/// A group spanning the full board would index past the table, but such a
/// group is a road and the terminal branch returns first.
fn score_groups(w: &Weights, c: &Constants, groups: &[Bitboard]) -> i64 {
    let mut sc = 0;
    for &g in groups {
        let (gw, gh) = c.dimensions(g);
        sc += w.groups[gw as usize];
        sc += w.groups[gh as usize];
    }
    sc
}
