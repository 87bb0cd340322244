/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{
    fmt,
    time::{Duration, Instant, SystemTime, UNIX_EPOCH},
};

use anyhow::{bail, ensure, Context, Result};
use log::{debug, trace};
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

use crate::{
    tune, Bound, Constants, EvalFn, Move, Position, Score, TTable, TTableEntry, Weights,
};

/// Configuration for a [`Searcher`].
pub struct SearchConfig {
    /// Board size the searcher is built for. Must match every position
    /// passed to [`Searcher::analyze`].
    pub size: u8,

    /// Hard cap on search depth.
    pub depth: u16,

    /// PRNG seed for the root move shuffle. Zero selects the wall clock,
    /// making runs non-reproducible.
    pub seed: i64,

    /// Diagnostic log verbosity, 0 to 3. Has no effect on results.
    pub debug: u8,

    /// Replacement for the default evaluator.
    pub evaluate: Option<EvalFn>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            size: 5,
            depth: 5,
            seed: 0,
            debug: 0,
            evaluate: None,
        }
    }
}

impl fmt::Debug for SearchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchConfig")
            .field("size", &self.size)
            .field("depth", &self.depth)
            .field("seed", &self.seed)
            .field("debug", &self.debug)
            .field("evaluate", &self.evaluate.is_some())
            .finish()
    }
}

/// Counters accumulated during one [`Searcher::analyze`] call.
///
/// All counters except `depth` reset at the start of each deepening
/// iteration, so the returned stats describe the deepest completed search.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SearchStats {
    /// Deepest iteration reached.
    pub depth: u16,

    /// Moves produced by the generator.
    pub generated: u64,

    /// Leaf nodes passed to the evaluator.
    pub evaluated: u64,

    /// Leaves that were terminal positions rather than depth-zero cutoffs.
    pub terminal: u64,

    /// Interior nodes entered.
    pub visited: u64,

    /// Nodes that failed high.
    pub cut_nodes: u64,

    /// Cutoffs on the first move searched.
    pub cut_first: u64,

    /// Cutoffs on the second move searched.
    pub cut_second: u64,

    /// Sum of (index + 1) over cutoffs at later moves.
    pub cut_search: u64,

    /// Nodes where no move improved alpha.
    pub all_nodes: u64,

    /// Nodes answered directly from the transposition table.
    pub tt_hits: u64,
}

/// Executes searches over Tak positions.
///
/// Owns its transposition table, which stays warm across
/// [`Searcher::analyze`] calls, so repeated queries on the same line of
/// play get faster.
pub struct Searcher {
    cfg: SearchConfig,
    constants: Constants,
    evaluate: EvalFn,
    table: TTable,
    rng: StdRng,
    stats: SearchStats,
}

impl Searcher {
    /// Construct a new [`Searcher`] from the provided configuration.
    pub fn new(mut cfg: SearchConfig) -> Self {
        let evaluate = cfg
            .evaluate
            .take()
            .unwrap_or_else(|| Weights::default().evaluator());

        Self {
            constants: Constants::new(cfg.size),
            evaluate,
            table: TTable::default(),
            rng: StdRng::seed_from_u64(0),
            stats: SearchStats::default(),
            cfg,
        }
    }

    /// Searches `p` and returns the best move found.
    pub fn get_move(&mut self, p: &Position, limit: Duration) -> Result<Move> {
        let (pv, _, _) = self.analyze(p, limit)?;
        pv.into_iter()
            .next()
            .context("search produced an empty principal variation")
    }

    /// Searches `p` by iterative deepening and returns the principal
    /// variation, its value, and the stats of the deepest iteration.
    ///
    /// `limit` bounds wall-clock time via estimation: an iteration is only
    /// started if the projected cost of completing it fits. A running
    /// iteration is never interrupted, so the PV is always coherent.
    /// A zero `limit` disables the estimator and searches to `cfg.depth`.
    pub fn analyze(
        &mut self,
        p: &Position,
        limit: Duration,
    ) -> Result<(Vec<Move>, Score, SearchStats)> {
        ensure!(
            self.cfg.size == p.size(),
            "searcher configured for size {} but position has size {}",
            self.cfg.size,
            p.size()
        );

        let mut seed = self.cfg.seed;
        if seed == 0 {
            seed = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default()
                .as_secs() as i64;
        }
        self.rng = StdRng::seed_from_u64(seed as u64);
        if self.cfg.debug > 0 {
            debug!("seed={seed}");
        }

        let mut pv: Vec<Move> = Vec::new();
        let mut value = Score::ZERO;
        let mut base = 0u16;

        // Seed from the table: a previous exact result is a head start, and
        // later iterations only search beyond its depth. The cap guarantees
        // at least one iteration runs even on a fully-warm table.
        if let Some(te) = self.table.get(p.hash()) {
            if te.bound == Bound::Exact {
                base = te.depth.min(self.cfg.depth.saturating_sub(1));
                pv = te.pv.clone();
            }
        }

        let top = Instant::now();
        let mut prev_eval = 0u64;
        let mut branch_sum = 0u64;

        let mut i = 0u16;
        while i + base < self.cfg.depth {
            i += 1;

            self.stats = SearchStats {
                depth: i + base,
                ..Default::default()
            };
            let start = Instant::now();

            let (new_pv, v) = self.minimax(p, 0, i + base, &pv, Score::ALPHA, Score::BETA)?;
            pv = new_pv;
            value = v;

            let time_used = top.elapsed();
            let time_move = start.elapsed();

            if self.cfg.debug > 0 {
                debug!(
                    "deepen: depth={} val={} pv={} time={:.2?} total={:.2?} evaluated={} tt={} branch={}",
                    i + base,
                    value,
                    format_pv(&pv),
                    time_move,
                    time_used,
                    self.stats.evaluated,
                    self.stats.tt_hits,
                    self.stats.evaluated / (prev_eval + 1),
                );
            }
            if self.cfg.debug > 1 {
                debug!(
                    " stats: visited={} evaluated={} terminal={} cut={} cut0={} cut1={} all={}",
                    self.stats.visited,
                    self.stats.evaluated,
                    self.stats.terminal,
                    self.stats.cut_nodes,
                    self.stats.cut_first,
                    self.stats.cut_second,
                    self.stats.all_nodes,
                );
            }

            if i > 1 {
                branch_sum += self.stats.evaluated / (prev_eval + 1);
            }
            prev_eval = self.stats.evaluated;

            if value.is_decided() {
                break;
            }

            if i + base != self.cfg.depth && !limit.is_zero() {
                let branch = if i > 2 {
                    branch_sum / (i as u64 - 1)
                } else {
                    tune::conservative_branch_factor!()
                };
                let estimate =
                    time_used + time_move.saturating_mul(branch.min(u32::MAX as u64) as u32);
                if estimate > limit {
                    if self.cfg.debug > 0 {
                        debug!(
                            "time cutoff: depth={} used={:.2?} estimate={:.2?}",
                            i + base,
                            time_used,
                            estimate
                        );
                    }
                    break;
                }
            }
        }

        Ok((pv, value, self.stats))
    }

    /// Negamax alpha-beta with null-window re-search, fail-soft.
    ///
    /// `pv` is the continuation of the parent's best line, used purely as
    /// an ordering hint. Returns this node's best line and its value from
    /// the perspective of the side to move.
    fn minimax(
        &mut self,
        p: &Position,
        ply: u16,
        depth: u16,
        pv: &[Move],
        mut alpha: Score,
        beta: Score,
    ) -> Result<(Vec<Move>, Score)> {
        let (over, _) = p.game_over();
        if depth == 0 || over {
            self.stats.evaluated += 1;
            if over {
                self.stats.terminal += 1;
            }
            return Ok((Vec::new(), (self.evaluate)(&self.constants, p)));
        }

        self.stats.visited += 1;

        let te = match self.table.get(p.hash()).cloned() {
            Some(entry) => {
                let usable = (entry.depth >= depth
                    && (entry.bound == Bound::Exact
                        || (entry.bound == Bound::Upper && entry.value <= alpha)
                        || (entry.bound == Bound::Lower && entry.value >= beta)))
                    || (entry.bound == Bound::Exact && entry.value.is_decided());

                if usable {
                    if p.apply(&entry.best_move).is_ok() {
                        self.stats.tt_hits += 1;
                        return Ok((entry.pv, entry.value));
                    }
                    // The slot held a colliding position; its move list
                    // means nothing here, so drop it for ordering too
                    None
                } else {
                    Some(entry)
                }
            }
            None => None,
        };

        let mut moves = p.all_moves();
        self.stats.generated += moves.len() as u64;

        // Break ties between equal moves differently on every run
        if ply == 0 {
            moves.shuffle(&mut self.rng);
        }

        order_moves(&mut moves, pv, te.as_ref());

        let mut best: Vec<Move> = Vec::with_capacity(depth as usize + 1);
        best.extend_from_slice(pv);
        let mut improved = false;
        let mut children = 0u64;

        for m in &moves {
            let Ok(child) = p.apply(m) else {
                continue;
            };
            children += 1;

            let child_pv = if best.is_empty() { &[][..] } else { &best[1..] };

            let (ms, v) = if children > 1 {
                // Null-window probe first; re-search on a fail inside the window
                let (mut ms, mut v) =
                    self.minimax(&child, ply + 1, depth - 1, child_pv, -alpha - 1, -alpha)?;
                if -v > alpha && -v < beta {
                    (ms, v) = self.minimax(&child, ply + 1, depth - 1, child_pv, -beta, -alpha)?;
                }
                (ms, v)
            } else {
                self.minimax(&child, ply + 1, depth - 1, child_pv, -beta, -alpha)?
            };
            let v = -v;

            if self.cfg.debug > 2 && ply == 0 {
                trace!(
                    "search: depth={depth} m={m} window=({alpha},{beta}) v={v} ms={}",
                    format_pv(&ms)
                );
            }

            if best.is_empty() {
                best.push(m.clone());
                best.extend_from_slice(&ms);
            }
            if v > alpha {
                improved = true;
                best.clear();
                best.push(m.clone());
                best.extend_from_slice(&ms);
                alpha = v;
                if alpha >= beta {
                    self.stats.cut_nodes += 1;
                    match children {
                        1 => self.stats.cut_first += 1,
                        2 => self.stats.cut_second += 1,
                        _ => self.stats.cut_search += children + 1,
                    }
                    break;
                }
            }
        }

        if best.is_empty() {
            bail!("no legal moves in a position reported as non-terminal (ply {ply})");
        }

        let bound = if !improved {
            self.stats.all_nodes += 1;
            Bound::Upper
        } else if alpha >= beta {
            Bound::Lower
        } else {
            Bound::Exact
        };

        self.table.store(TTableEntry {
            hash: p.hash(),
            depth,
            value: alpha,
            bound,
            best_move: best[0].clone(),
            pv: best.clone(),
        });

        Ok((best, alpha))
    }
}

/// Reorder `moves` in place, in a single pass over the front of the list.
///
/// Preference order: the PV continuation, then the table's best move, then
/// moves landing on the PV move's square. A slide PV move short-circuits
/// the remaining reordering.
fn order_moves(moves: &mut [Move], pv: &[Move], te: Option<&TTableEntry>) {
    let mut sorted = 0;

    if let Some(first) = pv.first() {
        if let Some(i) = moves.iter().position(|m| m == first) {
            moves.swap(0, i);
            sorted = 1;
            if first.kind.is_slide() {
                return;
            }
        }
    }

    if let Some(te) = te {
        if let Some(i) = moves[sorted..].iter().position(|m| *m == te.best_move) {
            moves.swap(sorted, sorted + i);
            sorted += 1;
        }
    }

    if let Some(first) = pv.first() {
        for j in sorted..moves.len() {
            if moves[j].x == first.x && moves[j].y == first.y {
                moves.swap(sorted, j);
                sorted += 1;
            }
        }
    }
}

/// Formats a move sequence for diagnostics.
fn format_pv(ms: &[Move]) -> String {
    let mut out = String::from("[");
    for (i, m) in ms.iter().enumerate() {
        if i != 0 {
            out.push(' ');
        }
        out.push_str(&m.to_string());
    }
    out.push(']');
    out
}
