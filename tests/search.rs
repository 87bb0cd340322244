/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::time::Duration;

use cairn::{evaluate, Move, Position, Score, SearchConfig, Searcher, Weights};

fn mv(s: &str) -> Move {
    s.parse().unwrap()
}

fn searcher(size: u8, depth: u16, seed: i64) -> Searcher {
    Searcher::new(SearchConfig {
        size,
        depth,
        seed,
        ..Default::default()
    })
}

/// The position after the conventional `a1 e5` opening on a 5x5 board.
fn opening() -> Position {
    Position::new(5)
        .apply(&mv("a1"))
        .unwrap()
        .apply(&mv("e5"))
        .unwrap()
}

#[test]
fn analyze_opening() {
    let p = opening();
    let (pv, value, stats) = searcher(5, 3, 1).analyze(&p, Duration::ZERO).unwrap();

    // A legal move with an undecided, in-range value
    assert!(!pv.is_empty());
    assert!(p.apply(&pv[0]).is_ok(), "pv[0] = {} is illegal", pv[0]);
    assert!(!value.is_decided(), "opening value was {value:?}");
    assert!(value >= Score::MIN && value <= Score::MAX);
    assert_eq!(stats.depth, 3);
}

#[test]
fn finds_road_in_one() {
    // White completes the bottom row with a single placement
    let p = Position::from_tps("x5/x5/x5/x5/1,1,1,1,x 1 5").unwrap();
    let (pv, value, _) = searcher(5, 1, 1).analyze(&p, Duration::ZERO).unwrap();

    assert!(value > Score::WIN, "value was {value:?}");
    assert_eq!((pv[0].x, pv[0].y), (4, 0));
    assert!(!pv[0].kind.is_slide());

    let child = p.apply(&pv[0]).unwrap();
    assert!(child.game_over().0);
}

#[test]
fn finds_road_in_two() {
    // White's d2 creates two completion squares (e2 for the second row,
    // d1 for the d column); Black can block only one of them
    let p = Position::from_tps("2,2,x,1,2/2,2,x,1,2/x3,1,x/1,1,1,x2/x5 1 7").unwrap();
    let (pv, value, _) = searcher(5, 3, 1).analyze(&p, Duration::ZERO).unwrap();

    assert!(value > Score::WIN, "value was {value:?}");
    assert!(pv.len() >= 3, "PV was {pv:?}");

    // The first move must not finish the game on its own
    let child = p.apply(&pv[0]).unwrap();
    assert!(!child.game_over().0, "{} ended the game immediately", pv[0]);
}

#[test]
fn regression_tps_returns_legal_move() {
    let p = Position::from_tps("2,x4/x2,2,x2/x,2,2,x2/x2,12,2,1/1,1,21,2,1 1 9").unwrap();
    let m = searcher(5, 3, 1).get_move(&p, Duration::ZERO).unwrap();
    assert!(p.apply(&m).is_ok(), "search returned illegal move {m}");
}

#[test]
fn mirrored_position_searches_identically() {
    // Swapping every stone's color together with the side to move hands
    // the mover the same game, so values and lines must match exactly
    let p = Position::from_tps("x4,1/x5/x5/x5/2,x4 1 2").unwrap();
    let mirror = Position::from_tps("x4,2/x5/x5/x5/1,x4 2 2").unwrap();

    let (pv_a, value_a, _) = searcher(5, 3, 9).analyze(&p, Duration::ZERO).unwrap();
    let (pv_b, value_b, _) = searcher(5, 3, 9).analyze(&mirror, Duration::ZERO).unwrap();

    assert_eq!(value_a, value_b);
    assert_eq!(pv_a, pv_b);
}

#[test]
fn warm_table_repeats_the_cold_answer() {
    let p = opening();
    let mut searcher = searcher(5, 4, 1);

    let (cold_pv, cold_value, cold_stats) = searcher.analyze(&p, Duration::ZERO).unwrap();
    let (warm_pv, warm_value, warm_stats) = searcher.analyze(&p, Duration::ZERO).unwrap();

    assert_eq!(warm_value, cold_value);
    assert_eq!(warm_pv.len(), cold_pv.len());
    assert!(warm_stats.tt_hits > 0, "warm stats: {warm_stats:?}");
    assert_eq!(warm_stats.depth, cold_stats.depth);
}

#[test]
fn fixed_seed_reproduces_results() {
    let p = opening();

    let (pv_a, value_a, _) = searcher(5, 3, 7).analyze(&p, Duration::ZERO).unwrap();
    let (pv_b, value_b, _) = searcher(5, 3, 7).analyze(&p, Duration::ZERO).unwrap();

    assert_eq!(pv_a, pv_b);
    assert_eq!(value_a, value_b);
}

#[test]
fn pv_replays_from_the_root() {
    let p = Position::from_tps("2,x4/x2,2,x2/x,2,2,x2/x2,12,2,1/1,1,21,2,1 1 9").unwrap();
    let (pv, _, _) = searcher(5, 3, 1).analyze(&p, Duration::ZERO).unwrap();

    let mut current = p;
    for m in &pv {
        current = current
            .apply(m)
            .unwrap_or_else(|e| panic!("PV move {m} is illegal: {e}"));
    }
}

/// Plain full-width negamax with no table, no windows, and no ordering.
fn negamax_reference(p: &Position, depth: u16, w: &Weights) -> Score {
    let (over, _) = p.game_over();
    if depth == 0 || over {
        return evaluate(w, p.constants(), p);
    }

    let mut best = Score::ALPHA;
    for m in p.all_moves() {
        let Ok(child) = p.apply(&m) else {
            continue;
        };
        let v = -negamax_reference(&child, depth - 1, w);
        if v > best {
            best = v;
        }
    }
    best
}

#[test]
fn pvs_matches_plain_negamax() {
    // Null-window re-searching and TT cutoffs are optimizations; the root
    // value must be exactly the minimax value
    let p = opening();
    let expected = negamax_reference(&p, 2, &Weights::default());

    let (_, value, _) = searcher(5, 2, 3).analyze(&p, Duration::ZERO).unwrap();
    assert_eq!(value, expected);
}

#[test]
fn time_limit_stops_deepening_without_error() {
    let p = opening();
    let mut searcher = searcher(5, 30, 1);

    // One nanosecond on the clock: the first iteration completes (iterations
    // are never interrupted), and the estimator stops everything after it
    let (pv, _, stats) = searcher.analyze(&p, Duration::from_nanos(1)).unwrap();
    assert!(!pv.is_empty());
    assert!(stats.depth < 30);
}
