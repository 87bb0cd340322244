/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::time::Duration;

use anyhow::Result;
use cairn::{Position, SearchConfig, Searcher};
use clap::Parser;

/// Analyze a Tak position.
#[derive(Debug, Parser)]
#[command(about, version)]
struct Cli {
    /// Position to analyze, in TPS. Defaults to an empty board.
    #[arg(short, long)]
    tps: Option<String>,

    /// Board size when no TPS is given.
    #[arg(short, long, default_value = "5")]
    size: u8,

    /// Maximum search depth.
    #[arg(short, long, default_value = "6")]
    depth: u16,

    /// Time limit in milliseconds; 0 searches to full depth.
    #[arg(short, long, default_value = "0")]
    limit: u64,

    /// PRNG seed; 0 seeds from the wall clock.
    #[arg(long, default_value = "0")]
    seed: i64,

    /// Diagnostic verbosity, 0 to 3.
    #[arg(long, default_value = "0")]
    debug: u8,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();

    let cli = Cli::parse();

    let position = match &cli.tps {
        Some(tps) => Position::from_tps(tps)?,
        None => Position::new(cli.size),
    };

    let mut searcher = Searcher::new(SearchConfig {
        size: position.size(),
        depth: cli.depth,
        seed: cli.seed,
        debug: cli.debug,
        evaluate: None,
    });

    let (pv, value, stats) = searcher.analyze(&position, Duration::from_millis(cli.limit))?;

    println!("position: {position}");
    print!("pv:");
    for m in &pv {
        print!(" {m}");
    }
    println!();
    println!("value: {value}");
    println!(
        "depth {}: visited={} evaluated={} generated={} tt_hits={} cuts={}",
        stats.depth, stats.visited, stats.evaluated, stats.generated, stats.tt_hits, stats.cut_nodes,
    );

    Ok(())
}
