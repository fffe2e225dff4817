/*
 * Copyright (C) 2023 Asim Ihsan
 * SPDX-License-Identifier: AGPL-3.0-only
 *
 * This program is free software: you can redistribute it and/or modify it under
 * the terms of the GNU Affero General Public License as published by the Free
 * Software Foundation, version 3.
 *
 * This program is distributed in the hope that it will be useful, but WITHOUT ANY
 * WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A
 * PARTICULAR PURPOSE. See the GNU Affero General Public License for more details.
 *
 * You should have received a copy of the GNU Affero General Public License along
 * with this program. If not, see <https://www.gnu.org/licenses/>
 */

mod logging;

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use guard_grid_logic::{CellLookup, Grid};
use guard_patrol::{analyze, PatrolReport, SearchConfig, SearchStrategy};

#[derive(Parser, Debug)]
#[command(
    name = "guard-patrol",
    version,
    about = "Walk a guard around a lab map and find where one more obstacle traps it in a loop"
)]
struct Cli {
    /// Map file, or `-` to read standard input.
    input: PathBuf,

    /// How to try the candidate obstacle placements.
    #[arg(short, long, value_enum, default_value_t = Strategy::Sequential)]
    strategy: Strategy,

    /// Also print every loop-inducing position as `row,col`, one per line.
    #[arg(short, long)]
    list_placements: bool,

    /// Print the report as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Strategy {
    /// Toggle one cell at a time in place.
    Sequential,
    /// Check candidates on all cores.
    Parallel,
}

impl From<Strategy> for SearchStrategy {
    fn from(strategy: Strategy) -> Self {
        match strategy {
            Strategy::Sequential => SearchStrategy::Sequential,
            Strategy::Parallel => SearchStrategy::Parallel,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    logging::init();

    if let Err(err) = run(&cli) {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let text = read_input(&cli.input)?;
    let report = solve(&text, cli.strategy.into())?;
    println!("{}", render(&report, cli)?);
    Ok(())
}

fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("read map from stdin")?;
        return Ok(text);
    }
    std::fs::read_to_string(path).with_context(|| format!("read map from {}", path.display()))
}

fn solve(text: &str, strategy: SearchStrategy) -> Result<PatrolReport> {
    let mut grid: Grid = text.parse().context("parse map")?;
    tracing::info!(
        height = grid.height(),
        width = grid.width(),
        start = %grid.start().position,
        "map loaded"
    );

    let config = SearchConfig { strategy };
    let report = analyze(&mut grid, &config).context("search for loop-inducing placements")?;
    Ok(report)
}

fn render(report: &PatrolReport, cli: &Cli) -> Result<String> {
    if cli.json {
        return serde_json::to_string_pretty(report).context("serialize report");
    }

    let mut out = report.to_string();
    if cli.list_placements {
        for position in &report.placements {
            out.push_str(&format!("\n{},{}", position.row, position.col));
        }
    }
    Ok(out)
}
