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

//! Brute-force search for obstacle placements that trap the guard.
//!
//! Only cells on the guard's unmodified path can change that path, so those are the only
//! candidates. Each candidate is still checked with a full patrol.

use guard_grid_logic::{Cell, CellLookup, Grid, GridError, Position};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::patrol::{simulate, SimulationResult};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SearchStrategy {
    /// One candidate at a time, toggling the cell in place and restoring it afterwards.
    #[default]
    Sequential,

    /// One rayon task per candidate, each over its own overlay of the grid.
    Parallel,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    pub strategy: SearchStrategy,
}

/// Cells worth obstructing: on the baseline path, not the start cell, not already an
/// obstacle. Row-major order.
pub fn candidate_positions<G: CellLookup>(grid: &G, baseline: &SimulationResult) -> Vec<Position> {
    let start = grid.start().position;
    let mut candidates: Vec<Position> = baseline
        .visited_positions
        .iter()
        .copied()
        .filter(|&position| position != start && grid.cell_at(position) == Some(Cell::Open))
        .collect();
    candidates.sort_unstable();
    candidates
}

/// Every single-cell obstacle placement that makes the guard loop, in row-major order. The
/// grid is the same before and after the call.
pub fn find_loop_inducing_placements(
    grid: &mut Grid,
    config: &SearchConfig,
) -> Result<Vec<Position>, GridError> {
    let baseline = simulate(&*grid);
    search_from_baseline(grid, &baseline, config)
}

/// `baseline` must come from `grid` before any obstacle was placed.
pub(crate) fn search_from_baseline(
    grid: &mut Grid,
    baseline: &SimulationResult,
    config: &SearchConfig,
) -> Result<Vec<Position>, GridError> {
    let candidates = candidate_positions(&*grid, baseline);
    let mut placements = match config.strategy {
        SearchStrategy::Sequential => search_sequential(grid, &candidates)?,
        SearchStrategy::Parallel => search_parallel(grid, &candidates)?,
    };
    placements.sort_unstable();

    tracing::info!(
        strategy = ?config.strategy,
        candidates = candidates.len(),
        placements = placements.len(),
        "loop search finished"
    );
    Ok(placements)
}

fn search_sequential(grid: &mut Grid, candidates: &[Position]) -> Result<Vec<Position>, GridError> {
    let mut placements = Vec::new();
    for &candidate in candidates {
        // restored when `obstructed` drops at the end of the iteration.
        let obstructed = grid.place_obstacle(candidate)?;
        if simulate(&*obstructed).loop_detected() {
            placements.push(candidate);
        }
    }
    Ok(placements)
}

fn search_parallel(grid: &Grid, candidates: &[Position]) -> Result<Vec<Position>, GridError> {
    candidates
        .par_iter()
        .filter_map(|&candidate| match grid.with_obstacle(candidate) {
            Ok(view) => simulate(&view).loop_detected().then_some(Ok(candidate)),
            Err(e) => Some(Err(e)),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::test_support::{any_grid, parse, TEXTBOOK};

    fn sequential() -> SearchConfig {
        SearchConfig {
            strategy: SearchStrategy::Sequential,
        }
    }

    fn parallel() -> SearchConfig {
        SearchConfig {
            strategy: SearchStrategy::Parallel,
        }
    }

    #[test]
    fn test_default_strategy_is_sequential() {
        assert_eq!(SearchConfig::default().strategy, SearchStrategy::Sequential);
    }

    #[test]
    fn test_textbook_has_six_loop_placements() {
        let expected = [
            Position::new(6, 3),
            Position::new(7, 6),
            Position::new(7, 7),
            Position::new(8, 1),
            Position::new(8, 3),
            Position::new(9, 7),
        ];
        for config in [sequential(), parallel()] {
            let mut grid = parse(TEXTBOOK);
            let placements =
                find_loop_inducing_placements(&mut grid, &config).expect("search failed");
            assert_eq!(placements, expected, "strategy: {:?}", config.strategy);
        }
    }

    #[test]
    fn test_single_cell_grid_has_no_candidates() {
        let mut grid = parse("^");
        let baseline = simulate(&grid);
        assert!(candidate_positions(&grid, &baseline).is_empty());
        let placements =
            find_loop_inducing_placements(&mut grid, &sequential()).expect("search failed");
        assert!(placements.is_empty());
    }

    #[test]
    fn test_candidates_skip_start_cell() {
        let grid = parse(">...");
        let baseline = simulate(&grid);
        assert_eq!(
            candidate_positions(&grid, &baseline),
            [Position::new(0, 1), Position::new(0, 2), Position::new(0, 3)]
        );
    }

    #[test]
    fn test_placement_that_boxes_in_start_counts() {
        // the only candidate is the cell above the guard; blocking it walls the guard in.
        let mut grid = parse("...\n#^#\n.#.");
        let placements =
            find_loop_inducing_placements(&mut grid, &sequential()).expect("search failed");
        assert_eq!(placements, [Position::new(0, 1)]);
    }

    #[test]
    fn test_already_looping_grid_is_searched_too() {
        let mut grid = parse("####\n#^.#\n#..#\n####");
        let placements =
            find_loop_inducing_placements(&mut grid, &sequential()).expect("search failed");
        // any interior obstacle still leaves the guard walled in.
        assert_eq!(
            placements,
            [Position::new(1, 2), Position::new(2, 1), Position::new(2, 2)]
        );
    }

    proptest! {
        #[test]
        fn test_placements_lie_on_baseline_path(grid in any_grid()) {
            let baseline = simulate(&grid);
            let mut grid = grid;
            let placements = find_loop_inducing_placements(&mut grid, &sequential())
                .expect("search failed");
            for placement in &placements {
                prop_assert!(baseline.visited_positions.contains(placement));
            }
        }

        #[test]
        fn test_placements_exclude_start_and_obstacles(grid in any_grid()) {
            let mut grid = grid;
            let placements = find_loop_inducing_placements(&mut grid, &sequential())
                .expect("search failed");
            for placement in &placements {
                prop_assert_ne!(*placement, grid.start().position);
                prop_assert_eq!(grid.cell_at(*placement), Some(Cell::Open));
            }
        }

        #[test]
        fn test_sequential_search_restores_grid(grid in any_grid()) {
            let before = grid.clone();
            let mut grid = grid;
            find_loop_inducing_placements(&mut grid, &sequential()).expect("search failed");
            prop_assert_eq!(grid, before);
        }

        #[test]
        fn test_strategies_agree(grid in any_grid()) {
            let mut grid = grid;
            let one = find_loop_inducing_placements(&mut grid, &sequential())
                .expect("search failed");
            let many = find_loop_inducing_placements(&mut grid, &parallel())
                .expect("search failed");
            prop_assert_eq!(one, many);
        }

        #[test]
        fn test_every_placement_really_loops(grid in any_grid()) {
            let mut grid = grid;
            let placements = find_loop_inducing_placements(&mut grid, &parallel())
                .expect("search failed");
            for placement in placements {
                let view = grid.with_obstacle(placement).expect("in bounds");
                prop_assert!(simulate(&view).loop_detected());
            }
        }
    }
}
