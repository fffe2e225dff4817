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

use guard_grid_logic::{Grid, GridError, Position};
use serde::Serialize;

use crate::patrol::{simulate, SimulationResult};
use crate::search::{search_from_baseline, SearchConfig};

/// The two answers, plus the placements behind the second one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatrolReport {
    /// Distinct cells the guard stands on during the unmodified patrol.
    pub distinct_positions: usize,

    /// Whether the unmodified patrol already loops.
    pub baseline_looped: bool,

    /// How many single obstacles would trap the guard.
    pub loop_inducing_placements: usize,

    /// Where those obstacles would go, row-major.
    pub placements: Vec<Position>,
}

impl PatrolReport {
    pub fn new(baseline: &SimulationResult, placements: Vec<Position>) -> Self {
        Self {
            distinct_positions: baseline.distinct_positions(),
            baseline_looped: baseline.loop_detected(),
            loop_inducing_placements: placements.len(),
            placements,
        }
    }
}

impl std::fmt::Display for PatrolReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "Distinct positions in simulated guard path: {}, infinite loop: {}",
            self.distinct_positions, self.baseline_looped
        )?;
        write!(
            f,
            "Loop-causing obstruction options: {}",
            self.loop_inducing_placements
        )
    }
}

/// Run the baseline patrol once, then search for loop-inducing placements from it.
pub fn analyze(grid: &mut Grid, config: &SearchConfig) -> Result<PatrolReport, GridError> {
    let baseline = simulate(&*grid);
    let placements = search_from_baseline(grid, &baseline, config)?;
    Ok(PatrolReport::new(&baseline, placements))
}
