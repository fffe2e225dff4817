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

use guard_grid_logic::{Cell, CellLookup, Heading, Pose, Position};
use serde::Serialize;

use crate::{Agent, Environment, HashSet, Simulation, Termination};

/// What the guard sees one step ahead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ahead {
    Open,
    Obstacle,
    /// The next step leaves the map.
    Edge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatrolAction {
    StepForward,
    TurnRight,
    Leave,
}

/// The guard's patrol protocol: walk forward until something is in the way, then turn right.
#[derive(Default)]
pub struct GuardAgent {}

impl GuardAgent {
    pub fn new() -> Self {
        Self {}
    }
}

impl Agent for GuardAgent {
    type Action = PatrolAction;
    type Percept = Ahead;

    fn act(&mut self, percept: &Self::Percept) -> Self::Action {
        match percept {
            Ahead::Open => PatrolAction::StepForward,
            Ahead::Obstacle => PatrolAction::TurnRight,
            Ahead::Edge => PatrolAction::Leave,
        }
    }
}

/// The lab as seen by one guard. Works over any [`CellLookup`], so the same patrol runs on a
/// plain grid, an in-place obstructed grid, or an overlay.
pub struct PatrolEnvironment<'a, G: CellLookup> {
    grid: &'a G,
    pose: Pose,
    exited: bool,
}

impl<'a, G: CellLookup> PatrolEnvironment<'a, G> {
    pub fn new(grid: &'a G) -> Self {
        Self {
            grid,
            pose: grid.start(),
            exited: false,
        }
    }

    pub fn pose(&self) -> Pose {
        self.pose
    }
}

impl<G: CellLookup> Environment for PatrolEnvironment<'_, G> {
    type Action = PatrolAction;
    type Percept = Ahead;
    type State = Pose;

    fn percept(&self) -> Self::Percept {
        let ahead = self
            .pose
            .position
            .forward(self.pose.heading)
            .and_then(|position| self.grid.cell_at(position));
        match ahead {
            Some(Cell::Open) => Ahead::Open,
            Some(Cell::Obstacle) => Ahead::Obstacle,
            None => Ahead::Edge,
        }
    }

    fn execute_action(&mut self, action: &Self::Action) {
        match action {
            PatrolAction::StepForward => {
                if let Some(next) = self.pose.position.forward(self.pose.heading) {
                    self.pose.position = next;
                }
            }
            PatrolAction::TurnRight => {
                self.pose.heading = self.pose.heading.turned_right();
            }
            PatrolAction::Leave => {
                self.exited = true;
            }
        }
    }

    fn state(&self) -> Self::State {
        self.pose
    }

    fn is_terminal(&self) -> bool {
        self.exited
    }
}

/// How a patrol ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PatrolOutcome {
    /// The guard walked off the map.
    Exited,

    /// The guard came back to a position it had already stood on, facing the same way.
    Looped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationResult {
    /// Every cell the guard stood on, whatever way it was facing.
    pub visited_positions: HashSet<Position>,
    pub outcome: PatrolOutcome,
    /// Turns plus forward steps. Never more than `4 * height * width`.
    pub transitions: usize,
}

impl SimulationResult {
    pub fn loop_detected(&self) -> bool {
        self.outcome == PatrolOutcome::Looped
    }

    pub fn distinct_positions(&self) -> usize {
        self.visited_positions.len()
    }
}

/// Upper bound on transitions: one per (position, heading) pair.
pub fn step_limit<G: CellLookup>(grid: &G) -> usize {
    Heading::CLOCKWISE.len() * grid.height() * grid.width()
}

/// Walk the guard from the grid's start pose until it leaves the map or repeats a pose.
pub fn simulate<G: CellLookup>(grid: &G) -> SimulationResult {
    let simulation = Simulation::new(
        PatrolEnvironment::new(grid),
        GuardAgent::new(),
        step_limit(grid),
    );
    let run = simulation.run();

    let outcome = match run.termination {
        Termination::Terminal => PatrolOutcome::Exited,
        Termination::Cycle => PatrolOutcome::Looped,
    };
    let visited_positions: HashSet<Position> =
        run.visited.iter().map(|pose| pose.position).collect();
    tracing::debug!(
        ?outcome,
        transitions = run.steps,
        distinct_positions = visited_positions.len(),
        "patrol finished"
    );

    SimulationResult {
        visited_positions,
        outcome,
        transitions: run.steps,
    }
}
