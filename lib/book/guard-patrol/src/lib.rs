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

// PEAS - Performance, Environment, Action, Sensing
//
// A guard is a simple reflex agent: it only sees the cell in front of it. The environment
// is the lab map. Because both are deterministic, the whole run is a walk through a finite
// state space, and seeing a state twice means the walk never ends.

pub mod patrol;
pub mod report;
pub mod search;
#[cfg(test)]
mod test_support;

pub use patrol::{simulate, GuardAgent, PatrolEnvironment, PatrolOutcome, SimulationResult};
pub use report::{analyze, PatrolReport};
pub use search::{find_loop_inducing_placements, SearchConfig, SearchStrategy};

pub type HashSet<T> = rustc_hash::FxHashSet<T>;

/// An Agent acts in a Performance, Environment, Action, Sensing (PEAS) cycle.
/// For a given Perception, the Agent will return an Action.
///
/// Notice that the Agent is not aware of an Environment, it's only interface
/// is the Perception coming in then the Action going out.
pub trait Agent {
    type Action;
    type Percept;

    fn act(&mut self, percept: &Self::Percept) -> Self::Action;
}

/// An Environment runs a single Agent in a Performance, Environment, Action, Sensing (PEAS) cycle.
///
/// Notice that the Environment is not aware of an Agent.
pub trait Environment {
    type Action;
    type Percept;

    /// Everything that determines what happens next. Two equal states must lead to the same
    /// future, otherwise cycle detection is unsound.
    type State: Copy + Eq + std::hash::Hash;

    fn percept(&self) -> Self::Percept;
    fn execute_action(&mut self, action: &Self::Action);
    fn state(&self) -> Self::State;

    /// True once the Agent has left the Environment. No further actions are executed.
    fn is_terminal(&self) -> bool;
}

/// Why a Simulation stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Termination {
    /// The Environment reached a terminal state.
    Terminal,

    /// A state was about to be visited a second time.
    Cycle,
}

/// Every state seen during one Simulation, how many actions were executed, and why it
/// stopped.
#[derive(Debug, Clone)]
pub struct Run<_State> {
    pub visited: HashSet<_State>,
    pub steps: usize,
    pub termination: Termination,
}

/// A Simulation runs a single Agent until the Environment is terminal or a state repeats.
///
/// The Simulation is aware of both the Environment and the single Agent. Notice that the Agent's
/// generic Action and Percept come from the Environment. The Agent still does not need to know that
/// the Environment exists, but the Agent definitely needs the Environment's Action and Percept
/// types.
///
/// `max_steps` must be at least the number of distinct states the Environment can be in. A run
/// that executes more actions than that has broken that promise and panics.
pub struct Simulation<_Environment, _Agent>
where
    _Environment: Environment,
    _Agent: Agent<Action = _Environment::Action, Percept = _Environment::Percept>,
{
    environment: _Environment,
    agent: _Agent,
    max_steps: usize,
}

impl<_Environment, _Agent> Simulation<_Environment, _Agent>
where
    _Environment: Environment,
    _Agent: Agent<Action = _Environment::Action, Percept = _Environment::Percept>,
{
    pub fn new(environment: _Environment, agent: _Agent, max_steps: usize) -> Self {
        Self {
            environment,
            agent,
            max_steps,
        }
    }

    pub fn run(mut self) -> Run<_Environment::State> {
        let mut visited = HashSet::default();
        let mut steps = 0;
        loop {
            // check before acting, so every distinct state is recorded exactly once.
            if !visited.insert(self.environment.state()) {
                return Run {
                    visited,
                    steps,
                    termination: Termination::Cycle,
                };
            }

            let percept = self.environment.percept();
            let action = self.agent.act(&percept);
            self.environment.execute_action(&action);
            if self.environment.is_terminal() {
                return Run {
                    visited,
                    steps,
                    termination: Termination::Terminal,
                };
            }

            steps += 1;
            if steps > self.max_steps {
                panic!(
                    "simulation executed {} steps but only {} states were declared",
                    steps, self.max_steps
                );
            }
        }
    }
}
