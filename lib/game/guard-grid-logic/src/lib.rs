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

#![warn(missing_docs)]

//! Guard patrol grid logic.
//!
//! This is a library for the lab map a guard patrols: open floor, obstacles, and the
//! single cell where the guard starts together with the way it is facing. It is intended
//! to be used by a simulation that walks the guard around the map.

use std::ops::Deref;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Grid error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    /// A row does not have the same length as the first row.
    #[error("row {row} has length {found}, expected {expected}")]
    MalformedGrid {
        /// Zero-indexed row that broke the rectangle.
        row: usize,
        /// Length of the first row.
        expected: usize,
        /// Length of the offending row.
        found: usize,
    },

    /// No guard glyph (`^`, `<`, `v` or `>`) anywhere in the input.
    #[error("no guard found, expected one of '^', '<', 'v', '>'")]
    MissingAgent,

    /// More than one guard glyph in the input.
    #[error("found a second guard at {second}, first guard is at {first}")]
    MultipleAgents {
        /// Where the first guard was found.
        first: Position,
        /// Where the second guard was found.
        second: Position,
    },

    /// A character that is neither floor, obstacle nor guard.
    #[error("unrecognized cell {glyph:?} at {position}")]
    UnrecognizedCell {
        /// Where the character was found.
        position: Position,
        /// The character itself.
        glyph: char,
    },

    /// Position is not inside the grid.
    #[error("position {position} is outside the {height}x{width} grid")]
    OutOfBounds {
        /// The requested position.
        position: Position,
        /// Height of the grid.
        height: usize,
        /// Width of the grid.
        width: usize,
    },
}

/// Grid cell. Part of the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    /// Open floor, the guard walks over it.
    Open,

    /// Obstacle, the guard turns right in front of it.
    Obstacle,
}

/// The way the guard is facing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Heading {
    /// Facing row 0.
    Up,

    /// Facing column 0.
    Left,

    /// Facing the last row.
    Down,

    /// Facing the last column.
    Right,
}

impl Heading {
    /// All headings, in the order the guard meets them when turning right from `Up`.
    pub const CLOCKWISE: [Heading; 4] = [Heading::Up, Heading::Right, Heading::Down, Heading::Left];

    /// The heading after a 90 degree clockwise turn.
    pub fn turned_right(self) -> Self {
        match self {
            Heading::Up => Heading::Right,
            Heading::Right => Heading::Down,
            Heading::Down => Heading::Left,
            Heading::Left => Heading::Up,
        }
    }

    /// Map an input glyph to a heading, if it is a guard glyph.
    pub fn from_glyph(glyph: char) -> Option<Self> {
        match glyph {
            '^' => Some(Heading::Up),
            '<' => Some(Heading::Left),
            'v' => Some(Heading::Down),
            '>' => Some(Heading::Right),
            _ => None,
        }
    }

    /// The glyph used to draw a guard with this heading.
    pub fn glyph(self) -> char {
        match self {
            Heading::Up => '^',
            Heading::Left => '<',
            Heading::Down => 'v',
            Heading::Right => '>',
        }
    }
}

/// Zero-indexed row and column of a cell.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Position {
    /// Row, 0 is the top row.
    pub row: usize,

    /// Column, 0 is the leftmost column.
    pub col: usize,
}

impl Position {
    /// Create a new position.
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// The neighbouring position one step along `heading`. Returns None when that would
    /// leave row 0 or column 0. The far edges are checked by the grid, not here.
    pub fn forward(self, heading: Heading) -> Option<Self> {
        match heading {
            Heading::Up => self.row.checked_sub(1).map(|row| Self::new(row, self.col)),
            Heading::Left => self.col.checked_sub(1).map(|col| Self::new(self.row, col)),
            Heading::Down => Some(Self::new(self.row + 1, self.col)),
            Heading::Right => Some(Self::new(self.row, self.col + 1)),
        }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Position and heading. This is the complete state of the guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pose {
    /// Where the guard stands.
    pub position: Position,

    /// Where the guard is facing.
    pub heading: Heading,
}

impl Pose {
    /// Create a new pose.
    pub fn new(position: Position, heading: Heading) -> Self {
        Self { position, heading }
    }
}

/// Read-only, bounds-checked view of a map. Implemented by [`Grid`] and by the overlay
/// [`ObstructedGrid`], so a simulation can run over either.
pub trait CellLookup {
    /// Number of rows.
    fn height(&self) -> usize;

    /// Number of columns.
    fn width(&self) -> usize;

    /// Where the guard starts and the way it faces.
    fn start(&self) -> Pose;

    /// The cell at `position`, or None when the position is outside the map. Leaving the
    /// map is how a patrol ends, so None is not an error.
    fn cell_at(&self, position: Position) -> Option<Cell>;
}

/// Lab map. Cells are stored row-major; every row has the same width. Only built by
/// [`parse`], so there is always exactly one start pose.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Grid {
    cells: Vec<Cell>,
    width: usize,
    height: usize,
    start: Pose,
}

// print the map back in input form, with the guard drawn at its start cell.
impl std::fmt::Display for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut s = String::with_capacity((self.width + 1) * self.height);
        for row in 0..self.height {
            for col in 0..self.width {
                let position = Position::new(row, col);
                let c = if position == self.start.position {
                    self.start.heading.glyph()
                } else {
                    match self.cells[self.index(position)] {
                        Cell::Open => '.',
                        Cell::Obstacle => '#',
                    }
                };
                s.push(c);
            }
            if row < self.height - 1 {
                s.push('\n');
            }
        }
        write!(f, "{}", s)
    }
}

impl FromStr for Grid {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

/// Parse a map. Each line is one row of `.` (open), `#` (obstacle) and exactly one guard
/// glyph. The guard's cell is open floor.
pub fn parse(text: &str) -> Result<Grid, GridError> {
    let mut cells = Vec::new();
    let mut width: Option<usize> = None;
    let mut height = 0;
    let mut start: Option<Pose> = None;

    for (row, line) in text.lines().enumerate() {
        let found = line.chars().count();
        let expected = *width.get_or_insert(found);
        if found != expected {
            return Err(GridError::MalformedGrid {
                row,
                expected,
                found,
            });
        }

        for (col, glyph) in line.chars().enumerate() {
            let position = Position::new(row, col);
            let cell = match glyph {
                '.' => Cell::Open,
                '#' => Cell::Obstacle,
                _ => {
                    let heading = Heading::from_glyph(glyph)
                        .ok_or(GridError::UnrecognizedCell { position, glyph })?;
                    if let Some(first) = start {
                        return Err(GridError::MultipleAgents {
                            first: first.position,
                            second: position,
                        });
                    }
                    start = Some(Pose::new(position, heading));
                    Cell::Open
                }
            };
            cells.push(cell);
        }
        height += 1;
    }

    let start = start.ok_or(GridError::MissingAgent)?;
    Ok(Grid {
        cells,
        width: width.unwrap_or(0),
        height,
        start,
    })
}

impl Grid {
    fn index(&self, position: Position) -> usize {
        position.row * self.width + position.col
    }

    fn contains(&self, position: Position) -> bool {
        position.row < self.height && position.col < self.width
    }

    fn check_bounds(&self, position: Position) -> Result<(), GridError> {
        if self.contains(position) {
            Ok(())
        } else {
            Err(GridError::OutOfBounds {
                position,
                height: self.height,
                width: self.width,
            })
        }
    }

    /// All positions, in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.height).flat_map(move |row| (0..self.width).map(move |col| Position::new(row, col)))
    }

    /// A view of this grid with one extra obstacle at `position`. The grid itself is not
    /// touched, so any number of views can be alive at once, e.g. one per worker thread.
    pub fn with_obstacle(&self, position: Position) -> Result<ObstructedGrid<'_>, GridError> {
        self.check_bounds(position)?;
        Ok(ObstructedGrid {
            base: self,
            obstacle: position,
        })
    }

    /// Turn the cell at `position` into an obstacle in place. The original cell comes back
    /// when the returned guard is dropped.
    pub fn place_obstacle(&mut self, position: Position) -> Result<ObstacleGuard<'_>, GridError> {
        self.check_bounds(position)?;
        let index = self.index(position);
        let original = std::mem::replace(&mut self.cells[index], Cell::Obstacle);
        Ok(ObstacleGuard {
            grid: self,
            index,
            original,
        })
    }
}

impl CellLookup for Grid {
    fn height(&self) -> usize {
        self.height
    }

    fn width(&self) -> usize {
        self.width
    }

    fn start(&self) -> Pose {
        self.start
    }

    fn cell_at(&self, position: Position) -> Option<Cell> {
        if self.contains(position) {
            Some(self.cells[self.index(position)])
        } else {
            None
        }
    }
}

/// Copy-on-write view: a borrowed grid plus one extra obstacle.
#[derive(Debug, Clone, Copy)]
pub struct ObstructedGrid<'a> {
    base: &'a Grid,
    obstacle: Position,
}

impl ObstructedGrid<'_> {
    /// Where the extra obstacle is.
    pub fn obstacle(&self) -> Position {
        self.obstacle
    }
}

impl CellLookup for ObstructedGrid<'_> {
    fn height(&self) -> usize {
        self.base.height
    }

    fn width(&self) -> usize {
        self.base.width
    }

    fn start(&self) -> Pose {
        self.base.start
    }

    fn cell_at(&self, position: Position) -> Option<Cell> {
        if position == self.obstacle {
            Some(Cell::Obstacle)
        } else {
            self.base.cell_at(position)
        }
    }
}

/// A grid with one cell temporarily turned into an obstacle. Derefs to the grid; restores
/// the original cell on drop.
#[derive(Debug)]
pub struct ObstacleGuard<'a> {
    grid: &'a mut Grid,
    index: usize,
    original: Cell,
}

impl Deref for ObstacleGuard<'_> {
    type Target = Grid;

    fn deref(&self) -> &Self::Target {
        &*self.grid
    }
}

impl Drop for ObstacleGuard<'_> {
    fn drop(&mut self) {
        self.grid.cells[self.index] = self.original;
    }
}
