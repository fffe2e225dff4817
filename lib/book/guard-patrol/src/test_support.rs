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

use guard_grid_logic::Grid;
use proptest::prelude::*;

/// The 10x10 lab from the puzzle statement. The guard visits 41 cells and there are 6 places
/// where one more obstacle traps it in a loop.
pub(crate) const TEXTBOOK: &str = "\
....#.....
.........#
..........
..#.......
.......#..
..........
.#..^.....
........#.
#.........
......#...";

pub(crate) fn parse(text: &str) -> Grid {
    text.parse().expect("test grid should parse")
}

/// Random grids up to 8x8, about one cell in five an obstacle, guard anywhere facing anywhere.
pub(crate) fn any_grid() -> impl Strategy<Value = Grid> {
    (1..=8usize, 1..=8usize).prop_flat_map(|(height, width)| {
        (
            prop::collection::vec(prop::bool::weighted(0.2), height * width),
            0..height,
            0..width,
            prop_oneof![Just('^'), Just('<'), Just('v'), Just('>')],
        )
            .prop_map(move |(obstacles, guard_row, guard_col, glyph)| {
                let mut text = String::with_capacity((width + 1) * height);
                for row in 0..height {
                    for col in 0..width {
                        let c = if (row, col) == (guard_row, guard_col) {
                            glyph
                        } else if obstacles[row * width + col] {
                            '#'
                        } else {
                            '.'
                        };
                        text.push(c);
                    }
                    text.push('\n');
                }
                parse(&text)
            })
    })
}
