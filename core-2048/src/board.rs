use std::{fmt, mem, ops::Index};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::direction::Direction;

/// Result of sliding a board in one direction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MoveOutcome {
    /// At least one tile slid or merged.
    pub changed: bool,
    /// Sum of the values of every tile produced by a merge.
    pub score_delta: u32,
}

/// Square grid of tiles, stored row-major. `0` marks an empty cell, any other
/// value is a power of two no smaller than 2.
#[derive(Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Board {
    size: usize,
    cells: Vec<u32>,
}

/// Whether `value` may be stored in a cell.
pub const fn is_tile_value(value: u32) -> bool {
    value == 0 || (value >= 2 && value.is_power_of_two())
}

/// Slides the non-empty values of `line` toward index 0 and merges equal
/// neighbours, returning the sum of the merged values.
///
/// A tile produced by a merge is never merged again during the same call, so
/// `[2, 2, 4, 0]` becomes `[4, 4, 0, 0]` rather than `[8, 0, 0, 0]`.
pub fn slide_and_merge(line: &mut [u32]) -> u32 {
    let mut write = 0;
    let mut mergeable = false;
    let mut score = 0;

    for read in 0..line.len() {
        let value = mem::take(&mut line[read]);

        if value == 0 {
            continue;
        }

        if mergeable && line[write - 1] == value {
            line[write - 1] = value * 2;
            score += value * 2;
            mergeable = false;
        } else {
            line[write] = value;
            write += 1;
            mergeable = true;
        }
    }

    score
}

impl Board {
    /// An empty `size` x `size` board.
    ///
    /// # Panics
    ///
    /// Panics if `size` is less than 2.
    pub fn new(size: usize) -> Self {
        assert!(size >= 2, "board size must be at least 2, got {size}");

        Self {
            size,
            cells: vec![0; size * size],
        }
    }

    /// Builds a board from its rows, top to bottom.
    ///
    /// # Panics
    ///
    /// Panics if the rows do not form a square of side at least 2, or if a
    /// cell holds something other than 0 or a power of two no smaller than 2.
    pub fn from_rows<R: AsRef<[u32]>>(rows: &[R]) -> Self {
        let size = rows.len();
        assert!(size >= 2, "board size must be at least 2, got {size}");

        let mut cells = Vec::with_capacity(size * size);

        for (i, row) in rows.iter().enumerate() {
            let row = row.as_ref();

            assert_eq!(
                row.len(),
                size,
                "row {i} has {} cells, expected {size}",
                row.len()
            );

            if let Some(value) = row.iter().find(|&&value| !is_tile_value(value)) {
                panic!("row {i} holds {value}, which is not a tile value");
            }

            cells.extend_from_slice(row);
        }

        Self { size, cells }
    }

    pub const fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, row: usize, column: usize) -> u32 {
        self.cells[row * self.size + column]
    }

    pub fn cells(&self) -> &[u32] {
        &self.cells
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u32]> {
        self.cells.chunks_exact(self.size)
    }

    pub(crate) fn set(&mut self, index: usize, value: u32) {
        debug_assert!(is_tile_value(value));

        self.cells[index] = value;
    }

    /// Row-major indices of the empty cells, in ascending order.
    pub fn empty_cells(&self) -> impl Iterator<Item = usize> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, &value)| value == 0)
            .map(|(index, _)| index)
    }

    pub fn empty_count(&self) -> usize {
        self.cells.iter().filter(|&&value| value == 0).count()
    }

    pub fn tile_count(&self) -> usize {
        self.cells.len() - self.empty_count()
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|&value| value != 0)
    }

    pub fn tile_sum(&self) -> u64 {
        self.cells.iter().copied().map(u64::from).sum()
    }

    pub fn highest_tile(&self) -> u32 {
        self.cells.iter().copied().max().unwrap_or(0)
    }

    // Index of the `offset`th cell of `line`, counting from the edge tiles
    // slide toward.
    fn line_index(&self, direction: Direction, line: usize, offset: usize) -> usize {
        let offset = if direction.is_reversed() {
            self.size - 1 - offset
        } else {
            offset
        };

        if direction.is_horizontal() {
            line * self.size + offset
        } else {
            offset * self.size + line
        }
    }

    /// Slides and merges every row or column toward the edge named by
    /// `direction`, in place.
    pub fn apply_move(&mut self, direction: Direction) -> MoveOutcome {
        let mut line = vec![0; self.size];
        let mut outcome = MoveOutcome::default();

        for i in 0..self.size {
            for (offset, cell) in line.iter_mut().enumerate() {
                *cell = self.cells[self.line_index(direction, i, offset)];
            }

            outcome.score_delta += slide_and_merge(&mut line);

            for (offset, &value) in line.iter().enumerate() {
                let index = self.line_index(direction, i, offset);

                if self.cells[index] != value {
                    self.cells[index] = value;
                    outcome.changed = true;
                }
            }
        }

        outcome
    }

    /// The board after moving in `direction` and the score gained, or `None`
    /// if the move changes nothing.
    pub fn try_move(&self, direction: Direction) -> Option<(Board, u32)> {
        let mut board = self.clone();
        let outcome = board.apply_move(direction);

        outcome.changed.then_some((board, outcome.score_delta))
    }

    /// [`Board::try_move`] for every direction, indexed by `Direction as usize`.
    pub fn try_all_moves(&self) -> [Option<(Board, u32)>; 4] {
        Direction::ALL.map(|direction| self.try_move(direction))
    }

    /// Whether the board is full and no tile equals its right or lower
    /// neighbour.
    pub fn is_game_over(&self) -> bool {
        let size = self.size;

        !(0..size).any(|row| {
            (0..size).any(|column| {
                let value = self.get(row, column);

                value == 0
                    || (column + 1 < size && value == self.get(row, column + 1))
                    || (row + 1 < size && value == self.get(row + 1, column))
            })
        })
    }
}

impl Index<(usize, usize)> for Board {
    type Output = u32;

    fn index(&self, (row, column): (usize, usize)) -> &u32 {
        &self.cells[row * self.size + column]
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.rows()).finish()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.highest_tile().max(1).to_string().len();

        for row in self.rows() {
            for (i, &value) in row.iter().enumerate() {
                if i != 0 {
                    f.write_str(" ")?;
                }

                if value == 0 {
                    write!(f, "{:>width$}", ".")?;
                } else {
                    write!(f, "{value:>width$}")?;
                }
            }

            f.write_str("\n")?;
        }

        Ok(())
    }
}
