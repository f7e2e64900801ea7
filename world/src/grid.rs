//! Dense cell store rebuilt from the latest observations every turn.

use thor_arena_core::{CellState, Point, MAX_ARENA_CELLS, NEIGHBOURHOOD};

use crate::WorldError;

/// Fixed-size arena grid recording which cells hold the avatar or a giant.
///
/// The grid is allocated once and reused turn over turn: the world places
/// the avatar and the giants when a turn is observed and clears every cell
/// once the turn's action has been emitted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArenaGrid {
    width: u32,
    height: u32,
    cells: Vec<CellState>,
}

impl ArenaGrid {
    /// Creates an empty grid with the provided dimensions.
    ///
    /// Dimensions covering more than [`MAX_ARENA_CELLS`] cells yield a grid on
    /// which no cell is addressable.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        let capacity = Some(u64::from(width) * u64::from(height))
            .filter(|cells| *cells <= MAX_ARENA_CELLS)
            .and_then(|cells| usize::try_from(cells).ok())
            .unwrap_or(0);
        Self {
            width,
            height,
            cells: vec![CellState::Empty; capacity],
        }
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Number of addressable cells.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Reports whether the point lies inside the grid bounds.
    #[must_use]
    pub fn is_on_grid(&self, point: Point) -> bool {
        self.index(point).is_some()
    }

    /// Occupancy of the provided cell, or `None` when it lies off the grid.
    #[must_use]
    pub fn get(&self, point: Point) -> Option<CellState> {
        self.index(point)
            .and_then(|index| self.cells.get(index).copied())
    }

    /// Records `state` at the provided cell.
    ///
    /// Placing outside the grid is a caller bug and is rejected without
    /// touching any cell.
    pub fn place(&mut self, point: Point, state: CellState) -> Result<(), WorldError> {
        let index = self.index(point).ok_or(WorldError::OutOfBounds {
            point,
            width: self.width,
            height: self.height,
        })?;
        if let Some(cell) = self.cells.get_mut(index) {
            *cell = state;
        }
        Ok(())
    }

    /// Reports whether a giant occupies the provided cell.
    #[must_use]
    pub fn has_hostile(&self, point: Point) -> bool {
        self.get(point) == Some(CellState::Hostile)
    }

    /// Reports whether any giant stands within one step of the cell, the cell
    /// itself included.
    #[must_use]
    pub fn is_lethally_adjacent(&self, point: Point) -> bool {
        NEIGHBOURHOOD
            .iter()
            .any(|offset| self.has_hostile(point + *offset))
    }

    /// Reports whether the cell is on the grid and out of every giant's reach.
    #[must_use]
    pub fn is_safe(&self, point: Point) -> bool {
        self.is_on_grid(point) && !self.is_lethally_adjacent(point)
    }

    /// Resets every cell to [`CellState::Empty`].
    pub fn clear(&mut self) {
        self.cells.fill(CellState::Empty);
    }

    /// Iterator over every cell in row-major order alongside its coordinate.
    pub fn iter(&self) -> impl Iterator<Item = (Point, CellState)> + '_ {
        let width = usize::try_from(self.width).unwrap_or(0).max(1);
        self.cells.iter().enumerate().map(move |(index, state)| {
            let column = i32::try_from(index % width).unwrap_or(i32::MAX);
            let row = i32::try_from(index / width).unwrap_or(i32::MAX);
            (Point::new(column, row), *state)
        })
    }

    fn index(&self, point: Point) -> Option<usize> {
        let column = u32::try_from(point.x()).ok()?;
        let row = u32::try_from(point.y()).ok()?;
        if column >= self.width || row >= self.height {
            return None;
        }

        let column = usize::try_from(column).ok()?;
        let row = usize::try_from(row).ok()?;
        let width = usize::try_from(self.width).ok()?;
        row.checked_mul(width)?
            .checked_add(column)
            .filter(|index| *index < self.cells.len())
    }
}
