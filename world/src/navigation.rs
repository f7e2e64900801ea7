//! Safe-distance field builder used by the decision systems.

use std::collections::VecDeque;

use thor_arena_core::{Point, NEIGHBOURHOOD};

use crate::ArenaGrid;

const UNREACHABLE: u32 = u32::MAX;

/// Dense 8-directional step counts towards a single target cell.
///
/// The field mirrors the grid's dimensions and stores breadth-first search
/// depths measured from the target. The target's own ring is always entered
/// and expanded, even when it lies next to a giant; beyond that ring the
/// search only expands through safe cells. Unsafe cells still receive a
/// depth when first touched, so a path may end next to danger but never pass
/// through it. Cells the search never reaches keep `u32::MAX` internally and
/// are reported as `None`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SafeDistanceMap {
    width: u32,
    height: u32,
    target: Point,
    distances: Vec<u32>,
}

impl SafeDistanceMap {
    /// Builds a fresh field for `target` over the provided grid.
    #[must_use]
    pub fn build(grid: &ArenaGrid, target: Point) -> Self {
        let mut map = Self::default();
        map.rebuild(grid, target);
        map
    }

    /// Rebuilds the field in place, reusing the distance buffer when the grid
    /// dimensions are unchanged.
    pub fn rebuild(&mut self, grid: &ArenaGrid, target: Point) {
        let cell_count = grid.cell_count();

        self.width = grid.width();
        self.height = grid.height();
        self.target = target;

        if self.distances.len() != cell_count {
            self.distances = vec![UNREACHABLE; cell_count];
        } else {
            self.distances.fill(UNREACHABLE);
        }

        let Some(target_index) = self.index(target) else {
            return;
        };
        self.distances[target_index] = 0;

        let mut queue = VecDeque::with_capacity(NEIGHBOURHOOD.len());
        for offset in NEIGHBOURHOOD {
            let neighbour = target + offset;
            if self.try_visit(neighbour, 1) {
                queue.push_back(neighbour);
            }
        }

        while let Some(cell) = queue.pop_front() {
            let Some(current_index) = self.index(cell) else {
                continue;
            };
            let next_distance = self.distances[current_index].saturating_add(1);

            for offset in NEIGHBOURHOOD {
                let neighbour = cell + offset;
                if self.try_visit(neighbour, next_distance) && grid.is_safe(neighbour) {
                    queue.push_back(neighbour);
                }
            }
        }
    }

    /// Cell the field measures distances towards.
    #[must_use]
    pub const fn target(&self) -> Point {
        self.target
    }

    /// Step count recorded for the provided cell.
    ///
    /// Returns `None` when the cell lies off the grid or the search never
    /// reached it.
    #[must_use]
    pub fn distance(&self, point: Point) -> Option<u32> {
        self.index(point)
            .and_then(|index| self.distances.get(index).copied())
            .filter(|distance| *distance != UNREACHABLE)
    }

    /// Reports whether the search reached the provided cell.
    #[must_use]
    pub fn is_reachable(&self, point: Point) -> bool {
        self.distance(point).is_some()
    }

    /// Assigns `distance` to an on-grid, unvisited cell and reports whether it did.
    fn try_visit(&mut self, point: Point, distance: u32) -> bool {
        let Some(index) = self.index(point) else {
            return false;
        };
        if self.distances[index] != UNREACHABLE {
            return false;
        }

        self.distances[index] = distance;
        true
    }

    fn index(&self, point: Point) -> Option<usize> {
        let column = u32::try_from(point.x()).ok()?;
        let row = u32::try_from(point.y()).ok()?;
        if column >= self.width || row >= self.height {
            return None;
        }

        let width = usize::try_from(self.width).ok()?;
        let column = usize::try_from(column).ok()?;
        let row = usize::try_from(row).ok()?;
        row.checked_mul(width)?
            .checked_add(column)
            .filter(|index| *index < self.distances.len())
    }
}
