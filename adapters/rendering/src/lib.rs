#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Debug presentation of the arena grid for terminal adapters.

use std::fmt;

use thor_arena_core::CellState;
use thor_arena_world::ArenaGrid;

/// Glyph drawn for a cell with the provided occupancy.
#[must_use]
pub const fn glyph(state: CellState) -> char {
    match state {
        CellState::Empty => '.',
        CellState::Thor => 'T',
        CellState::Hostile => 'G',
    }
}

/// Snapshot of the grid captured for a single frame.
///
/// Rendered through [`fmt::Display`] as a bordered board:
///
/// ```text
/// *-----*
/// |.|.|.|
/// |.|T|G|
/// *-----*
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridFrame {
    width: usize,
    glyphs: Vec<char>,
}

impl GridFrame {
    /// Captures the current occupancy of every cell.
    #[must_use]
    pub fn capture(grid: &ArenaGrid) -> Self {
        Self {
            width: usize::try_from(grid.width()).unwrap_or(0),
            glyphs: grid.iter().map(|(_, state)| glyph(state)).collect(),
        }
    }

    /// Number of rows contained in the frame.
    #[must_use]
    pub fn rows(&self) -> usize {
        if self.width == 0 {
            0
        } else {
            self.glyphs.len() / self.width
        }
    }

    fn write_border(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dashes = (2 * self.width).saturating_sub(1);
        writeln!(f, "*{}*", "-".repeat(dashes))
    }
}

impl fmt::Display for GridFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_border(f)?;
        if self.width > 0 {
            for row in self.glyphs.chunks(self.width) {
                f.write_str("|")?;
                for glyph in row {
                    write!(f, "{glyph}|")?;
                }
                writeln!(f)?;
            }
        }
        self.write_border(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use thor_arena_core::Point;

    #[test]
    fn frame_draws_bordered_board() {
        let mut grid = ArenaGrid::new(3, 2);
        grid.place(Point::new(1, 1), CellState::Thor)
            .expect("cell lies on the grid");
        grid.place(Point::new(2, 1), CellState::Hostile)
            .expect("cell lies on the grid");

        let frame = GridFrame::capture(&grid);

        assert_eq!(frame.rows(), 2);
        assert_eq!(
            frame.to_string(),
            "*-----*\n|.|.|.|\n|.|T|G|\n*-----*\n"
        );
    }

    #[test]
    fn empty_grid_draws_only_borders() {
        let frame = GridFrame::capture(&ArenaGrid::new(0, 4));

        assert_eq!(frame.rows(), 0);
        assert_eq!(frame.to_string(), "**\n**\n");
    }

    #[test]
    fn frame_of_default_arena_spans_every_row() {
        let frame = GridFrame::capture(&ArenaGrid::new(40, 18));
        let rendered = frame.to_string();

        assert_eq!(rendered.lines().count(), 20);
        assert!(rendered
            .lines()
            .all(|line| line.chars().count() == 2 * 40 + 1));
    }
}
