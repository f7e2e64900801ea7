#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Thor arena engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure decision systems. Adapters submit
//! [`Command`] values describing a turn's observations and the chosen
//! [`Action`], the world executes those commands via its `apply` entry point,
//! and then broadcasts [`Event`] values describing what changed. Decision
//! systems query immutable world state and respond with a single [`Action`]
//! per turn.

use std::{
    fmt,
    ops::{Add, Sub},
};

use serde::{Deserialize, Serialize};

/// Width of the arena observed in the original game variant.
pub const DEFAULT_ARENA_WIDTH: u32 = 40;

/// Height of the arena observed in the original game variant.
pub const DEFAULT_ARENA_HEIGHT: u32 = 18;

/// Chebyshev radius covered by Thor's hammer strike in the original variant.
pub const DEFAULT_STRIKE_RADIUS: u32 = 4;

/// Largest number of cells an arena may hold.
pub const MAX_ARENA_CELLS: u64 = 1 << 20;

/// Integer location on the arena expressed as column (`x`) and row (`y`).
///
/// Coordinates are signed so that neighbourhood arithmetic can step past the
/// arena edge; callers reject such points through the grid's bounds check.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Point {
    x: i32,
    y: i32,
}

impl Point {
    /// Creates a new point from column and row coordinates.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Zero-based column of the point. Grows towards the east.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Zero-based row of the point. Grows towards the south.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Offsets covering a cell and its eight neighbours, including the zero vector.
///
/// The order is stable and doubles as the pre-sort order of candidate cells,
/// so ties in later rankings resolve towards earlier entries.
pub const NEIGHBOURHOOD: [Point; 9] = [
    Point::new(-1, -1),
    Point::new(-1, 0),
    Point::new(-1, 1),
    Point::new(0, -1),
    Point::new(0, 0),
    Point::new(0, 1),
    Point::new(1, -1),
    Point::new(1, 0),
    Point::new(1, 1),
];

/// Number of single steps an 8-directional walker needs between two points.
#[must_use]
pub fn chebyshev_distance(a: Point, b: Point) -> u32 {
    a.x.abs_diff(b.x).max(a.y.abs_diff(b.y))
}

/// Straight-line distance between two points.
///
/// Only used to break ties between cells of equal step distance.
#[must_use]
pub fn euclidean_distance(a: Point, b: Point) -> f32 {
    let diff = b - a;
    let dx = diff.x as f32;
    let dy = diff.y as f32;
    (dx * dx + dy * dy).sqrt()
}

/// Reports whether `point` lies within `radius` Chebyshev steps of `center`.
#[must_use]
pub fn within_radius(point: Point, center: Point, radius: u32) -> bool {
    chebyshev_distance(point, center) <= radius
}

/// Occupancy recorded for a single arena cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CellState {
    /// Nothing occupies the cell.
    #[default]
    Empty,
    /// The avatar stands on the cell.
    Thor,
    /// A giant stands on the cell.
    Hostile,
}

/// Compass directions available to the avatar.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Towards decreasing rows.
    North,
    /// Towards decreasing rows and increasing columns.
    NorthEast,
    /// Towards increasing columns.
    East,
    /// Towards increasing rows and columns.
    SouthEast,
    /// Towards increasing rows.
    South,
    /// Towards increasing rows and decreasing columns.
    SouthWest,
    /// Towards decreasing columns.
    West,
    /// Towards decreasing rows and columns.
    NorthWest,
}

impl Direction {
    /// Protocol token naming the direction.
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::North => "N",
            Self::NorthEast => "NE",
            Self::East => "E",
            Self::SouthEast => "SE",
            Self::South => "S",
            Self::SouthWest => "SW",
            Self::West => "W",
            Self::NorthWest => "NW",
        }
    }

    /// Unit step taken when moving in the direction.
    #[must_use]
    pub const fn offset(self) -> Point {
        match self {
            Self::North => Point::new(0, -1),
            Self::NorthEast => Point::new(1, -1),
            Self::East => Point::new(1, 0),
            Self::SouthEast => Point::new(1, 1),
            Self::South => Point::new(0, 1),
            Self::SouthWest => Point::new(-1, 1),
            Self::West => Point::new(-1, 0),
            Self::NorthWest => Point::new(-1, -1),
        }
    }
}

/// Maps the signs of `desired - current` onto a compass direction.
///
/// Returns `None` when both points coincide. Only the signs matter, so points
/// further than one step apart still map to the direction of travel.
#[must_use]
pub fn symbolic_direction(current: Point, desired: Point) -> Option<Direction> {
    let diff = desired - current;
    match (diff.x.signum(), diff.y.signum()) {
        (0, -1) => Some(Direction::North),
        (1, -1) => Some(Direction::NorthEast),
        (1, 0) => Some(Direction::East),
        (1, 1) => Some(Direction::SouthEast),
        (0, 1) => Some(Direction::South),
        (-1, 1) => Some(Direction::SouthWest),
        (-1, 0) => Some(Direction::West),
        (-1, -1) => Some(Direction::NorthWest),
        _ => None,
    }
}

/// Single command the avatar issues per turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    /// Stay in place.
    Wait,
    /// Consume one hammer charge, eliminating every giant within the strike radius.
    Strike,
    /// Step one cell in the provided direction.
    Move(Direction),
}

impl Action {
    /// Builds the action that carries the avatar from `current` towards `desired`.
    #[must_use]
    pub fn step_towards(current: Point, desired: Point) -> Self {
        symbolic_direction(current, desired).map_or(Self::Wait, Self::Move)
    }

    /// Protocol token emitted for the action.
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::Wait => "WAIT",
            Self::Strike => "STRIKE",
            Self::Move(direction) => direction.token(),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Fixed arena parameters supplied once when a game starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArenaConfig {
    /// Number of columns in the arena.
    pub width: u32,
    /// Number of rows in the arena.
    pub height: u32,
    /// Chebyshev radius covered by a hammer strike.
    pub strike_radius: u32,
}

impl ArenaConfig {
    /// Number of cells covered by the arena.
    #[must_use]
    pub const fn cell_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_ARENA_WIDTH,
            height: DEFAULT_ARENA_HEIGHT,
            strike_radius: DEFAULT_STRIKE_RADIUS,
        }
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Replaces the hostile set and rebuilds the grid for a new turn.
    ObserveTurn {
        /// Giant positions reported for the turn, in input order.
        hostiles: Vec<Point>,
        /// Charge count reported by the game. Informational only.
        reported_charges: u32,
    },
    /// Applies the avatar's chosen action.
    Perform {
        /// Action selected by the decision system.
        action: Action,
    },
    /// Clears the grid once the turn's action has been emitted.
    EndTurn,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that the grid reflects the latest observations.
    TurnObserved {
        /// Number of giants placed on the grid.
        hostile_count: usize,
    },
    /// Reports that the game's charge count disagrees with internal tracking.
    ChargesDiverged {
        /// Charges reported by the game.
        reported: u32,
        /// Charges tracked by the world, which remain authoritative.
        tracked: u32,
    },
    /// Confirms that the avatar moved between two cells.
    ThorMoved {
        /// Cell occupied before the move.
        from: Point,
        /// Cell occupied after the move.
        to: Point,
    },
    /// Confirms that the avatar consumed a hammer charge.
    ThorStruck {
        /// Charges left after the strike.
        charges_left: u32,
    },
    /// Confirms that the avatar stayed in place.
    ThorWaited,
    /// Confirms that every cell of the grid is empty again.
    GridCleared,
}
