#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative arena state for a single game of Thor against the giants.

mod grid;
mod navigation;

use thiserror::Error;
use thor_arena_core::{
    within_radius, Action, ArenaConfig, CellState, Command, Event, Point, MAX_ARENA_CELLS,
};

pub use grid::ArenaGrid;
pub use navigation::SafeDistanceMap;

/// Contract violations raised while mutating the world.
///
/// Each variant points at a bug in the orchestration layer driving the world;
/// none of them is recoverable within a game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum WorldError {
    /// A point outside the arena was placed on the grid or moved onto.
    #[error("point {point} lies outside the {width}x{height} arena")]
    OutOfBounds {
        /// Offending point.
        point: Point,
        /// Number of columns in the arena.
        width: u32,
        /// Number of rows in the arena.
        height: u32,
    },
    /// A hammer strike was requested after every charge had been spent.
    #[error("hammer strike requested with no charges left")]
    NoChargesLeft,
    /// The arena was configured without any cells.
    #[error("arena dimensions must be positive (received {width}x{height})")]
    EmptyArena {
        /// Configured number of columns.
        width: u32,
        /// Configured number of rows.
        height: u32,
    },
    /// The arena holds more cells than the grid store supports.
    #[error("{width}x{height} arena exceeds the limit of {max_cells} cells")]
    ArenaTooLarge {
        /// Configured number of columns.
        width: u32,
        /// Configured number of rows.
        height: u32,
        /// Largest supported number of cells.
        max_cells: u64,
    },
}

/// The avatar: a position, a fixed strike radius and a dwindling supply of charges.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Thor {
    position: Point,
    strike_radius: u32,
    charges_left: u32,
}

impl Thor {
    /// Creates the avatar at its starting position.
    #[must_use]
    pub const fn new(position: Point, strike_radius: u32, charges_left: u32) -> Self {
        Self {
            position,
            strike_radius,
            charges_left,
        }
    }

    /// Cell the avatar currently occupies.
    #[must_use]
    pub const fn position(&self) -> Point {
        self.position
    }

    /// Chebyshev radius covered by a strike.
    #[must_use]
    pub const fn strike_radius(&self) -> u32 {
        self.strike_radius
    }

    /// Hammer charges still available.
    #[must_use]
    pub const fn charges_left(&self) -> u32 {
        self.charges_left
    }

    /// Reports whether a strike from the current position reaches `target`.
    #[must_use]
    pub fn can_strike(&self, target: Point) -> bool {
        within_radius(target, self.position, self.strike_radius)
    }

    /// Consumes one charge and returns how many remain.
    pub fn strike(&mut self) -> Result<u32, WorldError> {
        self.charges_left = self
            .charges_left
            .checked_sub(1)
            .ok_or(WorldError::NoChargesLeft)?;
        Ok(self.charges_left)
    }

    fn move_to(&mut self, position: Point) {
        self.position = position;
    }
}

/// Giant positions observed for the current turn, in input order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HostileSet {
    positions: Vec<Point>,
}

impl HostileSet {
    /// Wraps the provided positions.
    #[must_use]
    pub fn from_positions(positions: Vec<Point>) -> Self {
        Self { positions }
    }

    /// Iterator over the positions in input order.
    pub fn iter(&self) -> impl Iterator<Item = Point> + '_ {
        self.positions.iter().copied()
    }

    /// Positions as a slice, in input order.
    #[must_use]
    pub fn as_slice(&self) -> &[Point] {
        &self.positions
    }

    /// Number of giants observed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Reports whether no giant was observed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Represents the authoritative arena state.
#[derive(Debug)]
pub struct World {
    config: ArenaConfig,
    grid: ArenaGrid,
    thor: Thor,
    hostiles: HostileSet,
}

impl World {
    /// Creates a world with an empty grid and the avatar at `thor_start`.
    pub fn new(config: ArenaConfig, thor_start: Point, charges: u32) -> Result<Self, WorldError> {
        if config.width == 0 || config.height == 0 {
            return Err(WorldError::EmptyArena {
                width: config.width,
                height: config.height,
            });
        }
        if config.cell_count() > MAX_ARENA_CELLS {
            return Err(WorldError::ArenaTooLarge {
                width: config.width,
                height: config.height,
                max_cells: MAX_ARENA_CELLS,
            });
        }

        let grid = ArenaGrid::new(config.width, config.height);
        ensure_on_grid(&grid, thor_start)?;

        Ok(Self {
            config,
            grid,
            thor: Thor::new(thor_start, config.strike_radius, charges),
            hostiles: HostileSet::default(),
        })
    }
}

/// Applies the provided command to the world.
///
/// A failing command leaves the world untouched.
pub fn apply(
    world: &mut World,
    command: Command,
    out_events: &mut Vec<Event>,
) -> Result<(), WorldError> {
    match command {
        Command::ObserveTurn {
            hostiles,
            reported_charges,
        } => {
            for hostile in &hostiles {
                ensure_on_grid(&world.grid, *hostile)?;
            }

            world.hostiles = HostileSet::from_positions(hostiles);
            world.grid.clear();
            world.grid.place(world.thor.position(), CellState::Thor)?;
            for hostile in world.hostiles.iter() {
                world.grid.place(hostile, CellState::Hostile)?;
            }
            tracing::debug!(
                thor = %world.thor.position(),
                hostiles = world.hostiles.len(),
                "grid rebuilt for new turn"
            );
            out_events.push(Event::TurnObserved {
                hostile_count: world.hostiles.len(),
            });

            let tracked = world.thor.charges_left();
            if reported_charges != tracked {
                tracing::warn!(
                    reported = reported_charges,
                    tracked,
                    "reported charges disagree with tracked charges; keeping tracked value"
                );
                out_events.push(Event::ChargesDiverged {
                    reported: reported_charges,
                    tracked,
                });
            }
        }
        Command::Perform { action } => match action {
            Action::Wait => out_events.push(Event::ThorWaited),
            Action::Strike => {
                let charges_left = world.thor.strike()?;
                out_events.push(Event::ThorStruck { charges_left });
            }
            Action::Move(direction) => {
                let from = world.thor.position();
                let to = from + direction.offset();
                ensure_on_grid(&world.grid, to)?;
                world.thor.move_to(to);
                out_events.push(Event::ThorMoved { from, to });
            }
        },
        Command::EndTurn => {
            world.grid.clear();
            out_events.push(Event::GridCleared);
        }
    }

    Ok(())
}

fn ensure_on_grid(grid: &ArenaGrid, point: Point) -> Result<(), WorldError> {
    if grid.is_on_grid(point) {
        Ok(())
    } else {
        Err(WorldError::OutOfBounds {
            point,
            width: grid.width(),
            height: grid.height(),
        })
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use thor_arena_core::ArenaConfig;

    use super::{ArenaGrid, HostileSet, Thor, World};

    /// Arena parameters the world was created with.
    #[must_use]
    pub fn config(world: &World) -> &ArenaConfig {
        &world.config
    }

    /// Provides read-only access to the grid store.
    #[must_use]
    pub fn grid(world: &World) -> &ArenaGrid {
        &world.grid
    }

    /// Provides read-only access to the avatar.
    #[must_use]
    pub fn thor(world: &World) -> &Thor {
        &world.thor
    }

    /// Provides read-only access to the giants observed this turn.
    #[must_use]
    pub fn hostiles(world: &World) -> &HostileSet {
        &world.hostiles
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use thor_arena_core::Direction;

    fn small_world(charges: u32) -> World {
        let config = ArenaConfig {
            width: 5,
            height: 5,
            strike_radius: 1,
        };
        World::new(config, Point::new(2, 2), charges).expect("valid world")
    }

    fn observe(world: &mut World, hostiles: Vec<Point>, reported_charges: u32) -> Vec<Event> {
        let mut events = Vec::new();
        apply(
            world,
            Command::ObserveTurn {
                hostiles,
                reported_charges,
            },
            &mut events,
        )
        .expect("observation applies");
        events
    }

    #[test]
    fn new_world_rejects_empty_arena_and_off_grid_start() {
        let empty = ArenaConfig {
            width: 0,
            ..ArenaConfig::default()
        };
        assert_eq!(
            World::new(empty, Point::new(0, 0), 1).err(),
            Some(WorldError::EmptyArena {
                width: 0,
                height: 18,
            })
        );

        assert!(matches!(
            World::new(ArenaConfig::default(), Point::new(40, 0), 1),
            Err(WorldError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn new_world_rejects_oversized_arena() {
        let huge = ArenaConfig {
            width: 4_000_000_000,
            height: 4_000_000_000,
            strike_radius: 4,
        };
        assert_eq!(
            World::new(huge, Point::new(0, 0), 1).err(),
            Some(WorldError::ArenaTooLarge {
                width: 4_000_000_000,
                height: 4_000_000_000,
                max_cells: MAX_ARENA_CELLS,
            })
        );

        let widest = ArenaConfig {
            width: 1 << 20,
            height: 1,
            strike_radius: 4,
        };
        assert!(World::new(widest, Point::new(0, 0), 1).is_ok());
    }

    #[test]
    fn observe_turn_rebuilds_grid() {
        let mut world = small_world(3);

        let events = observe(&mut world, vec![Point::new(0, 0), Point::new(4, 4)], 3);

        let grid = query::grid(&world);
        assert_eq!(grid.get(Point::new(2, 2)), Some(CellState::Thor));
        assert!(grid.has_hostile(Point::new(0, 0)));
        assert!(grid.has_hostile(Point::new(4, 4)));
        let hostile_cells = grid
            .iter()
            .filter(|(_, state)| *state == CellState::Hostile)
            .count();
        assert_eq!(hostile_cells, 2);
        assert_eq!(events, vec![Event::TurnObserved { hostile_count: 2 }]);
    }

    #[test]
    fn observe_turn_replaces_previous_hostiles() {
        let mut world = small_world(3);
        let _ = observe(&mut world, vec![Point::new(0, 0)], 3);
        let _ = observe(&mut world, vec![Point::new(4, 0)], 3);

        assert_eq!(query::hostiles(&world).as_slice(), &[Point::new(4, 0)]);
        assert!(!query::grid(&world).has_hostile(Point::new(0, 0)));
    }

    #[test]
    fn off_grid_hostile_is_rejected_without_mutation() {
        let mut world = small_world(3);
        let _ = observe(&mut world, vec![Point::new(1, 1)], 3);
        let mut events = Vec::new();

        let result = apply(
            &mut world,
            Command::ObserveTurn {
                hostiles: vec![Point::new(0, 0), Point::new(5, 2)],
                reported_charges: 3,
            },
            &mut events,
        );

        assert!(matches!(result, Err(WorldError::OutOfBounds { .. })));
        assert!(events.is_empty());
        assert_eq!(query::hostiles(&world).as_slice(), &[Point::new(1, 1)]);
    }

    #[test]
    fn diverging_charge_report_keeps_tracked_value() {
        let mut world = small_world(2);

        let events = observe(&mut world, Vec::new(), 7);

        assert_eq!(query::thor(&world).charges_left(), 2);
        assert!(events.contains(&Event::ChargesDiverged {
            reported: 7,
            tracked: 2,
        }));
    }

    #[test]
    fn strike_consumes_exactly_one_charge() {
        let mut world = small_world(2);
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::Perform {
                action: Action::Strike,
            },
            &mut events,
        )
        .expect("charge available");

        assert_eq!(query::thor(&world).charges_left(), 1);
        assert_eq!(events, vec![Event::ThorStruck { charges_left: 1 }]);
    }

    #[test]
    fn strike_without_charges_is_fatal() {
        let mut world = small_world(0);
        let mut events = Vec::new();

        let result = apply(
            &mut world,
            Command::Perform {
                action: Action::Strike,
            },
            &mut events,
        );

        assert_eq!(result, Err(WorldError::NoChargesLeft));
        assert_eq!(query::thor(&world).charges_left(), 0);
        assert!(events.is_empty());
    }

    #[test]
    fn move_updates_position_and_rejects_leaving_the_arena() {
        let config = ArenaConfig {
            width: 3,
            height: 3,
            strike_radius: 1,
        };
        let mut world = World::new(config, Point::new(1, 1), 0).expect("valid world");
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::Perform {
                action: Action::Move(Direction::NorthWest),
            },
            &mut events,
        )
        .expect("destination lies on the grid");
        assert_eq!(query::thor(&world).position(), Point::new(0, 0));
        assert_eq!(
            events,
            vec![Event::ThorMoved {
                from: Point::new(1, 1),
                to: Point::new(0, 0),
            }]
        );

        let result = apply(
            &mut world,
            Command::Perform {
                action: Action::Move(Direction::West),
            },
            &mut events,
        );
        assert!(matches!(result, Err(WorldError::OutOfBounds { .. })));
        assert_eq!(query::thor(&world).position(), Point::new(0, 0));
    }

    #[test]
    fn end_turn_clears_grid() {
        let mut world = small_world(1);
        let _ = observe(&mut world, vec![Point::new(0, 4)], 1);
        let mut events = Vec::new();

        apply(&mut world, Command::EndTurn, &mut events).expect("end turn never fails");

        assert!(query::grid(&world)
            .iter()
            .all(|(_, state)| state == CellState::Empty));
        assert_eq!(events, vec![Event::GridCleared]);
    }

    #[test]
    fn thor_reports_strike_reach() {
        let thor = Thor::new(Point::new(10, 10), 4, 1);
        assert!(thor.can_strike(Point::new(14, 14)));
        assert!(!thor.can_strike(Point::new(15, 10)));
    }
}
