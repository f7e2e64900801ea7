//! Drives the world and a decision strategy through the referee's turns.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use thor_arena_core::{Action, ArenaConfig, Command, Event, Point};
use thor_arena_rendering::GridFrame;
use thor_arena_system_decision::{strategy_for, Strategy};
use thor_arena_world::{self as world, query, World, WorldError};

use crate::{
    config::Settings,
    protocol::{TurnInput, TurnReader},
};

/// A running game: authoritative world plus the policy steering Thor.
#[derive(Debug)]
pub(crate) struct Session {
    world: World,
    strategy: Box<dyn Strategy>,
    events: Vec<Event>,
}

impl Session {
    pub(crate) fn new(
        config: ArenaConfig,
        start: Point,
        charges: u32,
        strategy: Box<dyn Strategy>,
    ) -> Result<Self, WorldError> {
        Ok(Self {
            world: World::new(config, start, charges)?,
            strategy,
            events: Vec::new(),
        })
    }

    /// Loads the observations, decides an action and applies it.
    ///
    /// The grid is cleared again before returning, whether or not the action
    /// could be applied.
    pub(crate) fn play_turn(&mut self, turn: TurnInput) -> Result<Action, WorldError> {
        self.events.clear();
        world::apply(
            &mut self.world,
            Command::ObserveTurn {
                hostiles: turn.hostiles,
                reported_charges: turn.charges,
            },
            &mut self.events,
        )?;
        tracing::trace!("arena\n{}", GridFrame::capture(query::grid(&self.world)));

        let action = self.strategy.decide(&self.world);
        let performed =
            world::apply(&mut self.world, Command::Perform { action }, &mut self.events);
        world::apply(&mut self.world, Command::EndTurn, &mut self.events)?;
        performed?;

        tracing::debug!(%action, events = ?self.events, "turn resolved");
        Ok(action)
    }

    pub(crate) fn world(&self) -> &World {
        &self.world
    }
}

/// Plays turns read from `input` until it ends, answering each on `output`.
///
/// Returns the number of turns played.
pub(crate) fn run<R: BufRead, W: Write>(
    input: R,
    mut output: W,
    settings: Settings,
) -> Result<usize> {
    let mut reader = TurnReader::new(input);
    let start = reader
        .read_start()
        .context("failed to read the opening message")?;

    let Some(first) = reader.read_turn().context("failed to read turn 1")? else {
        tracing::info!("input ended before the first turn");
        return Ok(0);
    };
    let mut session = Session::new(
        settings.arena,
        start,
        first.charges,
        strategy_for(settings.strategy),
    )
    .context("invalid starting position")?;
    tracing::info!(
        %start,
        charges = first.charges,
        strategy = ?settings.strategy,
        "session started"
    );

    let mut next = Some(first);
    let mut played = 0;
    while let Some(turn) = next {
        played += 1;
        let action = session
            .play_turn(turn)
            .with_context(|| format!("turn {played} could not be played"))?;
        writeln!(output, "{action}").context("failed to write action")?;
        output.flush().context("failed to flush action")?;

        next = reader
            .read_turn()
            .with_context(|| format!("failed to read turn {}", played + 1))?;
    }

    let thor = query::thor(session.world());
    tracing::info!(
        turns = played,
        position = %thor.position(),
        charges_left = thor.charges_left(),
        "input exhausted"
    );
    Ok(played)
}

#[cfg(test)]
mod tests {
    use super::*;
    use thor_arena_system_decision::StrategyKind;

    fn settings(width: u32, height: u32, strike_radius: u32) -> Settings {
        Settings {
            arena: ArenaConfig {
                width,
                height,
                strike_radius,
            },
            strategy: StrategyKind::FollowMostDistant,
        }
    }

    fn play(input: &str, settings: Settings) -> (Result<usize>, String) {
        let mut output = Vec::new();
        let result = run(input.as_bytes(), &mut output, settings);
        (result, String::from_utf8(output).expect("actions are ascii"))
    }

    #[test]
    fn answers_every_turn_with_one_token() {
        let (result, output) = play("0 0\n3 1\n4 4\n3 1\n4 4\n", settings(5, 5, 1));

        assert_eq!(result.expect("game runs"), 2);
        assert_eq!(output, "SE\nSE\n");
    }

    #[test]
    fn first_turn_seeds_charges() {
        let (result, output) = play("2 2\n1 1\n2 2\n0 0\n", settings(5, 5, 1));

        assert_eq!(result.expect("game runs"), 2);
        assert_eq!(output, "STRIKE\nWAIT\n");
    }

    #[test]
    fn missing_first_turn_plays_nothing() {
        let (result, output) = play("4 4\n", settings(5, 5, 1));

        assert_eq!(result.expect("clean end"), 0);
        assert!(output.is_empty());
    }

    #[test]
    fn cornered_without_charges_aborts() {
        let (result, output) = play("0 0\n0 1\n1 1\n", settings(5, 5, 1));

        let error = result.expect_err("strike needs a charge");
        assert!(format!("{error:#}").contains("turn 1 could not be played"));
        assert_eq!(
            error.downcast_ref::<WorldError>(),
            Some(&WorldError::NoChargesLeft)
        );
        assert!(output.is_empty());
    }

    #[test]
    fn start_outside_arena_is_rejected() {
        let (result, _) = play("9 9\n1 0\n", settings(5, 5, 1));

        let error = result.expect_err("start is off the grid");
        assert!(matches!(
            error.downcast_ref::<WorldError>(),
            Some(WorldError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn session_tracks_position_across_turns() {
        let config = settings(5, 5, 1).arena;
        let mut session = Session::new(
            config,
            Point::new(0, 0),
            1,
            strategy_for(StrategyKind::DirectApproach),
        )
        .expect("valid start");

        for _ in 0..2 {
            let action = session
                .play_turn(TurnInput {
                    charges: 1,
                    hostiles: vec![Point::new(4, 4)],
                })
                .expect("turn applies");
            assert_eq!(action.to_string(), "SE");
        }

        assert_eq!(query::thor(session.world()).position(), Point::new(2, 2));
    }
}
