#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure decision systems that choose Thor's action for a single turn.
//!
//! Every strategy reads the world through its query surface and proposes one
//! [`Action`]. Proposals never mutate the world: charges and position change
//! only when the adapter applies the action through the world's `apply`
//! entry point, which is also where a strike without charges is rejected.

use std::fmt;

use thor_arena_core::{chebyshev_distance, euclidean_distance, Action, Point, NEIGHBOURHOOD};
use thor_arena_world::{query, SafeDistanceMap, World};

/// Capability shared by every decision policy.
pub trait Strategy: fmt::Debug {
    /// Chooses the action for the turn currently loaded into the world.
    fn decide(&mut self, world: &World) -> Action;
}

/// Selects which decision policy drives a game.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    /// Safety-aware pursuit of the most distant giant.
    #[default]
    FollowMostDistant,
    /// Straight-line pursuit of the most distant giant that ignores safe paths.
    DirectApproach,
}

/// Instantiates the policy named by `kind`.
#[must_use]
pub fn strategy_for(kind: StrategyKind) -> Box<dyn Strategy> {
    match kind {
        StrategyKind::FollowMostDistant => Box::new(FollowMostDistant::new()),
        StrategyKind::DirectApproach => Box::new(DirectApproach::new()),
    }
}

/// Pursues the giant furthest from Thor along paths that avoid every giant's reach.
///
/// Each turn the policy:
/// 1. waits when no giant remains;
/// 2. strikes when every neighbouring cell is within a giant's reach;
/// 3. strikes when the most distant giant is inside the strike radius;
/// 4. otherwise steps to the safe neighbouring cell with the smallest
///    safe-path distance to that giant, preferring the cell geometrically
///    closest to it on ties. When Thor's own cell has no safe path to the
///    giant, the safe cells are ranked by raw step distance instead.
///
/// The most distant giant is the first one encountered with the maximum
/// Chebyshev distance, so input order decides ties.
#[derive(Debug, Default)]
pub struct FollowMostDistant {
    distances: SafeDistanceMap,
    candidates: Vec<Point>,
}

impl FollowMostDistant {
    /// Creates the policy with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Strategy for FollowMostDistant {
    fn decide(&mut self, world: &World) -> Action {
        let Some(target) = prepare_turn(world, &mut self.candidates) else {
            return Action::Wait;
        };
        let thor = query::thor(world);
        if self.candidates.is_empty() {
            tracing::debug!(thor = %thor.position(), "cornered; striking");
            return Action::Strike;
        }

        if thor.can_strike(target) {
            return Action::Strike;
        }

        self.distances.rebuild(query::grid(world), target);
        if self.distances.is_reachable(thor.position()) {
            let distances = &self.distances;
            let distance = |point: Point| distances.distance(point).unwrap_or(u32::MAX);
            self.candidates.sort_by(|lhs, rhs| {
                distance(*lhs).cmp(&distance(*rhs)).then_with(|| {
                    euclidean_distance(*lhs, target).total_cmp(&euclidean_distance(*rhs, target))
                })
            });
        } else {
            tracing::debug!(
                thor = %thor.position(),
                %target,
                "no safe path to target; ranking by raw distance"
            );
            rank_by_raw_distance(&mut self.candidates, target);
        }

        step_to_best(thor.position(), target, &self.candidates)
    }
}

/// Heads straight for the most distant giant, striking only when cornered or in range.
///
/// Safe neighbouring cells are ranked by raw Chebyshev distance to the giant;
/// no safe-path field is built.
#[derive(Debug, Default)]
pub struct DirectApproach {
    candidates: Vec<Point>,
}

impl DirectApproach {
    /// Creates the policy with an empty scratch buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Strategy for DirectApproach {
    fn decide(&mut self, world: &World) -> Action {
        let Some(target) = prepare_turn(world, &mut self.candidates) else {
            return Action::Wait;
        };
        let thor = query::thor(world);
        if self.candidates.is_empty() || thor.can_strike(target) {
            return Action::Strike;
        }

        rank_by_raw_distance(&mut self.candidates, target);
        step_to_best(thor.position(), target, &self.candidates)
    }
}

/// Cells in Thor's neighbourhood, his own included, that no giant can reach.
///
/// Cells are listed in neighbourhood order.
#[must_use]
pub fn allowed_positions(world: &World) -> Vec<Point> {
    let mut out = Vec::with_capacity(NEIGHBOURHOOD.len());
    collect_allowed_positions(world, &mut out);
    out
}

/// The giant furthest from Thor by Chebyshev distance.
///
/// Ties resolve to the giant listed first. Returns `None` when no giant remains.
#[must_use]
pub fn most_distant_hostile(world: &World) -> Option<Point> {
    let thor = query::thor(world).position();
    let mut best: Option<(u32, Point)> = None;
    for hostile in query::hostiles(world).iter() {
        let distance = chebyshev_distance(hostile, thor);
        match best {
            Some((best_distance, _)) if best_distance >= distance => {}
            _ => best = Some((distance, hostile)),
        }
    }
    best.map(|(_, hostile)| hostile)
}

/// Loads the turn's safe candidates and returns the giant to pursue.
fn prepare_turn(world: &World, candidates: &mut Vec<Point>) -> Option<Point> {
    let target = most_distant_hostile(world)?;
    collect_allowed_positions(world, candidates);
    Some(target)
}

fn collect_allowed_positions(world: &World, out: &mut Vec<Point>) {
    out.clear();
    let grid = query::grid(world);
    let thor = query::thor(world).position();
    out.extend(
        NEIGHBOURHOOD
            .iter()
            .map(|offset| thor + *offset)
            .filter(|cell| grid.is_safe(*cell)),
    );
}

fn rank_by_raw_distance(candidates: &mut [Point], target: Point) {
    candidates.sort_by_key(|cell| chebyshev_distance(*cell, target));
}

fn step_to_best(current: Point, target: Point, ranked: &[Point]) -> Action {
    let Some(next) = ranked.first().copied() else {
        return Action::Wait;
    };
    tracing::debug!(thor = %current, giant = %target, next = %next, "next position");
    Action::step_towards(current, next)
}
