use super::direction::Direction;
use crate::domains::knowledge::{CellKind, ClassifiedGrid, CoinType, Coordinate};
use ordered_float::OrderedFloat;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};

pub const DEFAULT_EXPLORATION_PENALTY: f64 = 200.0;

const MAX_COIN_VALUE: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MoveStrategy {
    /// Heading for a known coin.
    Objective { coin: CoinType, target: Coordinate },
    /// Heading for the best never-seen cell.
    Explore { target: Coordinate },
    /// Nothing worth reaching; random passable step.
    Wander,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveDecision {
    pub direction: Direction,
    /// Where the agent expects to be after the move. Not committed anywhere.
    pub next: Coordinate,
    pub strategy: MoveStrategy,
    pub score: Option<OrderedFloat<f64>>,
}

/// A scored search result: the cell worth reaching and the first step towards it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub target: Coordinate,
    pub first_step: Direction,
    pub path_length: u32,
    pub score: OrderedFloat<f64>,
    pub kind: CellKind,
}

#[derive(Debug, Clone)]
pub struct Pathfinder {
    exploration_penalty: f64,
}

impl Default for Pathfinder {
    fn default() -> Self {
        Self::new(DEFAULT_EXPLORATION_PENALTY)
    }
}

impl Pathfinder {
    pub fn new(exploration_penalty: f64) -> Self {
        Self { exploration_penalty }
    }

    /// Picks the next single step from `start`. Falls back to a random passable
    /// direction when nothing scores; returns `None` only when boxed in.
    pub fn next_move<R: Rng + ?Sized>(
        &self,
        grid: &ClassifiedGrid,
        start: Coordinate,
        rng: &mut R,
    ) -> Option<MoveDecision> {
        if let Some(best) = self.best_candidate(grid, start) {
            let strategy = match best.kind {
                CellKind::Coin(coin) => MoveStrategy::Objective { coin, target: best.target },
                _ => MoveStrategy::Explore { target: best.target },
            };
            return Some(MoveDecision {
                direction: best.first_step,
                next: best.first_step.step_from(start),
                strategy,
                score: Some(best.score),
            });
        }

        self.fallback(grid, start, rng).map(|direction| MoveDecision {
            direction,
            next: direction.step_from(start),
            strategy: MoveStrategy::Wander,
            score: None,
        })
    }

    /// Breadth-first search over passable cells. The lowest score wins and the
    /// first candidate found keeps ties, which makes it the nearest.
    pub fn best_candidate(&self, grid: &ClassifiedGrid, start: Coordinate) -> Option<Candidate> {
        let mut visited: HashSet<Coordinate> = HashSet::with_capacity(grid.dimensions().cell_count());
        let mut frontier: VecDeque<(Coordinate, Direction, u32)> = VecDeque::new();
        visited.insert(start);

        for direction in Direction::ALL {
            let next = direction.step_from(start);
            if grid.is_passable(next) && visited.insert(next) {
                frontier.push_back((next, direction, 1));
            }
        }

        let mut best: Option<Candidate> = None;
        while let Some((cell, first_step, path_length)) = frontier.pop_front() {
            if let Some(found) = &best {
                // Nothing at this depth or deeper can score lower.
                if OrderedFloat(path_length as f64 / MAX_COIN_VALUE) >= found.score {
                    break;
                }
            }

            if let Some(score) = self.score(grid, cell, path_length) {
                if best.map_or(true, |found| score < found.score) {
                    best = Some(Candidate {
                        target: cell,
                        first_step,
                        path_length,
                        score,
                        kind: grid.kind(cell),
                    });
                }
            }

            for direction in Direction::ALL {
                let next = direction.step_from(cell);
                if grid.is_passable(next) && visited.insert(next) {
                    frontier.push_back((next, first_step, path_length + 1));
                }
            }
        }
        best
    }

    fn score(&self, grid: &ClassifiedGrid, cell: Coordinate, path_length: u32) -> Option<OrderedFloat<f64>> {
        match grid.kind(cell) {
            CellKind::Coin(coin) => Some(OrderedFloat(path_length as f64 / coin.value() as f64)),
            CellKind::Empty if !grid.is_seen(cell) => {
                Some(OrderedFloat(path_length as f64 + self.exploration_penalty))
            }
            _ => None,
        }
    }

    fn fallback<R: Rng + ?Sized>(&self, grid: &ClassifiedGrid, start: Coordinate, rng: &mut R) -> Option<Direction> {
        let open: Vec<Direction> = Direction::ALL
            .into_iter()
            .filter(|d| grid.is_passable(d.step_from(start)))
            .collect();
        open.choose(rng).copied()
    }
}
