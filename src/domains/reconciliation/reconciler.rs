use super::events::MapDelta;
use super::observation::Observation;
use crate::common::{DomainError, DomainResult};
use crate::domains::knowledge::{CoinType, Coordinate, GridKnowledgeStore};
use std::collections::HashSet;

pub const DEFAULT_VISIBILITY_RADIUS: i32 = 2;

/// Folds first-hand observations into the knowledge store and reports what changed.
#[derive(Debug, Clone)]
pub struct ObservationReconciler {
    visibility_radius: i32,
}

impl Default for ObservationReconciler {
    fn default() -> Self {
        Self::new(DEFAULT_VISIBILITY_RADIUS)
    }
}

impl ObservationReconciler {
    pub fn new(visibility_radius: i32) -> Self {
        Self { visibility_radius }
    }

    pub fn visibility_radius(&self) -> i32 {
        self.visibility_radius
    }

    pub fn in_window(&self, center: Coordinate, c: Coordinate) -> bool {
        c.chebyshev_distance(center) <= self.visibility_radius
    }

    /// Applies `observation` to `store` and returns the deltas in broadcast order:
    /// collected coins, newly seen cells, newly seen coins, newly seen walls.
    ///
    /// Reconciling the same observation twice yields no deltas the second time.
    pub fn reconcile(
        &self,
        store: &mut GridKnowledgeStore,
        observation: &Observation,
    ) -> DomainResult<Vec<MapDelta>> {
        observation.validate(store.dimensions(), self.visibility_radius)?;

        let position = observation.current_position;
        let enemies: HashSet<Coordinate> = observation.enemy_positions.iter().copied().collect();

        store.set_current_position(position);
        store.replace_enemies(enemies.iter().copied());
        for (name, at) in observation.teammates() {
            store.upsert_teammate(name, at);
        }

        let mut deltas = Vec::new();
        self.remove_collected(store, observation, &enemies, &mut deltas)?;

        let dimensions = store.dimensions();
        for c in dimensions.window(position, self.visibility_radius) {
            if store.mark_seen(c) {
                deltas.push(MapDelta::CellSeen { at: c });
            }
        }

        for coin in CoinType::ALL {
            for &c in observation.coins(coin) {
                if c == position || enemies.contains(&c) {
                    continue;
                }
                if store.observe_coin(coin, c) {
                    deltas.push(MapDelta::CoinSeen { coin, at: c });
                }
            }
        }

        for &c in &observation.walls {
            if store.mark_wall(c) {
                deltas.push(MapDelta::WallSeen { at: c });
            }
        }

        store.rebuild_grid();
        Ok(deltas)
    }

    fn remove_collected(
        &self,
        store: &mut GridKnowledgeStore,
        observation: &Observation,
        enemies: &HashSet<Coordinate>,
        deltas: &mut Vec<MapDelta>,
    ) -> DomainResult<()> {
        let position = observation.current_position;
        for coin in CoinType::ALL {
            let reported: HashSet<Coordinate> = observation.coins(coin).iter().copied().collect();
            let mut gone: Vec<Coordinate> = store
                .coins(coin)
                .iter()
                .copied()
                .filter(|c| {
                    *c == position
                        || enemies.contains(c)
                        || (self.in_window(position, *c) && !reported.contains(c))
                })
                .collect();
            gone.sort();

            for c in gone {
                if !store.remove_coin(coin, c) {
                    return Err(DomainError::InvariantViolation {
                        reason: format!("coin {} at {} vanished during reconciliation", coin, c),
                    });
                }
                deltas.push(MapDelta::CoinCollected { coin, at: c });
            }
        }
        Ok(())
    }
}
