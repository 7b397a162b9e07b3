use super::score::ScoreTracker;
use crate::common::{DomainResult, OutboundMessage};
use crate::domains::knowledge::{render_known_map, render_window, GridDimensions, GridKnowledgeStore};
use crate::domains::logger::DynLogger;
use crate::domains::pathfinding::{MoveDecision, MoveStrategy, Pathfinder, DEFAULT_EXPLORATION_PENALTY};
use crate::domains::reconciliation::{MapDelta, Observation, ObservationReconciler, DEFAULT_VISIBILITY_RADIUS};
use crate::domains::sync::{decode_scores, AgentIdentity, InboundOutcome, SyncBusAdapter, TopicScheme};
use rand::rngs::StdRng;
use rand::SeedableRng;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerState {
    Idle,
    /// A move was issued; the next observation tells where the agent really is.
    AwaitingNextObservation,
    Stopped { reason: String },
}

#[derive(Debug, Clone)]
pub struct ControllerSettings {
    pub dimensions: GridDimensions,
    pub visibility_radius: i32,
    pub exploration_penalty: f64,
    pub seed: Option<u64>,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            dimensions: GridDimensions::new(10, 10),
            visibility_radius: DEFAULT_VISIBILITY_RADIUS,
            exploration_penalty: DEFAULT_EXPLORATION_PENALTY,
            seed: None,
        }
    }
}

/// Everything one observation produced, messages in publish order.
#[derive(Debug, Clone, Default)]
pub struct TurnOutput {
    pub deltas: Vec<MapDelta>,
    pub decision: Option<MoveDecision>,
    pub messages: Vec<OutboundMessage>,
}

/// Owns one agent's replica and drives reconcile, broadcast and move selection.
pub struct TurnController {
    store: GridKnowledgeStore,
    reconciler: ObservationReconciler,
    pathfinder: Pathfinder,
    sync: SyncBusAdapter,
    scores: ScoreTracker,
    rng: StdRng,
    state: ControllerState,
    logger: DynLogger,
    turn: u64,
}

impl TurnController {
    pub fn new(identity: AgentIdentity, settings: ControllerSettings, logger: DynLogger) -> Self {
        let rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            store: GridKnowledgeStore::new(settings.dimensions),
            reconciler: ObservationReconciler::new(settings.visibility_radius),
            pathfinder: Pathfinder::new(settings.exploration_penalty),
            scores: ScoreTracker::new(identity.team.clone()),
            sync: SyncBusAdapter::new(TopicScheme::new(identity)),
            rng,
            state: ControllerState::Idle,
            logger,
            turn: 0,
        }
    }

    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    pub fn is_stopped(&self) -> bool {
        matches!(self.state, ControllerState::Stopped { .. })
    }

    pub fn store(&self) -> &GridKnowledgeStore {
        &self.store
    }

    pub fn scheme(&self) -> &TopicScheme {
        self.sync.scheme()
    }

    pub fn team_score(&self) -> i64 {
        self.scores.current()
    }

    /// Reconcile, share the deltas, then pick and announce the next step.
    /// A stopped controller returns an empty output.
    pub fn on_observation(&mut self, observation: &Observation) -> DomainResult<TurnOutput> {
        if self.is_stopped() {
            return Ok(TurnOutput::default());
        }
        self.turn += 1;

        let deltas = self.reconciler.reconcile(&mut self.store, observation)?;
        let mut messages = self.sync.outbound(&deltas);
        let shared = messages.len();

        tracing::debug!(
            turn = self.turn,
            "window:\n{}\nknown map:\n{}",
            render_window(&self.store, self.reconciler.visibility_radius()),
            render_known_map(&self.store)
        );

        let position = observation.current_position;
        let decision = self.pathfinder.next_move(self.store.grid(), position, &mut self.rng);
        match &decision {
            Some(decision) => {
                messages.push(OutboundMessage::new(
                    self.sync.scheme().move_command(),
                    decision.direction.as_command(),
                ));
                messages.push(self.sync.position_broadcast(decision.next));
                // The move may still be refused; only the next observation says where we are.
                self.state = ControllerState::AwaitingNextObservation;
                self.logger.info(&format!(
                    "turn {}: at {} moving {} towards {}, {} facts shared",
                    self.turn,
                    position,
                    decision.direction,
                    describe(&decision.strategy),
                    shared
                ));
            }
            None => {
                self.state = ControllerState::Idle;
                self.logger.warn(&format!(
                    "turn {}: at {} every neighbour is a wall, holding position",
                    self.turn, position
                ));
            }
        }

        Ok(TurnOutput {
            deltas,
            decision,
            messages,
        })
    }

    /// Merges a teammate broadcast. Never triggers path planning.
    pub fn on_team_broadcast(&mut self, topic: &str, payload: &str) -> DomainResult<InboundOutcome> {
        if self.is_stopped() {
            return Ok(InboundOutcome::Ignored);
        }
        let outcome = self.sync.apply_inbound(&mut self.store, topic, payload)?;
        if let InboundOutcome::Stale(kind) = &outcome {
            tracing::trace!(%topic, %kind, "stale team broadcast ignored");
        }
        Ok(outcome)
    }

    /// Tracks the team score. A gain equal to the value of the coin under the
    /// agent means that coin is gone; its removal is broadcast.
    pub fn on_scores(&mut self, topic: &str, payload: &str) -> DomainResult<Vec<OutboundMessage>> {
        if self.is_stopped() {
            return Ok(Vec::new());
        }
        let scores = decode_scores(topic, payload)?;
        tracing::debug!(?scores, "scores");
        let Some(gained) = self.scores.update(&scores) else {
            return Ok(Vec::new());
        };
        self.logger.info(&format!(
            "team score now {} (+{})",
            self.scores.current(),
            gained
        ));

        let Some(position) = self.store.current_position() else {
            return Ok(Vec::new());
        };
        let collected = self
            .store
            .coin_at(position)
            .filter(|coin| i64::from(coin.value()) == gained);
        let Some(coin) = collected else {
            return Ok(Vec::new());
        };

        if !self.store.remove_coin(coin, position) {
            return Ok(Vec::new());
        }
        self.store.rebuild_grid();
        Ok(self
            .sync
            .outbound(&[MapDelta::CoinCollected { coin, at: position }]))
    }

    pub fn stop(&mut self, reason: impl Into<String>) {
        if self.is_stopped() {
            return;
        }
        let reason = reason.into();
        self.logger.info(&format!("stopping after {} turns: {}", self.turn, reason));
        self.state = ControllerState::Stopped { reason };
    }
}

fn describe(strategy: &MoveStrategy) -> String {
    match strategy {
        MoveStrategy::Objective { coin, target } => format!("coin{} at {}", coin, target),
        MoveStrategy::Explore { target } => format!("unexplored {}", target),
        MoveStrategy::Wander => "nothing (wandering)".to_string(),
    }
}
