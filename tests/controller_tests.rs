use fogcoin_agent::adapters::outbound::init_noop_logger;
use fogcoin_agent::common::DomainError;
use fogcoin_agent::domains::knowledge::*;
use fogcoin_agent::domains::logger::DomainLogger;
use fogcoin_agent::domains::pathfinding::{Direction, MoveStrategy};
use fogcoin_agent::domains::reconciliation::Observation;
use fogcoin_agent::domains::sync::{AgentIdentity, BroadcastKind, InboundOutcome};
use fogcoin_agent::domains::turn::*;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

struct CaptureLogger {
    messages: Arc<Mutex<Vec<String>>>,
}

impl DomainLogger for CaptureLogger {
    fn info(&self, msg: &str) { self.messages.lock().unwrap().push(format!("INFO:{}", msg)); }
    fn warn(&self, msg: &str) { self.messages.lock().unwrap().push(format!("WARN:{}", msg)); }
    fn error(&self, msg: &str) { self.messages.lock().unwrap().push(format!("ERR:{}", msg)); }
}

fn settings() -> ControllerSettings {
    ControllerSettings {
        seed: Some(42),
        ..ControllerSettings::default()
    }
}

fn controller() -> TurnController {
    TurnController::new(AgentIdentity::new("lobby1", "red", "alice"), settings(), init_noop_logger())
}

fn topics_and_payloads(output: &TurnOutput) -> Vec<(String, String)> {
    output
        .messages
        .iter()
        .map(|m| (m.topic.clone(), m.payload.clone()))
        .collect()
}

#[cfg(test)]
mod turn_controller_tests {
    use super::*;

    #[test]
    fn test_turn_publishes_deltas_then_move_then_position() {
        let mut controller = controller();
        let mut obs = Observation::at(Coordinate::new(3, 1));
        obs.coin2.push(Coordinate::new(3, 3));

        let output = controller.on_observation(&obs).unwrap();

        assert_eq!(
            topics_and_payloads(&output),
            vec![
                ("games/lobby1/red/alice/seencoin2".to_string(), "[3, 3]".to_string()),
                ("games/lobby1/alice/move".to_string(), "RIGHT".to_string()),
                ("games/lobby1/red/alice/position".to_string(), "[3, 2]".to_string()),
            ]
        );
        let decision = output.decision.unwrap();
        assert_eq!(decision.direction, Direction::Right);
        assert!(matches!(decision.strategy, MoveStrategy::Objective { coin: CoinType::Two, .. }));
        assert_eq!(controller.state(), &ControllerState::AwaitingNextObservation);
    }

    #[test]
    fn test_position_is_not_committed_until_observed() {
        let mut controller = controller();
        controller.on_observation(&Observation::at(Coordinate::new(5, 5))).unwrap();

        assert_eq!(controller.store().current_position(), Some(Coordinate::new(5, 5)));
    }

    #[test]
    fn test_boxed_in_agent_issues_no_move() {
        let mut controller = controller();
        let mut obs = Observation::at(Coordinate::new(0, 0));
        obs.walls = vec![Coordinate::new(0, 1), Coordinate::new(1, 0)];

        let output = controller.on_observation(&obs).unwrap();

        assert!(output.decision.is_none());
        assert!(output.messages.iter().all(|m| !m.topic.ends_with("/move")));
        assert_eq!(output.messages.len(), 2, "only the two wall broadcasts");
        assert_eq!(controller.state(), &ControllerState::Idle);
    }

    #[test]
    fn test_invalid_observation_is_an_error() {
        let mut controller = controller();
        let obs = Observation::at(Coordinate::new(12, 0));

        let result = controller.on_observation(&obs);
        assert!(matches!(result, Err(DomainError::InvalidObservation { .. })));
    }

    #[test]
    fn test_team_broadcast_updates_store_without_moving() {
        let mut controller = controller();

        let outcome = controller
            .on_team_broadcast("games/lobby1/red/bob/seencoin3", "[8, 8]")
            .unwrap();

        assert_eq!(outcome, InboundOutcome::Applied(BroadcastKind::SeenCoin(CoinType::Three)));
        assert!(controller.store().has_coin(CoinType::Three, Coordinate::new(8, 8)));
        assert_eq!(controller.state(), &ControllerState::Idle);
    }

    #[test]
    fn test_teammate_coin_is_targeted_next_turn() {
        let mut controller = controller();
        controller
            .on_team_broadcast("games/lobby1/red/bob/seencoin3", "[5, 9]")
            .unwrap();

        let output = controller.on_observation(&Observation::at(Coordinate::new(5, 5))).unwrap();

        let decision = output.decision.unwrap();
        assert_eq!(decision.direction, Direction::Right);
        assert_eq!(
            decision.strategy,
            MoveStrategy::Objective { coin: CoinType::Three, target: Coordinate::new(5, 9) }
        );
    }

    #[test]
    fn test_score_gain_removes_coin_under_agent() {
        let mut controller = controller();
        controller.on_observation(&Observation::at(Coordinate::new(3, 1))).unwrap();
        controller
            .on_team_broadcast("games/lobby1/red/bob/seencoin1", "[3, 1]")
            .unwrap();

        let messages = controller
            .on_scores("games/lobby1/scores", r#"{"red": 1, "blue": 0}"#)
            .unwrap();

        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].topic, "games/lobby1/red/alice/collected1");
        assert_eq!(messages[0].payload, "[3, 1]");
        assert_eq!(controller.team_score(), 1);
        assert!(!controller.store().has_coin(CoinType::One, Coordinate::new(3, 1)));

        let repeated = controller
            .on_scores("games/lobby1/scores", r#"{"red": 1, "blue": 0}"#)
            .unwrap();
        assert!(repeated.is_empty());
    }

    #[test]
    fn test_score_gain_without_matching_coin() {
        let mut controller = controller();
        controller.on_observation(&Observation::at(Coordinate::new(3, 1))).unwrap();

        let messages = controller
            .on_scores("games/lobby1/scores", r#"{"red": 2}"#)
            .unwrap();

        assert!(messages.is_empty());
        assert_eq!(controller.team_score(), 2);
        assert!(controller.on_scores("games/lobby1/scores", "[]").is_err());
    }

    #[test]
    fn test_stopped_controller_ignores_input() {
        let mut controller = controller();
        controller.stop("Game Over");

        let output = controller.on_observation(&Observation::at(Coordinate::new(5, 5))).unwrap();
        assert!(output.messages.is_empty());
        assert!(output.decision.is_none());
        assert_eq!(
            controller
                .on_team_broadcast("games/lobby1/red/bob/seenwall", "[1, 1]")
                .unwrap(),
            InboundOutcome::Ignored
        );
        assert!(!controller.store().is_wall(Coordinate::new(1, 1)));
        assert_eq!(
            controller.state(),
            &ControllerState::Stopped { reason: "Game Over".to_string() }
        );
    }

    #[test]
    fn test_score_tracker_reports_gain() {
        let mut tracker = ScoreTracker::new("red");
        let mut scores = HashMap::new();
        scores.insert("blue".to_string(), 5);
        assert_eq!(tracker.update(&scores), None);

        scores.insert("red".to_string(), 3);
        assert_eq!(tracker.update(&scores), Some(3));
        assert_eq!(tracker.update(&scores), None);
        assert_eq!(tracker.current(), 3);
    }

    #[test]
    fn test_turns_are_logged() {
        let messages = Arc::new(Mutex::new(Vec::new()));
        let logger = Arc::new(CaptureLogger { messages: messages.clone() });
        let mut controller = TurnController::new(AgentIdentity::new("lobby1", "red", "alice"), settings(), logger);

        controller.on_observation(&Observation::at(Coordinate::new(5, 5))).unwrap();
        controller.stop("local stop request");

        let logged = messages.lock().unwrap();
        assert!(logged.iter().any(|m| m.starts_with("INFO:turn 1: at [5, 5] moving")));
        assert!(logged.iter().any(|m| m.contains("stopping after 1 turns: local stop request")));
    }
}
