use fogcoin_agent::common::DomainError;
use fogcoin_agent::domains::knowledge::*;
use fogcoin_agent::domains::reconciliation::MapDelta;
use fogcoin_agent::domains::sync::*;

fn scheme(player: &str) -> TopicScheme {
    TopicScheme::new(AgentIdentity::new("lobby1", "red", player))
}

fn store() -> GridKnowledgeStore {
    GridKnowledgeStore::new(GridDimensions::new(10, 10))
}

#[cfg(test)]
mod topic_tests {
    use super::*;

    #[test]
    fn test_topic_layout() {
        let scheme = scheme("alice");

        assert_eq!(scheme.game_state(), "games/lobby1/alice/game_state");
        assert_eq!(scheme.move_command(), "games/lobby1/alice/move");
        assert_eq!(scheme.start(), "games/lobby1/start");
        assert_eq!(scheme.scores(), "games/lobby1/scores");
        assert_eq!(scheme.lobby(), "games/lobby1/lobby");
        assert_eq!(scheme.team_wildcard(), "games/lobby1/red/+/+");
        assert_eq!(
            scheme.broadcast(BroadcastKind::SeenCoin(CoinType::Two)),
            "games/lobby1/red/alice/seencoin2"
        );
        assert_eq!(
            scheme.broadcast(BroadcastKind::Collected(CoinType::Three)),
            "games/lobby1/red/alice/collected3"
        );
        assert_eq!(scheme.broadcast(BroadcastKind::SeenWall), "games/lobby1/red/alice/seenwall");
        assert_eq!(scheme.broadcast(BroadcastKind::Position), "games/lobby1/red/alice/position");
    }

    #[test]
    fn test_parse_broadcast() {
        let scheme = scheme("alice");

        assert_eq!(
            scheme.parse_broadcast("games/lobby1/red/bob/collected1"),
            Some(("bob", BroadcastKind::Collected(CoinType::One)))
        );
        assert_eq!(scheme.parse_broadcast("games/lobby1/blue/bob/seenwall"), None);
        assert_eq!(scheme.parse_broadcast("games/lobby2/red/bob/seenwall"), None);
        assert_eq!(scheme.parse_broadcast("games/lobby1/red/bob/seencoin4"), None);
        assert_eq!(scheme.parse_broadcast("games/lobby1/red/bob/seenwall/extra"), None);
        assert_eq!(scheme.parse_broadcast("games/lobby1/alice/game_state"), None);
    }

    #[test]
    fn test_pattern_wildcards() {
        let single = TopicPattern::new("games/lobby1/red/+/+");
        assert!(single.matches("games/lobby1/red/bob/position"));
        assert!(!single.matches("games/lobby1/red/bob"));
        assert!(!single.matches("games/lobby1/red/bob/position/x"));
        assert!(!single.matches("games/lobby1/blue/bob/position"));

        let multi = TopicPattern::new("games/#");
        assert!(multi.matches("games/lobby1/scores"));
        assert!(multi.matches("games/lobby1/red/bob/seenwall"));
        assert!(!multi.matches("new_game"));

        let exact = TopicPattern::new("games/lobby1/scores");
        assert!(exact.matches("games/lobby1/scores"));
        assert!(!exact.matches("games/lobby1/scores/extra"));
    }

    #[test]
    fn test_dispatcher_routes() {
        let scheme = scheme("alice");
        let dispatcher = Dispatcher::new(&scheme);

        assert_eq!(dispatcher.route("games/lobby1/alice/game_state"), Some(Route::GameState));
        assert_eq!(dispatcher.route("games/lobby1/scores"), Some(Route::Scores));
        assert_eq!(dispatcher.route("games/lobby1/lobby"), Some(Route::Lobby));
        assert_eq!(dispatcher.route("games/lobby1/red/bob/seencoin1"), Some(Route::TeamBroadcast));
        assert_eq!(dispatcher.route("games/lobby1/bob/game_state"), None);
        assert_eq!(dispatcher.route("games/lobby1/blue/carol/position"), None);
        assert_eq!(dispatcher.subscriptions().count(), 4);
    }
}

#[cfg(test)]
mod codec_tests {
    use super::*;

    #[test]
    fn test_coordinate_payload_is_exact() {
        assert_eq!(encode_coordinate(Coordinate::new(2, 7)), "[2, 7]");
        assert_eq!(decode_coordinate("t", "[2, 7]").unwrap(), Coordinate::new(2, 7));
        assert_eq!(decode_coordinate("t", " [2,7]\n").unwrap(), Coordinate::new(2, 7));

        for bad in ["", "[2]", "[2, 7, 1]", "(2, 7)", "[2.5, 7]", "[\"2\", 7]"] {
            assert!(
                matches!(decode_coordinate("t", bad), Err(DomainError::MalformedPayload { .. })),
                "{:?} should not decode",
                bad
            );
        }
    }

    #[test]
    fn test_scores_payload() {
        let scores = decode_scores("games/lobby1/scores", r#"{"red": 4, "blue": 2}"#).unwrap();
        assert_eq!(scores.get("red"), Some(&4));
        assert!(decode_scores("games/lobby1/scores", "not json").is_err());
    }

    #[test]
    fn test_termination_markers() {
        assert_eq!(Termination::scan("{\"currentPosition\": [1, 1]}"), None);
        assert!(Termination::scan("Game Over: red wins").unwrap().is_success());
        assert_eq!(
            Termination::scan("Error: lobby full"),
            Some(Termination::Failed("Error: lobby full".to_string()))
        );
        // An error anywhere outranks the end of the match.
        assert!(!Termination::scan("Game Over after Error").unwrap().is_success());
    }
}

#[cfg(test)]
mod adapter_tests {
    use super::*;

    #[test]
    fn test_outbound_skips_seen_cells() {
        let adapter = SyncBusAdapter::new(scheme("alice"));
        let deltas = [
            MapDelta::CoinCollected { coin: CoinType::One, at: Coordinate::new(1, 1) },
            MapDelta::CellSeen { at: Coordinate::new(1, 2) },
            MapDelta::CoinSeen { coin: CoinType::Three, at: Coordinate::new(2, 2) },
            MapDelta::WallSeen { at: Coordinate::new(3, 3) },
        ];

        let messages = adapter.outbound(&deltas);
        let pairs: Vec<(&str, &str)> = messages
            .iter()
            .map(|m| (m.topic.as_str(), m.payload.as_str()))
            .collect();

        assert_eq!(
            pairs,
            vec![
                ("games/lobby1/red/alice/collected1", "[1, 1]"),
                ("games/lobby1/red/alice/seencoin3", "[2, 2]"),
                ("games/lobby1/red/alice/seenwall", "[3, 3]"),
            ]
        );
    }

    #[test]
    fn test_inbound_applies_each_kind() {
        let adapter = SyncBusAdapter::new(scheme("alice"));
        let mut store = store();

        assert_eq!(
            adapter
                .apply_inbound(&mut store, "games/lobby1/red/bob/seencoin2", "[4, 4]")
                .unwrap(),
            InboundOutcome::Applied(BroadcastKind::SeenCoin(CoinType::Two))
        );
        assert!(store.has_coin(CoinType::Two, Coordinate::new(4, 4)));

        adapter
            .apply_inbound(&mut store, "games/lobby1/red/bob/seenwall", "[5, 5]")
            .unwrap();
        assert!(store.is_wall(Coordinate::new(5, 5)));

        adapter
            .apply_inbound(&mut store, "games/lobby1/red/bob/position", "[6, 6]")
            .unwrap();
        assert_eq!(store.teammate("bob"), Some(Coordinate::new(6, 6)));

        adapter
            .apply_inbound(&mut store, "games/lobby1/red/bob/collected2", "[4, 4]")
            .unwrap();
        assert_eq!(store.total_coins(), 0);
    }

    #[test]
    fn test_redelivered_collection_is_stale_not_error() {
        let adapter = SyncBusAdapter::new(scheme("alice"));
        let mut store = store();
        store.mark_coin(CoinType::One, Coordinate::new(2, 2));
        let topic = "games/lobby1/red/bob/collected1";

        let first = adapter.apply_inbound(&mut store, topic, "[2, 2]").unwrap();
        let again = adapter.apply_inbound(&mut store, topic, "[2, 2]").unwrap();

        assert_eq!(first, InboundOutcome::Applied(BroadcastKind::Collected(CoinType::One)));
        assert_eq!(again, InboundOutcome::Stale(BroadcastKind::Collected(CoinType::One)));
    }

    #[test]
    fn test_own_echo_is_not_applied() {
        let adapter = SyncBusAdapter::new(scheme("alice"));
        let mut store = store();

        let outcome = adapter
            .apply_inbound(&mut store, "games/lobby1/red/alice/seenwall", "[5, 5]")
            .unwrap();

        assert_eq!(outcome, InboundOutcome::OwnEcho);
        assert!(!store.is_wall(Coordinate::new(5, 5)));
    }

    #[test]
    fn test_broadcast_cannot_unblock_border() {
        let adapter = SyncBusAdapter::new(scheme("alice"));
        let mut store = store();

        let outcome = adapter
            .apply_inbound(&mut store, "games/lobby1/red/bob/seencoin3", "[-1, 4]")
            .unwrap();

        assert_eq!(outcome, InboundOutcome::Stale(BroadcastKind::SeenCoin(CoinType::Three)));
        assert_eq!(store.classify(Coordinate::new(-1, 4)), CellKind::Blocked);
    }

    #[test]
    fn test_malformed_broadcast_is_reported() {
        let adapter = SyncBusAdapter::new(scheme("alice"));
        let mut store = store();

        let result = adapter.apply_inbound(&mut store, "games/lobby1/red/bob/seenwall", "5,5");
        assert!(matches!(result, Err(DomainError::MalformedPayload { .. })));

        let ignored = adapter.apply_inbound(&mut store, "games/lobby1/scores", "{}").unwrap();
        assert_eq!(ignored, InboundOutcome::Ignored);
    }

    #[test]
    fn test_collection_before_sighting_is_stale() {
        let adapter = SyncBusAdapter::new(scheme("alice"));
        let mut store = store();

        let collected = adapter
            .apply_inbound(&mut store, "games/lobby1/red/carol/collected2", "[6, 6]")
            .unwrap();
        let seen = adapter
            .apply_inbound(&mut store, "games/lobby1/red/bob/seencoin2", "[6, 6]")
            .unwrap();

        assert_eq!(collected, InboundOutcome::Stale(BroadcastKind::Collected(CoinType::Two)));
        assert_eq!(seen, InboundOutcome::Stale(BroadcastKind::SeenCoin(CoinType::Two)));
        assert_eq!(store.coin_at(Coordinate::new(6, 6)), None);
    }

    #[test]
    fn test_replicas_converge_regardless_of_order() {
        let adapter = SyncBusAdapter::new(scheme("alice"));
        let facts = [
            ("games/lobby1/red/bob/seencoin1", "[3, 3]"),
            ("games/lobby1/red/carol/seenwall", "[4, 4]"),
            ("games/lobby1/red/bob/seencoin3", "[7, 1]"),
            ("games/lobby1/red/carol/collected3", "[7, 1]"),
            ("games/lobby1/red/bob/seencoin1", "[2, 6]"),
            ("games/lobby1/red/carol/seencoin2", "[2, 6]"),
            ("games/lobby1/red/bob/seencoin2", "[5, 8]"),
            ("games/lobby1/red/carol/seenwall", "[5, 8]"),
        ];

        let mut forward = store();
        for (topic, payload) in facts {
            adapter.apply_inbound(&mut forward, topic, payload).unwrap();
        }
        let mut reversed = store();
        for (topic, payload) in facts.iter().rev() {
            adapter.apply_inbound(&mut reversed, topic, payload).unwrap();
        }

        assert_eq!(forward, reversed);
        assert_eq!(forward.coin_at(Coordinate::new(3, 3)), Some(CoinType::One));
        assert_eq!(forward.coin_at(Coordinate::new(7, 1)), None);
        assert_eq!(forward.coin_at(Coordinate::new(2, 6)), Some(CoinType::Two));
        assert_eq!(forward.coin_at(Coordinate::new(5, 8)), None);
        assert!(forward.is_wall(Coordinate::new(4, 4)));
        assert_eq!(forward.total_coins(), 2);
    }
}
