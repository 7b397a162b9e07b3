use crate::domains::knowledge::CoinType;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const NEW_GAME_TOPIC: &str = "new_game";

/// Who this agent is on the bus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentIdentity {
    pub lobby: String,
    pub team: String,
    pub player: String,
}

impl AgentIdentity {
    pub fn new(lobby: impl Into<String>, team: impl Into<String>, player: impl Into<String>) -> Self {
        Self {
            lobby: lobby.into(),
            team: team.into(),
            player: player.into(),
        }
    }
}

/// The kinds of fact exchanged between teammates, one topic level each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BroadcastKind {
    Position,
    SeenCoin(CoinType),
    Collected(CoinType),
    SeenWall,
}

impl BroadcastKind {
    pub fn parse(segment: &str) -> Option<Self> {
        match segment {
            "position" => Some(BroadcastKind::Position),
            "seenwall" => Some(BroadcastKind::SeenWall),
            _ => {
                let (prefix, value) = if let Some(rest) = segment.strip_prefix("seencoin") {
                    ("seencoin", rest)
                } else if let Some(rest) = segment.strip_prefix("collected") {
                    ("collected", rest)
                } else {
                    return None;
                };
                let coin = value.parse::<u32>().ok().and_then(CoinType::from_value)?;
                match prefix {
                    "seencoin" => Some(BroadcastKind::SeenCoin(coin)),
                    _ => Some(BroadcastKind::Collected(coin)),
                }
            }
        }
    }
}

impl fmt::Display for BroadcastKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BroadcastKind::Position => f.write_str("position"),
            BroadcastKind::SeenCoin(coin) => write!(f, "seencoin{}", coin.value()),
            BroadcastKind::Collected(coin) => write!(f, "collected{}", coin.value()),
            BroadcastKind::SeenWall => f.write_str("seenwall"),
        }
    }
}

/// Builds and parses every topic this agent publishes or listens on.
#[derive(Debug, Clone)]
pub struct TopicScheme {
    identity: AgentIdentity,
}

impl TopicScheme {
    pub fn new(identity: AgentIdentity) -> Self {
        Self { identity }
    }

    pub fn identity(&self) -> &AgentIdentity {
        &self.identity
    }

    pub fn game_state(&self) -> String {
        format!("games/{}/{}/game_state", self.identity.lobby, self.identity.player)
    }

    pub fn move_command(&self) -> String {
        format!("games/{}/{}/move", self.identity.lobby, self.identity.player)
    }

    pub fn start(&self) -> String {
        format!("games/{}/start", self.identity.lobby)
    }

    pub fn scores(&self) -> String {
        format!("games/{}/scores", self.identity.lobby)
    }

    pub fn lobby(&self) -> String {
        format!("games/{}/lobby", self.identity.lobby)
    }

    pub fn broadcast(&self, kind: BroadcastKind) -> String {
        format!(
            "games/{}/{}/{}/{}",
            self.identity.lobby, self.identity.team, self.identity.player, kind
        )
    }

    /// Every teammate broadcast, own echoes included.
    pub fn team_wildcard(&self) -> String {
        format!("games/{}/{}/+/+", self.identity.lobby, self.identity.team)
    }

    /// Splits a team broadcast topic into (sender, kind). `None` for anything
    /// that is not a broadcast of this agent's team.
    pub fn parse_broadcast<'t>(&self, topic: &'t str) -> Option<(&'t str, BroadcastKind)> {
        let mut levels = topic.split('/');
        let (games, lobby, team, sender, kind) =
            (levels.next()?, levels.next()?, levels.next()?, levels.next()?, levels.next()?);
        if levels.next().is_some() || games != "games" {
            return None;
        }
        if lobby != self.identity.lobby || team != self.identity.team {
            return None;
        }
        Some((sender, BroadcastKind::parse(kind)?))
    }
}

/// MQTT-style topic filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicPattern(String);

impl TopicPattern {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self(pattern.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn matches(&self, topic: &str) -> bool {
        let mut pattern = self.0.split('/');
        let mut levels = topic.split('/');
        loop {
            match (pattern.next(), levels.next()) {
                (Some("#"), _) => return true,
                (Some("+"), Some(_)) => {}
                (Some(p), Some(level)) if p == level => {}
                (None, None) => return true,
                _ => return false,
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    GameState,
    TeamBroadcast,
    Scores,
    Lobby,
}

/// Topic pattern to handler table, built once per agent. First match wins.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    routes: Vec<(TopicPattern, Route)>,
}

impl Dispatcher {
    pub fn new(scheme: &TopicScheme) -> Self {
        Self {
            routes: vec![
                (TopicPattern::new(scheme.game_state()), Route::GameState),
                (TopicPattern::new(scheme.scores()), Route::Scores),
                (TopicPattern::new(scheme.lobby()), Route::Lobby),
                (TopicPattern::new(scheme.team_wildcard()), Route::TeamBroadcast),
            ],
        }
    }

    pub fn route(&self, topic: &str) -> Option<Route> {
        self.routes
            .iter()
            .find(|(pattern, _)| pattern.matches(topic))
            .map(|(_, route)| *route)
    }

    /// The patterns to subscribe to so that every route can fire.
    pub fn subscriptions(&self) -> impl Iterator<Item = &str> {
        self.routes.iter().map(|(pattern, _)| pattern.as_str())
    }
}
