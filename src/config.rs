use crate::domains::knowledge::GridDimensions;
use crate::domains::pathfinding::DEFAULT_EXPLORATION_PENALTY;
use crate::domains::reconciliation::DEFAULT_VISIBILITY_RADIUS;
use crate::domains::sync::AgentIdentity;
use crate::domains::turn::ControllerSettings;
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub agent: AgentConfig,
    pub grid: GridConfig,
    pub planner: PlannerConfig,
    pub bus: BusConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub lobby: String,
    pub team: String,
    pub player: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub rows: i32,
    pub columns: i32,
    pub visibility_radius: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub exploration_penalty: f64,
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BusConfig {
    pub brokers: Vec<String>,
    /// Kafka topic that carries every game topic as its record key.
    pub topic: String,
    pub client_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub filter: String,
    pub file: Option<String>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            rows: 10,
            columns: 10,
            visibility_radius: DEFAULT_VISIBILITY_RADIUS,
        }
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            exploration_penalty: DEFAULT_EXPLORATION_PENALTY,
            seed: None,
        }
    }
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            brokers: vec!["localhost:9092".to_string()],
            topic: "coin-game".to_string(),
            client_id: "fogcoin-agent".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            file: None,
        }
    }
}

impl Config {
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = tokio::fs::read_to_string(path).await?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Reads `path` if it exists, otherwise starts from defaults.
    pub async fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if tokio::fs::try_exists(path.as_ref()).await? {
            Self::from_file(path).await
        } else {
            Ok(Self::default())
        }
    }

    pub fn with_identity(mut self, player: &str, lobby: &str, team: &str) -> Self {
        self.agent = AgentConfig {
            lobby: lobby.to_string(),
            team: team.to_string(),
            player: player.to_string(),
        };
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.grid.rows <= 0 || self.grid.columns <= 0 {
            bail!("grid must have positive size, got {}x{}", self.grid.rows, self.grid.columns);
        }
        if self.grid.visibility_radius < 0 {
            bail!("visibility radius must not be negative");
        }
        let penalty = self.planner.exploration_penalty;
        if !penalty.is_finite() || penalty < 0.0 {
            bail!("exploration penalty must be a finite non-negative number, got {}", penalty);
        }
        for (field, value) in [
            ("lobby", &self.agent.lobby),
            ("team", &self.agent.team),
            ("player", &self.agent.player),
        ] {
            if value.is_empty() {
                bail!("agent {} must not be empty", field);
            }
            if value.contains(['/', '+', '#']) {
                bail!("agent {} '{}' contains a topic separator or wildcard", field, value);
            }
        }
        Ok(())
    }

    pub fn identity(&self) -> AgentIdentity {
        AgentIdentity::new(&self.agent.lobby, &self.agent.team, &self.agent.player)
    }

    pub fn controller_settings(&self) -> ControllerSettings {
        ControllerSettings {
            dimensions: GridDimensions::new(self.grid.rows, self.grid.columns),
            visibility_radius: self.grid.visibility_radius,
            exploration_penalty: self.planner.exploration_penalty,
            seed: self.planner.seed,
        }
    }
}
