use crate::domains::knowledge::{CoinType, Coordinate};
use serde::{Deserialize, Serialize};

/// A single idempotent fact produced by reconciliation and shared with teammates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MapDelta {
    CellSeen { at: Coordinate },
    CoinSeen { coin: CoinType, at: Coordinate },
    CoinCollected { coin: CoinType, at: Coordinate },
    WallSeen { at: Coordinate },
}

impl MapDelta {
    pub fn delta_type(&self) -> &'static str {
        match self {
            MapDelta::CellSeen { .. } => "CellSeen",
            MapDelta::CoinSeen { .. } => "CoinSeen",
            MapDelta::CoinCollected { .. } => "CoinCollected",
            MapDelta::WallSeen { .. } => "WallSeen",
        }
    }

    pub fn coordinate(&self) -> Coordinate {
        match self {
            MapDelta::CellSeen { at }
            | MapDelta::CoinSeen { at, .. }
            | MapDelta::CoinCollected { at, .. }
            | MapDelta::WallSeen { at } => *at,
        }
    }

    /// Whether teammates receive this fact. Seen cells stay local.
    pub fn is_shared(&self) -> bool {
        !matches!(self, MapDelta::CellSeen { .. })
    }
}
