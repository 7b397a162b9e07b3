use crate::common::{DomainError, DomainResult};
use crate::domains::knowledge::{CoinType, Coordinate, GridDimensions};
use serde::{Deserialize, Serialize};

/// The authoritative per-tick view published on `games/{lobby}/{player}/game_state`.
/// All coordinates are absolute grid coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Observation {
    pub current_position: Coordinate,
    #[serde(default)]
    pub enemy_positions: Vec<Coordinate>,
    #[serde(default)]
    pub teammate_names: Vec<String>,
    #[serde(default)]
    pub teammate_positions: Vec<Coordinate>,
    #[serde(default, rename = "coin1")]
    pub coin1: Vec<Coordinate>,
    #[serde(default, rename = "coin2")]
    pub coin2: Vec<Coordinate>,
    #[serde(default, rename = "coin3")]
    pub coin3: Vec<Coordinate>,
    #[serde(default)]
    pub walls: Vec<Coordinate>,
}

impl Observation {
    pub fn at(current_position: Coordinate) -> Self {
        Self {
            current_position,
            enemy_positions: Vec::new(),
            teammate_names: Vec::new(),
            teammate_positions: Vec::new(),
            coin1: Vec::new(),
            coin2: Vec::new(),
            coin3: Vec::new(),
            walls: Vec::new(),
        }
    }

    pub fn from_json(payload: &str) -> DomainResult<Self> {
        Ok(serde_json::from_str(payload)?)
    }

    pub fn coins(&self, coin: CoinType) -> &[Coordinate] {
        match coin {
            CoinType::One => &self.coin1,
            CoinType::Two => &self.coin2,
            CoinType::Three => &self.coin3,
        }
    }

    pub fn coins_mut(&mut self, coin: CoinType) -> &mut Vec<Coordinate> {
        match coin {
            CoinType::One => &mut self.coin1,
            CoinType::Two => &mut self.coin2,
            CoinType::Three => &mut self.coin3,
        }
    }

    pub fn teammates(&self) -> impl Iterator<Item = (&str, Coordinate)> {
        self.teammate_names
            .iter()
            .map(String::as_str)
            .zip(self.teammate_positions.iter().copied())
    }

    /// Checks the shape the reconciler relies on: everything lies inside the
    /// visibility window of `current_position`, and inside the grid (walls may
    /// also sit on the border ring).
    pub fn validate(&self, dimensions: GridDimensions, radius: i32) -> DomainResult<()> {
        let center = self.current_position;
        if !dimensions.contains(center) {
            return Err(invalid(format!("current position {} is outside the grid", center)));
        }
        if self.teammate_names.len() != self.teammate_positions.len() {
            return Err(invalid(format!(
                "{} teammate names but {} teammate positions",
                self.teammate_names.len(),
                self.teammate_positions.len()
            )));
        }

        let in_window = |c: &Coordinate| c.chebyshev_distance(center) <= radius;
        let cells = self
            .enemy_positions
            .iter()
            .map(|c| ("enemy", c))
            .chain(self.teammate_positions.iter().map(|c| ("teammate", c)))
            .chain(
                CoinType::ALL
                    .into_iter()
                    .flat_map(move |coin| self.coins(coin).iter().map(|c| ("coin", c))),
            );
        for (what, c) in cells {
            if !dimensions.contains(*c) || !in_window(c) {
                return Err(invalid(format!("{} at {} is outside the visible grid", what, c)));
            }
        }
        for c in &self.walls {
            if !dimensions.contains_with_border(*c) || !in_window(c) {
                return Err(invalid(format!("wall at {} is outside the visible grid", c)));
            }
        }
        Ok(())
    }
}

fn invalid(reason: String) -> DomainError {
    DomainError::InvalidObservation { reason }
}
