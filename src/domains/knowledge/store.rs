use super::coordinate::{CellKind, CoinType, Coordinate, GridDimensions};
use super::grid::ClassifiedGrid;
use std::collections::{HashMap, HashSet};

/// One agent's replica of what is known about the grid.
///
/// Every mutator is idempotent, and the broadcast mutators ([`mark_wall`],
/// [`mark_coin`], [`remove_coin`]) commute: any delivery order of the same
/// facts leaves the same store.
///
/// [`mark_wall`]: Self::mark_wall
/// [`mark_coin`]: Self::mark_coin
/// [`remove_coin`]: Self::remove_coin
#[derive(Debug, Clone)]
pub struct GridKnowledgeStore {
    dimensions: GridDimensions,
    walls: HashSet<Coordinate>,
    coins: [HashSet<Coordinate>; 3],
    /// Cells whose coin is known to be gone. Only a first-hand sighting clears one.
    collected: HashSet<Coordinate>,
    seen: HashSet<Coordinate>,
    teammates: HashMap<String, Coordinate>,
    teammate_cells: HashMap<Coordinate, usize>,
    enemies: HashSet<Coordinate>,
    current_position: Option<Coordinate>,
    grid: ClassifiedGrid,
}

impl GridKnowledgeStore {
    pub fn new(dimensions: GridDimensions) -> Self {
        let walls: HashSet<Coordinate> = dimensions.border().collect();
        let mut store = Self {
            dimensions,
            walls,
            coins: [HashSet::new(), HashSet::new(), HashSet::new()],
            collected: HashSet::new(),
            seen: HashSet::new(),
            teammates: HashMap::new(),
            teammate_cells: HashMap::new(),
            enemies: HashSet::new(),
            current_position: None,
            grid: ClassifiedGrid::empty(dimensions),
        };
        store.rebuild_grid();
        store
    }

    pub fn dimensions(&self) -> GridDimensions {
        self.dimensions
    }

    /// Returns true if the wall was not known before. A coin recorded on the
    /// cell is dropped.
    pub fn mark_wall(&mut self, c: Coordinate) -> bool {
        if !self.walls.insert(c) {
            return false;
        }
        self.clear_coin(c);
        true
    }

    /// Records a reported coin. Rejected on walls, outside the grid and on
    /// cells whose coin was collected. When two reports disagree on the type
    /// the higher type is kept, whichever arrived first.
    pub fn mark_coin(&mut self, coin: CoinType, c: Coordinate) -> bool {
        if !self.dimensions.contains(c) || self.walls.contains(&c) || self.collected.contains(&c) {
            return false;
        }
        match self.coin_at(c) {
            Some(existing) if existing >= coin => false,
            Some(existing) => {
                self.coins[existing.index()].remove(&c);
                self.coins[coin.index()].insert(c)
            }
            None => self.coins[coin.index()].insert(c),
        }
    }

    /// Records a coin the agent sees itself. This overrides an earlier
    /// collection and any other type on the cell.
    pub fn observe_coin(&mut self, coin: CoinType, c: Coordinate) -> bool {
        if !self.dimensions.contains(c) || self.walls.contains(&c) {
            return false;
        }
        self.collected.remove(&c);
        if self.coin_at(c) == Some(coin) {
            return false;
        }
        self.clear_coin(c);
        self.coins[coin.index()].insert(c)
    }

    /// Marks the cell as collected and drops whatever coin sits there.
    /// Returns whether a coin of type `coin` was removed; the mark is kept
    /// either way so a late report of the same coin stays stale.
    pub fn remove_coin(&mut self, coin: CoinType, c: Coordinate) -> bool {
        if !self.dimensions.contains(c) {
            return false;
        }
        self.collected.insert(c);
        self.clear_coin(c) == Some(coin)
    }

    fn clear_coin(&mut self, c: Coordinate) -> Option<CoinType> {
        let existing = self.coin_at(c)?;
        self.coins[existing.index()].remove(&c);
        Some(existing)
    }

    pub fn mark_seen(&mut self, c: Coordinate) -> bool {
        self.dimensions.contains(c) && self.seen.insert(c)
    }

    pub fn upsert_teammate(&mut self, name: &str, c: Coordinate) {
        let previous = match self.teammates.get_mut(name) {
            Some(position) => Some(std::mem::replace(position, c)),
            None => {
                self.teammates.insert(name.to_string(), c);
                None
            }
        };
        if previous == Some(c) {
            return;
        }
        if let Some(old) = previous {
            if let Some(count) = self.teammate_cells.get_mut(&old) {
                *count -= 1;
                if *count == 0 {
                    self.teammate_cells.remove(&old);
                }
            }
        }
        *self.teammate_cells.entry(c).or_insert(0) += 1;
    }

    pub fn set_current_position(&mut self, c: Coordinate) {
        self.current_position = Some(c);
    }

    pub fn replace_enemies<I>(&mut self, enemies: I)
    where
        I: IntoIterator<Item = Coordinate>,
    {
        self.enemies = enemies.into_iter().collect();
    }

    pub fn classify(&self, c: Coordinate) -> CellKind {
        if !self.dimensions.contains(c) || self.walls.contains(&c) {
            return CellKind::Blocked;
        }
        if self.enemies.contains(&c) || self.teammate_cells.contains_key(&c) {
            return CellKind::Blocked;
        }
        match self.coin_at(c) {
            Some(coin) => CellKind::Coin(coin),
            None => CellKind::Empty,
        }
    }

    pub fn coin_at(&self, c: Coordinate) -> Option<CoinType> {
        CoinType::ALL
            .into_iter()
            .find(|coin| self.coins[coin.index()].contains(&c))
    }

    pub fn is_wall(&self, c: Coordinate) -> bool {
        self.walls.contains(&c)
    }

    pub fn is_seen(&self, c: Coordinate) -> bool {
        self.seen.contains(&c)
    }

    pub fn has_coin(&self, coin: CoinType, c: Coordinate) -> bool {
        self.coins[coin.index()].contains(&c)
    }

    pub fn is_collected(&self, c: Coordinate) -> bool {
        self.collected.contains(&c)
    }

    pub fn walls(&self) -> &HashSet<Coordinate> {
        &self.walls
    }

    pub fn coins(&self, coin: CoinType) -> &HashSet<Coordinate> {
        &self.coins[coin.index()]
    }

    pub fn seen(&self) -> &HashSet<Coordinate> {
        &self.seen
    }

    pub fn teammates(&self) -> &HashMap<String, Coordinate> {
        &self.teammates
    }

    pub fn teammate(&self, name: &str) -> Option<Coordinate> {
        self.teammates.get(name).copied()
    }

    pub fn enemies(&self) -> &HashSet<Coordinate> {
        &self.enemies
    }

    pub fn current_position(&self) -> Option<Coordinate> {
        self.current_position
    }

    pub fn total_coins(&self) -> usize {
        self.coins.iter().map(HashSet::len).sum()
    }

    /// Dense classification used by the pathfinder. Only as fresh as the last
    /// [`rebuild_grid`](Self::rebuild_grid).
    pub fn grid(&self) -> &ClassifiedGrid {
        &self.grid
    }

    pub fn rebuild_grid(&mut self) {
        let mut grid = ClassifiedGrid::empty(self.dimensions);
        for row in 0..self.dimensions.rows {
            for col in 0..self.dimensions.columns {
                let c = Coordinate::new(row, col);
                grid.set(c, self.classify(c), self.seen.contains(&c));
            }
        }
        self.grid = grid;
    }
}

impl PartialEq for GridKnowledgeStore {
    /// Knowledge equality; the dense grid is a cache and is not compared.
    fn eq(&self, other: &Self) -> bool {
        self.dimensions == other.dimensions
            && self.walls == other.walls
            && self.coins == other.coins
            && self.collected == other.collected
            && self.seen == other.seen
            && self.teammates == other.teammates
            && self.enemies == other.enemies
            && self.current_position == other.current_position
    }
}
