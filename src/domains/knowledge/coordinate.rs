use serde::{Deserialize, Serialize};
use std::fmt;

/// A grid position as (row, column). Serialized as a two-element list `[row, col]`,
/// which is the shape used by every payload on the game bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "[i32; 2]", into = "[i32; 2]")]
pub struct Coordinate {
    pub row: i32,
    pub col: i32,
}

impl Coordinate {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    pub fn offset(self, d_row: i32, d_col: i32) -> Self {
        Self::new(self.row + d_row, self.col + d_col)
    }

    /// Chebyshev distance; the visibility window is a square so this is the
    /// natural "is it in view" metric.
    pub fn chebyshev_distance(self, other: Coordinate) -> i32 {
        (self.row - other.row).abs().max((self.col - other.col).abs())
    }
}

impl From<[i32; 2]> for Coordinate {
    fn from([row, col]: [i32; 2]) -> Self {
        Self { row, col }
    }
}

impl From<Coordinate> for [i32; 2] {
    fn from(c: Coordinate) -> Self {
        [c.row, c.col]
    }
}

impl From<(i32, i32)> for Coordinate {
    fn from((row, col): (i32, i32)) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.row, self.col)
    }
}

/// Coin value class. The numeric value doubles as the score divisor in path planning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CoinType {
    One,
    Two,
    Three,
}

impl CoinType {
    pub const ALL: [CoinType; 3] = [CoinType::One, CoinType::Two, CoinType::Three];

    pub fn value(self) -> u32 {
        match self {
            CoinType::One => 1,
            CoinType::Two => 2,
            CoinType::Three => 3,
        }
    }

    pub fn from_value(value: u32) -> Option<Self> {
        match value {
            1 => Some(CoinType::One),
            2 => Some(CoinType::Two),
            3 => Some(CoinType::Three),
            _ => None,
        }
    }

    pub(crate) fn index(self) -> usize {
        self.value() as usize - 1
    }
}

impl fmt::Display for CoinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// Derived classification of a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellKind {
    Empty,
    Blocked,
    Coin(CoinType),
}

impl CellKind {
    pub fn is_blocked(self) -> bool {
        matches!(self, CellKind::Blocked)
    }
}

/// Fixed grid size, set once when the store is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridDimensions {
    pub rows: i32,
    pub columns: i32,
}

impl GridDimensions {
    pub fn new(rows: i32, columns: i32) -> Self {
        Self { rows, columns }
    }

    pub fn contains(&self, c: Coordinate) -> bool {
        c.row >= 0 && c.row < self.rows && c.col >= 0 && c.col < self.columns
    }

    /// In-bounds or on the one-cell border ring around the grid.
    pub fn contains_with_border(&self, c: Coordinate) -> bool {
        c.row >= -1 && c.row <= self.rows && c.col >= -1 && c.col <= self.columns
    }

    pub fn is_border(&self, c: Coordinate) -> bool {
        self.contains_with_border(c) && !self.contains(c)
    }

    /// Every coordinate of the border perimeter, corners included.
    pub fn border(&self) -> impl Iterator<Item = Coordinate> + '_ {
        let horizontal = (-1..=self.columns)
            .flat_map(move |col| [Coordinate::new(-1, col), Coordinate::new(self.rows, col)]);
        let vertical = (-1..=self.rows)
            .flat_map(move |row| [Coordinate::new(row, -1), Coordinate::new(row, self.columns)]);
        horizontal.chain(vertical)
    }

    pub fn cell_count(&self) -> usize {
        (self.rows.max(0) as usize) * (self.columns.max(0) as usize)
    }

    pub(crate) fn index_of(&self, c: Coordinate) -> Option<usize> {
        if self.contains(c) {
            Some((c.row * self.columns + c.col) as usize)
        } else {
            None
        }
    }

    /// All in-bounds cells within `radius` (Chebyshev) of `center`.
    pub fn window(&self, center: Coordinate, radius: i32) -> impl Iterator<Item = Coordinate> + '_ {
        (-radius..=radius).flat_map(move |dr| {
            (-radius..=radius)
                .map(move |dc| center.offset(dr, dc))
                .filter(move |c| self.contains(*c))
        })
    }
}
