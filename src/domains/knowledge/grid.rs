use super::coordinate::{CellKind, Coordinate, GridDimensions};

/// Row-major snapshot of cell classifications plus the seen flag per cell.
/// Anything outside the grid reads as blocked and seen.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedGrid {
    dimensions: GridDimensions,
    cells: Vec<CellKind>,
    seen: Vec<bool>,
}

impl ClassifiedGrid {
    pub fn empty(dimensions: GridDimensions) -> Self {
        let count = dimensions.cell_count();
        Self {
            dimensions,
            cells: vec![CellKind::Empty; count],
            seen: vec![false; count],
        }
    }

    pub fn dimensions(&self) -> GridDimensions {
        self.dimensions
    }

    pub fn set(&mut self, c: Coordinate, kind: CellKind, seen: bool) {
        if let Some(i) = self.dimensions.index_of(c) {
            self.cells[i] = kind;
            self.seen[i] = seen;
        }
    }

    pub fn kind(&self, c: Coordinate) -> CellKind {
        self.dimensions
            .index_of(c)
            .map_or(CellKind::Blocked, |i| self.cells[i])
    }

    pub fn is_seen(&self, c: Coordinate) -> bool {
        self.dimensions.index_of(c).map_or(true, |i| self.seen[i])
    }

    pub fn is_passable(&self, c: Coordinate) -> bool {
        !self.kind(c).is_blocked()
    }
}
