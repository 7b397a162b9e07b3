//! Plain-text map dumps for debug logging.

use super::coordinate::{CoinType, Coordinate};
use super::store::GridKnowledgeStore;

fn glyph(store: &GridKnowledgeStore, c: Coordinate) -> char {
    let dims = store.dimensions();
    if !dims.contains_with_border(c) {
        return ' ';
    }
    if store.current_position() == Some(c) {
        return 'A';
    }
    if store.teammates().values().any(|p| *p == c) {
        return 'T';
    }
    if store.enemies().contains(&c) {
        return 'E';
    }
    if store.is_wall(c) {
        return '#';
    }
    match store.coin_at(c) {
        Some(CoinType::One) => '1',
        Some(CoinType::Two) => '2',
        Some(CoinType::Three) => '3',
        None if !store.is_seen(c) => '?',
        None => '.',
    }
}

fn render_rows(store: &GridKnowledgeStore, rows: std::ops::RangeInclusive<i32>, cols: std::ops::RangeInclusive<i32>) -> String {
    rows.map(|row| {
        cols.clone()
            .map(|col| glyph(store, Coordinate::new(row, col)))
            .collect::<String>()
    })
    .collect::<Vec<_>>()
    .join("\n")
}

/// The square window of `radius` around the agent. Empty if the agent has no position yet.
pub fn render_window(store: &GridKnowledgeStore, radius: i32) -> String {
    match store.current_position() {
        Some(center) => render_rows(
            store,
            center.row - radius..=center.row + radius,
            center.col - radius..=center.col + radius,
        ),
        None => String::new(),
    }
}

/// Whole known map, border ring included.
pub fn render_known_map(store: &GridKnowledgeStore) -> String {
    let dims = store.dimensions();
    render_rows(store, -1..=dims.rows, -1..=dims.columns)
}
