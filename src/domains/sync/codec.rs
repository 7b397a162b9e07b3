use crate::common::{DomainError, DomainResult};
use crate::domains::knowledge::Coordinate;
use std::collections::HashMap;

/// `[row, col]`, the textual list form teammates exchange.
pub fn encode_coordinate(c: Coordinate) -> String {
    c.to_string()
}

/// Accepts only an exact two-element integer list.
pub fn decode_coordinate(topic: &str, payload: &str) -> DomainResult<Coordinate> {
    serde_json::from_str::<[i32; 2]>(payload.trim())
        .map(Coordinate::from)
        .map_err(|e| DomainError::MalformedPayload {
            topic: topic.to_string(),
            reason: format!("expected [row, col]: {}", e),
        })
}

pub fn decode_scores(topic: &str, payload: &str) -> DomainResult<HashMap<String, i64>> {
    serde_json::from_str(payload).map_err(|e| DomainError::MalformedPayload {
        topic: topic.to_string(),
        reason: format!("expected team score map: {}", e),
    })
}
