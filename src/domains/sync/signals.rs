pub const ERROR_MARKER: &str = "Error";
pub const GAME_OVER_MARKER: &str = "Game Over";

/// Protocol-level end of the match, detected anywhere in a payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Termination {
    Failed(String),
    Completed(String),
}

impl Termination {
    /// Substring scan of the whole payload; an error marker takes precedence.
    pub fn scan(payload: &str) -> Option<Self> {
        if payload.contains(ERROR_MARKER) {
            Some(Termination::Failed(payload.to_string()))
        } else if payload.contains(GAME_OVER_MARKER) {
            Some(Termination::Completed(payload.to_string()))
        } else {
            None
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Termination::Completed(_))
    }
}
