use std::collections::HashMap;

/// Last known score of the agent's own team.
#[derive(Debug, Clone)]
pub struct ScoreTracker {
    team: String,
    current: i64,
}

impl ScoreTracker {
    pub fn new(team: impl Into<String>) -> Self {
        Self {
            team: team.into(),
            current: 0,
        }
    }

    pub fn current(&self) -> i64 {
        self.current
    }

    /// Records the team's entry in `scores` and returns how much it moved, if at all.
    pub fn update(&mut self, scores: &HashMap<String, i64>) -> Option<i64> {
        let latest = *scores.get(&self.team)?;
        if latest == self.current {
            return None;
        }
        let gained = latest - self.current;
        self.current = latest;
        Some(gained)
    }
}
