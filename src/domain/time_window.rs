// src/domain/time_window.rs
//
// Trending time window
//
// Each window maps to a stable remote token. Unknown tokens resolve
// to Today so persisted partitions always map back to a window.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TimeWindow {
    #[default]
    Today,
    ThisWeek,
}

impl TimeWindow {
    pub const ALL: [TimeWindow; 2] = [TimeWindow::Today, TimeWindow::ThisWeek];

    /// Token used by the remote API and as the cache partition key
    pub fn token(&self) -> &'static str {
        match self {
            TimeWindow::Today => "day",
            TimeWindow::ThisWeek => "week",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            TimeWindow::Today => "Today",
            TimeWindow::ThisWeek => "This Week",
        }
    }

    /// Resolve a remote token back to a window.
    ///
    /// Never fails: anything that is not a known token maps to `Today`.
    pub fn from_token(token: &str) -> Self {
        match token {
            "week" => TimeWindow::ThisWeek,
            _ => TimeWindow::Today,
        }
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl Serialize for TimeWindow {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.token())
    }
}

impl<'de> Deserialize<'de> for TimeWindow {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let token = String::deserialize(deserializer)?;
        Ok(TimeWindow::from_token(&token))
    }
}
