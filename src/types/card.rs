// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use serde::Deserialize;
use serde::Serialize;

use crate::fsrs::Difficulty;
use crate::fsrs::Stability;
use crate::types::timestamp::Timestamp;

/// Where a card is in its lifecycle.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Never reviewed.
    New,
    /// Reviewed, but not yet stable enough for long intervals.
    Learning,
    /// Scheduled on long, stability-driven intervals.
    Review,
    /// Forgotten after reaching review, and being learned again.
    Relearning,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::New => "new",
            Status::Learning => "learning",
            Status::Review => "review",
            Status::Relearning => "relearning",
        }
    }

    /// Learning and relearning share the short-interval regime.
    pub fn is_short_term(&self) -> bool {
        matches!(self, Status::Learning | Status::Relearning)
    }
}

/// The scheduling state of a single item.
///
/// Cards are plain values: the scheduler never mutates one, it returns a new
/// card for every review.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    /// The next scheduled review instant.
    pub due: Timestamp,
    /// Days for retrievability to decay to 90%.
    pub stability: Stability,
    /// Resistance to retention gains, in [1, 10] once reviewed.
    pub difficulty: Difficulty,
    /// Days between the previous review and the latest one.
    pub elapsed_days: f64,
    /// Days between the latest review and `due`.
    pub scheduled_days: f64,
    /// Total reviews performed.
    pub reps: u32,
    /// Times the card was forgotten after leaving the New state.
    pub lapses: u32,
    pub status: Status,
    /// When the card was last reviewed. Cards migrated from the legacy
    /// scheduler don't have this.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_review: Option<Timestamp>,
}

impl Card {
    /// A fresh, never-reviewed card due at `now`.
    pub fn new(now: Timestamp) -> Self {
        Self {
            due: now,
            stability: 0.0,
            difficulty: 0.0,
            elapsed_days: 0.0,
            scheduled_days: 0.0,
            reps: 0,
            lapses: 0,
            status: Status::New,
            last_review: None,
        }
    }

    pub fn is_new(&self) -> bool {
        self.status == Status::New
    }

    /// The instant retrievability is measured from: the last review if
    /// known, otherwise the start of the current interval.
    pub fn reference_time(&self) -> Timestamp {
        match self.last_review {
            Some(ts) => ts,
            None => self.due.add_days(-self.scheduled_days),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Fallible;

    #[test]
    fn test_new_card() -> Fallible<()> {
        let now = Timestamp::parse("2025-01-01T00:00:00Z")?;
        let card = Card::new(now);
        assert_eq!(card.due, now);
        assert_eq!(card.stability, 0.0);
        assert_eq!(card.difficulty, 0.0);
        assert_eq!(card.reps, 0);
        assert_eq!(card.lapses, 0);
        assert_eq!(card.status, Status::New);
        Ok(())
    }

    #[test]
    fn test_reference_time_without_last_review() -> Fallible<()> {
        let due = Timestamp::parse("2025-01-11T00:00:00Z")?;
        let mut card = Card::new(due);
        card.scheduled_days = 10.0;
        assert_eq!(card.reference_time(), Timestamp::parse("2025-01-01T00:00:00Z")?);
        Ok(())
    }

    #[test]
    fn test_serde_round_trip() -> Fallible<()> {
        let card = Card::new(Timestamp::parse("2025-01-01T00:00:00Z")?);
        let json = serde_json::to_string(&card)?;
        assert!(json.contains("\"elapsedDays\""));
        assert!(json.contains("\"status\":\"new\""));
        assert!(!json.contains("lastReview"));
        let back: Card = serde_json::from_str(&json)?;
        assert_eq!(card, back);
        Ok(())
    }
}
