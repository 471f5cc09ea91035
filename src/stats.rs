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

use crate::scheduler::get_retention;
use crate::types::card::Card;
use crate::types::card::Status;
use crate::types::timestamp::Timestamp;

/// A summary of a collection's health.
#[derive(Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total: usize,
    pub new: usize,
    pub learning: usize,
    pub review: usize,
    pub relearning: usize,
    /// Cards due before the end of the current day, including overdue ones.
    pub due_today: usize,
    /// Mean over reviewed cards only.
    pub average_stability: f64,
    /// Mean over reviewed cards only.
    pub average_difficulty: f64,
    /// Mean retrievability of reviewed cards at `now`.
    pub estimated_retention: f64,
}

pub fn get_collection_stats(cards: &[Card], now: Timestamp) -> Stats {
    let end_of_day = now.end_of_day();
    let mut stats = Stats {
        total: cards.len(),
        ..Stats::default()
    };
    let mut reviewed = 0usize;
    let mut stability = 0.0;
    let mut difficulty = 0.0;
    let mut retention = 0.0;
    for card in cards {
        match card.status {
            Status::New => stats.new += 1,
            Status::Learning => stats.learning += 1,
            Status::Review => stats.review += 1,
            Status::Relearning => stats.relearning += 1,
        }
        if card.due < end_of_day {
            stats.due_today += 1;
        }
        if card.reps > 0 {
            reviewed += 1;
            stability += card.stability;
            difficulty += card.difficulty;
            retention += get_retention(card, now);
        }
    }
    if reviewed > 0 {
        let n = reviewed as f64;
        stats.average_stability = stability / n;
        stats.average_difficulty = difficulty / n;
        stats.estimated_retention = retention / n;
    }
    stats
}
