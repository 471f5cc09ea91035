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

//! The SuperMemo 2 scheduler, kept for collections that predate FSRS.
//!
//! Quality ratings (0-5):
//! - 0: Complete blackout
//! - 1: Incorrect, but the answer was recognized
//! - 2: Incorrect, but the answer seemed easy to recall
//! - 3: Correct with serious difficulty
//! - 4: Correct after hesitation
//! - 5: Perfect recall

use crate::types::legacy_card::DEFAULT_EASE_FACTOR;
use crate::types::legacy_card::LegacyCard;
use crate::types::legacy_card::LegacyStatus;
use crate::types::legacy_card::MIN_EASE_FACTOR;
use crate::types::response::Response;
use crate::types::timestamp::Timestamp;

/// Cards whose interval reaches this many days are graduated.
const GRADUATION_INTERVAL: u32 = 21;

pub fn create_card() -> LegacyCard {
    LegacyCard {
        ease_factor: DEFAULT_EASE_FACTOR,
        interval: 0,
        repetitions: 0,
        status: LegacyStatus::New,
        due: None,
    }
}

/// Map a response to an SM-2 quality.
pub fn response_to_quality(response: Response) -> u8 {
    match response {
        Response::Again => 1,
        Response::Hard => 3,
        Response::Good => 4,
        Response::Easy => 5,
    }
}

pub fn calculate_next_review(card: &LegacyCard, response: Response, now: Timestamp) -> LegacyCard {
    let q = response_to_quality(response) as f64;

    // EF' = EF + (0.1 - (5-q) * (0.08 + (5-q) * 0.02))
    let ease_factor = (card.ease_factor + (0.1 - (5.0 - q) * (0.08 + (5.0 - q) * 0.02)))
        .max(MIN_EASE_FACTOR);

    let (interval, repetitions, status) = if response.is_success() {
        let repetitions = card.repetitions.saturating_add(1);
        let interval = match card.repetitions {
            0 => 1,
            1 => 6,
            _ => ((card.interval.max(1) as f64) * ease_factor).round() as u32,
        };
        let status = if interval >= GRADUATION_INTERVAL {
            LegacyStatus::Graduated
        } else if repetitions >= 2 {
            LegacyStatus::Review
        } else {
            LegacyStatus::Learning
        };
        (interval, repetitions, status)
    } else {
        (1, 0, LegacyStatus::Learning)
    };

    LegacyCard {
        ease_factor,
        interval,
        repetitions,
        status,
        due: Some(now.add_days(interval as f64)),
    }
}

/// Cards without a due date have never been scheduled and are always due.
pub fn is_due_for_review(card: &LegacyCard, today: Timestamp) -> bool {
    match card.due {
        Some(due) => due <= today,
        None => true,
    }
}

/// Previously-seen cards that are due.
pub fn get_cards_for_review(cards: &[LegacyCard], today: Timestamp) -> Vec<LegacyCard> {
    cards
        .iter()
        .filter(|card| card.status != LegacyStatus::New && is_due_for_review(card, today))
        .cloned()
        .collect()
}

pub fn get_new_cards(cards: &[LegacyCard]) -> Vec<LegacyCard> {
    cards
        .iter()
        .filter(|card| card.status == LegacyStatus::New)
        .cloned()
        .collect()
}
