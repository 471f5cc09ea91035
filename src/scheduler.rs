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

use crate::fsrs::Days;
use crate::fsrs::MAX_DIFFICULTY;
use crate::fsrs::MIN_DIFFICULTY;
use crate::fsrs::MIN_STABILITY;
use crate::fsrs::Retrievability;
use crate::fsrs::Stability;
use crate::fsrs::initial_difficulty;
use crate::fsrs::initial_stability;
use crate::fsrs::interval;
use crate::fsrs::new_difficulty;
use crate::fsrs::retrievability;
use crate::fsrs::stability_after_lapse;
use crate::fsrs::stability_after_success;
use crate::params::Parameters;
use crate::types::card::Card;
use crate::types::card::Status;
use crate::types::response::Grade;
use crate::types::response::Response;
use crate::types::timestamp::Timestamp;

/// The result of reviewing a card.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewOutcome {
    pub card: Card,
    pub next_review_date: Timestamp,
    pub interval: Days,
}

/// The FSRS scheduler. Holds only its configuration; every operation is a
/// pure function of its arguments.
#[derive(Clone, Debug, Default)]
pub struct Scheduler {
    params: Parameters,
}

impl Scheduler {
    pub fn new(params: Parameters) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &Parameters {
        &self.params
    }

    pub fn create_card(&self, now: Timestamp) -> Card {
        Card::new(now)
    }

    /// Apply a review to a card, returning the updated card. The input is
    /// left untouched.
    pub fn review_card(&self, card: &Card, response: Response, now: Timestamp) -> ReviewOutcome {
        let w = &self.params.weights;
        let grade = Grade::from(response);
        let first = card.is_new() || !(card.stability > 0.0);

        let elapsed_days = if card.is_new() {
            0.0
        } else {
            now.days_since(card.reference_time())
        };
        let r: Retrievability = if first {
            1.0
        } else {
            retrievability(elapsed_days, card.stability)
        };

        let (stability, difficulty) = if first {
            (initial_stability(w, grade), initial_difficulty(w, grade))
        } else {
            let d = card.difficulty.clamp(MIN_DIFFICULTY, MAX_DIFFICULTY);
            let s = if response.is_success() {
                stability_after_success(w, d, card.stability, r, grade)
            } else {
                self.lapse_stability(card, d, r)
            };
            (s, new_difficulty(w, d, grade))
        };

        let lapses = if !response.is_success() && !card.is_new() {
            card.lapses.saturating_add(1)
        } else {
            card.lapses
        };

        let status = self.next_status(card.status, response, stability);
        let scheduled_days = self.interval_for(status, stability);
        let due = now.add_days(scheduled_days);

        log::debug!(
            "Reviewed card as {response}: {} -> {}, R={r:.3}, S={stability:.2}, \
             D={difficulty:.2}, interval={scheduled_days:.2}d",
            card.status.as_str(),
            status.as_str(),
        );

        let card = Card {
            due,
            stability,
            difficulty,
            elapsed_days,
            scheduled_days,
            reps: card.reps.saturating_add(1),
            lapses,
            status,
            last_review: Some(now),
        };
        ReviewOutcome {
            card,
            next_review_date: due,
            interval: scheduled_days,
        }
    }

    /// The outcome of each response, in `Again`, `Hard`, `Good`, `Easy`
    /// order.
    pub fn preview(&self, card: &Card, now: Timestamp) -> [ReviewOutcome; 4] {
        Response::ALL.map(|response| self.review_card(card, response, now))
    }

    pub fn is_due(&self, card: &Card, now: Timestamp) -> bool {
        is_due(card, now)
    }

    pub fn get_retention(&self, card: &Card, now: Timestamp) -> Retrievability {
        get_retention(card, now)
    }

    fn lapse_stability(&self, card: &Card, d: f64, r: Retrievability) -> Stability {
        let w = &self.params.weights;
        let mut s = stability_after_lapse(w, d, card.stability, r);
        if card.status == Status::Relearning {
            s *= self.params.relapse_severity;
        }
        s.min(card.stability * self.params.lapse_ceiling)
            .max(MIN_STABILITY)
    }

    fn next_status(&self, current: Status, response: Response, stability: Stability) -> Status {
        let success = response.is_success();
        match current {
            Status::New => Status::Learning,
            Status::Learning => {
                if success && stability >= self.params.graduation_stability {
                    Status::Review
                } else {
                    Status::Learning
                }
            }
            Status::Review | Status::Relearning => {
                if success {
                    Status::Review
                } else {
                    Status::Relearning
                }
            }
        }
    }

    fn interval_for(&self, status: Status, stability: Stability) -> Days {
        let p = &self.params;
        let raw = interval(p.desired_retention, stability);
        let raw = if raw.is_finite() { raw } else { 0.0 };
        if status.is_short_term() {
            raw.min(p.max_short_interval).max(p.min_short_interval)
        } else {
            raw.round().min(p.maximum_interval).max(1.0)
        }
    }
}

pub fn is_due(card: &Card, now: Timestamp) -> bool {
    card.due <= now
}

/// The modeled probability that the card is remembered at `now`. Cards that
/// were never reviewed are fully retained.
pub fn get_retention(card: &Card, now: Timestamp) -> Retrievability {
    if card.reps == 0 {
        return 1.0;
    }
    let elapsed = now.days_since(card.reference_time());
    let r = retrievability(elapsed, card.stability);
    if r.is_finite() { r.clamp(0.0, 1.0) } else { 0.0 }
}
