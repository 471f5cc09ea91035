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
use crate::scheduler::is_due;
use crate::types::card::Card;
use crate::types::timestamp::Timestamp;

/// Caps on how many cards a single queue may hold.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueLimits {
    pub new_cards: usize,
    pub reviews: usize,
}

impl Default for QueueLimits {
    fn default() -> Self {
        Self {
            new_cards: 20,
            reviews: 100,
        }
    }
}

/// Cards most at risk of being forgotten come first; ties go to the card
/// that fell due earliest. The sort is stable, so re-sorting the output
/// yields the same order.
pub fn sort_by_review_priority(cards: &[Card], now: Timestamp) -> Vec<Card> {
    priority_order(cards, now)
        .into_iter()
        .map(|i| cards[i].clone())
        .collect()
}

/// Indices into `cards` in review priority order.
pub fn priority_order(cards: &[Card], now: Timestamp) -> Vec<usize> {
    let retention: Vec<f64> = cards.iter().map(|card| get_retention(card, now)).collect();
    let mut order: Vec<usize> = (0..cards.len()).collect();
    order.sort_by(|&a, &b| {
        retention[a]
            .total_cmp(&retention[b])
            .then_with(|| cards[a].due.cmp(&cards[b].due))
    });
    order
}

/// New cards are always eligible for their first exposure.
pub fn is_eligible(card: &Card, now: Timestamp) -> bool {
    card.is_new() || is_due(card, now)
}

pub fn due_cards(cards: &[Card], now: Timestamp) -> Vec<Card> {
    cards
        .iter()
        .filter(|card| is_eligible(card, now))
        .cloned()
        .collect()
}

/// The cards to present now: due cards in priority order, followed by new
/// cards in their original order, each group capped by `limits`.
pub fn build_queue(cards: &[Card], now: Timestamp, limits: QueueLimits) -> Vec<Card> {
    build_queue_indices(cards, now, limits)
        .into_iter()
        .map(|i| cards[i].clone())
        .collect()
}

/// Like [`build_queue`], but returns indices into `cards`.
pub fn build_queue_indices(cards: &[Card], now: Timestamp, limits: QueueLimits) -> Vec<usize> {
    let mut queue: Vec<usize> = priority_order(cards, now)
        .into_iter()
        .filter(|&i| !cards[i].is_new() && is_due(&cards[i], now))
        .take(limits.reviews)
        .collect();
    queue.extend(
        (0..cards.len())
            .filter(|&i| cards[i].is_new())
            .take(limits.new_cards),
    );
    log::debug!("Built queue of {} cards from {}.", queue.len(), cards.len());
    queue
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Fallible;
    use crate::scheduler::Scheduler;
    use crate::types::response::Response;

    fn now() -> Fallible<Timestamp> {
        Timestamp::parse("2025-04-10T08:00:00Z")
    }

    fn reviewed(response: Response, at: Timestamp) -> Card {
        let scheduler = Scheduler::default();
        let card = scheduler.create_card(at);
        scheduler.review_card(&card, response, at).card
    }

    fn mixed_collection() -> Fallible<Vec<Card>> {
        let now = now()?;
        Ok(vec![
            Card::new(now),
            reviewed(Response::Good, now.add_days(-30.0)),
            reviewed(Response::Easy, now.add_days(-0.25)),
            reviewed(Response::Again, now.add_days(-3.0)),
            reviewed(Response::Hard, now.add_days(-0.5)),
            Card::new(now.add_days(-2.0)),
        ])
    }

    #[test]
    fn test_scenario_e_lower_retention_first() -> Fallible<()> {
        let now = now()?;
        let easy = reviewed(Response::Easy, now.add_days(-1.0));
        let new = Card::new(now);
        let sorted = sort_by_review_priority(&[new.clone(), easy.clone()], now);
        assert!(get_retention(&easy, now) < get_retention(&new, now));
        assert_eq!(sorted, vec![easy, new]);
        Ok(())
    }

    #[test]
    fn test_ties_broken_by_due() -> Fallible<()> {
        let now = now()?;
        let later = Card::new(now);
        let earlier = Card::new(now.add_days(-3.0));
        let sorted = sort_by_review_priority(&[later.clone(), earlier.clone()], now);
        assert_eq!(sorted, vec![earlier, later]);
        Ok(())
    }

    #[test]
    fn test_sort_is_ascending_by_retention() -> Fallible<()> {
        let now = now()?;
        let sorted = sort_by_review_priority(&mixed_collection()?, now);
        let retention: Vec<f64> = sorted.iter().map(|c| get_retention(c, now)).collect();
        assert!(retention.windows(2).all(|w| w[0] <= w[1]));
        Ok(())
    }

    #[test]
    fn test_sort_is_idempotent() -> Fallible<()> {
        let now = now()?;
        let once = sort_by_review_priority(&mixed_collection()?, now);
        let twice = sort_by_review_priority(&once, now);
        assert_eq!(once, twice);
        Ok(())
    }

    #[test]
    fn test_sort_does_not_mutate_input() -> Fallible<()> {
        let cards = mixed_collection()?;
        let before = cards.clone();
        let _ = sort_by_review_priority(&cards, now()?);
        assert_eq!(cards, before);
        Ok(())
    }

    #[test]
    fn test_new_cards_always_eligible() -> Fallible<()> {
        let now = now()?;
        let future_new = Card::new(now.add_days(10.0));
        assert!(is_eligible(&future_new, now));
        let fresh = reviewed(Response::Easy, now);
        assert!(!is_eligible(&fresh, now));
        Ok(())
    }

    #[test]
    fn test_due_cards() -> Fallible<()> {
        let now = now()?;
        let due = due_cards(&mixed_collection()?, now);
        // The easy and hard cards reviewed earlier today are not due yet.
        assert_eq!(due.len(), 4);
        Ok(())
    }

    #[test]
    fn test_build_queue_limits() -> Fallible<()> {
        let now = now()?;
        let cards = mixed_collection()?;
        let queue = build_queue(
            &cards,
            now,
            QueueLimits {
                new_cards: 1,
                reviews: 1,
            },
        );
        assert_eq!(queue.len(), 2);
        assert!(!queue[0].is_new());
        assert!(queue[1].is_new());
        Ok(())
    }

    #[test]
    fn test_empty_queue() -> Fallible<()> {
        assert!(build_queue(&[], now()?, QueueLimits::default()).is_empty());
        assert!(sort_by_review_priority(&[], now()?).is_empty());
        Ok(())
    }
}
